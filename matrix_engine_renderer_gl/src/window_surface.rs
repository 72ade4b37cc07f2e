/// WindowSurface - X11 window (desktop or wallpaper) with an EGL context
///
/// Three window styles come out of `Options`:
///
/// - windowed: non-resizable window of `width` x `height`
/// - fullscreen: borderless fullscreen on the current monitor
/// - wallpaper: override-redirect desktop-type window covering the monitor,
///   kept below every other window
///
/// Events are pumped without blocking once per loop iteration.

use std::time::Duration;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::platform::x11::{EventLoopBuilderExtX11, WindowAttributesExtX11, WindowType};
use winit::window::{Fullscreen, Window, WindowId, WindowLevel};

use matrix_engine::matrix::{Error, Options, Result};
use matrix_engine::matrix::device::GraphicsApi;
use matrix_engine::matrix::events::{GroupedEvents, MouseButton};
use matrix_engine::matrix::surface::{Surface, SurfaceCapabilities};
use matrix_engine::{engine_debug, engine_info, engine_warn};

use crate::egl_context::{EglContext, EglTarget};
use crate::gl_device::GlGraphicsDevice;

const SOURCE: &str = "matrix::gl::WindowSurface";

pub const WINDOW_TITLE: &str = "Matrix rain";

/// How the window is placed on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStyle {
    Windowed { width: u32, height: u32 },
    Fullscreen,
    Wallpaper,
}

impl WindowStyle {
    /// Wallpaper mode wins over fullscreen
    pub fn from_options(options: &Options) -> Self {
        if options.wallpaper_mode {
            WindowStyle::Wallpaper
        } else if options.fullscreen {
            WindowStyle::Fullscreen
        } else {
            WindowStyle::Windowed { width: options.width, height: options.height }
        }
    }

    fn covers_monitor(&self) -> bool {
        !matches!(self, WindowStyle::Windowed { .. })
    }
}

// ============================================================================
// Event translation
// ============================================================================

pub fn map_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Fold one window event into the grouped input state
pub fn apply_window_event(events: &mut GroupedEvents, event: &WindowEvent) {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => events.quit = true,
        WindowEvent::KeyboardInput { event, .. } if !event.repeat => match event.state {
            ElementState::Pressed => events.key_pressed(),
            ElementState::Released => events.key_released(),
        },
        WindowEvent::CursorMoved { position, .. } => {
            events.mouse_moved(position.x as f32, position.y as f32)
        }
        WindowEvent::MouseInput { state, button, .. } => {
            if let Some(button) = map_mouse_button(*button) {
                events.set_mouse_button(button, *state == ElementState::Pressed);
            }
        }
        _ => {}
    }
}

struct EventPump<'a> {
    events: &'a mut GroupedEvents,
}

impl ApplicationHandler for EventPump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        apply_window_event(self.events, &event);
    }
}

// ============================================================================
// WindowSurface
// ============================================================================

pub struct WindowSurface {
    // Drop order: the context goes before the window it renders to
    egl: Option<EglContext>,
    window: Option<Window>,
    /// Created on first use and kept: winit allows one event loop per process
    event_loop: Option<EventLoop<()>>,
    viewport: (u32, u32),
}

impl WindowSurface {
    pub fn new() -> Self {
        Self { egl: None, window: None, event_loop: None, viewport: (0, 0) }
    }

    fn event_loop(&mut self) -> Result<&EventLoop<()>> {
        if self.event_loop.is_none() {
            let event_loop = EventLoop::builder()
                .with_x11()
                .build()
                .map_err(|e| Error::InitializationFailed(format!("Cannot open the X11 event loop: {}", e)))?;
            self.event_loop = Some(event_loop);
        }
        self.event_loop
            .as_ref()
            .ok_or_else(|| Error::InitializationFailed("Event loop unavailable".to_string()))
    }

    fn open_window(&mut self, style: WindowStyle) -> Result<(Window, (u32, u32))> {
        let mut attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_resizable(false);
        attributes = match style {
            WindowStyle::Windowed { width, height } => attributes.with_inner_size(PhysicalSize::new(width, height)),
            WindowStyle::Fullscreen => attributes.with_fullscreen(Some(Fullscreen::Borderless(None))),
            WindowStyle::Wallpaper => attributes
                .with_decorations(false)
                .with_override_redirect(true)
                .with_x11_window_type(vec![WindowType::Desktop])
                .with_window_level(WindowLevel::AlwaysOnBottom)
                .with_position(PhysicalPosition::new(0, 0)),
        };

        #[allow(deprecated)]
        let window = self
            .event_loop()?
            .create_window(attributes)
            .map_err(|e| Error::InitializationFailed(format!("Cannot create window: {}", e)))?;

        let size = match style {
            WindowStyle::Windowed { width, height } => (width, height),
            _ => {
                let monitor = window.current_monitor().or_else(|| window.primary_monitor());
                match monitor.map(|m| m.size()) {
                    Some(size) => (size.width, size.height),
                    None => {
                        engine_warn!(SOURCE, "No monitor reported, using the window size");
                        let size = window.inner_size();
                        (size.width, size.height)
                    }
                }
            }
        };
        if style.covers_monitor() {
            let _ = window.request_inner_size(PhysicalSize::new(size.0, size.1));
        }
        Ok((window, size))
    }
}

impl Default for WindowSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Native X11 display and window of a winit window
fn x11_handles(window: &Window) -> Result<(*mut std::ffi::c_void, khronos_egl::NativeWindowType)> {
    let display = window
        .display_handle()
        .map_err(|e| Error::InitializationFailed(format!("No display handle: {}", e)))?;
    let display = match display.as_raw() {
        RawDisplayHandle::Xlib(handle) => handle.display.map_or(std::ptr::null_mut(), |d| d.as_ptr()),
        other => {
            return Err(Error::InitializationFailed(format!("Unsupported display {:?}, X11 required", other)))
        }
    };
    let handle = window
        .window_handle()
        .map_err(|e| Error::InitializationFailed(format!("No window handle: {}", e)))?;
    let native_window = match handle.as_raw() {
        RawWindowHandle::Xlib(handle) => handle.window as khronos_egl::NativeWindowType,
        other => {
            return Err(Error::InitializationFailed(format!("Unsupported window {:?}, X11 required", other)))
        }
    };
    Ok((display, native_window))
}

impl Surface for WindowSurface {
    type Device = GlGraphicsDevice;

    fn create_context(&mut self, options: &Options) -> Result<GlGraphicsDevice> {
        let style = WindowStyle::from_options(options);
        let (window, viewport) = self.open_window(style)?;
        let (display, native_window) = x11_handles(&window)?;

        // The window outlives the context: both are stored on self and the
        // context is dropped first.
        let egl = unsafe { EglContext::new(display, EglTarget::Window(native_window), GraphicsApi::DesktopGl, 0)? };
        let device = GlGraphicsDevice::new(egl.load_gl());

        engine_info!(SOURCE, "{:?} window ready ({}x{})", style, viewport.0, viewport.1);
        self.window = Some(window);
        self.egl = Some(egl);
        self.viewport = viewport;
        Ok(device)
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities { restricted: false }
    }

    fn poll_events(&mut self, events: &mut GroupedEvents) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };
        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut EventPump { events: &mut *events });
        if let PumpStatus::Exit(code) = status {
            engine_debug!(SOURCE, "Event loop exited ({})", code);
            events.quit = true;
        }
    }

    fn swap_buffers(&mut self) -> Result<()> {
        match self.egl.as_ref() {
            Some(egl) => egl.swap_buffers(),
            None => Err(Error::InvalidResource("Window surface has no context".to_string())),
        }
    }

    fn destroy(&mut self) {
        if self.egl.take().is_some() {
            engine_debug!(SOURCE, "Window context destroyed");
        }
        self.window = None;
    }
}

#[cfg(test)]
#[path = "window_surface_tests.rs"]
mod tests;
