/// Renderer - owns the surface, device, compositor and app for one run
///
/// Initialization order:
///
/// 1. surface context (the viewport is known afterwards)
/// 2. frame buffers sized to the viewport
/// 3. clock
/// 4. app setup (requests effects)
/// 5. allowed-effects mask
/// 6. compositor
///
/// Shutdown runs the reverse: app, compositor and buffers, device, surface.

use std::time::Duration;

use crate::app::{create_app, App, FrameContext, SetupContext};
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::events::GroupedEvents;
use crate::frame_buffer::{FrameBufferManager, FrameBuffers};
use crate::graphics_device::GraphicsDevice;
use crate::options::Options;
use crate::post_process::{Compositor, FrameReport};
use crate::surface::{ShutdownFlag, Surface};
use crate::{engine_debug, engine_error, engine_info, engine_warn};

const SOURCE: &str = "matrix::Renderer";

/// Longest single sleep of a throttled loop, so shutdown requests are seen
const MAX_THROTTLE_SLEEP: Duration = Duration::from_millis(250);

/// Time to sleep before the swap interval elapses, bounded by `MAX_THROTTLE_SLEEP`
fn throttle_sleep(swap_time: f32, frame_swap_delta: f32) -> Duration {
    let remaining = (swap_time - frame_swap_delta).max(0.0);
    Duration::try_from_secs_f32(remaining).map_or(MAX_THROTTLE_SLEEP, |d| d.min(MAX_THROTTLE_SLEEP))
}

/// Result of one main-loop iteration
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Rendered(FrameReport),
    /// The swap interval has not elapsed yet
    Throttled,
    /// The surface reported a quit request
    Quit,
}

struct RenderState<D> {
    device: D,
    compositor: Compositor,
    app: Box<dyn App>,
}

pub struct Renderer<S: Surface> {
    surface: S,
    options: Options,
    clock: Clock,
    events: GroupedEvents,
    /// App used by the next `initialize` instead of the factory
    pending_app: Option<Box<dyn App>>,
    state: Option<RenderState<S::Device>>,
    frames: u64,
}

impl<S: Surface> Renderer<S> {
    pub fn new(surface: S, options: Options) -> Self {
        Self::with_clock(surface, options, Clock::new())
    }

    pub fn with_clock(surface: S, options: Options, clock: Clock) -> Self {
        Self {
            surface,
            options,
            clock,
            events: GroupedEvents::new(),
            pending_app: None,
            state: None,
            frames: 0,
        }
    }

    /// Use `app` instead of the one selected by `Options::app`
    pub fn with_app(mut self, app: Box<dyn App>) -> Self {
        self.pending_app = Some(app);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn events(&self) -> &GroupedEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut GroupedEvents {
        &mut self.events
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn device(&self) -> Option<&S::Device> {
        self.state.as_ref().map(|state| &state.device)
    }

    pub fn device_mut(&mut self) -> Option<&mut S::Device> {
        self.state.as_mut().map(|state| &mut state.device)
    }

    pub fn compositor(&self) -> Option<&Compositor> {
        self.state.as_ref().map(|state| &state.compositor)
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Frames rendered since initialization
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Create the context and every GPU object needed to render
    ///
    /// On failure everything created so far is released and the renderer
    /// can be initialized again.
    ///
    /// # Errors
    ///
    /// Context creation, framebuffer completeness, program creation and app
    /// setup failures. All of them are fatal for a desktop run.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state.is_some() {
            engine_warn!(SOURCE, "Renderer is already initialized");
            return Ok(());
        }

        let mut device = self.surface.create_context(&self.options)?;
        let viewport = self.surface.viewport();
        let restricted = self.surface.capabilities().restricted;
        engine_info!(SOURCE, "Context ready: {}x{}{}",
            viewport.0, viewport.1, if restricted { " (restricted)" } else { "" });

        let app = self
            .pending_app
            .take()
            .unwrap_or_else(|| create_app(self.options.app));

        match self.build(&mut device, app, viewport, restricted) {
            Ok((compositor, app)) => {
                self.state = Some(RenderState { device, compositor, app });
                self.frames = 0;
                Ok(())
            }
            Err(e) => {
                engine_error!(SOURCE, "Initialization failed: {}", e);
                self.surface.destroy_context(device);
                Err(e)
            }
        }
    }

    fn build(
        &mut self,
        device: &mut S::Device,
        mut app: Box<dyn App>,
        viewport: (u32, u32),
        restricted: bool,
    ) -> Result<(Compositor, Box<dyn App>)> {
        let (width, height) = viewport;
        let buffers = FrameBufferManager::allocate_for(device, width, height, self.options.samples, restricted)?;

        self.clock.initialize();

        let mut settings = self.options.post_process.clone();
        let setup = app.setup(SetupContext {
            device: &mut *device,
            options: &self.options,
            settings: &mut settings,
            viewport,
            restricted,
        });
        if let Err(e) = setup {
            app.destroy(device);
            if let FrameBuffers::Triad(triad) = buffers {
                FrameBufferManager::release(device, triad);
            }
            return Err(e);
        }
        self.options.post_process = settings;
        self.options.mask_post_processing();
        engine_debug!(SOURCE, "App '{}' enabled effects {:?}", app.kind(), self.options.post_process.effects);

        match Compositor::new(device, buffers, &self.options.post_process, self.options.swap_time, viewport) {
            Ok(compositor) => Ok((compositor, app)),
            Err(e) => {
                app.destroy(device);
                Err(e)
            }
        }
    }

    /// One main-loop iteration: poll, gate, draw, composite, present
    ///
    /// # Errors
    ///
    /// Fails if the renderer is not initialized or a pass fails. The next
    /// call starts a fresh frame.
    pub fn run_frame(&mut self) -> Result<FrameOutcome> {
        let Some(state) = self.state.as_mut() else {
            return Err(Error::InitializationFailed("Renderer is not initialized".to_string()));
        };

        self.clock.tick_frame_swap();
        self.surface.poll_events(&mut self.events);
        if self.events.quit {
            return Ok(FrameOutcome::Quit);
        }

        if self.options.loop_with_swap && self.clock.frame_swap_delta_time() < self.options.swap_time {
            return Ok(FrameOutcome::Throttled);
        }

        self.clock.tick();
        let viewport = self.surface.viewport();
        let restricted = state.compositor.is_restricted();

        state.compositor.begin_frame(&mut state.device)?;
        state.app.frame(FrameContext {
            device: &mut state.device,
            clock: &self.clock,
            events: &self.events,
            viewport,
            restricted,
        })?;
        let report = state.compositor.end_frame(&mut state.device, &mut self.clock)?;
        state.device.flush();
        self.surface.swap_buffers()?;

        self.frames += 1;
        Ok(FrameOutcome::Rendered(report))
    }

    /// Clear the screen and present, without app or post-processing
    ///
    /// Used to settle freshly created mobile surfaces.
    pub fn present_blank(&mut self) -> Result<()> {
        let Some(state) = self.state.as_mut() else {
            return Err(Error::InitializationFailed("Renderer is not initialized".to_string()));
        };
        let (width, height) = self.surface.viewport();
        state.device.set_viewport(width, height);
        state.device.bind_render_target(None)?;
        state.device.clear([0.0, 0.0, 0.0, 1.0]);
        state.device.flush();
        self.surface.swap_buffers()
    }

    /// Run frames until the surface quits or `shutdown` is requested
    ///
    /// Frame errors are logged and the loop continues.
    pub fn run(&mut self, shutdown: &ShutdownFlag) -> Result<()> {
        while !shutdown.is_requested() {
            match self.run_frame() {
                Ok(FrameOutcome::Quit) => {
                    engine_info!(SOURCE, "Quit requested by the surface");
                    break;
                }
                Ok(FrameOutcome::Throttled) => {
                    std::thread::sleep(throttle_sleep(self.options.swap_time, self.clock.frame_swap_delta_time()));
                }
                Ok(FrameOutcome::Rendered(_)) => {}
                Err(e) if !self.is_initialized() => return Err(e),
                Err(e) => engine_error!(SOURCE, "Frame {} failed: {}", self.frames, e),
            }
        }
        if shutdown.is_requested() {
            engine_info!(SOURCE, "Shutdown requested");
        }
        Ok(())
    }

    /// Release everything in order while the context is current
    ///
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(mut state) = self.state.take() {
            state.app.destroy(&mut state.device);
            state.compositor.destroy(&mut state.device);
            self.surface.destroy_context(state.device);
            engine_info!(SOURCE, "Renderer shut down after {} frames", self.frames);
        }
        self.surface.destroy();
    }
}

impl<S: Surface> Drop for Renderer<S> {
    /// Release GPU objects while the surface's context is still alive
    fn drop(&mut self) {
        if self.state.is_some() {
            self.shutdown();
        }
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
