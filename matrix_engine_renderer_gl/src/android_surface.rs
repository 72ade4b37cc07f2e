/// AndroidSurface - ANativeWindow with an OpenGL ES 3.0 context
///
/// The wallpaper host hands over the native window of its surface holder.
/// Android surfaces are restricted: the compositor draws straight to the
/// window and simulates ghosting with a translucent fade. Input arrives
/// through `WallpaperSession::touch_event`, so polling does nothing.

use std::ffi::c_void;
use std::ptr::NonNull;

use raw_window_handle::RawWindowHandle;

use matrix_engine::matrix::{Error, Options, Result};
use matrix_engine::matrix::device::GraphicsApi;
use matrix_engine::matrix::events::GroupedEvents;
use matrix_engine::matrix::surface::{Surface, SurfaceCapabilities};
use matrix_engine::{engine_info, engine_warn};

use crate::egl_context::{EglContext, EglTarget};
use crate::gl_device::GlGraphicsDevice;

const SOURCE: &str = "matrix::gl::AndroidSurface";

pub struct AndroidSurface {
    native_window: NonNull<c_void>,
    /// Size reported by the host, used when EGL cannot report one
    host_size: (u32, u32),
    egl: Option<EglContext>,
    viewport: (u32, u32),
}

impl AndroidSurface {
    /// # Safety
    ///
    /// `native_window` must be a valid `ANativeWindow*` that stays alive
    /// until this surface is destroyed.
    pub unsafe fn new(native_window: NonNull<c_void>, width: u32, height: u32) -> Self {
        Self {
            native_window,
            host_size: (width, height),
            egl: None,
            viewport: (width, height),
        }
    }

    /// Build from a raw-window-handle, as handed over by the host glue
    ///
    /// # Safety
    ///
    /// Same contract as [`AndroidSurface::new`].
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` for anything but an Android NDK handle.
    pub unsafe fn from_window_handle(handle: RawWindowHandle, width: u32, height: u32) -> Result<Self> {
        match handle {
            RawWindowHandle::AndroidNdk(handle) => Ok(unsafe { Self::new(handle.a_native_window, width, height) }),
            other => Err(Error::InitializationFailed(format!("Expected an Android window handle, got {:?}", other))),
        }
    }
}

impl Surface for AndroidSurface {
    type Device = GlGraphicsDevice;

    fn create_context(&mut self, options: &Options) -> Result<GlGraphicsDevice> {
        let egl = unsafe {
            EglContext::new(
                khronos_egl::DEFAULT_DISPLAY,
                EglTarget::Window(self.native_window.as_ptr()),
                GraphicsApi::Gles,
                options.samples,
            )?
        };
        let viewport = match egl.surface_size() {
            Ok((width, height)) if width > 0 && height > 0 => (width, height),
            _ => {
                engine_warn!(SOURCE, "EGL reported no surface size, using {}x{}", self.host_size.0, self.host_size.1);
                self.host_size
            }
        };
        let device = GlGraphicsDevice::new(egl.load_gl());

        engine_info!(SOURCE, "Native window ready ({}x{})", viewport.0, viewport.1);
        self.egl = Some(egl);
        self.viewport = viewport;
        Ok(device)
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities { restricted: true }
    }

    fn poll_events(&mut self, _events: &mut GroupedEvents) {}

    fn swap_buffers(&mut self) -> Result<()> {
        match self.egl.as_ref() {
            Some(egl) => egl.swap_buffers(),
            None => Err(Error::InvalidResource("Android surface has no context".to_string())),
        }
    }

    fn destroy(&mut self) {
        if self.egl.take().is_some() {
            engine_info!(SOURCE, "EGL resources released");
        }
    }
}

#[cfg(test)]
#[path = "android_surface_tests.rs"]
mod tests;
