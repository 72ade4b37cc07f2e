/// HeadlessSurface - off-screen EGL pbuffer, for rendering without a window
///
/// Runs the full pipeline on a desktop GL context with nothing on screen.
/// Used by the GPU integration tests.

use matrix_engine::matrix::{Error, Options, Result};
use matrix_engine::matrix::device::GraphicsApi;
use matrix_engine::matrix::events::GroupedEvents;
use matrix_engine::matrix::surface::{Surface, SurfaceCapabilities};
use matrix_engine::engine_debug;

use crate::egl_context::{EglContext, EglTarget};
use crate::gl_device::GlGraphicsDevice;

const SOURCE: &str = "matrix::gl::HeadlessSurface";

pub struct HeadlessSurface {
    api: GraphicsApi,
    egl: Option<EglContext>,
    viewport: (u32, u32),
}

impl HeadlessSurface {
    pub fn new(api: GraphicsApi) -> Self {
        Self { api, egl: None, viewport: (0, 0) }
    }
}

impl Surface for HeadlessSurface {
    type Device = GlGraphicsDevice;

    /// The pbuffer takes `width` x `height` from the options
    fn create_context(&mut self, options: &Options) -> Result<GlGraphicsDevice> {
        let target = EglTarget::Pbuffer { width: options.width, height: options.height };
        let egl = unsafe { EglContext::new(khronos_egl::DEFAULT_DISPLAY, target, self.api, 0)? };
        let device = GlGraphicsDevice::new(egl.load_gl());
        self.viewport = (options.width, options.height);
        self.egl = Some(egl);
        engine_debug!(SOURCE, "Pbuffer ready ({}x{})", options.width, options.height);
        Ok(device)
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities { restricted: self.api == GraphicsApi::Gles }
    }

    fn poll_events(&mut self, _events: &mut GroupedEvents) {}

    fn swap_buffers(&mut self) -> Result<()> {
        match self.egl.as_ref() {
            Some(egl) => egl.swap_buffers(),
            None => Err(Error::InvalidResource("Headless surface has no context".to_string())),
        }
    }

    fn destroy(&mut self) {
        self.egl = None;
    }
}
