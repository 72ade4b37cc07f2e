/// App trait - a visual effect driven by the renderer
///
/// The renderer calls `setup` once after the context exists and before the
/// compositor is built, `frame` once per rendered frame with the scene
/// target bound, and `destroy` once at shutdown while the context is still
/// current. Apps own their GPU objects and never touch render targets.

use crate::clock::Clock;
use crate::error::Result;
use crate::events::GroupedEvents;
use crate::graphics_device::GraphicsDevice;
use crate::options::{AppKind, Options, PostProcessSettings};
use super::{DebugApp, MatrixApp, TriangleApp};

/// Everything an app may read or adjust during setup
pub struct SetupContext<'a> {
    pub device: &'a mut dyn GraphicsDevice,
    pub options: &'a Options,
    /// Requested effects; masked with the allowed effects after setup
    pub settings: &'a mut PostProcessSettings,
    pub viewport: (u32, u32),
    pub restricted: bool,
}

/// Per-frame state handed to `App::frame`
pub struct FrameContext<'a> {
    pub device: &'a mut dyn GraphicsDevice,
    pub clock: &'a Clock,
    pub events: &'a GroupedEvents,
    pub viewport: (u32, u32),
    pub restricted: bool,
}

pub trait App {
    fn kind(&self) -> AppKind;

    /// Create GPU objects and request post-processing effects
    ///
    /// # Errors
    ///
    /// Any error aborts initialization. Objects created before the failure
    /// are released by the following `destroy` call.
    fn setup(&mut self, ctx: SetupContext<'_>) -> Result<()>;

    /// Draw into the currently bound target
    fn frame(&mut self, ctx: FrameContext<'_>) -> Result<()>;

    /// Release GPU objects and flush persistent state
    fn destroy(&mut self, device: &mut dyn GraphicsDevice);
}

/// Build the app selected by `kind`
pub fn create_app(kind: AppKind) -> Box<dyn App> {
    match kind {
        AppKind::Matrix => Box::new(MatrixApp::new()),
        AppKind::Triangle => Box::new(TriangleApp::new()),
        AppKind::Debug => Box::new(DebugApp::new()),
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
