/// Surface trait - where frames end up
///
/// A surface owns the native window (desktop window, X11 wallpaper window,
/// Android native window) and the context bound to it. The renderer only
/// sees the device it creates, the viewport and whether the platform is
/// restricted to direct-to-screen rendering.

use crate::error::Result;
use crate::events::GroupedEvents;
use crate::graphics_device::GraphicsDevice;
use crate::options::Options;

/// Platform limits reported by a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceCapabilities {
    /// No off-screen render targets: draw straight to the screen and fade
    pub restricted: bool,
}

pub trait Surface {
    /// Device type produced by this surface's context
    type Device: GraphicsDevice + 'static;

    /// Create the graphics context and make it current on this thread
    ///
    /// The viewport is known once this returns.
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if the window, display or context
    /// cannot be created.
    fn create_context(&mut self, options: &Options) -> Result<Self::Device>;

    /// Viewport size in pixels (fixed for the lifetime of the context)
    fn viewport(&self) -> (u32, u32);

    fn capabilities(&self) -> SurfaceCapabilities;

    /// Fold pending native events into `events`
    fn poll_events(&mut self, events: &mut GroupedEvents);

    /// Present the default framebuffer
    fn swap_buffers(&mut self) -> Result<()>;

    /// Release the device while its context is still current
    fn destroy_context(&mut self, device: Self::Device) {
        drop(device);
    }

    /// Tear down the context and the native window
    ///
    /// Safe to call more than once.
    fn destroy(&mut self);
}
