/// Mobile live-wallpaper session
///
/// The host drives the renderer through four entry points: `initialize`
/// whenever a new native surface appears, `render_frame` once per host
/// frame callback, `touch_event` on input and `destroy` when the wallpaper
/// goes away. The host may re-initialize without destroying first.
///
/// Android's compositor can still hold the previous surface for a short
/// while after it is torn down, so the session waits a little after
/// teardown, retries a failed initialization once, and presents a few
/// blank frames on a fresh surface. These delays are heuristics, not
/// synchronization.

use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::options::{AppKind, Options};
use crate::surface::Surface;
use crate::{engine_debug, engine_error, engine_info, engine_warn};
use super::renderer::{FrameOutcome, Renderer};

const SOURCE: &str = "matrix::WallpaperSession";

/// Delays used to let the host release old surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTiming {
    /// Wait after tearing down a previous renderer
    pub teardown_delay: Duration,
    /// Wait before the single initialization retry
    pub retry_delay: Duration,
    /// Blank clear+swap cycles after a successful initialization
    pub redundant_swaps: u32,
}

impl Default for SettleTiming {
    fn default() -> Self {
        Self {
            teardown_delay: Duration::from_millis(50),
            retry_delay: Duration::from_millis(100),
            redundant_swaps: 3,
        }
    }
}

impl SettleTiming {
    /// No waiting at all
    pub fn immediate() -> Self {
        Self {
            teardown_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
            redundant_swaps: 0,
        }
    }
}

pub struct WallpaperSession<S: Surface> {
    options: Options,
    timing: SettleTiming,
    renderer: Option<Renderer<S>>,
}

impl<S: Surface> WallpaperSession<S> {
    /// Session running the matrix app, one frame per host callback
    pub fn new(timing: SettleTiming) -> Self {
        let options = Options {
            wallpaper_mode: true,
            fullscreen: false,
            app: AppKind::Matrix,
            loop_with_swap: false,
            ..Default::default()
        };
        Self::with_options(options, timing)
    }

    pub fn with_options(options: Options, timing: SettleTiming) -> Self {
        Self { options, timing, renderer: None }
    }

    pub fn renderer(&self) -> Option<&Renderer<S>> {
        self.renderer.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.renderer.is_some()
    }

    /// Start rendering to `surface`, replacing any previous renderer
    ///
    /// # Errors
    ///
    /// Returns the error of the retry when both attempts fail. Only
    /// `InitializationFailed` is retried. On any error the session is left
    /// inactive and `render_frame` becomes a no-op.
    pub fn initialize(&mut self, surface: S, width: u32, height: u32) -> Result<()> {
        if let Some(mut old) = self.renderer.take() {
            engine_info!(SOURCE, "Replacing the previous renderer");
            old.shutdown();
            thread::sleep(self.timing.teardown_delay);
        }

        let mut options = self.options.clone();
        options.width = width;
        options.height = height;

        let mut renderer = Renderer::new(surface, options);
        match renderer.initialize() {
            Ok(()) => {}
            // Only context creation is retried
            Err(Error::InitializationFailed(e)) => {
                engine_warn!(SOURCE, "Initialization failed ({}), retrying once", e);
                thread::sleep(self.timing.retry_delay);
                if let Err(e) = renderer.initialize() {
                    engine_error!(SOURCE, "Initialization failed again: {}", e);
                    renderer.shutdown();
                    return Err(e);
                }
            }
            Err(e) => {
                renderer.shutdown();
                return Err(e);
            }
        }

        for _ in 0..self.timing.redundant_swaps {
            if let Err(e) = renderer.present_blank() {
                engine_error!(SOURCE, "Settle frame failed: {}", e);
                renderer.shutdown();
                return Err(e);
            }
        }

        engine_info!(SOURCE, "Wallpaper renderer ready ({}x{})", width, height);
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Render one frame; a no-op without an active renderer
    ///
    /// Frame errors are logged, not returned, so the host keeps calling.
    pub fn render_frame(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        match renderer.run_frame() {
            Ok(FrameOutcome::Rendered(_)) | Ok(FrameOutcome::Throttled) => {}
            Ok(FrameOutcome::Quit) => engine_debug!(SOURCE, "Surface asked to quit"),
            Err(e) => engine_error!(SOURCE, "Frame failed: {}", e),
        }
    }

    /// Forward a touch to the running app as a cursor position and left button
    pub fn touch_event(&mut self, x: f32, y: f32, pressed: bool) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.events_mut().touch(x, y, pressed);
        }
    }

    pub fn destroy(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.shutdown();
            engine_info!(SOURCE, "Wallpaper renderer destroyed");
        }
    }
}

impl<S: Surface> Drop for WallpaperSession<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
#[path = "wallpaper_session_tests.rs"]
mod tests;
