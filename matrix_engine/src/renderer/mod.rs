/// Renderer module - the main loop and the mobile wallpaper session

pub mod renderer;
pub mod wallpaper_session;

pub use renderer::{Renderer, FrameOutcome};
pub use wallpaper_session::{WallpaperSession, SettleTiming};
