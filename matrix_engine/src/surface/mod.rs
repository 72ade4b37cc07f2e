/// Surface module - platform windows and their graphics contexts

pub mod surface;
pub mod shutdown_flag;

pub use surface::*;
pub use shutdown_flag::ShutdownFlag;

// Scriptable surface for renderer tests (no window, no GPU)
#[cfg(test)]
pub mod mock_surface;
