/// Graphics device module - the GPU abstraction used by the compositor and apps

// Module declarations
pub mod graphics_device;
pub mod handles;
pub mod render_target;
pub mod program;
pub mod geometry;
pub mod texture;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use handles::*;
pub use render_target::*;
pub use program::*;
pub use geometry::*;
pub use texture::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
