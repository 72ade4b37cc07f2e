//! Frame buffer management module
//!
//! Owns the Current/Previous/Mixing render target triad used by the
//! post-processing compositor. Each role pairs a multisampled scene target
//! with a resolved, sampleable twin.

mod buffer_triad;
mod frame_buffer_manager;

pub use buffer_triad::{BufferTriad, BufferRole, RenderTargetPair, FrameBuffers};
pub use frame_buffer_manager::{FrameBufferManager, clamp_samples};
