//! Post-processing module
//!
//! The compositor runs the per-frame pass sequence (resolve, ghosting,
//! blur, composite) and rotates buffer roles between frames. On restricted
//! surfaces it falls back to fade-based ghosting on the default framebuffer.

mod fullscreen_quad;
mod compositor;

pub use fullscreen_quad::{FullscreenQuad, QUAD_VERTICES, QUAD_VERTEX_COUNT};
pub use compositor::{Compositor, FrameStage, FrameReport, FADE_ALPHA, SCENE_CLEAR_COLOR, SCREEN_CLEAR_COLOR};
