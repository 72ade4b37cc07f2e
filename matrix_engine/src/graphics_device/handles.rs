/// Opaque handles to GPU objects owned by a GraphicsDevice
///
/// Handles are slotmap keys: copying one never copies GPU data, and a stale
/// handle is detected instead of aliasing a newer object.

use slotmap::new_key_type;

new_key_type! {
    /// Framebuffer plus its color attachment
    pub struct RenderTargetKey;
    /// Depth/stencil renderbuffer shared between targets
    pub struct DepthStencilKey;
    /// Sampled 2D texture
    pub struct TextureKey;
    /// Linked vertex+fragment program
    pub struct ProgramKey;
    /// Vertex array with its vertex buffer
    pub struct VertexArrayKey;
}
