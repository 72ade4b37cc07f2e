/// GraphicsDevice trait - immediate-mode GPU interface
///
/// The compositor, the frame buffer manager and the apps issue every GPU
/// command through this trait. A backend (OpenGL/GLES via glow) implements
/// it on top of a context that must be current on the calling thread.

use crate::error::Result;
use crate::graphics_device::{
    RenderTargetKey, DepthStencilKey, TextureKey, ProgramKey, VertexArrayKey,
    RenderTargetDesc, DepthStencilDesc, FramebufferStatus,
    ProgramDesc, UniformValue,
    VertexArrayDesc, PrimitiveTopology,
    TextureDesc,
};

// ============================================================================
// Common types
// ============================================================================

/// Client API of the current context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsApi {
    /// Desktop OpenGL 3.3 core
    DesktopGl,
    /// OpenGL ES 3.0
    Gles,
}

/// Device limits queried once after context creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    pub api: GraphicsApi,
    /// GL_MAX_SAMPLES
    pub max_samples: u32,
}

/// Blend equation presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Disabled,
    /// ONE, ONE_MINUS_SRC_ALPHA
    Premultiplied,
    /// SRC_ALPHA, ONE_MINUS_SRC_ALPHA
    Alpha,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// GPU command interface
///
/// Handles returned by `create_*` stay valid until the matching `destroy_*`
/// call. Destroying an unknown handle is a no-op.
pub trait GraphicsDevice {
    /// Get device limits
    fn capabilities(&self) -> DeviceCapabilities;

    // ===== RENDER TARGETS =====

    /// Create a framebuffer with a single color attachment
    ///
    /// # Arguments
    ///
    /// * `desc` - Size, sample count and format of the color attachment
    ///
    /// # Errors
    ///
    /// Returns an error if the framebuffer or its attachment cannot be created.
    /// Completeness is checked separately with `framebuffer_status`.
    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetKey>;

    /// Create a DEPTH24_STENCIL8 renderbuffer
    fn create_depth_stencil(&mut self, desc: &DepthStencilDesc) -> Result<DepthStencilKey>;

    /// Attach a depth/stencil renderbuffer to a render target
    fn attach_depth_stencil(&mut self, target: RenderTargetKey, depth: DepthStencilKey) -> Result<()>;

    /// Check completeness of a render target's framebuffer
    fn framebuffer_status(&mut self, target: RenderTargetKey) -> Result<FramebufferStatus>;

    fn destroy_render_target(&mut self, target: RenderTargetKey);

    fn destroy_depth_stencil(&mut self, depth: DepthStencilKey);

    /// Bind a render target for drawing; `None` binds the default framebuffer
    fn bind_render_target(&mut self, target: Option<RenderTargetKey>) -> Result<()>;

    /// Clear the color buffer of the bound framebuffer
    fn clear(&mut self, color: [f32; 4]);

    /// Full-resolution nearest-filter blit of `src` into `dst`
    ///
    /// Used to resolve a multisampled target into its sampleable twin.
    fn resolve(&mut self, src: RenderTargetKey, dst: RenderTargetKey) -> Result<()>;

    /// Bind the color attachment of a single-sample target to a texture unit
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` for multisampled targets.
    fn bind_target_texture(&mut self, unit: u32, target: RenderTargetKey) -> Result<()>;

    // ===== TEXTURES =====

    /// Create an RGBA8 texture from tightly packed pixels
    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> Result<TextureKey>;

    fn bind_texture(&mut self, unit: u32, texture: TextureKey) -> Result<()>;

    fn destroy_texture(&mut self, texture: TextureKey);

    // ===== PROGRAMS =====

    /// Compile and link a program
    ///
    /// Compile and link failures are logged and the program is still
    /// returned. Only failing to create the program object is an error.
    fn create_program(&mut self, desc: &ProgramDesc) -> Result<ProgramKey>;

    fn use_program(&mut self, program: ProgramKey) -> Result<()>;

    /// Location of a named uniform, `None` if the program has no active uniform by that name
    fn uniform_location(&mut self, program: ProgramKey, name: &str) -> Option<u32>;

    /// Set a uniform on `program` (binds it first)
    ///
    /// Unknown uniform names are ignored, like assignments to location -1.
    fn set_uniform(&mut self, program: ProgramKey, name: &str, value: UniformValue) -> Result<()>;

    /// Index of a named uniform block
    fn uniform_block_index(&mut self, program: ProgramKey, name: &str) -> Option<u32>;

    /// Assign a uniform block to a binding point
    fn uniform_block_binding(&mut self, program: ProgramKey, block_index: u32, binding: u32) -> Result<()>;

    fn destroy_program(&mut self, program: ProgramKey);

    // ===== GEOMETRY =====

    /// Create a vertex array and upload its initial vertices
    fn create_vertex_array(&mut self, desc: &VertexArrayDesc) -> Result<VertexArrayKey>;

    /// Replace the vertex buffer contents
    fn update_vertices(&mut self, vertex_array: VertexArrayKey, vertices: &[u8]) -> Result<()>;

    /// Draw `count` vertices starting at `first` with the bound program
    fn draw(
        &mut self,
        vertex_array: VertexArrayKey,
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
    ) -> Result<()>;

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayKey);

    // ===== STATE =====

    fn set_blend_mode(&mut self, mode: BlendMode);

    fn set_viewport(&mut self, width: u32, height: u32);

    /// Flush queued commands (called before presenting)
    fn flush(&mut self);
}
