/// Vertex array descriptors

/// Primitive assembly mode for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Expected update frequency of the vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Uploaded once
    Static,
    /// Rewritten every frame
    Stream,
}

/// One float vertex attribute inside an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location
    pub location: u32,
    /// Number of f32 components (1..=4)
    pub components: u32,
    /// Byte offset inside the vertex
    pub offset: u32,
}

/// Descriptor for creating a vertex array with its vertex buffer
#[derive(Debug, Clone, Copy)]
pub struct VertexArrayDesc<'a> {
    pub name: &'a str,
    /// Byte size of one vertex
    pub stride: u32,
    pub attributes: &'a [VertexAttribute],
    /// Initial contents, typically `bytemuck::cast_slice` of a Pod vertex slice
    pub vertices: &'a [u8],
    pub usage: BufferUsage,
}
