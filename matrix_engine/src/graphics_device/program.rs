/// Shader program descriptors and uniform values

use glam::{Mat4, Vec2, Vec4};

/// Descriptor for creating a program from GLSL 330 core sources
///
/// Backends targeting GLES rewrite the version header before compiling.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDesc {
    /// Debug name, used in logs
    pub name: String,
    pub vertex_source: String,
    pub fragment_source: String,
}

/// Value assigned to a uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec4(Vec4),
    Mat4(Mat4),
}
