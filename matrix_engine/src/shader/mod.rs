//! Shader module
//!
//! Splits combined GLSL sources, rewrites desktop headers for GLES and
//! wraps device programs with name-based uniform helpers. `builtin` holds
//! the GLSL 330 core sources of the compositor passes and the apps.

pub mod builtin;
mod shader_source;
mod shader_program;

pub use shader_source::{ShaderStage, ShaderSources, parse_shader, convert_for_es, source_excerpt, SOURCE_EXCERPT_CHARS};
pub use shader_program::ShaderProgram;
