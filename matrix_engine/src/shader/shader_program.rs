/// ShaderProgram - a device program plus name-based uniform helpers

use glam::{Mat4, Vec2, Vec4};

use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, ProgramDesc, ProgramKey, UniformValue};
use crate::engine_debug;
use super::shader_source::parse_shader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    key: ProgramKey,
    name: String,
}

impl ShaderProgram {
    /// Compile and link a combined `#shader vertex` / `#shader fragment` source
    ///
    /// The desktop version header is rewritten when the device runs GLES.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program object cannot be created;
    /// compile and link failures are logged by the device.
    pub fn load(device: &mut dyn GraphicsDevice, name: &str, source: &str) -> Result<Self> {
        let sources = parse_shader(source).for_api(device.capabilities().api);
        let key = device.create_program(&ProgramDesc {
            name: name.to_string(),
            vertex_source: sources.vertex,
            fragment_source: sources.fragment,
        })?;
        engine_debug!("matrix::ShaderProgram", "Loaded program '{}'", name);
        Ok(Self { key, name: name.to_string() })
    }

    pub fn key(&self) -> ProgramKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.use_program(self.key)
    }

    pub fn uniform_location(&self, device: &mut dyn GraphicsDevice, name: &str) -> Option<u32> {
        device.uniform_location(self.key, name)
    }

    pub fn uniform_block_index(&self, device: &mut dyn GraphicsDevice, name: &str) -> Option<u32> {
        device.uniform_block_index(self.key, name)
    }

    /// Bind a named uniform block to `binding`; missing blocks are skipped
    pub fn bind_uniform_block(&self, device: &mut dyn GraphicsDevice, name: &str, binding: u32) -> Result<()> {
        match device.uniform_block_index(self.key, name) {
            Some(index) => device.uniform_block_binding(self.key, index, binding),
            None => {
                engine_debug!("matrix::ShaderProgram",
                    "Program '{}' has no uniform block '{}'", self.name, name);
                Ok(())
            }
        }
    }

    pub fn set_int(&self, device: &mut dyn GraphicsDevice, name: &str, value: i32) -> Result<()> {
        device.set_uniform(self.key, name, UniformValue::Int(value))
    }

    pub fn set_float(&self, device: &mut dyn GraphicsDevice, name: &str, value: f32) -> Result<()> {
        device.set_uniform(self.key, name, UniformValue::Float(value))
    }

    pub fn set_vec2(&self, device: &mut dyn GraphicsDevice, name: &str, value: Vec2) -> Result<()> {
        device.set_uniform(self.key, name, UniformValue::Vec2(value))
    }

    pub fn set_vec4(&self, device: &mut dyn GraphicsDevice, name: &str, value: Vec4) -> Result<()> {
        device.set_uniform(self.key, name, UniformValue::Vec4(value))
    }

    pub fn set_mat4(&self, device: &mut dyn GraphicsDevice, name: &str, value: Mat4) -> Result<()> {
        device.set_uniform(self.key, name, UniformValue::Mat4(value))
    }

    /// Delete the device program
    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        device.destroy_program(self.key);
    }
}

#[cfg(test)]
#[path = "shader_program_tests.rs"]
mod tests;
