/// Triangle app - a vertex-colored triangle spinning back and forth
///
/// Requests ghosting and a light blur so the motion leaves soft trails.

use crate::error::Result;
use crate::graphics_device::{
    BufferUsage, GraphicsDevice, PrimitiveTopology, VertexArrayDesc, VertexArrayKey, VertexAttribute,
};
use crate::options::{AppKind, PostProcessingOptions};
use crate::shader::{builtin, ShaderProgram};
use super::app::{App, FrameContext, SetupContext};

/// Position (xy) and color (rgb) per vertex
#[rustfmt::skip]
const TRIANGLE_VERTICES: [f32; 15] = [
    -0.5, -0.5,   1.0, 0.0, 0.0,
     0.0,  0.5,   0.0, 1.0, 0.0,
     0.5, -0.5,   0.0, 0.0, 1.0,
];

const ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute { location: 0, components: 2, offset: 0 },
    VertexAttribute { location: 1, components: 3, offset: 8 },
];

/// Upper bound of the `u_Time` oscillation
pub const TIME_RANGE: f32 = 10.0;

/// `u_Time` units per second
const TIME_RATE: f32 = 0.1;

pub struct TriangleApp {
    program: Option<ShaderProgram>,
    vertex_array: Option<VertexArrayKey>,
    time: f32,
    direction: f32,
}

impl TriangleApp {
    pub fn new() -> Self {
        Self {
            program: None,
            vertex_array: None,
            time: 0.0,
            direction: 1.0,
        }
    }

    /// Current `u_Time` value
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Move `time` and bounce off 0 and `TIME_RANGE`
    fn advance(&mut self, delta_time: f32) {
        self.time += self.direction * delta_time * TIME_RATE;
        if self.direction > 0.0 && self.time > TIME_RANGE {
            self.direction = -1.0;
        } else if self.direction < 0.0 && self.time < 0.0 {
            self.direction = 1.0;
        }
    }
}

impl Default for TriangleApp {
    fn default() -> Self {
        Self::new()
    }
}

impl App for TriangleApp {
    fn kind(&self) -> AppKind {
        AppKind::Triangle
    }

    fn setup(&mut self, ctx: SetupContext<'_>) -> Result<()> {
        ctx.settings.effects |= PostProcessingOptions::GHOSTING | PostProcessingOptions::BLUR;
        ctx.settings.blur_size = 0.2;

        self.program = Some(ShaderProgram::load(ctx.device, "triangle", builtin::TRIANGLE)?);
        self.vertex_array = Some(ctx.device.create_vertex_array(&VertexArrayDesc {
            name: "triangle",
            stride: 5 * std::mem::size_of::<f32>() as u32,
            attributes: &ATTRIBUTES,
            vertices: bytemuck::cast_slice(&TRIANGLE_VERTICES),
            usage: BufferUsage::Static,
        })?);
        Ok(())
    }

    fn frame(&mut self, ctx: FrameContext<'_>) -> Result<()> {
        self.advance(ctx.clock.delta_time());
        let (Some(program), Some(vertex_array)) = (self.program.as_ref(), self.vertex_array) else {
            return Ok(());
        };

        program.set_float(ctx.device, "u_Time", self.time)?;
        program.bind(ctx.device)?;
        ctx.device.draw(vertex_array, PrimitiveTopology::Triangles, 0, 3)
    }

    fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(vertex_array) = self.vertex_array.take() {
            device.destroy_vertex_array(vertex_array);
        }
        if let Some(program) = self.program.take() {
            program.destroy(device);
        }
    }
}

#[cfg(test)]
#[path = "triangle_app_tests.rs"]
mod tests;
