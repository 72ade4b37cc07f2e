/// Debug app - a solid square glued to the cursor
///
/// Turns on every effect with a wide blur, which makes ghosting, blur and
/// buffer rotation easy to eyeball while moving the mouse.

use glam::{Mat4, Vec2, Vec4};

use crate::error::Result;
use crate::graphics_device::{
    BufferUsage, GraphicsDevice, PrimitiveTopology, VertexArrayDesc, VertexArrayKey, VertexAttribute,
};
use crate::options::{AppKind, PostProcessingOptions};
use crate::shader::{builtin, ShaderProgram};
use super::app::{App, FrameContext, SetupContext};

/// Side of the square in pixels
pub const QUAD_SIZE: f32 = 50.0;

/// Premultiplied square color
pub const QUAD_COLOR: Vec4 = Vec4::new(0.1, 0.9, 0.3, 1.0);

const ATTRIBUTES: [VertexAttribute; 1] = [
    VertexAttribute { location: 0, components: 2, offset: 0 },
];

pub struct DebugApp {
    program: Option<ShaderProgram>,
    vertex_array: Option<VertexArrayKey>,
}

impl DebugApp {
    pub fn new() -> Self {
        Self { program: None, vertex_array: None }
    }
}

impl Default for DebugApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Square centered on the origin, two triangles
fn quad_vertices(size: f32) -> [f32; 12] {
    let h = size / 2.0;
    [
        -h, -h,   h, -h,   h, h,
        -h, -h,   h, h,   -h, h,
    ]
}

impl App for DebugApp {
    fn kind(&self) -> AppKind {
        AppKind::Debug
    }

    fn setup(&mut self, ctx: SetupContext<'_>) -> Result<()> {
        ctx.settings.effects = PostProcessingOptions::all();
        ctx.settings.blur_size = 2.0;

        let program = ShaderProgram::load(ctx.device, "debug_quad", builtin::SOLID_QUAD)?;
        let (width, height) = ctx.viewport;
        // Window pixels, origin top-left like the cursor
        let projection = Mat4::orthographic_rh_gl(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
        program.set_mat4(ctx.device, "u_Projection", projection)?;
        program.set_vec4(ctx.device, "u_color", QUAD_COLOR)?;
        self.program = Some(program);

        let vertices = quad_vertices(QUAD_SIZE);
        self.vertex_array = Some(ctx.device.create_vertex_array(&VertexArrayDesc {
            name: "debug_quad",
            stride: 2 * std::mem::size_of::<f32>() as u32,
            attributes: &ATTRIBUTES,
            vertices: bytemuck::cast_slice(&vertices),
            usage: BufferUsage::Static,
        })?);
        Ok(())
    }

    fn frame(&mut self, ctx: FrameContext<'_>) -> Result<()> {
        let (Some(program), Some(vertex_array)) = (self.program.as_ref(), self.vertex_array) else {
            return Ok(());
        };

        let cursor = Vec2::new(ctx.events.mouse_x, ctx.events.mouse_y);
        program.set_vec2(ctx.device, "u_Offset", cursor)?;
        program.bind(ctx.device)?;
        ctx.device.draw(vertex_array, PrimitiveTopology::Triangles, 0, 6)
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
#[path = "debug_app_tests.rs"]
mod tests;
