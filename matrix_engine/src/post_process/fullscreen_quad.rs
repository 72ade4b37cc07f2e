/// Fullscreen quad shared by every compositor pass

use crate::error::Result;
use crate::graphics_device::{
    GraphicsDevice, VertexArrayKey, VertexArrayDesc, VertexAttribute,
    BufferUsage, PrimitiveTopology,
};

pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Two triangles in clip space, interleaved position (xy) and uv
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 24] = [
     1.0, -1.0,   1.0, 0.0,
    -1.0, -1.0,   0.0, 0.0,
    -1.0,  1.0,   0.0, 1.0,

     1.0,  1.0,   1.0, 1.0,
     1.0, -1.0,   1.0, 0.0,
    -1.0,  1.0,   0.0, 1.0,
];

const STRIDE: u32 = 4 * std::mem::size_of::<f32>() as u32;

const ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute { location: 0, components: 2, offset: 0 },
    VertexAttribute { location: 1, components: 2, offset: 8 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenQuad {
    vertex_array: VertexArrayKey,
}

impl FullscreenQuad {
    pub fn new(device: &mut dyn GraphicsDevice) -> Result<Self> {
        let vertex_array = device.create_vertex_array(&VertexArrayDesc {
            name: "fullscreen_quad",
            stride: STRIDE,
            attributes: &ATTRIBUTES,
            vertices: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: BufferUsage::Static,
        })?;
        Ok(Self { vertex_array })
    }

    /// Draw with whatever program and render target are bound
    pub fn draw(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.draw(self.vertex_array, PrimitiveTopology::Triangles, 0, QUAD_VERTEX_COUNT)
    }

    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        device.destroy_vertex_array(self.vertex_array);
    }
}
