/// Unit tests for MockGraphicsDevice
///
/// The compositor tests lean on the mock's pass recording and pixel model,
/// so both are checked here against hand-computed expectations.

use super::*;
use glam::Vec4;
use crate::graphics_device::{VertexAttribute, TextureFilter};

const QUAD: [f32; 24] = [
    1.0, -1.0, 1.0, 0.0,
    -1.0, -1.0, 0.0, 0.0,
    -1.0, 1.0, 0.0, 1.0,
    1.0, 1.0, 1.0, 1.0,
    1.0, -1.0, 1.0, 0.0,
    -1.0, 1.0, 0.0, 1.0,
];

const ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute { location: 0, components: 2, offset: 0 },
    VertexAttribute { location: 1, components: 2, offset: 8 },
];

fn create_quad(device: &mut MockGraphicsDevice) -> VertexArrayKey {
    device
        .create_vertex_array(&VertexArrayDesc {
            name: "quad",
            stride: 16,
            attributes: &ATTRIBUTES,
            vertices: bytemuck::cast_slice(&QUAD),
            usage: BufferUsage::Static,
        })
        .unwrap()
}

fn create_program(device: &mut MockGraphicsDevice, name: &str, fragment: &str) -> ProgramKey {
    device
        .create_program(&ProgramDesc {
            name: name.to_string(),
            vertex_source: "#version 330 core\nvoid main() {}\n".to_string(),
            fragment_source: fragment.to_string(),
        })
        .unwrap()
}

// ============================================================================
// Render target tests
// ============================================================================

#[test]
fn test_create_render_target_records_command() {
    let mut device = MockGraphicsDevice::new();
    let key = device
        .create_render_target(&RenderTargetDesc::multisampled(800, 600, 4))
        .unwrap();

    assert!(device.targets.contains_key(key));
    assert_eq!(device.commands, vec!["create_render_target(800x600, samples=4)"]);
}

#[test]
fn test_zero_sized_render_target_fails() {
    let mut device = MockGraphicsDevice::new();
    assert!(device.create_render_target(&RenderTargetDesc::resolved(0, 600)).is_err());
}

#[test]
fn test_framebuffer_failure_injection() {
    let mut device = MockGraphicsDevice::new();
    device.fail_framebuffer_after = Some(1);

    let first = device.create_render_target(&RenderTargetDesc::resolved(4, 4)).unwrap();
    let second = device.create_render_target(&RenderTargetDesc::resolved(4, 4)).unwrap();

    assert_eq!(device.framebuffer_status(first).unwrap(), FramebufferStatus::Complete);
    assert_eq!(
        device.framebuffer_status(second).unwrap(),
        FramebufferStatus::Incomplete(MOCK_INCOMPLETE_STATUS)
    );
}

#[test]
fn test_resolve_requires_single_sample_destination() {
    let mut device = MockGraphicsDevice::new();
    let msaa = device.create_render_target(&RenderTargetDesc::multisampled(8, 8, 4)).unwrap();
    let plain = device.create_render_target(&RenderTargetDesc::resolved(8, 8)).unwrap();

    assert!(device.resolve(msaa, plain).is_ok());
    assert!(device.resolve(plain, msaa).is_err());
    assert_eq!(device.resolves, vec![(msaa, plain)]);
}

#[test]
fn test_resolve_rejects_size_mismatch() {
    let mut device = MockGraphicsDevice::new();
    let msaa = device.create_render_target(&RenderTargetDesc::multisampled(8, 8, 4)).unwrap();
    let plain = device.create_render_target(&RenderTargetDesc::resolved(4, 4)).unwrap();

    assert!(device.resolve(msaa, plain).is_err());
}

#[test]
fn test_multisampled_target_cannot_be_sampled() {
    let mut device = MockGraphicsDevice::new();
    let msaa = device.create_render_target(&RenderTargetDesc::multisampled(8, 8, 4)).unwrap();

    let result = device.bind_target_texture(0, msaa);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_destroy_unknown_handles_is_noop() {
    let mut device = MockGraphicsDevice::new();
    let key = device.create_render_target(&RenderTargetDesc::resolved(4, 4)).unwrap();
    device.destroy_render_target(key);
    device.destroy_render_target(key);

    assert_eq!(device.live_objects(), 0);
    assert_eq!(
        device.commands.iter().filter(|c| *c == "destroy_render_target").count(),
        1
    );
}

// ============================================================================
// Program tests
// ============================================================================

#[test]
fn test_program_reflects_uniforms_and_blocks() {
    let mut device = MockGraphicsDevice::new();
    let program = create_program(
        &mut device,
        "reflect",
        "uniform sampler2D u_texture;\nuniform float u_weights[9];\nuniform Globals {\n  mat4 view;\n};\n",
    );

    assert_eq!(device.uniform_location(program, "u_texture"), Some(0));
    assert_eq!(device.uniform_location(program, "u_weights"), Some(1));
    assert_eq!(device.uniform_location(program, "u_missing"), None);
    assert_eq!(device.uniform_block_index(program, "Globals"), Some(0));
}

#[test]
fn test_program_creation_failure_injection() {
    let mut device = MockGraphicsDevice::new();
    device.fail_program_creation = true;

    let result = device.create_program(&ProgramDesc {
        name: "broken".to_string(),
        vertex_source: String::new(),
        fragment_source: String::new(),
    });
    assert!(matches!(result, Err(Error::BackendError(_))));
}

// ============================================================================
// Draw and pass recording tests
// ============================================================================

#[test]
fn test_draw_records_sampled_targets() {
    let mut device = MockGraphicsDevice::new();
    let quad = create_quad(&mut device);
    let current = device.create_render_target(&RenderTargetDesc::resolved(8, 8)).unwrap();
    let previous = device.create_render_target(&RenderTargetDesc::resolved(8, 8)).unwrap();
    let mixing = device.create_render_target(&RenderTargetDesc::resolved(8, 8)).unwrap();
    let program = create_program(&mut device, "ghosting", "");

    device.bind_render_target(Some(mixing)).unwrap();
    device.bind_target_texture(0, current).unwrap();
    device.bind_target_texture(1, previous).unwrap();
    device.set_uniform(program, "u_textureC", UniformValue::Int(0)).unwrap();
    device.set_uniform(program, "u_textureP", UniformValue::Int(1)).unwrap();
    device.set_uniform(program, "u_previousFrameOpacity", UniformValue::Float(0.97)).unwrap();
    device.use_program(program).unwrap();
    device.draw(quad, PrimitiveTopology::Triangles, 0, 6).unwrap();

    let pass = &device.passes[0];
    assert_eq!(pass.target, Some(mixing));
    assert_eq!(pass.program, "ghosting");
    assert_eq!(pass.sampler("u_textureC"), Some(current));
    assert_eq!(pass.sampler("u_textureP"), Some(previous));
    assert_eq!(pass.float("u_previousFrameOpacity"), Some(0.97));
    assert_eq!(pass.vertex_count, 6);
}

#[test]
fn test_draw_out_of_range_fails() {
    let mut device = MockGraphicsDevice::new();
    let quad = create_quad(&mut device);
    let program = create_program(&mut device, "basic", "");
    device.use_program(program).unwrap();

    assert!(device.draw(quad, PrimitiveTopology::Triangles, 0, 7).is_err());
    assert!(device.draw(quad, PrimitiveTopology::Triangles, 3, 3).is_ok());
}

#[test]
fn test_draw_without_program_fails() {
    let mut device = MockGraphicsDevice::new();
    let quad = create_quad(&mut device);
    assert!(device.draw(quad, PrimitiveTopology::Triangles, 0, 6).is_err());
}

#[test]
fn test_update_vertices_resizes_buffer() {
    let mut device = MockGraphicsDevice::new();
    let quad = create_quad(&mut device);
    let program = create_program(&mut device, "basic", "");
    device.use_program(program).unwrap();

    let doubled: Vec<f32> = QUAD.iter().chain(QUAD.iter()).copied().collect();
    device.update_vertices(quad, bytemuck::cast_slice(&doubled)).unwrap();

    assert!(device.draw(quad, PrimitiveTopology::Triangles, 0, 12).is_ok());
    assert_eq!(device.vertex_arrays[quad].uploads, 2);
}

#[test]
fn test_texture_size_is_validated() {
    let mut device = MockGraphicsDevice::new();
    let desc = TextureDesc { width: 2, height: 2, filter: TextureFilter::Linear };

    assert!(device.create_texture(&desc, &[0u8; 16]).is_ok());
    assert!(device.create_texture(&desc, &[0u8; 15]).is_err());
}

// ============================================================================
// Screen pixel model tests
// ============================================================================

#[test]
fn test_clear_sets_screen_pixel() {
    let mut device = MockGraphicsDevice::new();
    device.bind_render_target(None).unwrap();
    device.clear([0.0, 0.0, 0.0, 1.0]);
    assert_eq!(device.screen_pixel, [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_offscreen_clear_leaves_screen_pixel() {
    let mut device = MockGraphicsDevice::new();
    let target = device.create_render_target(&RenderTargetDesc::resolved(4, 4)).unwrap();
    device.bind_render_target(Some(target)).unwrap();
    device.clear([1.0, 1.0, 1.0, 1.0]);
    assert_eq!(device.screen_pixel, [0.0; 4]);
}

#[test]
fn test_fade_blends_towards_black() {
    let mut device = MockGraphicsDevice::new();
    let quad = create_quad(&mut device);
    let fade = create_program(&mut device, "fade", "uniform float u_alpha;");

    device.bind_render_target(None).unwrap();
    device.screen_pixel = [1.0, 0.5, 0.0, 1.0];
    device.set_blend_mode(BlendMode::Alpha);
    device.set_uniform(fade, "u_alpha", UniformValue::Float(0.25)).unwrap();
    device.use_program(fade).unwrap();
    device.draw(quad, PrimitiveTopology::Triangles, 0, 6).unwrap();

    let [r, g, b, _] = device.screen_pixel;
    assert!((r - 0.75).abs() < 1e-6);
    assert!((g - 0.375).abs() < 1e-6);
    assert_eq!(b, 0.0);
}

#[test]
fn test_premultiplied_color_draw() {
    let mut device = MockGraphicsDevice::new();
    let quad = create_quad(&mut device);
    let solid = create_program(&mut device, "solid", "uniform vec4 u_color;");

    device.bind_render_target(None).unwrap();
    device.clear([0.0, 0.0, 0.0, 1.0]);
    device.set_blend_mode(BlendMode::Premultiplied);
    device
        .set_uniform(solid, "u_color", UniformValue::Vec4(Vec4::new(0.0, 0.5, 0.0, 0.5)))
        .unwrap();
    device.use_program(solid).unwrap();
    device.draw(quad, PrimitiveTopology::Triangles, 0, 6).unwrap();

    assert_eq!(device.screen_pixel, [0.0, 0.5, 0.0, 1.0]);
}
