//! GPU tests for GlGraphicsDevice and the renderer on an EGL pbuffer
//!
//! All tests require a GPU (or a software EGL driver) and are marked with #[ignore].
//!
//! Run with: cargo test --test gl_device_tests -- --ignored

use matrix_engine::matrix::device::{
    BufferUsage, DepthStencilDesc, FramebufferStatus, GraphicsApi, GraphicsDevice, PrimitiveTopology,
    ProgramDesc, RenderTargetDesc, TextureDesc, TextureFilter, UniformValue, VertexArrayDesc,
    VertexAttribute,
};
use matrix_engine::matrix::frame_buffer::FrameBufferManager;
use matrix_engine::matrix::shader::ShaderProgram;
use matrix_engine::matrix::surface::Surface;
use matrix_engine::matrix::{AppKind, FrameOutcome, Options, Renderer};
use matrix_engine::glam::Vec4;
use matrix_engine_renderer_gl::{EglContext, EglTarget, GlGraphicsDevice, HeadlessSurface};
use serial_test::serial;

const WIDTH: u32 = 128;
const HEIGHT: u32 = 96;

fn options(app: AppKind) -> Options {
    Options {
        fullscreen: false,
        width: WIDTH,
        height: HEIGHT,
        app,
        loop_with_swap: false,
        ..Default::default()
    }
}

/// Desktop GL device on a pbuffer; the surface must outlive the device
fn create_device() -> (HeadlessSurface, GlGraphicsDevice) {
    let mut surface = HeadlessSurface::new(GraphicsApi::DesktopGl);
    let device = surface.create_context(&options(AppKind::Debug)).unwrap();
    (surface, device)
}

const COLOR_SHADER: &str = "#shader vertex
#version 330 core
layout(location = 0) in vec2 a_Position;
void main() { gl_Position = vec4(a_Position, 0.0, 1.0); }
#shader fragment
#version 330 core
uniform vec4 u_Color;
out vec4 FragColor;
void main() { FragColor = u_Color; }
";

// ============================================================================
// EGL TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_egl_pbuffer_reports_its_size() {
    let target = EglTarget::Pbuffer { width: WIDTH, height: HEIGHT };
    let egl = unsafe { EglContext::new(khronos_egl::DEFAULT_DISPLAY, target, GraphicsApi::DesktopGl, 0) }.unwrap();

    assert_eq!(egl.surface_size().unwrap(), (WIDTH, HEIGHT));
    egl.swap_buffers().unwrap();
}

// ============================================================================
// RENDER TARGET TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_gl_resolved_target_is_complete() {
    let (mut surface, mut device) = create_device();

    let target = device.create_render_target(&RenderTargetDesc::resolved(WIDTH, HEIGHT)).unwrap();

    assert_eq!(device.framebuffer_status(target).unwrap(), FramebufferStatus::Complete);
    device.destroy_render_target(target);
    assert_eq!(device.live_objects(), 0);
    drop(device);
    surface.destroy();
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_gl_multisampled_target_with_depth_resolves() {
    let (mut surface, mut device) = create_device();
    let samples = device.capabilities().max_samples.min(4);

    let msaa = device.create_render_target(&RenderTargetDesc::multisampled(WIDTH, HEIGHT, samples)).unwrap();
    let depth = device
        .create_depth_stencil(&DepthStencilDesc { width: WIDTH, height: HEIGHT, samples })
        .unwrap();
    device.attach_depth_stencil(msaa, depth).unwrap();
    let resolved = device.create_render_target(&RenderTargetDesc::resolved(WIDTH, HEIGHT)).unwrap();

    assert!(device.framebuffer_status(msaa).unwrap().is_complete());
    device.bind_render_target(Some(msaa)).unwrap();
    device.clear([0.0, 1.0, 0.0, 1.0]);
    device.resolve(msaa, resolved).unwrap();
    device.bind_target_texture(0, resolved).unwrap();
    if samples > 1 {
        assert!(device.bind_target_texture(0, msaa).is_err());
    }

    device.destroy_render_target(msaa);
    device.destroy_render_target(resolved);
    device.destroy_depth_stencil(depth);
    assert_eq!(device.live_objects(), 0);
    drop(device);
    surface.destroy();
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_gl_frame_buffer_manager_allocates_triad() {
    let (mut surface, mut device) = create_device();

    let triad = FrameBufferManager::allocate(&mut device, WIDTH, HEIGHT, 4).unwrap();
    assert_eq!(device.live_objects(), 7);

    FrameBufferManager::release(&mut device, triad);
    assert_eq!(device.live_objects(), 0);
    drop(device);
    surface.destroy();
}

// ============================================================================
// TEXTURE TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_gl_texture_size_is_checked() {
    let (mut surface, mut device) = create_device();
    let desc = TextureDesc { width: 2, height: 2, filter: TextureFilter::Linear };

    assert!(device.create_texture(&desc, &[0u8; 15]).is_err());
    let texture = device.create_texture(&desc, &[255u8; 16]).unwrap();
    device.bind_texture(1, texture).unwrap();
    device.destroy_texture(texture);

    assert_eq!(device.live_objects(), 0);
    drop(device);
    surface.destroy();
}

// ============================================================================
// PROGRAM AND DRAW TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_gl_program_uniforms_and_draw() {
    let (mut surface, mut device) = create_device();
    let program = ShaderProgram::load(&mut device, "color", COLOR_SHADER).unwrap();

    assert!(program.uniform_location(&mut device, "u_Color").is_some());
    assert!(program.uniform_location(&mut device, "u_Missing").is_none());
    device
        .set_uniform(program.key(), "u_Color", UniformValue::Vec4(Vec4::ONE))
        .unwrap();
    // Unknown names are ignored
    device.set_uniform(program.key(), "u_Missing", UniformValue::Float(1.0)).unwrap();

    let vertices: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];
    let bytes: Vec<u8> = vertices.iter().flat_map(|v| v.to_ne_bytes()).collect();
    let attributes = [VertexAttribute { location: 0, components: 2, offset: 0 }];
    let vertex_array = device
        .create_vertex_array(&VertexArrayDesc {
            name: "triangle",
            stride: 8,
            attributes: &attributes,
            vertices: &bytes,
            usage: BufferUsage::Stream,
        })
        .unwrap();

    device.bind_render_target(None).unwrap();
    program.bind(&mut device).unwrap();
    device.draw(vertex_array, PrimitiveTopology::Triangles, 0, 3).unwrap();
    device.update_vertices(vertex_array, &bytes).unwrap();
    device.flush();

    device.destroy_vertex_array(vertex_array);
    program.destroy(&mut device);
    assert_eq!(device.live_objects(), 0);
    drop(device);
    surface.destroy();
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_gl_broken_shader_still_returns_program() {
    let (mut surface, mut device) = create_device();

    let program = device
        .create_program(&ProgramDesc {
            name: "broken".to_string(),
            vertex_source: "#version 330 core\nvoid main() { nope }".to_string(),
            fragment_source: "#version 330 core\nvoid main() {}".to_string(),
        })
        .unwrap();

    device.destroy_program(program);
    drop(device);
    surface.destroy();
}

// ============================================================================
// RENDERER TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_gl_renderer_runs_triangle_frames() {
    let mut renderer = Renderer::new(HeadlessSurface::new(GraphicsApi::DesktopGl), options(AppKind::Triangle));
    renderer.initialize().unwrap();

    for _ in 0..5 {
        assert!(matches!(renderer.run_frame().unwrap(), FrameOutcome::Rendered(_)));
    }

    renderer.shutdown();
    assert!(!renderer.is_initialized());
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_gl_renderer_runs_debug_frames() {
    let mut renderer = Renderer::new(HeadlessSurface::new(GraphicsApi::DesktopGl), options(AppKind::Debug));
    renderer.initialize().unwrap();

    for _ in 0..3 {
        renderer.run_frame().unwrap();
    }
    assert_eq!(renderer.frames(), 3);
    assert_eq!(renderer.device().unwrap().capabilities().api, GraphicsApi::DesktopGl);

    renderer.shutdown();
}
