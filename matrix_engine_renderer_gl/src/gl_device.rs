/// GlGraphicsDevice - OpenGL 3.3 core / OpenGL ES 3.0 implementation of GraphicsDevice
///
/// Every GPU object lives in a slotmap keyed by the engine's handle types.
/// All calls require the context that created the device to be current on
/// the calling thread. Objects still alive when the device is dropped are
/// deleted then, so the owning surface must drop the device before it
/// destroys the context.

use glow::{HasContext, PixelUnpackData};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use matrix_engine::matrix::{Error, Result};
use matrix_engine::matrix::device::{
    BlendMode, BufferUsage, DepthStencilDesc, DepthStencilKey, DeviceCapabilities,
    FramebufferStatus, GraphicsApi, GraphicsDevice, PrimitiveTopology, ProgramDesc, ProgramKey,
    RenderTargetDesc, RenderTargetKey, TextureDesc, TextureFilter, TextureKey, UniformValue,
    VertexArrayDesc, VertexArrayKey,
};
use matrix_engine::{engine_bail, engine_debug, engine_err, engine_info, engine_warn};

use crate::gl_shader::build_program;

const SOURCE: &str = "matrix::gl::Device";

/// RGBA8 pre-cast for `tex_image_2d` / `tex_image_2d_multisample`
const RGBA8_INTERNAL_FORMAT: i32 = glow::RGBA8 as i32;

fn gl_size(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// ============================================================================
// Object records
// ============================================================================

enum ColorAttachment {
    /// Single-sample, sampleable
    Texture(glow::Texture),
    /// Desktop GL multisampled texture
    MultisampleTexture(glow::Texture),
    /// GLES multisampled renderbuffer
    MultisampleRenderbuffer(glow::Renderbuffer),
}

struct GlRenderTarget {
    desc: RenderTargetDesc,
    framebuffer: glow::Framebuffer,
    attachment: ColorAttachment,
}

struct GlProgram {
    name: String,
    program: glow::Program,
    /// Name -> location, including misses
    uniforms: FxHashMap<String, Option<glow::UniformLocation>>,
}

struct GlVertexArray {
    vertex_array: glow::VertexArray,
    buffer: glow::Buffer,
    usage: u32,
}

fn gl_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Stream => glow::STREAM_DRAW,
    }
}

fn gl_topology(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::Triangles => glow::TRIANGLES,
        PrimitiveTopology::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveTopology::TriangleFan => glow::TRIANGLE_FAN,
    }
}

fn gl_filter(filter: TextureFilter) -> i32 {
    match filter {
        TextureFilter::Linear => glow::LINEAR as i32,
        TextureFilter::Nearest => glow::NEAREST as i32,
    }
}

// ============================================================================
// GlGraphicsDevice
// ============================================================================

pub struct GlGraphicsDevice {
    gl: glow::Context,
    capabilities: DeviceCapabilities,
    targets: SlotMap<RenderTargetKey, GlRenderTarget>,
    depth_stencils: SlotMap<DepthStencilKey, glow::Renderbuffer>,
    textures: SlotMap<TextureKey, glow::Texture>,
    programs: SlotMap<ProgramKey, GlProgram>,
    vertex_arrays: SlotMap<VertexArrayKey, GlVertexArray>,
    bound_target: Option<RenderTargetKey>,
    bound_program: Option<ProgramKey>,
    viewport: (u32, u32),
}

impl GlGraphicsDevice {
    /// Wrap a loaded context and query its limits
    ///
    /// The API (desktop or ES) comes from the context's version string.
    /// Blending starts as premultiplied alpha.
    pub fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        let api = if version.is_embedded { GraphicsApi::Gles } else { GraphicsApi::DesktopGl };
        let max_samples = unsafe { gl.get_parameter_i32(glow::MAX_SAMPLES) }.max(1) as u32;
        engine_info!(SOURCE, "OpenGL{} {}.{} ({}), max {} samples",
            if version.is_embedded { " ES" } else { "" },
            version.major, version.minor, version.vendor_info, max_samples);

        let mut device = Self {
            gl,
            capabilities: DeviceCapabilities { api, max_samples },
            targets: SlotMap::with_key(),
            depth_stencils: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            programs: SlotMap::with_key(),
            vertex_arrays: SlotMap::with_key(),
            bound_target: None,
            bound_program: None,
            viewport: (0, 0),
        };
        device.set_blend_mode(BlendMode::Premultiplied);
        device
    }

    /// Number of GPU objects created through this device and not yet destroyed
    pub fn live_objects(&self) -> usize {
        self.targets.len()
            + self.depth_stencils.len()
            + self.textures.len()
            + self.programs.len()
            + self.vertex_arrays.len()
    }

    fn target(&self, key: RenderTargetKey) -> Result<&GlRenderTarget> {
        self.targets
            .get(key)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown render target {:?}", key)))
    }

    fn program(&self, key: ProgramKey) -> Result<&GlProgram> {
        self.programs
            .get(key)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown program {:?}", key)))
    }

    fn framebuffer_of(&self, target: Option<RenderTargetKey>) -> Option<glow::Framebuffer> {
        target.and_then(|key| self.targets.get(key)).map(|t| t.framebuffer)
    }

    /// Cached uniform lookup; misses are cached too
    fn cached_location(&mut self, key: ProgramKey, name: &str) -> Option<glow::UniformLocation> {
        let entry = self.programs.get_mut(key)?;
        if let Some(location) = entry.uniforms.get(name) {
            return location.clone();
        }
        let location = unsafe { self.gl.get_uniform_location(entry.program, name) };
        entry.uniforms.insert(name.to_string(), location.clone());
        location
    }

    fn create_color_attachment(&self, desc: &RenderTargetDesc) -> Result<ColorAttachment> {
        let gl = &self.gl;
        let (width, height) = (gl_size(desc.width), gl_size(desc.height));

        if !desc.is_multisampled() {
            let texture = unsafe { gl.create_texture() }
                .map_err(|e| engine_err!(SOURCE, "Failed to create color texture: {}", e))?;
            unsafe {
                gl.bind_texture(glow::TEXTURE_2D, Some(texture));
                gl.tex_image_2d(
                    glow::TEXTURE_2D,
                    0,
                    RGBA8_INTERNAL_FORMAT,
                    width,
                    height,
                    0,
                    glow::RGBA,
                    glow::UNSIGNED_BYTE,
                    PixelUnpackData::Slice(None),
                );
                gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
                gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
                gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
                gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
                gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    glow::COLOR_ATTACHMENT0,
                    glow::TEXTURE_2D,
                    Some(texture),
                    0,
                );
                gl.bind_texture(glow::TEXTURE_2D, None);
            }
            return Ok(ColorAttachment::Texture(texture));
        }

        let samples = gl_size(desc.samples);
        match self.capabilities.api {
            GraphicsApi::DesktopGl => {
                let texture = unsafe { gl.create_texture() }
                    .map_err(|e| engine_err!(SOURCE, "Failed to create multisampled texture: {}", e))?;
                unsafe {
                    gl.bind_texture(glow::TEXTURE_2D_MULTISAMPLE, Some(texture));
                    gl.tex_image_2d_multisample(
                        glow::TEXTURE_2D_MULTISAMPLE,
                        samples,
                        RGBA8_INTERNAL_FORMAT,
                        width,
                        height,
                        true,
                    );
                    gl.framebuffer_texture_2d(
                        glow::FRAMEBUFFER,
                        glow::COLOR_ATTACHMENT0,
                        glow::TEXTURE_2D_MULTISAMPLE,
                        Some(texture),
                        0,
                    );
                    gl.bind_texture(glow::TEXTURE_2D_MULTISAMPLE, None);
                }
                Ok(ColorAttachment::MultisampleTexture(texture))
            }
            GraphicsApi::Gles => {
                let renderbuffer = unsafe { gl.create_renderbuffer() }
                    .map_err(|e| engine_err!(SOURCE, "Failed to create multisampled renderbuffer: {}", e))?;
                unsafe {
                    gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
                    gl.renderbuffer_storage_multisample(glow::RENDERBUFFER, samples, glow::RGBA8, width, height);
                    gl.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::COLOR_ATTACHMENT0,
                        glow::RENDERBUFFER,
                        Some(renderbuffer),
                    );
                    gl.bind_renderbuffer(glow::RENDERBUFFER, None);
                }
                Ok(ColorAttachment::MultisampleRenderbuffer(renderbuffer))
            }
        }
    }

    fn delete_target(&self, target: GlRenderTarget) {
        unsafe {
            match target.attachment {
                ColorAttachment::Texture(texture) | ColorAttachment::MultisampleTexture(texture) => {
                    self.gl.delete_texture(texture)
                }
                ColorAttachment::MultisampleRenderbuffer(renderbuffer) => {
                    self.gl.delete_renderbuffer(renderbuffer)
                }
            }
            self.gl.delete_framebuffer(target.framebuffer);
        }
    }

    fn delete_vertex_array(&self, vertex_array: GlVertexArray) {
        unsafe {
            self.gl.delete_vertex_array(vertex_array.vertex_array);
            self.gl.delete_buffer(vertex_array.buffer);
        }
    }
}

impl GraphicsDevice for GlGraphicsDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    // ===== RENDER TARGETS =====

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetKey> {
        let framebuffer = unsafe { self.gl.create_framebuffer() }
            .map_err(|e| engine_err!(SOURCE, "Failed to create framebuffer: {}", e))?;
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer)) };

        let attachment = self.create_color_attachment(desc);
        let previous = self.framebuffer_of(self.bound_target);
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, previous) };

        let attachment = match attachment {
            Ok(attachment) => attachment,
            Err(e) => {
                unsafe { self.gl.delete_framebuffer(framebuffer) };
                return Err(e);
            }
        };
        gl_check!(&self.gl, "create_render_target");

        engine_debug!(SOURCE, "Render target {}x{} ({} samples)", desc.width, desc.height, desc.samples);
        Ok(self.targets.insert(GlRenderTarget { desc: *desc, framebuffer, attachment }))
    }

    fn create_depth_stencil(&mut self, desc: &DepthStencilDesc) -> Result<DepthStencilKey> {
        let gl = &self.gl;
        let renderbuffer = unsafe { gl.create_renderbuffer() }
            .map_err(|e| engine_err!(SOURCE, "Failed to create depth/stencil renderbuffer: {}", e))?;
        let (width, height) = (gl_size(desc.width), gl_size(desc.height));
        unsafe {
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
            if desc.samples > 1 {
                gl.renderbuffer_storage_multisample(
                    glow::RENDERBUFFER,
                    gl_size(desc.samples),
                    glow::DEPTH24_STENCIL8,
                    width,
                    height,
                );
            } else {
                gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH24_STENCIL8, width, height);
            }
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
        }
        gl_check!(gl, "create_depth_stencil");
        Ok(self.depth_stencils.insert(renderbuffer))
    }

    fn attach_depth_stencil(&mut self, target: RenderTargetKey, depth: DepthStencilKey) -> Result<()> {
        let framebuffer = self.target(target)?.framebuffer;
        let renderbuffer = *self
            .depth_stencils
            .get(depth)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown depth/stencil {:?}", depth)))?;
        let previous = self.framebuffer_of(self.bound_target);
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            self.gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_STENCIL_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(renderbuffer),
            );
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, previous);
        }
        gl_check!(&self.gl, "attach_depth_stencil");
        Ok(())
    }

    fn framebuffer_status(&mut self, target: RenderTargetKey) -> Result<FramebufferStatus> {
        let framebuffer = self.target(target)?.framebuffer;
        let previous = self.framebuffer_of(self.bound_target);
        let status = unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            let status = self.gl.check_framebuffer_status(glow::FRAMEBUFFER);
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, previous);
            status
        };
        if status == glow::FRAMEBUFFER_COMPLETE {
            Ok(FramebufferStatus::Complete)
        } else {
            Ok(FramebufferStatus::Incomplete(status))
        }
    }

    fn destroy_render_target(&mut self, target: RenderTargetKey) {
        if let Some(record) = self.targets.remove(target) {
            if self.bound_target == Some(target) {
                unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, None) };
                self.bound_target = None;
            }
            self.delete_target(record);
        }
    }

    fn destroy_depth_stencil(&mut self, depth: DepthStencilKey) {
        if let Some(renderbuffer) = self.depth_stencils.remove(depth) {
            unsafe { self.gl.delete_renderbuffer(renderbuffer) };
        }
    }

    fn bind_render_target(&mut self, target: Option<RenderTargetKey>) -> Result<()> {
        let framebuffer = match target {
            Some(key) => Some(self.target(key)?.framebuffer),
            None => None,
        };
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer) };
        self.bound_target = target;
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);
        }
    }

    fn resolve(&mut self, src: RenderTargetKey, dst: RenderTargetKey) -> Result<()> {
        let source = self.target(src)?;
        let (read, width, height) = (source.framebuffer, gl_size(source.desc.width), gl_size(source.desc.height));
        let draw = self.target(dst)?.framebuffer;
        let previous = self.framebuffer_of(self.bound_target);
        unsafe {
            self.gl.bind_framebuffer(glow::READ_FRAMEBUFFER, Some(read));
            self.gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, Some(draw));
            self.gl.blit_framebuffer(
                0,
                0,
                width,
                height,
                0,
                0,
                width,
                height,
                glow::COLOR_BUFFER_BIT,
                glow::NEAREST,
            );
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, previous);
        }
        gl_check!(&self.gl, "resolve");
        Ok(())
    }

    fn bind_target_texture(&mut self, unit: u32, target: RenderTargetKey) -> Result<()> {
        let texture = match self.target(target)?.attachment {
            ColorAttachment::Texture(texture) => texture,
            _ => engine_bail!(SOURCE, "Render target {:?} is multisampled and cannot be sampled", target),
        };
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        }
        Ok(())
    }

    // ===== TEXTURES =====

    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> Result<TextureKey> {
        if pixels.len() != desc.byte_len() {
            return Err(Error::InvalidResource(format!(
                "Texture {}x{} needs {} bytes, got {}",
                desc.width, desc.height, desc.byte_len(), pixels.len()
            )));
        }
        let gl = &self.gl;
        let texture = unsafe { gl.create_texture() }
            .map_err(|e| engine_err!(SOURCE, "Failed to create texture: {}", e))?;
        let filter = gl_filter(desc.filter);
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                RGBA8_INTERNAL_FORMAT,
                gl_size(desc.width),
                gl_size(desc.height),
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(pixels)),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }
        gl_check!(gl, "create_texture");
        Ok(self.textures.insert(texture))
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureKey) -> Result<()> {
        let texture = *self
            .textures
            .get(texture)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown texture {:?}", texture)))?;
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        }
        Ok(())
    }

    fn destroy_texture(&mut self, texture: TextureKey) {
        if let Some(texture) = self.textures.remove(texture) {
            unsafe { self.gl.delete_texture(texture) };
        }
    }

    // ===== PROGRAMS =====

    fn create_program(&mut self, desc: &ProgramDesc) -> Result<ProgramKey> {
        let program = build_program(&self.gl, &desc.name, &desc.vertex_source, &desc.fragment_source)?;
        Ok(self.programs.insert(GlProgram {
            name: desc.name.clone(),
            program,
            uniforms: FxHashMap::default(),
        }))
    }

    fn use_program(&mut self, program: ProgramKey) -> Result<()> {
        if self.bound_program == Some(program) {
            return Ok(());
        }
        let native = self.program(program)?.program;
        unsafe { self.gl.use_program(Some(native)) };
        self.bound_program = Some(program);
        Ok(())
    }

    fn uniform_location(&mut self, program: ProgramKey, name: &str) -> Option<u32> {
        self.cached_location(program, name).map(|location| location.0)
    }

    fn set_uniform(&mut self, program: ProgramKey, name: &str, value: UniformValue) -> Result<()> {
        self.use_program(program)?;
        let Some(location) = self.cached_location(program, name) else {
            return Ok(());
        };
        let location = Some(&location);
        unsafe {
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, v),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array()),
            }
        }
        Ok(())
    }

    fn uniform_block_index(&mut self, program: ProgramKey, name: &str) -> Option<u32> {
        let native = self.programs.get(program)?.program;
        unsafe { self.gl.get_uniform_block_index(native, name) }
    }

    fn uniform_block_binding(&mut self, program: ProgramKey, block_index: u32, binding: u32) -> Result<()> {
        let native = self.program(program)?.program;
        unsafe { self.gl.uniform_block_binding(native, block_index, binding) };
        gl_check!(&self.gl, "uniform_block_binding");
        Ok(())
    }

    fn destroy_program(&mut self, program: ProgramKey) {
        if let Some(record) = self.programs.remove(program) {
            if self.bound_program == Some(program) {
                unsafe { self.gl.use_program(None) };
                self.bound_program = None;
            }
            engine_debug!(SOURCE, "Deleting program '{}'", record.name);
            unsafe { self.gl.delete_program(record.program) };
        }
    }

    // ===== GEOMETRY =====

    fn create_vertex_array(&mut self, desc: &VertexArrayDesc) -> Result<VertexArrayKey> {
        let gl = &self.gl;
        let vertex_array = unsafe { gl.create_vertex_array() }
            .map_err(|e| engine_err!(SOURCE, "Failed to create vertex array '{}': {}", desc.name, e))?;
        let buffer = match unsafe { gl.create_buffer() } {
            Ok(buffer) => buffer,
            Err(e) => {
                unsafe { gl.delete_vertex_array(vertex_array) };
                engine_bail!(SOURCE, "Failed to create vertex buffer '{}': {}", desc.name, e);
            }
        };
        let usage = gl_usage(desc.usage);

        unsafe {
            gl.bind_vertex_array(Some(vertex_array));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, desc.vertices, usage);
            for attribute in desc.attributes {
                gl.enable_vertex_attrib_array(attribute.location);
                gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components as i32,
                    glow::FLOAT,
                    false,
                    desc.stride as i32,
                    attribute.offset as i32,
                );
            }
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        gl_check!(gl, "create_vertex_array");

        Ok(self.vertex_arrays.insert(GlVertexArray { vertex_array, buffer, usage }))
    }

    fn update_vertices(&mut self, vertex_array: VertexArrayKey, vertices: &[u8]) -> Result<()> {
        let record = self
            .vertex_arrays
            .get(vertex_array)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown vertex array {:?}", vertex_array)))?;
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(record.buffer));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, vertices, record.usage);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        Ok(())
    }

    fn draw(
        &mut self,
        vertex_array: VertexArrayKey,
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
    ) -> Result<()> {
        let native = self
            .vertex_arrays
            .get(vertex_array)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown vertex array {:?}", vertex_array)))?
            .vertex_array;
        if self.bound_program.is_none() {
            engine_warn!(SOURCE, "Draw without a bound program");
        }
        unsafe {
            self.gl.bind_vertex_array(Some(native));
            self.gl.draw_arrays(gl_topology(topology), gl_size(first), gl_size(count));
            self.gl.bind_vertex_array(None);
        }
        gl_check!(&self.gl, "draw");
        Ok(())
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayKey) {
        if let Some(record) = self.vertex_arrays.remove(vertex_array) {
            self.delete_vertex_array(record);
        }
    }

    // ===== STATE =====

    fn set_blend_mode(&mut self, mode: BlendMode) {
        unsafe {
            match mode {
                BlendMode::Disabled => self.gl.disable(glow::BLEND),
                BlendMode::Premultiplied => {
                    self.gl.enable(glow::BLEND);
                    self.gl.blend_func(glow::ONE, glow::ONE_MINUS_SRC_ALPHA);
                }
                BlendMode::Alpha => {
                    self.gl.enable(glow::BLEND);
                    self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
                }
            }
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        if self.viewport != (width, height) {
            unsafe { self.gl.viewport(0, 0, gl_size(width), gl_size(height)) };
            self.viewport = (width, height);
        }
    }

    fn flush(&mut self) {
        unsafe { self.gl.flush() };
        gl_check!(&self.gl, "flush");
    }
}

impl Drop for GlGraphicsDevice {
    fn drop(&mut self) {
        let leaked = self.live_objects();
        if leaked > 0 {
            engine_warn!(SOURCE, "Deleting {} GPU objects still alive at device drop", leaked);
        }
        unsafe {
            self.gl.use_program(None);
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
        for (_, target) in self.targets.drain().collect::<Vec<_>>() {
            self.delete_target(target);
        }
        for (_, renderbuffer) in self.depth_stencils.drain() {
            unsafe { self.gl.delete_renderbuffer(renderbuffer) };
        }
        for (_, texture) in self.textures.drain() {
            unsafe { self.gl.delete_texture(texture) };
        }
        for (_, program) in self.programs.drain() {
            unsafe { self.gl.delete_program(program.program) };
        }
        for (_, vertex_array) in self.vertex_arrays.drain().collect::<Vec<_>>() {
            self.delete_vertex_array(vertex_array);
        }
    }
}

#[cfg(test)]
#[path = "gl_device_tests.rs"]
mod tests;
