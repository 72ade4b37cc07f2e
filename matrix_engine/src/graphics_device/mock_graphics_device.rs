/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every command as a string, every draw as a `MockPass`, and keeps
/// a one-pixel model of the default framebuffer so blend sequences can be
/// checked numerically.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::engine_bail;
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, DeviceCapabilities, GraphicsApi, BlendMode,
    RenderTargetKey, DepthStencilKey, TextureKey, ProgramKey, VertexArrayKey,
    RenderTargetDesc, DepthStencilDesc, FramebufferStatus,
    ProgramDesc, UniformValue,
    VertexArrayDesc, PrimitiveTopology, BufferUsage,
    TextureDesc,
};

/// GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT
pub const MOCK_INCOMPLETE_STATUS: u32 = 0x8CD6;

// ============================================================================
// Mock resources
// ============================================================================

#[derive(Debug, Clone)]
pub struct MockRenderTarget {
    pub desc: RenderTargetDesc,
    /// Creation order, used by `fail_framebuffer_after`
    pub serial: usize,
    pub depth_stencil: Option<DepthStencilKey>,
}

#[derive(Debug, Clone)]
pub struct MockProgram {
    pub name: String,
    pub vertex_source: String,
    pub fragment_source: String,
    /// Uniform names declared in the sources, in declaration order
    pub active_uniforms: Vec<String>,
    pub uniform_blocks: Vec<String>,
    pub block_bindings: FxHashMap<u32, u32>,
    pub uniforms: FxHashMap<String, UniformValue>,
}

#[derive(Debug, Clone)]
pub struct MockVertexArray {
    pub name: String,
    pub stride: u32,
    pub byte_len: usize,
    pub usage: BufferUsage,
    pub uploads: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockUnitBinding {
    Target(RenderTargetKey),
    Texture(TextureKey),
}

/// One recorded draw call
#[derive(Debug, Clone)]
pub struct MockPass {
    /// Bound render target, `None` for the default framebuffer
    pub target: Option<RenderTargetKey>,
    pub program: String,
    /// Render targets read through `u_texture*` samplers, sorted by sampler name
    pub sampled: Vec<(String, RenderTargetKey)>,
    pub uniforms: FxHashMap<String, UniformValue>,
    pub blend: BlendMode,
    pub vertex_count: u32,
}

impl MockPass {
    /// Render target bound to the named sampler
    pub fn sampler(&self, name: &str) -> Option<RenderTargetKey> {
        self.sampled.iter().find(|(n, _)| n == name).map(|(_, k)| *k)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.uniforms.get(name) {
            Some(UniformValue::Float(v)) => Some(*v),
            _ => None,
        }
    }
}

// ============================================================================
// MockGraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    pub capabilities: DeviceCapabilities,

    pub targets: SlotMap<RenderTargetKey, MockRenderTarget>,
    pub depth_stencils: SlotMap<DepthStencilKey, DepthStencilDesc>,
    pub textures: SlotMap<TextureKey, TextureDesc>,
    pub programs: SlotMap<ProgramKey, MockProgram>,
    pub vertex_arrays: SlotMap<VertexArrayKey, MockVertexArray>,

    pub bound_target: Option<RenderTargetKey>,
    pub bound_program: Option<ProgramKey>,
    pub units: FxHashMap<u32, MockUnitBinding>,
    pub blend: BlendMode,
    pub viewport: (u32, u32),

    pub commands: Vec<String>,
    pub passes: Vec<MockPass>,
    pub resolves: Vec<(RenderTargetKey, RenderTargetKey)>,
    pub clears: Vec<(Option<RenderTargetKey>, [f32; 4])>,
    pub flushes: u32,

    /// Premultiplied RGBA of one default-framebuffer pixel
    pub screen_pixel: [f32; 4],

    /// Targets created after this many report an incomplete framebuffer
    pub fail_framebuffer_after: Option<usize>,
    pub fail_draws: bool,
    pub fail_program_creation: bool,

    targets_created: usize,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::with_capabilities(DeviceCapabilities {
            api: GraphicsApi::DesktopGl,
            max_samples: 8,
        })
    }

    pub fn with_capabilities(capabilities: DeviceCapabilities) -> Self {
        Self {
            capabilities,
            targets: SlotMap::with_key(),
            depth_stencils: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            programs: SlotMap::with_key(),
            vertex_arrays: SlotMap::with_key(),
            bound_target: None,
            bound_program: None,
            units: FxHashMap::default(),
            blend: BlendMode::Disabled,
            viewport: (0, 0),
            commands: Vec::new(),
            passes: Vec::new(),
            resolves: Vec::new(),
            clears: Vec::new(),
            flushes: 0,
            screen_pixel: [0.0; 4],
            fail_framebuffer_after: None,
            fail_draws: false,
            fail_program_creation: false,
            targets_created: 0,
        }
    }

    /// Forget recorded commands, passes, resolves and clears
    pub fn clear_log(&mut self) {
        self.commands.clear();
        self.passes.clear();
        self.resolves.clear();
        self.clears.clear();
    }

    /// Total number of live GPU objects
    pub fn live_objects(&self) -> usize {
        self.targets.len()
            + self.depth_stencils.len()
            + self.textures.len()
            + self.programs.len()
            + self.vertex_arrays.len()
    }

    pub fn program_by_name(&self, name: &str) -> Option<&MockProgram> {
        self.programs.values().find(|p| p.name == name)
    }

    fn blend_into_screen(&mut self, program: &MockProgram) {
        match (program.name.as_str(), self.blend) {
            ("fade", BlendMode::Alpha) => {
                let alpha = match program.uniforms.get("u_alpha") {
                    Some(UniformValue::Float(a)) => *a,
                    _ => return,
                };
                // Source is black with `alpha`
                for channel in &mut self.screen_pixel[..3] {
                    *channel *= 1.0 - alpha;
                }
                self.screen_pixel[3] = alpha * alpha + self.screen_pixel[3] * (1.0 - alpha);
            }
            (_, BlendMode::Premultiplied) => {
                if let Some(UniformValue::Vec4(color)) = program.uniforms.get("u_color") {
                    let src = color.to_array();
                    for (dst, s) in self.screen_pixel.iter_mut().zip(src) {
                        *dst = s + *dst * (1.0 - src[3]);
                    }
                }
            }
            _ => {}
        }
    }

    fn target(&self, key: RenderTargetKey) -> Result<&MockRenderTarget> {
        self.targets
            .get(key)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown render target {:?}", key)))
    }

    fn program(&self, key: ProgramKey) -> Result<&MockProgram> {
        self.programs
            .get(key)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown program {:?}", key)))
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect uniform and uniform block names from GLSL sources
fn reflect_uniforms(sources: &[&str]) -> (Vec<String>, Vec<String>) {
    let mut uniforms = Vec::new();
    let mut blocks = Vec::new();

    for line in sources.iter().flat_map(|s| s.lines()) {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("uniform ") else {
            continue;
        };
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        if rest.contains('{') || tokens.len() == 1 {
            if let Some(name) = tokens.first() {
                blocks.push(name.trim_end_matches('{').to_string());
            }
        } else if let Some(last) = tokens.last() {
            let name = last.trim_end_matches(';');
            let name = name.split('[').next().unwrap_or(name);
            uniforms.push(name.to_string());
        }
    }

    (uniforms, blocks)
}

impl GraphicsDevice for MockGraphicsDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    // ===== RENDER TARGETS =====

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetKey> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!("matrix::MockGraphicsDevice", "Zero-sized render target {}x{}", desc.width, desc.height);
        }
        let serial = self.targets_created;
        self.targets_created += 1;
        let key = self.targets.insert(MockRenderTarget {
            desc: *desc,
            serial,
            depth_stencil: None,
        });
        self.commands.push(format!(
            "create_render_target({}x{}, samples={})",
            desc.width, desc.height, desc.samples
        ));
        Ok(key)
    }

    fn create_depth_stencil(&mut self, desc: &DepthStencilDesc) -> Result<DepthStencilKey> {
        self.commands.push(format!(
            "create_depth_stencil({}x{}, samples={})",
            desc.width, desc.height, desc.samples
        ));
        Ok(self.depth_stencils.insert(*desc))
    }

    fn attach_depth_stencil(&mut self, target: RenderTargetKey, depth: DepthStencilKey) -> Result<()> {
        if !self.depth_stencils.contains_key(depth) {
            return Err(Error::InvalidResource(format!("Unknown depth/stencil {:?}", depth)));
        }
        let entry = self
            .targets
            .get_mut(target)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown render target {:?}", target)))?;
        entry.depth_stencil = Some(depth);
        self.commands.push("attach_depth_stencil".to_string());
        Ok(())
    }

    fn framebuffer_status(&mut self, target: RenderTargetKey) -> Result<FramebufferStatus> {
        let serial = self.target(target)?.serial;
        match self.fail_framebuffer_after {
            Some(limit) if serial >= limit => Ok(FramebufferStatus::Incomplete(MOCK_INCOMPLETE_STATUS)),
            _ => Ok(FramebufferStatus::Complete),
        }
    }

    fn destroy_render_target(&mut self, target: RenderTargetKey) {
        if self.targets.remove(target).is_some() {
            self.commands.push("destroy_render_target".to_string());
        }
        if self.bound_target == Some(target) {
            self.bound_target = None;
        }
    }

    fn destroy_depth_stencil(&mut self, depth: DepthStencilKey) {
        if self.depth_stencils.remove(depth).is_some() {
            self.commands.push("destroy_depth_stencil".to_string());
        }
    }

    fn bind_render_target(&mut self, target: Option<RenderTargetKey>) -> Result<()> {
        if let Some(key) = target {
            self.target(key)?;
        }
        self.bound_target = target;
        self.commands.push(match target {
            Some(_) => "bind_render_target".to_string(),
            None => "bind_default_framebuffer".to_string(),
        });
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) {
        if self.bound_target.is_none() {
            self.screen_pixel = color;
        }
        self.clears.push((self.bound_target, color));
        self.commands.push(format!("clear({:?})", color));
    }

    fn resolve(&mut self, src: RenderTargetKey, dst: RenderTargetKey) -> Result<()> {
        let src_desc = self.target(src)?.desc;
        let dst_desc = self.target(dst)?.desc;
        if dst_desc.is_multisampled() {
            return Err(Error::InvalidResource(
                "Resolve destination must be single-sample".to_string(),
            ));
        }
        if (src_desc.width, src_desc.height) != (dst_desc.width, dst_desc.height) {
            return Err(Error::InvalidResource("Resolve size mismatch".to_string()));
        }
        self.resolves.push((src, dst));
        self.commands.push("resolve".to_string());
        Ok(())
    }

    fn bind_target_texture(&mut self, unit: u32, target: RenderTargetKey) -> Result<()> {
        if self.target(target)?.desc.is_multisampled() {
            return Err(Error::InvalidResource(
                "Multisampled render targets cannot be sampled".to_string(),
            ));
        }
        self.units.insert(unit, MockUnitBinding::Target(target));
        self.commands.push(format!("bind_target_texture({})", unit));
        Ok(())
    }

    // ===== TEXTURES =====

    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> Result<TextureKey> {
        if pixels.len() != desc.byte_len() {
            return Err(Error::InvalidResource(format!(
                "Texture data is {} bytes, expected {}",
                pixels.len(),
                desc.byte_len()
            )));
        }
        self.commands.push(format!("create_texture({}x{})", desc.width, desc.height));
        Ok(self.textures.insert(*desc))
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureKey) -> Result<()> {
        if !self.textures.contains_key(texture) {
            return Err(Error::InvalidResource(format!("Unknown texture {:?}", texture)));
        }
        self.units.insert(unit, MockUnitBinding::Texture(texture));
        self.commands.push(format!("bind_texture({})", unit));
        Ok(())
    }

    fn destroy_texture(&mut self, texture: TextureKey) {
        if self.textures.remove(texture).is_some() {
            self.commands.push("destroy_texture".to_string());
        }
    }

    // ===== PROGRAMS =====

    fn create_program(&mut self, desc: &ProgramDesc) -> Result<ProgramKey> {
        if self.fail_program_creation {
            engine_bail!("matrix::MockGraphicsDevice", "Failed to create program object '{}'", desc.name);
        }
        let (active_uniforms, uniform_blocks) =
            reflect_uniforms(&[&desc.vertex_source, &desc.fragment_source]);
        self.commands.push(format!("create_program({})", desc.name));
        Ok(self.programs.insert(MockProgram {
            name: desc.name.clone(),
            vertex_source: desc.vertex_source.clone(),
            fragment_source: desc.fragment_source.clone(),
            active_uniforms,
            uniform_blocks,
            block_bindings: FxHashMap::default(),
            uniforms: FxHashMap::default(),
        }))
    }

    fn use_program(&mut self, program: ProgramKey) -> Result<()> {
        let name = self.program(program)?.name.clone();
        self.bound_program = Some(program);
        self.commands.push(format!("use_program({})", name));
        Ok(())
    }

    fn uniform_location(&mut self, program: ProgramKey, name: &str) -> Option<u32> {
        self.programs
            .get(program)?
            .active_uniforms
            .iter()
            .position(|u| u == name)
            .map(|i| i as u32)
    }

    fn set_uniform(&mut self, program: ProgramKey, name: &str, value: UniformValue) -> Result<()> {
        let entry = self
            .programs
            .get_mut(program)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown program {:?}", program)))?;
        entry.uniforms.insert(name.to_string(), value);
        self.bound_program = Some(program);
        Ok(())
    }

    fn uniform_block_index(&mut self, program: ProgramKey, name: &str) -> Option<u32> {
        self.programs
            .get(program)?
            .uniform_blocks
            .iter()
            .position(|b| b == name)
            .map(|i| i as u32)
    }

    fn uniform_block_binding(&mut self, program: ProgramKey, block_index: u32, binding: u32) -> Result<()> {
        let entry = self
            .programs
            .get_mut(program)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown program {:?}", program)))?;
        entry.block_bindings.insert(block_index, binding);
        Ok(())
    }

    fn destroy_program(&mut self, program: ProgramKey) {
        if self.programs.remove(program).is_some() {
            self.commands.push("destroy_program".to_string());
        }
        if self.bound_program == Some(program) {
            self.bound_program = None;
        }
    }

    // ===== GEOMETRY =====

    fn create_vertex_array(&mut self, desc: &VertexArrayDesc) -> Result<VertexArrayKey> {
        if desc.stride == 0 {
            return Err(Error::InvalidResource(format!("Vertex array '{}' has zero stride", desc.name)));
        }
        self.commands.push(format!("create_vertex_array({})", desc.name));
        Ok(self.vertex_arrays.insert(MockVertexArray {
            name: desc.name.to_string(),
            stride: desc.stride,
            byte_len: desc.vertices.len(),
            usage: desc.usage,
            uploads: 1,
        }))
    }

    fn update_vertices(&mut self, vertex_array: VertexArrayKey, vertices: &[u8]) -> Result<()> {
        let entry = self
            .vertex_arrays
            .get_mut(vertex_array)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown vertex array {:?}", vertex_array)))?;
        entry.byte_len = vertices.len();
        entry.uploads += 1;
        Ok(())
    }

    fn draw(
        &mut self,
        vertex_array: VertexArrayKey,
        _topology: PrimitiveTopology,
        first: u32,
        count: u32,
    ) -> Result<()> {
        if self.fail_draws {
            engine_bail!("matrix::MockGraphicsDevice", "Injected draw failure");
        }
        let va = self
            .vertex_arrays
            .get(vertex_array)
            .ok_or_else(|| Error::InvalidResource(format!("Unknown vertex array {:?}", vertex_array)))?;
        let available = (va.byte_len / va.stride as usize) as u32;
        if first + count > available {
            return Err(Error::InvalidResource(format!(
                "Draw of {} vertices from {} exceeds '{}' ({} vertices)",
                count, first, va.name, available
            )));
        }
        let program_key = match self.bound_program {
            Some(key) => key,
            None => engine_bail!("matrix::MockGraphicsDevice", "Draw without a bound program"),
        };
        let program = self.program(program_key)?.clone();

        let mut sampled: Vec<(String, RenderTargetKey)> = program
            .uniforms
            .iter()
            .filter(|(name, _)| name.starts_with("u_texture"))
            .filter_map(|(name, value)| match value {
                UniformValue::Int(unit) => match self.units.get(&(*unit as u32)) {
                    Some(MockUnitBinding::Target(key)) => Some((name.clone(), *key)),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        sampled.sort_by(|a, b| a.0.cmp(&b.0));

        if self.bound_target.is_none() {
            self.blend_into_screen(&program);
        }

        self.passes.push(MockPass {
            target: self.bound_target,
            program: program.name.clone(),
            sampled,
            uniforms: program.uniforms.clone(),
            blend: self.blend,
            vertex_count: count,
        });
        self.commands.push(format!("draw({}, {})", program.name, count));
        Ok(())
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayKey) {
        if self.vertex_arrays.remove(vertex_array).is_some() {
            self.commands.push("destroy_vertex_array".to_string());
        }
    }

    // ===== STATE =====

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
        self.commands.push(format!("set_blend_mode({:?})", mode));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.commands.push(format!("set_viewport({}, {})", width, height));
    }

    fn flush(&mut self) {
        self.flushes += 1;
        self.commands.push("flush".to_string());
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
