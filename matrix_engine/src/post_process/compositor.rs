/// Post-processing compositor
///
/// Full mode, per frame:
///
/// 1. `begin_frame`: bind Current (multisampled) and clear it
/// 2. the app draws the scene
/// 3. `end_frame`: resolve, ghosting blend, ghosting blur, blur,
///    composite to the screen, then rotate Current and Previous once the
///    swap interval has elapsed
///
/// Restricted mode draws straight to the default framebuffer: a hard clear
/// on the first frame, then a translucent black fade per frame when
/// ghosting is on.

use crate::clock::Clock;
use crate::engine_warn;
use crate::error::{Error, Result};
use crate::frame_buffer::{BufferTriad, FrameBuffers, FrameBufferManager};
use crate::graphics_device::{BlendMode, GraphicsDevice};
use crate::options::{PostProcessingOptions, PostProcessSettings};
use crate::shader::{builtin, ShaderProgram};
use super::fullscreen_quad::FullscreenQuad;

/// Per-frame alpha of the restricted-mode fade (about 92% retention)
pub const FADE_ALPHA: f32 = 0.08;

/// Clear color of off-screen targets and of the composited screen
pub const SCENE_CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Clear color of the screen in restricted mode
pub const SCREEN_CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

const SOURCE: &str = "matrix::Compositor";

/// Pass sequence states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStage {
    BeginFrame,
    SceneRendered,
    Resolved,
    GhostBlended,
    Blurred,
    Composited,
    Presented,
}

/// What `end_frame` did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    /// Stages visited, in order
    pub stages: Vec<FrameStage>,
    /// Previous-frame weight used by the ghosting pass
    pub frame_opacity: Option<f32>,
    pub ghost_blurred: bool,
    /// Current and Previous swapped roles
    pub rotated: bool,
}

impl FrameReport {
    pub fn visited(&self, stage: FrameStage) -> bool {
        self.stages.contains(&stage)
    }
}

enum Mode {
    Full {
        buffers: BufferTriad,
        present: ShaderProgram,
        ghosting: Option<ShaderProgram>,
        blur: Option<ShaderProgram>,
    },
    Restricted {
        fade: ShaderProgram,
        first_frame: bool,
    },
}

pub struct Compositor {
    mode: Mode,
    quad: FullscreenQuad,
    settings: PostProcessSettings,
    swap_time: f32,
    viewport: (u32, u32),
    stage: FrameStage,
}

impl Compositor {
    /// Create the compositor, taking ownership of the frame buffers
    ///
    /// `settings` must already be masked with the allowed effects. Programs
    /// are only created for enabled effects. Blur is dropped on direct
    /// (restricted) buffers.
    ///
    /// # Errors
    ///
    /// Fails if the quad or a program object cannot be created. The frame
    /// buffers are released before returning the error.
    pub fn new(
        device: &mut dyn GraphicsDevice,
        buffers: FrameBuffers,
        settings: &PostProcessSettings,
        swap_time: f32,
        viewport: (u32, u32),
    ) -> Result<Self> {
        let mut settings = settings.clone();
        if buffers.is_direct() && settings.blur() {
            engine_warn!(SOURCE, "Blur is not available on restricted surfaces");
            settings.mask(PostProcessingOptions::GHOSTING);
        }

        let quad = match FullscreenQuad::new(device) {
            Ok(quad) => quad,
            Err(e) => {
                if let FrameBuffers::Triad(triad) = buffers {
                    FrameBufferManager::release(device, triad);
                }
                return Err(e);
            }
        };

        let mode = match buffers {
            FrameBuffers::Direct => match ShaderProgram::load(device, "fade", builtin::FADE) {
                Ok(fade) => Mode::Restricted { fade, first_frame: true },
                Err(e) => {
                    quad.destroy(device);
                    return Err(e);
                }
            },
            FrameBuffers::Triad(triad) => match load_full_programs(device, &settings) {
                Ok((present, ghosting, blur)) => Mode::Full { buffers: triad, present, ghosting, blur },
                Err(e) => {
                    quad.destroy(device);
                    FrameBufferManager::release(device, triad);
                    return Err(e);
                }
            },
        };

        device.set_blend_mode(BlendMode::Premultiplied);

        Ok(Self {
            mode,
            quad,
            settings,
            swap_time,
            viewport,
            stage: FrameStage::Presented,
        })
    }

    pub fn is_restricted(&self) -> bool {
        matches!(self.mode, Mode::Restricted { .. })
    }

    pub fn settings(&self) -> &PostProcessSettings {
        &self.settings
    }

    /// Last completed stage
    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    /// Render target roles, `None` in restricted mode
    pub fn buffers(&self) -> Option<&BufferTriad> {
        match &self.mode {
            Mode::Full { buffers, .. } => Some(buffers),
            Mode::Restricted { .. } => None,
        }
    }

    /// Prepare the scene target for the app
    pub fn begin_frame(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let (width, height) = self.viewport;
        device.set_viewport(width, height);

        match &mut self.mode {
            Mode::Full { buffers, .. } => {
                device.bind_render_target(Some(buffers.current.multisampled))?;
                device.clear(SCENE_CLEAR_COLOR);
            }
            Mode::Restricted { fade, first_frame } => {
                device.bind_render_target(None)?;
                if *first_frame || !self.settings.ghosting() {
                    device.clear(SCREEN_CLEAR_COLOR);
                    *first_frame = false;
                } else {
                    device.set_blend_mode(BlendMode::Alpha);
                    fade.set_float(device, "u_alpha", FADE_ALPHA)?;
                    fade.bind(device)?;
                    let drawn = self.quad.draw(device);
                    device.set_blend_mode(BlendMode::Premultiplied);
                    drawn?;
                }
            }
        }

        self.stage = FrameStage::BeginFrame;
        Ok(())
    }

    /// Run the post-processing passes and present to the default framebuffer
    ///
    /// # Errors
    ///
    /// Fails if called without a matching `begin_frame`, or if a pass fails.
    pub fn end_frame(&mut self, device: &mut dyn GraphicsDevice, clock: &mut Clock) -> Result<FrameReport> {
        if self.stage != FrameStage::BeginFrame {
            return Err(Error::BackendError(format!(
                "end_frame called in stage {:?}, expected BeginFrame",
                self.stage
            )));
        }

        let mut report = FrameReport::default();
        self.advance(&mut report, FrameStage::SceneRendered);

        let interval_elapsed = clock.frame_swap_delta_time() >= self.swap_time;

        if let Mode::Full { buffers, present, ghosting, blur } = &mut self.mode {
            if let Some(ghosting) = ghosting.as_ref().filter(|_| self.settings.ghosting()) {
                device.resolve(buffers.current.multisampled, buffers.current.resolved)?;
                device.resolve(buffers.previous.multisampled, buffers.previous.resolved)?;
                push_stage(&mut self.stage, &mut report, FrameStage::Resolved);

                let opacity = self.settings.frame_opacity(clock.delta_time());
                device.bind_render_target(Some(buffers.mixing.multisampled))?;
                device.clear(SCENE_CLEAR_COLOR);
                device.bind_target_texture(0, buffers.current.resolved)?;
                device.bind_target_texture(1, buffers.previous.resolved)?;
                ghosting.set_int(device, "u_textureC", 0)?;
                ghosting.set_int(device, "u_textureP", 1)?;
                ghosting.set_float(device, "u_previousFrameOpacity", opacity)?;
                ghosting.bind(device)?;
                self.quad.draw(device)?;
                buffers.swap_current_mixing();
                report.frame_opacity = Some(opacity);
                push_stage(&mut self.stage, &mut report, FrameStage::GhostBlended);

                if self.settings.ghosting_blur_size > 0.0 {
                    if let Some(blur) = blur.as_ref() {
                        device.resolve(buffers.current.multisampled, buffers.current.resolved)?;
                        blur_pass(device, &self.quad, blur, buffers, self.settings.ghosting_blur_size)?;
                        buffers.swap_previous_mixing();
                        report.ghost_blurred = true;
                    }
                }
            }

            if let Some(blur) = blur.as_ref().filter(|_| self.settings.blur()) {
                device.resolve(buffers.current.multisampled, buffers.current.resolved)?;
                if !report.visited(FrameStage::Resolved) {
                    push_stage(&mut self.stage, &mut report, FrameStage::Resolved);
                }
                blur_pass(device, &self.quad, blur, buffers, self.settings.blur_size)?;
                buffers.swap_current_mixing();
                push_stage(&mut self.stage, &mut report, FrameStage::Blurred);
            }

            device.resolve(buffers.current.multisampled, buffers.current.resolved)?;
            device.bind_render_target(None)?;
            device.clear(SCENE_CLEAR_COLOR);
            device.bind_target_texture(0, buffers.current.resolved)?;
            present.set_int(device, "u_texture", 0)?;
            present.bind(device)?;
            self.quad.draw(device)?;
            push_stage(&mut self.stage, &mut report, FrameStage::Composited);

            if interval_elapsed && self.settings.ghosting() {
                buffers.swap_current_previous();
                report.rotated = true;
            }
        }

        if interval_elapsed {
            clock.reset_frame_swap();
        }
        self.advance(&mut report, FrameStage::Presented);
        Ok(report)
    }

    /// Delete programs, the quad and every frame buffer
    ///
    /// Must run while the context is still current.
    pub fn destroy(self, device: &mut dyn GraphicsDevice) {
        self.quad.destroy(device);
        match self.mode {
            Mode::Full { buffers, present, ghosting, blur } => {
                present.destroy(device);
                if let Some(program) = ghosting {
                    program.destroy(device);
                }
                if let Some(program) = blur {
                    program.destroy(device);
                }
                FrameBufferManager::release(device, buffers);
            }
            Mode::Restricted { fade, .. } => fade.destroy(device),
        }
    }

    fn advance(&mut self, report: &mut FrameReport, stage: FrameStage) {
        push_stage(&mut self.stage, report, stage);
    }
}

fn push_stage(current: &mut FrameStage, report: &mut FrameReport, stage: FrameStage) {
    *current = stage;
    report.stages.push(stage);
}

/// Blur resolved Current into Mixing
fn blur_pass(
    device: &mut dyn GraphicsDevice,
    quad: &FullscreenQuad,
    blur: &ShaderProgram,
    buffers: &BufferTriad,
    size: f32,
) -> Result<()> {
    device.bind_render_target(Some(buffers.mixing.multisampled))?;
    device.clear(SCENE_CLEAR_COLOR);
    device.bind_target_texture(0, buffers.current.resolved)?;
    blur.set_int(device, "u_textureC", 0)?;
    blur.set_float(device, "u_blurSize", size)?;
    blur.bind(device)?;
    quad.draw(device)
}

type FullPrograms = (ShaderProgram, Option<ShaderProgram>, Option<ShaderProgram>);

fn load_full_programs(device: &mut dyn GraphicsDevice, settings: &PostProcessSettings) -> Result<FullPrograms> {
    let present = ShaderProgram::load(device, "basic_texture", builtin::BASIC_TEXTURE)?;

    let ghosting = if settings.ghosting() {
        match ShaderProgram::load(device, "ghosting", builtin::GHOSTING) {
            Ok(program) => Some(program),
            Err(e) => {
                present.destroy(device);
                return Err(e);
            }
        }
    } else {
        None
    };

    let blur = if settings.ghosting() || settings.blur() {
        match ShaderProgram::load(device, "blur", builtin::BLUR) {
            Ok(program) => Some(program),
            Err(e) => {
                present.destroy(device);
                if let Some(program) = ghosting {
                    program.destroy(device);
                }
                return Err(e);
            }
        }
    } else {
        None
    };

    Ok((present, ghosting, blur))
}

#[cfg(test)]
#[path = "compositor_tests.rs"]
mod tests;
