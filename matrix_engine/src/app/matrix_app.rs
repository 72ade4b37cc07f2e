/// Matrix app - digital rain with an optional image-tinted variant
///
/// The CPU simulation lives in `RainField`; this app owns the GPU side
/// (program, streamed vertex array, wallpaper texture) and the pet state
/// file that travels with the rain.

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::graphics_device::{
    BufferUsage, GraphicsDevice, PrimitiveTopology, TextureDesc, TextureFilter, TextureKey,
    VertexArrayDesc, VertexArrayKey, VertexAttribute,
};
use crate::options::{AppKind, PostProcessingOptions};
use crate::pet::{unix_now, PetStore, DEFAULT_PET_STATE_PATH};
use crate::shader::{builtin, ShaderProgram};
use crate::{engine_debug, engine_info, engine_warn};
use super::app::{App, FrameContext, SetupContext};
use super::rain::{
    RainField, RainInput, RainVertex, DELTA_MULTIPLIER, RAIN_LIMIT, RESTRICTED_RAIN_LIMIT, ROTATION,
    VERTICES_PER_DROP,
};

const SOURCE: &str = "matrix::MatrixApp";

/// Previous-frame retention of the rainbow rain
pub const RAINBOW_OPACITY: f32 = 0.97;

/// Previous-frame retention of the image-tinted rain
pub const WALLPAPER_OPACITY: f32 = 0.998;

pub const GHOSTING_BLUR_SIZE: f32 = 0.1;

/// Glyph size as a fraction of the viewport height
const CHARACTER_SCALE_DIVISOR: f32 = 70.0;

/// Texture unit of the wallpaper image
const WALLPAPER_UNIT: u32 = 1;

const ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute { location: 0, components: 2, offset: 0 },
    VertexAttribute { location: 1, components: 4, offset: 8 },
];

pub struct MatrixApp {
    seed: Option<u64>,
    program: Option<ShaderProgram>,
    vertex_array: Option<VertexArrayKey>,
    wallpaper: Option<TextureKey>,
    field: Option<RainField>,
    vertices: Vec<RainVertex>,
    base_color: f32,
    pet: Option<PetStore>,
}

impl MatrixApp {
    pub fn new() -> Self {
        Self {
            seed: None,
            program: None,
            vertex_array: None,
            wallpaper: None,
            field: None,
            vertices: Vec::new(),
            base_color: 0.0,
            pet: None,
        }
    }

    /// Deterministic rain, for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::new() }
    }

    pub fn field(&self) -> Option<&RainField> {
        self.field.as_ref()
    }

    pub fn pet(&self) -> Option<&PetStore> {
        self.pet.as_ref()
    }

    pub fn uses_wallpaper(&self) -> bool {
        self.wallpaper.is_some()
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn setup_pet(&mut self, path: Option<&Path>) {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_PET_STATE_PATH), Path::to_path_buf);
        match PetStore::load(&path, unix_now()) {
            Ok(store) => self.pet = Some(store),
            Err(e) => engine_warn!(SOURCE, "Pet state disabled: {}", e),
        }
    }
}

impl Default for MatrixApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image file into tightly packed RGBA8
fn load_image(path: &Path) -> Result<(TextureDesc, Vec<u8>)> {
    let image = image::open(path)
        .map_err(|e| Error::Io(format!("Cannot load image '{}': {}", path.display(), e)))?
        .to_rgba8();
    let desc = TextureDesc {
        width: image.width(),
        height: image.height(),
        filter: TextureFilter::Linear,
    };
    Ok((desc, image.into_raw()))
}

impl App for MatrixApp {
    fn kind(&self) -> AppKind {
        AppKind::Matrix
    }

    fn setup(&mut self, ctx: SetupContext<'_>) -> Result<()> {
        ctx.settings.effects |= PostProcessingOptions::GHOSTING;
        ctx.settings.ghosting_previous_frame_opacity = RAINBOW_OPACITY;
        ctx.settings.ghosting_blur_size = GHOSTING_BLUR_SIZE;

        let mut limit = if ctx.restricted { RESTRICTED_RAIN_LIMIT } else { RAIN_LIMIT };

        if let Some(path) = ctx.options.image_path.as_deref() {
            match load_image(path) {
                Ok((desc, pixels)) => {
                    self.wallpaper = Some(ctx.device.create_texture(&desc, &pixels)?);
                    ctx.settings.ghosting_previous_frame_opacity = WALLPAPER_OPACITY;
                    limit = limit * 3 / 2;
                    engine_info!(SOURCE, "Using wallpaper image '{}' ({}x{})",
                        path.display(), desc.width, desc.height);
                }
                Err(e) => engine_warn!(SOURCE, "{}, falling back to rainbow rain", e),
            }
        }

        let program = if self.wallpaper.is_some() {
            ShaderProgram::load(ctx.device, "matrix_wallpaper", &builtin::matrix_wallpaper())?
        } else {
            ShaderProgram::load(ctx.device, "matrix_rainbow", &builtin::matrix_rainbow())?
        };

        let (width, height) = ctx.viewport;
        let (w, h) = (width as f32, height as f32);
        program.set_mat4(ctx.device, "u_Projection", Mat4::orthographic_rh_gl(0.0, w, 0.0, h, -1.0, 1.0))?;
        program.set_vec2(ctx.device, "u_ViewportSize", Vec2::new(w, h))?;
        program.set_int(ctx.device, "u_Rotation", ROTATION)?;
        program.set_float(ctx.device, "u_CharacterScaling", h / CHARACTER_SCALE_DIVISOR)?;
        if self.wallpaper.is_some() {
            program.set_int(ctx.device, "u_WallpaperTexture", WALLPAPER_UNIT as i32)?;
        }
        self.program = Some(program);

        let field = RainField::new(limit, width, height, !ctx.restricted, self.rng());
        field.write_vertices(&mut self.vertices);
        self.vertex_array = Some(ctx.device.create_vertex_array(&VertexArrayDesc {
            name: "matrix_rain",
            stride: std::mem::size_of::<RainVertex>() as u32,
            attributes: &ATTRIBUTES,
            vertices: bytemuck::cast_slice(&self.vertices),
            usage: BufferUsage::Stream,
        })?);
        engine_debug!(SOURCE, "Simulating {} drops", field.len());
        self.field = Some(field);

        self.setup_pet(ctx.options.pet_state_path.as_deref());
        Ok(())
    }

    fn frame(&mut self, ctx: FrameContext<'_>) -> Result<()> {
        let (Some(program), Some(vertex_array), Some(field)) =
            (self.program.as_ref(), self.vertex_array, self.field.as_mut())
        else {
            return Ok(());
        };

        let delta_time = ctx.clock.delta_time();
        program.set_float(ctx.device, "u_BaseColor", self.base_color)?;
        program.set_float(ctx.device, "u_Time", ctx.clock.elapsed())?;
        self.base_color += delta_time / DELTA_MULTIPLIER;

        field.step(&RainInput {
            delta_time,
            mouse: Vec2::new(ctx.events.mouse_x, ctx.events.mouse_y),
            mouse_left: ctx.events.mouse_left,
            keys_pressed: ctx.events.keys_pressed,
        });
        field.write_vertices(&mut self.vertices);

        ctx.device.update_vertices(vertex_array, bytemuck::cast_slice(&self.vertices))?;
        if let Some(texture) = self.wallpaper {
            ctx.device.bind_texture(WALLPAPER_UNIT, texture)?;
        }
        program.bind(ctx.device)?;
        let count = (field.len() * VERTICES_PER_DROP) as u32;
        ctx.device.draw(vertex_array, PrimitiveTopology::Triangles, 0, count)?;

        if let Some(pet) = self.pet.as_mut() {
            if let Err(e) = pet.save_if_due(unix_now()) {
                engine_warn!(SOURCE, "Failed to save pet state: {}", e);
            }
        }
        Ok(())
    }

    fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(vertex_array) = self.vertex_array.take() {
            device.destroy_vertex_array(vertex_array);
        }
        if let Some(texture) = self.wallpaper.take() {
            device.destroy_texture(texture);
        }
        if let Some(program) = self.program.take() {
            program.destroy(device);
        }
        self.field = None;

        if let Some(mut pet) = self.pet.take() {
            if let Err(e) = pet.save(unix_now()) {
                engine_warn!(SOURCE, "Failed to save pet state: {}", e);
            }
        }
    }
}

#[cfg(test)]
#[path = "matrix_app_tests.rs"]
mod tests;
