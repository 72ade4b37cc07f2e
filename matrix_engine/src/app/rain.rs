/// Digital rain simulation
///
/// Each drop is a single glyph falling down the screen; the trail behind
/// it comes from the compositor's ghosting. Drops drift sideways, respawn
/// at the top with a new speed and color, get pushed away by the cursor,
/// and burst out of the cursor when reassigned by key presses or clicks.
///
/// Positions are in pixels with the origin at the bottom-left.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

/// Drops simulated on desktop surfaces
pub const RAIN_LIMIT: usize = 1000;

/// Drops simulated on restricted (mobile) surfaces
pub const RESTRICTED_RAIN_LIMIT: usize = 500;

/// Scales per-second quantities into pixels per frame-second
pub const DELTA_MULTIPLIER: f32 = 20.0;

/// Max absolute per-drop hue offset
pub const COLOR_VARIATION: f32 = 0.05;

/// Grid divisor applied to random positions and speeds
pub const TEXT_SIZE_DIVISOR: f32 = 2.0;

/// Speed of drops bursting out of the cursor
pub const SPEED_DRAW: f32 = 0.5;

/// Sparks are drawn uniformly from `0..=CHANCE_OF_SPARK`; 0 sparkles
pub const CHANCE_OF_SPARK: i32 = 5;

/// Drops reassigned per held key
pub const EFFECT_PER_KEYPRESS: u32 = 10;

/// Drops reassigned while the left button is held
pub const DRAW_STRENGTH: u32 = 100;

/// Glyph tilt in degrees, also the source of the sideways drift
pub const ROTATION: i32 = 5;

const ROTATION_D15: f32 = ROTATION as f32 / 15.0;
const DRIFT: f32 = ROTATION_D15 * 2.0;
const SPEED_OFFSET: f32 = ROTATION_D15 / 2.0;

/// Frames a reassigned drop keeps bursting outward
const PARDONS_CLICK: u32 = 300;
const PARDONS_KEY: u32 = 100;

/// Strength of the cursor repulsion at the cursor itself
const CURSOR_PUSH: f32 = 100.0;

/// Per-drop vertex data (`a_drop` in the matrix shaders)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct RainDrop {
    pub x: f32,
    pub y: f32,
    pub color_offset: f32,
    /// 0..=CHANCE_OF_SPARK, stored as float for the vertex stream
    pub spark: f32,
}

/// One expanded glyph-quad vertex: `a_corner` then `a_drop`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct RainVertex {
    pub corner: [f32; 2],
    pub drop: RainDrop,
}

/// Two triangles covering the unit glyph cell
const CORNERS: [[f32; 2]; 6] = [
    [0.0, 0.0], [1.0, 0.0], [1.0, 1.0],
    [0.0, 0.0], [1.0, 1.0], [0.0, 1.0],
];

pub const VERTICES_PER_DROP: usize = CORNERS.len();

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RainMotion {
    speed: f32,
    /// Offset applied by the cursor, undone once the cursor moves away
    push: Vec2,
    /// Frames left during which the drop ignores gravity
    cursor_pardons: u32,
}

/// Input sampled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RainInput {
    pub delta_time: f32,
    /// Cursor in window pixels, origin top-left
    pub mouse: Vec2,
    pub mouse_left: bool,
    pub keys_pressed: u32,
}

pub struct RainField {
    drops: Vec<RainDrop>,
    motion: Vec<RainMotion>,
    width: f32,
    height: f32,
    mouse_radius: f32,
    /// Cursor repulsion is disabled on touch surfaces
    cursor_push: bool,
    active_cursor_pardons: usize,
    rng: StdRng,
}

impl RainField {
    /// Scatter `capacity` drops over a `width` x `height` screen
    pub fn new(capacity: usize, width: u32, height: u32, cursor_push: bool, rng: StdRng) -> Self {
        let mut field = Self {
            drops: vec![RainDrop::default(); capacity],
            motion: vec![RainMotion::default(); capacity],
            width: width as f32,
            height: height as f32,
            mouse_radius: height as f32 / 10.0,
            cursor_push,
            active_cursor_pardons: 0,
            rng,
        };

        for index in 0..capacity {
            let x = field.random_td_float(0.0, field.width);
            let y = field.random_td_float(0.0, field.height);
            let color_offset = field.random_color_offset();
            let spark = field.random_spark();
            let speed = field.random_speed();
            field.drops[index] = RainDrop { x, y, color_offset, spark };
            field.motion[index].speed = speed;
        }

        field
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }

    pub fn mouse_radius(&self) -> f32 {
        self.mouse_radius
    }

    /// Drops still bursting out of the cursor after the last step
    pub fn active_cursor_pardons(&self) -> usize {
        self.active_cursor_pardons
    }

    /// Reassignment budget for this frame, capped by drops not already bursting
    pub fn reassignment_budget(&self, input: &RainInput) -> usize {
        let mut budget = input.keys_pressed.saturating_mul(EFFECT_PER_KEYPRESS) as usize;
        if input.mouse_left {
            budget += DRAW_STRENGTH as usize;
        }
        budget.min(self.drops.len().saturating_sub(self.active_cursor_pardons))
    }

    /// Advance every drop by one frame
    ///
    /// At most one random drop is reassigned to the cursor per frame.
    pub fn step(&mut self, input: &RainInput) {
        if self.drops.is_empty() {
            return;
        }

        let reassigned = if self.reassignment_budget(input) > 0 {
            Some(self.rng.gen_range(0..self.drops.len()))
        } else {
            None
        };

        // Mouse coordinates are top-left based, drops bottom-left
        let mouse = Vec2::new(input.mouse.x, self.height - input.mouse.y);

        self.active_cursor_pardons = 0;
        for index in 0..self.drops.len() {
            self.increment(index, reassigned == Some(index), mouse, input);
            if self.motion[index].cursor_pardons > 0 {
                self.active_cursor_pardons += 1;
            }
        }
    }

    /// Write six glyph-quad vertices per drop into `out`
    pub fn write_vertices(&self, out: &mut Vec<RainVertex>) {
        out.clear();
        out.reserve(self.drops.len() * VERTICES_PER_DROP);
        for drop in &self.drops {
            out.extend(CORNERS.iter().map(|&corner| RainVertex { corner, drop: *drop }));
        }
    }

    fn increment(&mut self, index: usize, reassigned: bool, mouse: Vec2, input: &RainInput) {
        let add_x = DRIFT * self.random_sign();
        let speed = self.motion[index].speed - SPEED_OFFSET;

        if reassigned {
            let pardons = if input.mouse_left { PARDONS_CLICK } else { PARDONS_KEY };
            let burst = if self.random_int(0, 4) == 0 {
                let angle = (self.random_int(0, 360) as f32).to_radians();
                Vec2::new(angle.cos(), angle.sin()) * input.delta_time * DELTA_MULTIPLIER * SPEED_DRAW
            } else {
                Vec2::ZERO
            };
            let drop = &mut self.drops[index];
            drop.color_offset += 0.5;
            drop.x = mouse.x;
            drop.y = mouse.y;
            self.motion[index] = RainMotion { push: burst, cursor_pardons: pardons, ..self.motion[index] };
        }

        let offset = Vec2::new(self.drops[index].x, self.drops[index].y) - mouse;
        let distance = offset.length();

        let repelled = self.cursor_push
            && self.motion[index].cursor_pardons == 0
            && distance < self.mouse_radius
            && distance > 0.0
            && self.random_int(0, 10) != 0;

        let drop = &mut self.drops[index];
        let motion = &mut self.motion[index];
        if repelled {
            let force = (self.mouse_radius - distance) / self.mouse_radius;
            let push = offset / distance * force * CURSOR_PUSH;
            drop.x += push.x;
            drop.y += push.y;
            motion.push += push;
        } else if motion.cursor_pardons > 0 {
            drop.x += motion.push.x;
            drop.y += motion.push.y;
            motion.cursor_pardons -= 1;
            if motion.cursor_pardons == 0 {
                motion.push = Vec2::ZERO;
            }
        } else if motion.push != Vec2::ZERO {
            drop.x -= motion.push.x;
            drop.y -= motion.push.y;
            motion.push = Vec2::ZERO;
        }

        if motion.cursor_pardons == 0 {
            drop.x += add_x;
            drop.y -= speed * input.delta_time * DELTA_MULTIPLIER;
        }

        if self.random_int(0, 1000) == 0 {
            self.drops[index].x = self.random_td_float(0.0, self.width);
        }

        if self.drops[index].y < 0.0 {
            self.drops[index].y = self.height;
            self.reset(index);
        }
    }

    /// New column, color, spark and speed for a drop leaving the screen
    fn reset(&mut self, index: usize) {
        let x = self.random_td_float(0.0, self.width);
        let spark = self.random_spark();
        let color_offset = self.random_color_offset();
        let speed = self.random_speed();
        let drop = &mut self.drops[index];
        drop.x = x;
        drop.spark = spark;
        drop.color_offset = color_offset;
        self.motion[index].speed = speed;
    }

    // ===== random helpers =====

    /// Uniform integer in `a..=b`
    fn random_int(&mut self, a: i32, b: i32) -> i32 {
        self.rng.gen_range(a..=b)
    }

    fn random_float(&mut self, a: f32, b: f32) -> f32 {
        a + self.rng.gen::<f32>() * (b - a)
    }

    fn random_td_float(&mut self, a: f32, b: f32) -> f32 {
        self.random_float(a / TEXT_SIZE_DIVISOR, b / TEXT_SIZE_DIVISOR) * TEXT_SIZE_DIVISOR
    }

    fn random_sign(&mut self) -> f32 {
        if self.random_int(0, 1) == 0 { -1.0 } else { 1.0 }
    }

    fn random_spark(&mut self) -> f32 {
        self.random_int(0, CHANCE_OF_SPARK) as f32
    }

    /// Whole pixels per frame-second, 10..=20
    fn random_speed(&mut self) -> f32 {
        self.random_td_float(10.0, 20.0).trunc()
    }

    fn random_color_offset(&mut self) -> f32 {
        self.random_float(-COLOR_VARIATION, COLOR_VARIATION)
    }
}

#[cfg(test)]
#[path = "rain_tests.rs"]
mod tests;
