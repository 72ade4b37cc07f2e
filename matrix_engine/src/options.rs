/// Runtime options
///
/// `Options` holds everything decided at process start (surface kind, size,
/// app selection, swap interval). `PostProcessSettings` holds the effect
/// parameters that apps are allowed to adjust during setup, before the
/// allowed-effects mask is applied.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use bitflags::bitflags;

/// Reference frame rate the ghosting opacity is expressed at
pub const TARGET_FPS: f32 = 60.0;

/// Default interval between Current/Previous rotations (seconds)
pub const DEFAULT_SWAP_TIME: f32 = 1.0 / 60.0;

bitflags! {
    /// Independent post-processing effect toggles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PostProcessingOptions: u32 {
        /// Blend the current frame over an attenuated previous frame
        const GHOSTING = 1 << 0;
        /// Blur the composited frame
        const BLUR = 1 << 1;
    }
}

// ============================================================================
// AppKind
// ============================================================================

/// Built-in visual apps selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppKind {
    #[default]
    Matrix,
    Triangle,
    Debug,
}

impl AppKind {
    pub const ALL: [AppKind; 3] = [AppKind::Matrix, AppKind::Triangle, AppKind::Debug];

    pub fn name(&self) -> &'static str {
        match self {
            AppKind::Matrix => "matrix",
            AppKind::Triangle => "triangle",
            AppKind::Debug => "debug",
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AppKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = AppKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown app '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

// ============================================================================
// PostProcessSettings
// ============================================================================

/// Effect parameters, adjustable by apps during setup
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessSettings {
    /// Effects requested by the app
    pub effects: PostProcessingOptions,
    /// Blur radius of the standalone blur pass (texels)
    pub blur_size: f32,
    /// Blur radius of the ghosting sub-pass; 0 disables it
    pub ghosting_blur_size: f32,
    /// Previous-frame retention at 60 FPS
    pub ghosting_previous_frame_opacity: f32,
}

impl Default for PostProcessSettings {
    fn default() -> Self {
        Self {
            effects: PostProcessingOptions::empty(),
            blur_size: 1.0,
            ghosting_blur_size: 0.0,
            ghosting_previous_frame_opacity: 0.99,
        }
    }
}

impl PostProcessSettings {
    /// Intersect the requested effects with the allowed mask
    ///
    /// Applied once, before pass setup. Applying it again is a no-op.
    pub fn mask(&mut self, allowed: PostProcessingOptions) {
        self.effects &= allowed;
    }

    pub fn ghosting(&self) -> bool {
        self.effects.contains(PostProcessingOptions::GHOSTING)
    }

    pub fn blur(&self) -> bool {
        self.effects.contains(PostProcessingOptions::BLUR)
    }

    /// Framerate-normalized retention of the previous frame
    ///
    /// `base ^ (delta_time * 60)`: the per-second decay stays `base ^ 60`
    /// whatever the actual frame time.
    pub fn frame_opacity(&self, delta_time: f32) -> f32 {
        frame_opacity(self.ghosting_previous_frame_opacity, delta_time)
    }
}

/// `base ^ (delta_time * TARGET_FPS)`, with negative deltas treated as zero
pub fn frame_opacity(base: f32, delta_time: f32) -> f32 {
    base.powf(delta_time.max(0.0) * TARGET_FPS)
}

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Render as the desktop wallpaper instead of a regular window
    pub wallpaper_mode: bool,
    /// Use the monitor resolution (desktop window only)
    pub fullscreen: bool,
    pub width: u32,
    pub height: u32,
    pub app: AppKind,
    /// Background image for the image-backed rain variant
    pub image_path: Option<PathBuf>,
    /// Minimum time between Current/Previous rotations (seconds)
    pub swap_time: f32,
    /// Throttle the whole frame loop to `swap_time`
    pub loop_with_swap: bool,
    /// Requested MSAA samples (clamped to the device maximum)
    pub samples: u32,
    /// Effects the user or platform allows
    pub allowed_effects: PostProcessingOptions,
    pub post_process: PostProcessSettings,
    /// Pet state file; `None` uses `matrix_cat.data` in the working directory
    pub pet_state_path: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            wallpaper_mode: false,
            fullscreen: true,
            width: 800,
            height: 600,
            app: AppKind::default(),
            image_path: None,
            swap_time: DEFAULT_SWAP_TIME,
            loop_with_swap: true,
            samples: 4,
            allowed_effects: PostProcessingOptions::all(),
            post_process: PostProcessSettings::default(),
            pet_state_path: None,
        }
    }
}

impl Options {
    /// Apply the allowed-effects mask to the requested effects
    pub fn mask_post_processing(&mut self) {
        let allowed = self.allowed_effects;
        self.post_process.mask(allowed);
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
