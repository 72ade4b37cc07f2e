/// Input state shared between the surface (producer) and apps (consumers)
///
/// Surfaces fold their native events into a `GroupedEvents` once per loop
/// iteration; apps read the aggregated state during `frame()`.

use std::time::Instant;

/// Mouse buttons tracked by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Default)]
pub struct GroupedEvents {
    /// Set when the window closes or a shutdown signal arrives
    pub quit: bool,
    /// Cursor position in window pixels, origin top-left
    pub mouse_x: f32,
    pub mouse_y: f32,
    /// Number of keys currently held down
    pub keys_pressed: u32,
    pub mouse_left: bool,
    pub mouse_right: bool,
    pub mouse_middle: bool,
    pub last_mouse_motion: Option<Instant>,
}

impl GroupedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_pressed(&mut self) {
        self.keys_pressed = self.keys_pressed.saturating_add(1);
    }

    /// Releases never drive the count below zero (focus changes can drop presses)
    pub fn key_released(&mut self) {
        self.keys_pressed = self.keys_pressed.saturating_sub(1);
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.mouse_left = pressed,
            MouseButton::Right => self.mouse_right = pressed,
            MouseButton::Middle => self.mouse_middle = pressed,
        }
    }

    pub fn mouse_moved(&mut self, x: f32, y: f32) {
        self.mouse_x = x;
        self.mouse_y = y;
        self.last_mouse_motion = Some(Instant::now());
    }

    /// Touch input from a mobile host: position plus a left-button press
    pub fn touch(&mut self, x: f32, y: f32, pressed: bool) {
        self.mouse_x = x;
        self.mouse_y = y;
        self.mouse_left = pressed;
        if pressed {
            self.last_mouse_motion = Some(Instant::now());
        }
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
