/// Pet stats and their on-disk layout
///
/// Layout: eight `f32` (hunger, energy, cleanliness, affection, mood,
/// playful, clingy, lazy) followed by one `f64` (last_update, unix
/// seconds), native-endian, no header. 40 bytes in total.

use bytemuck::{Pod, Zeroable};

pub const PET_STATE_SIZE: usize = std::mem::size_of::<PetState>();

/// Byte offset where the `f64` field starts
const LAST_UPDATE_OFFSET: usize = 8 * std::mem::size_of::<f32>();

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PetState {
    /// 0..100
    pub hunger: f32,
    /// 0..100
    pub energy: f32,
    /// 0..100
    pub cleanliness: f32,
    /// 0..100
    pub affection: f32,
    /// -100..100
    pub mood: f32,
    /// Personality traits, 0..1
    pub playful: f32,
    pub clingy: f32,
    pub lazy: f32,
    pub last_update: f64,
}

impl PetState {
    /// Default stats stamped with `last_update`
    pub fn new(last_update: f64) -> Self {
        Self {
            hunger: 80.0,
            energy: 75.0,
            cleanliness: 85.0,
            affection: 45.0,
            mood: 15.0,
            playful: 0.55,
            clingy: 0.45,
            lazy: 0.40,
            last_update,
        }
    }

    pub fn to_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Overlay the complete fields found in `bytes` onto `self`
    ///
    /// A trailing partial field is ignored and keeps its current value.
    /// Returns the number of bytes applied.
    pub fn apply_bytes(&mut self, bytes: &[u8]) -> usize {
        let usable = if bytes.len() >= PET_STATE_SIZE {
            PET_STATE_SIZE
        } else if bytes.len() >= LAST_UPDATE_OFFSET {
            LAST_UPDATE_OFFSET
        } else {
            bytes.len() - bytes.len() % std::mem::size_of::<f32>()
        };
        bytemuck::bytes_of_mut(self)[..usable].copy_from_slice(&bytes[..usable]);
        usable
    }
}

#[cfg(test)]
#[path = "pet_state_tests.rs"]
mod tests;
