//! Virtual pet persistence
//!
//! The pet overlay keeps its stats in a small native-endian file next to
//! the binary. Stats are loaded at app setup, saved at most every
//! `SAVE_THRESHOLD_SECS` while running, and saved again on shutdown.

mod pet_state;
mod pet_store;

pub use pet_state::{PetState, PET_STATE_SIZE};
pub use pet_store::{PetStore, DEFAULT_PET_STATE_PATH, SAVE_THRESHOLD_SECS, unix_now};
