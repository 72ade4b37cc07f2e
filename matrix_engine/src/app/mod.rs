/// App module - pluggable visual effects drawn into the scene target

pub mod app;
pub mod rain;
pub mod triangle_app;
pub mod debug_app;
pub mod matrix_app;

pub use app::*;
pub use rain::{RainField, RainDrop, RainInput, RainVertex};
pub use triangle_app::TriangleApp;
pub use debug_app::DebugApp;
pub use matrix_app::MatrixApp;
