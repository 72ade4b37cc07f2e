/*!
# Matrix Engine

Core types for the Matrix digital-rain renderer.

This crate is backend-agnostic: it talks to the GPU only through the
`GraphicsDevice` trait and to the platform only through the `Surface` trait.
The OpenGL/GLES backend (`matrix_engine_renderer_gl`) provides concrete
devices and surfaces for desktop windows, X11 wallpapers and Android.

## Architecture

- **GraphicsDevice**: GPU object factory and command sink
- **Surface**: native window plus context, produces a device
- **FrameBufferManager**: Current/Previous/Mixing render target triad
- **Compositor**: per-frame post-processing (resolve, ghosting, blur, composite)
- **App**: pluggable visual effect (matrix rain, triangle, debug quad)
- **Renderer**: owns all of the above and drives the main loop
- **WallpaperSession**: host-driven lifecycle for mobile live wallpapers
*/

// Internal modules
mod error;
mod engine;
mod log;
mod clock;
mod options;
mod events;
mod graphics_device;
mod frame_buffer;
mod shader;
mod post_process;
mod pet;
mod surface;
mod app;
mod renderer;

// Main matrix namespace module
pub mod matrix {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::engine::Engine;

    // Main loop
    pub use crate::renderer::{Renderer, FrameOutcome, WallpaperSession, SettleTiming};

    // Process options
    pub use crate::options::{
        Options, AppKind, PostProcessSettings, PostProcessingOptions, frame_opacity,
        TARGET_FPS, DEFAULT_SWAP_TIME,
    };

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    pub mod time {
        pub use crate::clock::{Clock, TimeSource, MonotonicTime, ManualTime};
    }

    pub mod events {
        pub use crate::events::{GroupedEvents, MouseButton};
    }

    // GPU abstraction implemented by backends
    pub mod device {
        pub use crate::graphics_device::*;
    }

    pub mod surface {
        pub use crate::surface::*;
    }

    pub mod frame_buffer {
        pub use crate::frame_buffer::*;
    }

    pub mod shader {
        pub use crate::shader::*;
    }

    pub mod post_process {
        pub use crate::post_process::*;
    }

    pub mod app {
        pub use crate::app::*;
    }

    pub mod pet {
        pub use crate::pet::*;
    }
}

// Re-export math library at crate root
pub use glam;
