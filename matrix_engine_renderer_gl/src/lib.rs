/*!
# Matrix Engine - OpenGL Renderer Backend

OpenGL 3.3 core / OpenGL ES 3.0 implementation of the matrix_engine traits,
using `glow` for GL calls and `khronos-egl` for contexts.

Surfaces:

- **WindowSurface**: X11 window, fullscreen window or desktop wallpaper (Linux)
- **AndroidSurface**: ANativeWindow of a live wallpaper, restricted mode
- **HeadlessSurface**: EGL pbuffer, no window
*/

#[macro_use]
mod gl_errors;
mod gl_shader;
mod gl_device;
mod egl_context;
mod headless_surface;
mod android_surface;
#[cfg(target_os = "linux")]
mod window_surface;

pub use gl_device::GlGraphicsDevice;
pub use gl_errors::{gl_error_name, drain_gl_errors};
pub use egl_context::{EglContext, EglTarget};
pub use headless_surface::HeadlessSurface;
pub use android_surface::AndroidSurface;
#[cfg(target_os = "linux")]
pub use window_surface::{WindowSurface, WindowStyle, WINDOW_TITLE};
