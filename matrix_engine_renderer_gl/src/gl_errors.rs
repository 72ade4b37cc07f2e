/// GL error reporting
///
/// `gl_check!` drains every pending `glGetError` code after a call and logs
/// each one with the call name and the caller's file and line. Errors are
/// reported, not returned: GL keeps running after a failed call and the
/// next frame usually recovers.

use glow::HasContext;
use matrix_engine::matrix::Engine;
use matrix_engine::matrix::log::LogSeverity;

/// Upper bound on codes drained per check (a lost context can report forever)
const MAX_DRAINED_ERRORS: usize = 16;

/// Symbolic name of a `glGetError` code
pub fn gl_error_name(code: u32) -> &'static str {
    match code {
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => "UNKNOWN_ERROR",
    }
}

/// Log every pending GL error; returns how many were found
pub fn drain_gl_errors(gl: &glow::Context, call: &str, file: &'static str, line: u32) -> usize {
    let mut count = 0;
    while count < MAX_DRAINED_ERRORS {
        let code = unsafe { gl.get_error() };
        if code == glow::NO_ERROR {
            break;
        }
        Engine::log_detailed(
            LogSeverity::Error,
            "matrix::gl",
            format!("OpenGL error {} (0x{:04X}) in call: {}", gl_error_name(code), code, call),
            file,
            line,
        );
        count += 1;
    }
    count
}

/// Check for GL errors after `call`, logging them at the invocation site
macro_rules! gl_check {
    ($gl:expr, $call:expr) => {
        $crate::gl_errors::drain_gl_errors($gl, $call, file!(), line!())
    };
}

#[cfg(test)]
#[path = "gl_errors_tests.rs"]
mod tests;
