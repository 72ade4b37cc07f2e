//! Error types for the Matrix engine
//!
//! This module defines the error types used throughout the engine,
//! including context creation, frame buffer allocation and persistence.

use std::fmt;

/// Result type for Matrix engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Matrix engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (OpenGL, EGL, windowing)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (render target, program, vertex array, texture)
    InvalidResource(String),

    /// Initialization failed (context, surface, app)
    InitializationFailed(String),

    /// A framebuffer failed its completeness check
    IncompleteFramebuffer(String),

    /// Filesystem error (persisted state, images)
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::IncompleteFramebuffer(msg) => write!(f, "Framebuffer is not complete: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error.to_string())
    }
}

impl Error {
    /// Whether this error must abort the process instead of skipping a frame
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InitializationFailed(_) | Error::IncompleteFramebuffer(_) | Error::OutOfMemory
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
