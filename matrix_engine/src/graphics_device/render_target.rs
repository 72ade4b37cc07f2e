/// Render target descriptors
///
/// A render target is a framebuffer with one color attachment. With
/// `samples > 1` the attachment is multisampled (a multisampled texture on
/// desktop GL, a multisampled renderbuffer on GLES) and must be resolved
/// before it can be sampled. Otherwise it is a plain RGBA8 2D texture.

/// Color attachment format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    Rgba8,
}

/// Descriptor for creating a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetDesc {
    pub width: u32,
    pub height: u32,
    /// Sample count; 0 or 1 means a single-sample texture
    pub samples: u32,
    pub format: ColorFormat,
}

impl RenderTargetDesc {
    /// Multisampled scene target
    pub fn multisampled(width: u32, height: u32, samples: u32) -> Self {
        Self { width, height, samples, format: ColorFormat::Rgba8 }
    }

    /// Single-sample, sampleable resolve target
    pub fn resolved(width: u32, height: u32) -> Self {
        Self { width, height, samples: 0, format: ColorFormat::Rgba8 }
    }

    pub fn is_multisampled(&self) -> bool {
        self.samples > 1
    }
}

/// Descriptor for the shared depth/stencil renderbuffer (DEPTH24_STENCIL8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilDesc {
    pub width: u32,
    pub height: u32,
    pub samples: u32,
}

/// Result of a framebuffer completeness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    /// Incomplete, with the raw status code reported by the driver
    Incomplete(u32),
}

impl FramebufferStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, FramebufferStatus::Complete)
    }
}
