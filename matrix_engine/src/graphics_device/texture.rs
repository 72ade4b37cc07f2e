/// Sampled texture descriptors

/// Minification/magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Linear,
    Nearest,
}

/// Descriptor for an RGBA8 2D texture uploaded from memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub filter: TextureFilter,
}

impl TextureDesc {
    /// Byte length of a tightly packed RGBA8 image of this size
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}
