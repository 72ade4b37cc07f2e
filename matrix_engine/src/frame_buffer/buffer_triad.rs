/// Buffer triad - the three render target roles rotated by the compositor
///
/// Roles are reassigned by swapping handles, never by copying pixels, so
/// every swap keeps the three pairs disjoint.

use crate::graphics_device::{RenderTargetKey, DepthStencilKey};

/// A multisampled scene target and its resolved output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetPair {
    pub multisampled: RenderTargetKey,
    pub resolved: RenderTargetKey,
}

/// Role of a pair inside the triad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferRole {
    /// This frame's scene
    Current,
    /// Last displayed frame
    Previous,
    /// Scratch target for blend output
    Mixing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferTriad {
    pub current: RenderTargetPair,
    pub previous: RenderTargetPair,
    pub mixing: RenderTargetPair,
    /// Shared by the three multisampled targets
    pub depth_stencil: DepthStencilKey,
    pub width: u32,
    pub height: u32,
    /// Sample count after clamping
    pub samples: u32,
}

impl BufferTriad {
    pub fn pair(&self, role: BufferRole) -> RenderTargetPair {
        match role {
            BufferRole::Current => self.current,
            BufferRole::Previous => self.previous,
            BufferRole::Mixing => self.mixing,
        }
    }

    /// Role currently held by a render target, if it belongs to the triad
    pub fn role_of(&self, target: RenderTargetKey) -> Option<BufferRole> {
        [BufferRole::Current, BufferRole::Previous, BufferRole::Mixing]
            .into_iter()
            .find(|role| {
                let pair = self.pair(*role);
                pair.multisampled == target || pair.resolved == target
            })
    }

    pub fn swap_current_mixing(&mut self) {
        std::mem::swap(&mut self.current, &mut self.mixing);
    }

    pub fn swap_previous_mixing(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.mixing);
    }

    pub fn swap_current_previous(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
    }

    /// All six render targets, role by role
    pub fn targets(&self) -> [RenderTargetKey; 6] {
        [
            self.current.multisampled,
            self.current.resolved,
            self.previous.multisampled,
            self.previous.resolved,
            self.mixing.multisampled,
            self.mixing.resolved,
        ]
    }

    /// True when no render target is shared between roles
    pub fn is_partitioned(&self) -> bool {
        let targets = self.targets();
        targets
            .iter()
            .enumerate()
            .all(|(i, a)| targets[i + 1..].iter().all(|b| a != b))
    }
}

/// Render targets available to the compositor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBuffers {
    /// Off-screen MSAA triad (full mode)
    Triad(BufferTriad),
    /// No off-screen targets, everything draws to the default framebuffer
    Direct,
}

impl FrameBuffers {
    pub fn triad(&self) -> Option<&BufferTriad> {
        match self {
            FrameBuffers::Triad(triad) => Some(triad),
            FrameBuffers::Direct => None,
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, FrameBuffers::Direct)
    }
}

#[cfg(test)]
#[path = "buffer_triad_tests.rs"]
mod tests;
