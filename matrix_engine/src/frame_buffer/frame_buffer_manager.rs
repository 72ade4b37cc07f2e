/// Frame buffer manager - allocates and releases the render target triad
///
/// Six render targets (three multisampled, three resolved) and one shared
/// depth/stencil renderbuffer, all sized to the viewport. Buffers live from
/// initialization to shutdown and are never resized.

use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, RenderTargetKey, DepthStencilKey,
    RenderTargetDesc, DepthStencilDesc, FramebufferStatus,
};
use crate::{engine_debug, engine_error, engine_warn};
use super::buffer_triad::{BufferTriad, FrameBuffers, RenderTargetPair};

/// Clamp a requested sample count to the device maximum
///
/// Logs a warning when the request is lowered. Never returns less than 1.
pub fn clamp_samples(requested: u32, max_samples: u32) -> u32 {
    let max_samples = max_samples.max(1);
    if requested > max_samples {
        engine_warn!("matrix::FrameBufferManager",
            "Requested {} samples, device supports {}; clamping", requested, max_samples);
        max_samples
    } else {
        requested.max(1)
    }
}

/// Stateless allocator for frame buffers
pub struct FrameBufferManager;

impl FrameBufferManager {
    /// Allocate the frame buffers for a surface
    ///
    /// Restricted surfaces get `FrameBuffers::Direct` and nothing is
    /// allocated on the device.
    pub fn allocate_for(
        device: &mut dyn GraphicsDevice,
        width: u32,
        height: u32,
        samples: u32,
        restricted: bool,
    ) -> Result<FrameBuffers> {
        if restricted {
            engine_debug!("matrix::FrameBufferManager", "Restricted surface, drawing direct to screen");
            return Ok(FrameBuffers::Direct);
        }
        Self::allocate(device, width, height, samples).map(FrameBuffers::Triad)
    }

    /// Allocate the Current/Previous/Mixing triad
    ///
    /// # Arguments
    ///
    /// * `device` - Graphics device with a current context
    /// * `width`, `height` - Viewport size in pixels
    /// * `samples` - Requested MSAA sample count, clamped to the device maximum
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompleteFramebuffer` if any framebuffer fails its
    /// completeness check. Everything created so far is released first.
    pub fn allocate(
        device: &mut dyn GraphicsDevice,
        width: u32,
        height: u32,
        samples: u32,
    ) -> Result<BufferTriad> {
        let samples = clamp_samples(samples, device.capabilities().max_samples);

        let depth_stencil = device.create_depth_stencil(&DepthStencilDesc { width, height, samples })?;
        let mut created: Vec<RenderTargetKey> = Vec::with_capacity(6);

        let result = create_triad(device, width, height, samples, depth_stencil, &mut created);

        match result {
            Ok(triad) => {
                engine_debug!("matrix::FrameBufferManager",
                    "Allocated frame buffers {}x{} with {} samples", width, height, samples);
                Ok(triad)
            }
            Err(e) => {
                for target in created {
                    device.destroy_render_target(target);
                }
                device.destroy_depth_stencil(depth_stencil);
                Err(e)
            }
        }
    }

    /// Delete every GPU object of the triad
    ///
    /// Must run while the context is still current.
    pub fn release(device: &mut dyn GraphicsDevice, triad: BufferTriad) {
        for target in triad.targets() {
            device.destroy_render_target(target);
        }
        device.destroy_depth_stencil(triad.depth_stencil);
    }
}

fn create_triad(
    device: &mut dyn GraphicsDevice,
    width: u32,
    height: u32,
    samples: u32,
    depth_stencil: DepthStencilKey,
    created: &mut Vec<RenderTargetKey>,
) -> Result<BufferTriad> {
    let current = create_pair(device, width, height, samples, depth_stencil, created)?;
    let previous = create_pair(device, width, height, samples, depth_stencil, created)?;
    let mixing = create_pair(device, width, height, samples, depth_stencil, created)?;
    Ok(BufferTriad {
        current,
        previous,
        mixing,
        depth_stencil,
        width,
        height,
        samples,
    })
}

fn create_pair(
    device: &mut dyn GraphicsDevice,
    width: u32,
    height: u32,
    samples: u32,
    depth_stencil: DepthStencilKey,
    created: &mut Vec<RenderTargetKey>,
) -> Result<RenderTargetPair> {
    let multisampled = device.create_render_target(&RenderTargetDesc::multisampled(width, height, samples))?;
    created.push(multisampled);
    device.attach_depth_stencil(multisampled, depth_stencil)?;
    check_complete(device, multisampled, "multisampled")?;

    let resolved = device.create_render_target(&RenderTargetDesc::resolved(width, height))?;
    created.push(resolved);
    check_complete(device, resolved, "resolved")?;

    Ok(RenderTargetPair { multisampled, resolved })
}

fn check_complete(device: &mut dyn GraphicsDevice, target: RenderTargetKey, kind: &str) -> Result<()> {
    match device.framebuffer_status(target)? {
        FramebufferStatus::Complete => Ok(()),
        FramebufferStatus::Incomplete(status) => {
            let message = format!("{} framebuffer incomplete (status 0x{:04X})", kind, status);
            engine_error!("matrix::FrameBufferManager", "{}", message);
            Err(Error::IncompleteFramebuffer(message))
        }
    }
}

#[cfg(test)]
#[path = "frame_buffer_manager_tests.rs"]
mod tests;
