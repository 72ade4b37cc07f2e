/// Mock surface for testing
///
/// Produces `MockGraphicsDevice`s, scripts input and failures, and records
/// every lifecycle call so tests can check ordering.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::events::GroupedEvents;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::DeviceCapabilities;
use crate::options::Options;
use super::{Surface, SurfaceCapabilities};

pub struct MockSurface {
    pub viewport: (u32, u32),
    pub capabilities: SurfaceCapabilities,
    pub device_capabilities: DeviceCapabilities,

    // ===== failure injection =====
    /// Number of `create_context` calls that fail before one succeeds
    pub failing_creates: u32,
    /// Forwarded to the created device
    pub fail_framebuffer_after: Option<usize>,
    pub fail_swaps: bool,

    // ===== scripted input =====
    /// Report `quit` on this poll (1-based)
    pub quit_on_poll: Option<u32>,
    /// Cursor position and left button applied on every poll
    pub mouse: Option<(f32, f32, bool)>,

    // ===== recorded calls =====
    pub create_attempts: u32,
    pub polls: u32,
    pub swaps: u32,
    pub context_alive: bool,
    /// Live device objects when the device was handed back
    pub released_live_objects: Option<usize>,
    /// Whether the context was still alive when the device was handed back
    pub released_with_context: bool,
    pub destroy_calls: u32,
    /// Lifecycle calls in order: "create", "release", "destroy"
    pub calls: Vec<&'static str>,
    /// Same calls, shared: clone it to watch a surface after handing it over
    pub journal: Rc<RefCell<Vec<&'static str>>>,
}

impl MockSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width, height),
            capabilities: SurfaceCapabilities::default(),
            device_capabilities: MockGraphicsDevice::new().capabilities,
            failing_creates: 0,
            fail_framebuffer_after: None,
            fail_swaps: false,
            quit_on_poll: None,
            mouse: None,
            create_attempts: 0,
            polls: 0,
            swaps: 0,
            context_alive: false,
            released_live_objects: None,
            released_with_context: false,
            destroy_calls: 0,
            calls: Vec::new(),
            journal: Rc::default(),
        }
    }

    /// Android-like surface: direct-to-screen only
    fn record(&mut self, call: &'static str) {
        self.calls.push(call);
        self.journal.borrow_mut().push(call);
    }

    pub fn restricted(width: u32, height: u32) -> Self {
        let mut surface = Self::new(width, height);
        surface.capabilities.restricted = true;
        surface
    }
}

impl Surface for MockSurface {
    type Device = MockGraphicsDevice;

    fn create_context(&mut self, _options: &Options) -> Result<MockGraphicsDevice> {
        self.create_attempts += 1;
        self.record("create");
        if self.failing_creates > 0 {
            self.failing_creates -= 1;
            return Err(Error::InitializationFailed("mock surface unavailable".to_string()));
        }
        let mut device = MockGraphicsDevice::with_capabilities(self.device_capabilities);
        device.fail_framebuffer_after = self.fail_framebuffer_after;
        self.context_alive = true;
        Ok(device)
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn capabilities(&self) -> SurfaceCapabilities {
        self.capabilities
    }

    fn poll_events(&mut self, events: &mut GroupedEvents) {
        self.polls += 1;
        if let Some((x, y, pressed)) = self.mouse {
            events.touch(x, y, pressed);
        }
        if self.quit_on_poll == Some(self.polls) {
            events.quit = true;
        }
    }

    fn swap_buffers(&mut self) -> Result<()> {
        if self.fail_swaps {
            return Err(Error::BackendError("mock swap failed".to_string()));
        }
        self.swaps += 1;
        Ok(())
    }

    fn destroy_context(&mut self, device: MockGraphicsDevice) {
        self.record("release");
        self.released_live_objects = Some(device.live_objects());
        self.released_with_context = self.context_alive;
    }

    fn destroy(&mut self) {
        self.record("destroy");
        self.destroy_calls += 1;
        self.context_alive = false;
    }
}
