/// EGL display, context and surface, shared by every GL surface kind
///
/// libEGL is loaded at runtime. Desktop surfaces get an OpenGL 3.3 core
/// context, Android gets OpenGL ES 3.0. The context is made current on the
/// creating thread and stays current until the `EglContext` is dropped.

use std::ffi::c_void;
use std::ptr;

use khronos_egl as egl;
use matrix_engine::matrix::{Error, Result};
use matrix_engine::matrix::device::GraphicsApi;
use matrix_engine::{engine_debug, engine_err, engine_info, engine_warn};

const SOURCE: &str = "matrix::gl::Egl";

pub type EglInstance = egl::DynamicInstance<egl::EGL1_4>;

// EGL 1.5 / EGL_KHR_create_context values, not exposed by the 1.4 instance
const OPENGL_ES3_BIT: egl::Int = 0x0040;
const CONTEXT_MAJOR_VERSION: egl::Int = 0x3098;
const CONTEXT_MINOR_VERSION: egl::Int = 0x30FB;
const CONTEXT_OPENGL_PROFILE_MASK: egl::Int = 0x30FD;
const CONTEXT_OPENGL_CORE_PROFILE_BIT: egl::Int = 0x0001;

/// What the context renders into
#[derive(Debug, Clone, Copy)]
pub enum EglTarget {
    /// Native window (X11 window id or ANativeWindow pointer)
    Window(egl::NativeWindowType),
    /// Off-screen pbuffer of the given size
    Pbuffer { width: u32, height: u32 },
}

/// Config attributes for the requested API, target and sample count
pub fn config_attributes(api: GraphicsApi, target: &EglTarget, samples: u32) -> Vec<egl::Int> {
    let surface_type = match target {
        EglTarget::Window(_) => egl::WINDOW_BIT,
        EglTarget::Pbuffer { .. } => egl::PBUFFER_BIT,
    };
    let renderable = match api {
        GraphicsApi::DesktopGl => egl::OPENGL_BIT,
        GraphicsApi::Gles => OPENGL_ES3_BIT,
    };
    let mut attributes = vec![
        egl::SURFACE_TYPE, surface_type,
        egl::RENDERABLE_TYPE, renderable,
        egl::RED_SIZE, 8,
        egl::GREEN_SIZE, 8,
        egl::BLUE_SIZE, 8,
        egl::ALPHA_SIZE, 8,
        egl::DEPTH_SIZE, 24,
    ];
    if samples > 1 {
        attributes.extend_from_slice(&[egl::SAMPLE_BUFFERS, 1, egl::SAMPLES, samples as egl::Int]);
    }
    attributes.push(egl::NONE);
    attributes
}

/// Context attributes: 3.3 core on desktop, ES 3.0 otherwise
pub fn context_attributes(api: GraphicsApi) -> Vec<egl::Int> {
    match api {
        GraphicsApi::DesktopGl => vec![
            CONTEXT_MAJOR_VERSION, 3,
            CONTEXT_MINOR_VERSION, 3,
            CONTEXT_OPENGL_PROFILE_MASK, CONTEXT_OPENGL_CORE_PROFILE_BIT,
            egl::NONE,
        ],
        GraphicsApi::Gles => vec![egl::CONTEXT_CLIENT_VERSION, 3, egl::NONE],
    }
}

pub struct EglContext {
    egl: EglInstance,
    display: egl::Display,
    context: egl::Context,
    surface: egl::Surface,
}

impl EglContext {
    /// Create a context and a surface for `target` and make them current
    ///
    /// A config with `samples` is tried first, then one without multisampling.
    ///
    /// # Safety
    ///
    /// `native_display` and a window in `target` must be valid native
    /// handles that outlive the returned context.
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if libEGL cannot be loaded or any EGL
    /// step fails. Everything created before the failure is released.
    pub unsafe fn new(
        native_display: egl::NativeDisplayType,
        target: EglTarget,
        api: GraphicsApi,
        samples: u32,
    ) -> Result<Self> {
        let instance = unsafe { EglInstance::load_required() }
            .map_err(|e| Error::InitializationFailed(format!("Cannot load libEGL: {}", e)))?;

        let display = unsafe { instance.get_display(native_display) }
            .ok_or_else(|| Error::InitializationFailed("eglGetDisplay returned no display".to_string()))?;
        let (major, minor) = instance
            .initialize(display)
            .map_err(|e| init_error("eglInitialize", e))?;
        engine_info!(SOURCE, "EGL {}.{} initialized", major, minor);

        match unsafe { Self::create_on(&instance, display, target, api, samples) } {
            Ok((context, surface)) => Ok(Self { egl: instance, display, context, surface }),
            Err(e) => {
                if let Err(term) = instance.terminate(display) {
                    engine_warn!(SOURCE, "eglTerminate failed: {}", term);
                }
                Err(e)
            }
        }
    }

    unsafe fn create_on(
        instance: &EglInstance,
        display: egl::Display,
        target: EglTarget,
        api: GraphicsApi,
        samples: u32,
    ) -> Result<(egl::Context, egl::Surface)> {
        let bound_api = match api {
            GraphicsApi::DesktopGl => egl::OPENGL_API,
            GraphicsApi::Gles => egl::OPENGL_ES_API,
        };
        instance.bind_api(bound_api).map_err(|e| init_error("eglBindAPI", e))?;

        let mut config = instance
            .choose_first_config(display, &config_attributes(api, &target, samples))
            .map_err(|e| init_error("eglChooseConfig", e))?;
        if config.is_none() && samples > 1 {
            engine_warn!(SOURCE, "No EGL config with {} samples, retrying without multisampling", samples);
            config = instance
                .choose_first_config(display, &config_attributes(api, &target, 0))
                .map_err(|e| init_error("eglChooseConfig", e))?;
        }
        let config = config
            .ok_or_else(|| Error::InitializationFailed("No suitable EGL config".to_string()))?;

        let context = instance
            .create_context(display, config, None, &context_attributes(api))
            .map_err(|e| init_error("eglCreateContext", e))?;

        let surface = match target {
            EglTarget::Window(window) => unsafe { instance.create_window_surface(display, config, window, None) },
            EglTarget::Pbuffer { width, height } => instance.create_pbuffer_surface(
                display,
                config,
                &[egl::WIDTH, width as egl::Int, egl::HEIGHT, height as egl::Int, egl::NONE],
            ),
        };
        let surface = match surface {
            Ok(surface) => surface,
            Err(e) => {
                let _ = instance.destroy_context(display, context);
                return Err(init_error("eglCreateSurface", e));
            }
        };

        if let Err(e) = instance.make_current(display, Some(surface), Some(surface), Some(context)) {
            let _ = instance.destroy_surface(display, surface);
            let _ = instance.destroy_context(display, context);
            return Err(init_error("eglMakeCurrent", e));
        }
        engine_debug!(SOURCE, "EGL context current ({:?})", api);
        Ok((context, surface))
    }

    /// Load GL entry points through `eglGetProcAddress`
    pub fn load_gl(&self) -> glow::Context {
        unsafe {
            glow::Context::from_loader_function(|name| {
                self.egl
                    .get_proc_address(name)
                    .map_or(ptr::null(), |f| f as *const c_void)
            })
        }
    }

    /// Surface size as reported by EGL
    pub fn surface_size(&self) -> Result<(u32, u32)> {
        let width = self.query_surface(egl::WIDTH)?;
        let height = self.query_surface(egl::HEIGHT)?;
        Ok((surface_dimension(width), surface_dimension(height)))
    }

    fn query_surface(&self, attribute: egl::Int) -> Result<egl::Int> {
        self.egl
            .query_surface(self.display, self.surface, attribute)
            .map_err(|e| engine_err!(SOURCE, "eglQuerySurface(0x{:04X}) failed: {}", attribute, e))
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.egl
            .swap_buffers(self.display, self.surface)
            .map_err(|e| engine_err!(SOURCE, "eglSwapBuffers failed: {}", e))
    }
}

impl Drop for EglContext {
    fn drop(&mut self) {
        let results = [
            self.egl.make_current(self.display, None, None, None),
            self.egl.destroy_surface(self.display, self.surface),
            self.egl.destroy_context(self.display, self.context),
            self.egl.terminate(self.display),
        ];
        for result in results {
            if let Err(e) = result {
                engine_warn!(SOURCE, "EGL teardown step failed: {}", e);
            }
        }
        engine_debug!(SOURCE, "EGL context destroyed");
    }
}

/// Negative sizes from a broken driver read as 0
fn surface_dimension(value: egl::Int) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn init_error(call: &str, error: egl::Error) -> Error {
    Error::InitializationFailed(format!("{} failed: {}", call, error))
}

#[cfg(test)]
#[path = "egl_context_tests.rs"]
mod tests;
