/// GLSL source helpers
///
/// A combined source holds both stages, each introduced by a marker line:
///
/// ```text
/// #shader vertex
/// ...
/// #shader fragment
/// ...
/// ```

use crate::graphics_device::GraphicsApi;

const DESKTOP_VERSION: &str = "#version 330 core";
const ES_VERSION: &str = "#version 300 es";
const ES_PRECISION: &str = "\nprecision mediump float;";

/// Maximum number of source characters echoed in compile error logs
pub const SOURCE_EXCERPT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Vertex and fragment text split out of a combined source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }

    /// Rewrite both stages for the target API
    pub fn for_api(self, api: GraphicsApi) -> Self {
        match api {
            GraphicsApi::DesktopGl => self,
            GraphicsApi::Gles => Self {
                vertex: convert_for_es(&self.vertex),
                fragment: convert_for_es(&self.fragment),
            },
        }
    }
}

/// Split a combined source on `#shader vertex` / `#shader fragment` lines
///
/// Lines before the first marker belong to no stage and are dropped.
/// A marker naming neither stage keeps the previous stage.
pub fn parse_shader(source: &str) -> ShaderSources {
    let mut sources = ShaderSources::default();
    let mut stage: Option<ShaderStage> = None;

    for line in source.lines() {
        if line.contains("#shader") {
            if line.contains("vertex") {
                stage = Some(ShaderStage::Vertex);
            } else if line.contains("fragment") {
                stage = Some(ShaderStage::Fragment);
            }
            continue;
        }
        let target = match stage {
            Some(ShaderStage::Vertex) => &mut sources.vertex,
            Some(ShaderStage::Fragment) => &mut sources.fragment,
            None => continue,
        };
        target.push_str(line);
        target.push('\n');
    }

    sources
}

/// Replace the first `#version 330 core` with `#version 300 es` plus a
/// default float precision. Sources without that header are returned as-is.
pub fn convert_for_es(source: &str) -> String {
    match source.find(DESKTOP_VERSION) {
        Some(pos) => {
            let mut converted = String::with_capacity(source.len() + ES_PRECISION.len());
            converted.push_str(&source[..pos]);
            converted.push_str(ES_VERSION);
            converted.push_str(ES_PRECISION);
            converted.push_str(&source[pos + DESKTOP_VERSION.len()..]);
            converted
        }
        None => source.to_string(),
    }
}

/// First `SOURCE_EXCERPT_CHARS` characters of a source, cut on a char boundary
pub fn source_excerpt(source: &str) -> &str {
    match source.char_indices().nth(SOURCE_EXCERPT_CHARS) {
        Some((end, _)) => &source[..end],
        None => source,
    }
}

#[cfg(test)]
#[path = "shader_source_tests.rs"]
mod tests;
