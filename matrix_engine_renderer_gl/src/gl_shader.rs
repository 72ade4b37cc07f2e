/// GLSL compilation and linking
///
/// Compile and link failures are logged together with an excerpt of the
/// offending source and the program object is kept, so a broken shader
/// draws nothing instead of stopping the renderer. Only failing to create
/// the shader or program objects is an error.

use glow::HasContext;
use matrix_engine::matrix::Result;
use matrix_engine::matrix::shader::{source_excerpt, ShaderStage};
use matrix_engine::{engine_err, engine_error};

const SOURCE: &str = "matrix::gl::Shader";

fn stage_name(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => "vertex",
        ShaderStage::Fragment => "fragment",
    }
}

fn gl_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// Compile one stage; compile errors are logged, not returned
pub fn compile_stage(gl: &glow::Context, name: &str, stage: ShaderStage, source: &str) -> Result<glow::Shader> {
    let shader = unsafe { gl.create_shader(gl_stage(stage)) }
        .map_err(|e| engine_err!(SOURCE, "Failed to create {} shader for '{}': {}", stage_name(stage), name, e))?;

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            engine_error!(SOURCE, "Failed to compile {} shader of '{}': {}\nSource:\n{}",
                stage_name(stage), name, gl.get_shader_info_log(shader), source_excerpt(source));
        }
    }
    Ok(shader)
}

/// Compile both stages and link them into a program
///
/// # Errors
///
/// Returns an error if a shader or the program object cannot be created.
pub fn build_program(gl: &glow::Context, name: &str, vertex_source: &str, fragment_source: &str) -> Result<glow::Program> {
    let vertex = compile_stage(gl, name, ShaderStage::Vertex, vertex_source)?;
    let fragment = match compile_stage(gl, name, ShaderStage::Fragment, fragment_source) {
        Ok(fragment) => fragment,
        Err(e) => {
            unsafe { gl.delete_shader(vertex) };
            return Err(e);
        }
    };

    let program = match unsafe { gl.create_program() } {
        Ok(program) => program,
        Err(e) => {
            unsafe {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
            }
            return Err(engine_err!(SOURCE, "Failed to create program object '{}': {}", name, e));
        }
    };

    unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            engine_error!(SOURCE, "Failed to link program '{}': {}\nVertex source:\n{}",
                name, gl.get_program_info_log(program), source_excerpt(vertex_source));
        }
        // The linked program keeps its own copy of the binaries
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);
    }
    Ok(program)
}

#[cfg(test)]
#[path = "gl_shader_tests.rs"]
mod tests;
