/// Built-in GLSL 330 core programs
///
/// Every source is a combined `#shader vertex` / `#shader fragment` text,
/// split with `parse_shader` and rewritten for GLES when needed.
///
/// Attribute locations of the fullscreen quad: 0 = position, 1 = uv.

/// Copies `u_texture` to the screen
pub const BASIC_TEXTURE: &str = r#"#shader vertex
#version 330 core
layout(location = 0) in vec2 a_position;
layout(location = 1) in vec2 a_uv;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
#shader fragment
#version 330 core
in vec2 v_uv;
uniform sampler2D u_texture;
out vec4 fragColor;
void main() {
    fragColor = texture(u_texture, v_uv);
}
"#;

/// Current over a faded Previous, both premultiplied
pub const GHOSTING: &str = r#"#shader vertex
#version 330 core
layout(location = 0) in vec2 a_position;
layout(location = 1) in vec2 a_uv;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
#shader fragment
#version 330 core
in vec2 v_uv;
uniform sampler2D u_textureC;
uniform sampler2D u_textureP;
uniform float u_previousFrameOpacity;
out vec4 fragColor;
void main() {
    vec4 current = texture(u_textureC, v_uv);
    vec4 previous = texture(u_textureP, v_uv) * u_previousFrameOpacity;
    fragColor = current + previous * (1.0 - current.a);
}
"#;

/// 3x3 box blur, `u_blurSize` is the tap distance in texels
pub const BLUR: &str = r#"#shader vertex
#version 330 core
layout(location = 0) in vec2 a_position;
layout(location = 1) in vec2 a_uv;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
#shader fragment
#version 330 core
in vec2 v_uv;
uniform sampler2D u_textureC;
uniform float u_blurSize;
out vec4 fragColor;
void main() {
    vec2 texel = u_blurSize / vec2(textureSize(u_textureC, 0));
    vec4 sum = vec4(0.0);
    for (int x = -1; x <= 1; x++) {
        for (int y = -1; y <= 1; y++) {
            sum += texture(u_textureC, v_uv + vec2(float(x), float(y)) * texel);
        }
    }
    fragColor = sum / 9.0;
}
"#;

/// Black overlay at `u_alpha`, the direct-to-screen ghosting fallback
pub const FADE: &str = r#"#shader vertex
#version 330 core
layout(location = 0) in vec2 a_position;
void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
#shader fragment
#version 330 core
uniform float u_alpha;
out vec4 fragColor;
void main() {
    fragColor = vec4(0.0, 0.0, 0.0, u_alpha);
}
"#;

/// Vertex-colored triangle with a time-driven hue shift
pub const TRIANGLE: &str = r#"#shader vertex
#version 330 core
layout(location = 0) in vec2 a_position;
layout(location = 1) in vec3 a_color;
uniform float u_Time;
out vec3 v_color;
void main() {
    float angle = u_Time * 0.6283185;
    mat2 spin = mat2(cos(angle), sin(angle), -sin(angle), cos(angle));
    v_color = a_color;
    gl_Position = vec4(spin * a_position, 0.0, 1.0);
}
#shader fragment
#version 330 core
in vec3 v_color;
uniform float u_Time;
out vec4 fragColor;
void main() {
    float pulse = 0.5 + 0.5 * sin(u_Time);
    fragColor = vec4(v_color * (0.5 + 0.5 * pulse), 1.0);
}
"#;

/// Solid premultiplied `u_color` quad in pixel space
pub const SOLID_QUAD: &str = r#"#shader vertex
#version 330 core
layout(location = 0) in vec2 a_position;
uniform mat4 u_Projection;
uniform vec2 u_Offset;
void main() {
    gl_Position = u_Projection * vec4(a_position + u_Offset, 0.0, 1.0);
}
#shader fragment
#version 330 core
uniform vec4 u_color;
out vec4 fragColor;
void main() {
    fragColor = u_color;
}
"#;

const MATRIX_VERTEX: &str = r#"#shader vertex
#version 330 core
layout(location = 0) in vec2 a_corner;
layout(location = 1) in vec4 a_drop;
uniform mat4 u_Projection;
uniform float u_CharacterScaling;
uniform int u_Rotation;
uniform float u_Time;
out vec2 v_uv;
out vec2 v_screen;
flat out float v_colorOffset;
flat out float v_spark;
flat out float v_glyph;
void main() {
    float angle = radians(float(u_Rotation));
    mat2 tilt = mat2(cos(angle), sin(angle), -sin(angle), cos(angle));
    vec2 local = (a_corner - 0.5) * u_CharacterScaling;
    vec2 position = a_drop.xy + tilt * local;
    v_uv = a_corner;
    v_screen = position;
    v_colorOffset = a_drop.z;
    v_spark = a_drop.w;
    v_glyph = floor(a_drop.x * 0.37 + a_drop.y / u_CharacterScaling) + floor(u_Time * 8.0);
    gl_Position = u_Projection * vec4(position, 0.0, 1.0);
}
"#;

const MATRIX_GLYPH: &str = r#"
in vec2 v_uv;
in vec2 v_screen;
flat in float v_colorOffset;
flat in float v_spark;
flat in float v_glyph;
out vec4 fragColor;

float hash(vec2 p) {
    return fract(sin(dot(p, vec2(127.1, 311.7))) * 43758.5453);
}

// 5x7 cell pattern seeded by the glyph index; 0 outside lit cells
float glyph(vec2 uv, float index) {
    vec2 cell = floor(uv * vec2(5.0, 7.0));
    vec2 inner = fract(uv * vec2(5.0, 7.0));
    float lit = step(0.45, hash(cell + vec2(index * 5.3, index * 1.7)));
    float border = step(0.12, inner.x) * step(0.12, inner.y);
    return lit * border;
}

vec3 hueToRgb(float hue) {
    vec3 k = vec3(0.0, 2.0 / 3.0, 1.0 / 3.0);
    return clamp(abs(fract(hue + k) * 6.0 - 3.0) - 1.0, 0.0, 1.0);
}
"#;

/// Rainbow glyph rain, hue driven by `u_BaseColor`
pub fn matrix_rainbow() -> String {
    format!(
        "{}#shader fragment\n#version 330 core\n{}{}",
        MATRIX_VERTEX,
        MATRIX_GLYPH,
        r#"uniform float u_BaseColor;
uniform vec2 u_ViewportSize;
void main() {
    float mask = glyph(v_uv, v_glyph);
    if (mask <= 0.0) {
        discard;
    }
    float hue = u_BaseColor + v_colorOffset + v_screen.x / u_ViewportSize.x * 0.25;
    vec3 color = hueToRgb(hue);
    if (v_spark < 0.5) {
        color = mix(color, vec3(1.0), 0.7);
    }
    fragColor = vec4(color * mask, mask);
}
"#
    )
}

/// Glyph rain tinted by a background image
pub fn matrix_wallpaper() -> String {
    format!(
        "{}#shader fragment\n#version 330 core\n{}{}",
        MATRIX_VERTEX,
        MATRIX_GLYPH,
        r#"uniform sampler2D u_WallpaperTexture;
uniform vec2 u_ViewportSize;
uniform float u_BaseColor;
void main() {
    float mask = glyph(v_uv, v_glyph);
    if (mask <= 0.0) {
        discard;
    }
    vec2 uv = vec2(v_screen.x / u_ViewportSize.x, 1.0 - v_screen.y / u_ViewportSize.y);
    vec3 color = texture(u_WallpaperTexture, uv).rgb;
    color *= 0.85 + 0.15 * sin(u_BaseColor * 6.2831853 + v_colorOffset * 20.0);
    if (v_spark < 0.5) {
        color = mix(color, vec3(1.0), 0.5);
    }
    fragColor = vec4(color * mask, mask);
}
"#
    )
}

#[cfg(test)]
#[path = "builtin_tests.rs"]
mod tests;
