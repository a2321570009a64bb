//! WGSL shaders

/// Textured glyph quads
///
/// Vertex input is the layout `quill_text` emits: `vert` (pixel position,
/// y down) at location 0 and `vert_tex_coord` (atlas UV) at location 1.
/// The atlas stores coverage in its red channel.
pub const TEXT_SHADER: &str = r#"
// ============================================================================
// Quill Text Shader
// ============================================================================

struct TextUniforms {
    // Render target size in pixels
    resolution: vec2<f32>,
    _padding: vec2<f32>,
    text_color: vec4<f32>,
}

struct VertexInput {
    @location(0) vert: vec2<f32>,
    @location(1) vert_tex_coord: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@group(0) @binding(0) var<uniform> uniforms: TextUniforms;
@group(0) @binding(1) var glyph_atlas: texture_2d<f32>;
@group(0) @binding(2) var glyph_sampler: sampler;

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;

    // Pixels to clip space
    let clip_pos = vec2<f32>(
        (in.vert.x / uniforms.resolution.x) * 2.0 - 1.0,
        1.0 - (in.vert.y / uniforms.resolution.y) * 2.0
    );

    out.position = vec4<f32>(clip_pos, 0.0, 1.0);
    out.uv = in.vert_tex_coord;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let coverage = textureSample(glyph_atlas, glyph_sampler, in.uv).r;
    return vec4<f32>(uniforms.text_color.rgb, uniforms.text_color.a * coverage);
}
"#;
