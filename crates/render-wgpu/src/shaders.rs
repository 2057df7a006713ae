/// WGSL shader for flat-coloured 2D triangles given in surface pixels.
pub const FLAT_SHADER: &str = r#"
struct Uniforms {
    // Surface size in pixels; xy used, zw padding.
    screen: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    // Pixels (origin top-left, y down) to clip space (y up).
    let ndc = vec2<f32>(
        vertex.position.x / uniforms.screen.x * 2.0 - 1.0,
        1.0 - vertex.position.y / uniforms.screen.y * 2.0,
    );
    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
