/// WGSL shader for every scene draw.
///
/// Two vertex entry points share one fragment stage:
/// - `vs_single` places a mesh with a per-draw model matrix and material
///   carried as instance attributes.
/// - `vs_instanced` adds a per-instance offset to each vertex in world space
///   and reads its material from the group 1 uniform.
///
/// `color_src` selects the fragment colour: 1 flat, 2 UV, 3 texture 0,
/// 4 texture 1, anything else magenta.
pub const SCENE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
};

struct Material {
    color: vec4<f32>,
    color_src: u32,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var<uniform> material: Material;

@group(2) @binding(0)
var texture0: texture_2d<f32>;
@group(2) @binding(1)
var sampler0: sampler;
@group(2) @binding(2)
var texture1: texture_2d<f32>;
@group(2) @binding(3)
var sampler1: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct SingleInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) color_src: u32,
};

struct OffsetInput {
    @location(2) offset: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) @interpolate(flat) color_src: u32,
};

@vertex
fn vs_single(vertex: VertexInput, instance: SingleInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    var out: VertexOutput;
    out.clip_position = globals.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    out.color = instance.color;
    out.color_src = instance.color_src;
    return out;
}

@vertex
fn vs_instanced(vertex: VertexInput, instance: OffsetInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = globals.view_proj * vec4<f32>(vertex.position + instance.offset, 1.0);
    out.uv = vertex.uv;
    out.color = material.color;
    out.color_src = material.color_src;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Sampling must stay in uniform control flow.
    let tex0 = textureSample(texture0, sampler0, in.uv);
    let tex1 = textureSample(texture1, sampler1, in.uv);
    switch in.color_src {
        case 1u: { return in.color; }
        case 2u: { return vec4<f32>(in.uv, 0.0, 1.0); }
        case 3u: { return tex0; }
        case 4u: { return tex1; }
        default: { return vec4<f32>(1.0, 0.0, 1.0, 1.0); }
    }
}
"#;
