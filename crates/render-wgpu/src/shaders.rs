/// WGSL shader for lit instanced boxes (voxel slots, plane parts, cloud blocks).
pub const BOX_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    edge_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    // collapsed slots have a zero basis; keep the normal finite
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz + vec3<f32>(0.0, 1e-6, 0.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(5.0, 10.0, 7.0));
    let ambient = 0.5;
    let diffuse = max(dot(in.world_normal, light_dir), 0.0);
    let lighting = ambient + diffuse * 0.5;
    return vec4<f32>(in.color.rgb * lighting, in.color.a);
}
"#;

/// WGSL shader for the wireframe edges drawn over the voxel slots.
pub const EDGE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    edge_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

@vertex
fn vs_edge(@location(0) position: vec3<f32>, instance: InstanceInput) -> @builtin(position) vec4<f32> {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    return uniforms.view_proj * model * vec4<f32>(position, 1.0);
}

@fragment
fn fs_edge() -> @location(0) vec4<f32> {
    return uniforms.edge_color;
}
"#;

/// WGSL shader for the flat-shaded sea.
pub const SEA_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    edge_color: vec4<f32>,
};

struct SeaUniforms {
    model: mat4x4<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var<uniform> sea: SeaUniforms;

struct SeaOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
};

@vertex
fn vs_sea(@location(0) position: vec3<f32>) -> SeaOutput {
    let world = sea.model * vec4<f32>(position, 1.0);
    var out: SeaOutput;
    out.clip_position = uniforms.view_proj * world;
    out.world_pos = world.xyz;
    return out;
}

@fragment
fn fs_sea(in: SeaOutput) -> @location(0) vec4<f32> {
    let normal = normalize(cross(dpdx(in.world_pos), dpdy(in.world_pos)));
    let light_dir = normalize(vec3<f32>(150.0, 350.0, 350.0));
    let lighting = 0.4 + abs(dot(normal, light_dir)) * 0.6;
    return vec4<f32>(sea.color.rgb * lighting, sea.color.a);
}
"#;
