//! Shard mesh, uniform layout and the WGSL render shader.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Circumradius of a single shard.
pub const SHARD_RADIUS: f32 = 0.15;

/// Tone mapping exposure.
pub const EXPOSURE: f32 = 1.5;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz camera position, w exposure.
    pub camera: [f32; 4],
    /// xyz position, w unused.
    pub key_light_pos: [f32; 4],
    /// rgb linear color, w intensity.
    pub key_light_color: [f32; 4],
    pub fill_light_pos: [f32; 4],
    pub fill_light_color: [f32; 4],
    /// rgb linear color, w intensity.
    pub ambient: [f32; 4],
}

impl Uniforms {
    /// Gold key light from the upper right, emerald fill from below behind,
    /// white ambient.
    pub fn new(view_proj: Mat4, camera_pos: Vec3, gold: Vec3, emerald: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera: camera_pos.extend(EXPOSURE).to_array(),
            key_light_pos: [10.0, 10.0, 10.0, 0.0],
            key_light_color: gold.extend(2.0).to_array(),
            fill_light_pos: [-10.0, -5.0, -10.0, 0.0],
            fill_light_color: emerald.extend(1.0).to_array(),
            ambient: [1.0, 1.0, 1.0, 0.5],
        }
    }
}

/// Vertex of the shard mesh.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Flat-shaded tetrahedron: four faces, three vertices each.
pub fn tetrahedron(radius: f32) -> Vec<MeshVertex> {
    let corners = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ]
    .map(|c| c.normalize() * radius);

    let faces = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

    let mut vertices = Vec::with_capacity(12);
    for [a, b, c] in faces {
        let (a, b, c) = (corners[a], corners[b], corners[c]);
        let mut normal = (b - a).cross(c - a).normalize();
        // Keep normals pointing away from the centroid regardless of winding
        let (a, b, c) = if normal.dot(a + b + c) < 0.0 {
            normal = -normal;
            (a, c, b)
        } else {
            (a, b, c)
        };
        for p in [a, b, c] {
            vertices.push(MeshVertex {
                position: p.to_array(),
                normal: normal.to_array(),
            });
        }
    }
    vertices
}

pub const SHADER_SOURCE: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera: vec4<f32>,
    key_light_pos: vec4<f32>,
    key_light_color: vec4<f32>,
    fill_light_pos: vec4<f32>,
    fill_light_color: vec4<f32>,
    ambient: vec4<f32>,
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
    @location(6) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

@vertex
fn vs_main(mesh: VertexInput, inst: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        inst.model_0,
        inst.model_1,
        inst.model_2,
        inst.model_3,
    );

    let world = model * vec4<f32>(mesh.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world;
    out.world_pos = world.xyz;
    // Uniform scale only, so the model matrix is fine for normals
    out.normal = normalize((model * vec4<f32>(mesh.normal, 0.0)).xyz);
    out.color = inst.color;
    return out;
}

fn shade_light(n: vec3<f32>, v: vec3<f32>, world: vec3<f32>, light_pos: vec3<f32>, light: vec4<f32>, albedo: vec3<f32>) -> vec3<f32> {
    let l = normalize(light_pos - world);
    let h = normalize(l + v);
    let diffuse = max(dot(n, l), 0.0);
    let specular = pow(max(dot(n, h), 0.0), 64.0);
    // Metallic surfaces tint their highlights with the base color
    return light.rgb * light.w * albedo * (diffuse * 0.4 + specular * 3.0);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let v = normalize(uniforms.camera.xyz - in.world_pos);

    var color = uniforms.ambient.rgb * uniforms.ambient.w * in.color;
    color += shade_light(n, v, in.world_pos, uniforms.key_light_pos.xyz, uniforms.key_light_color, in.color);
    color += shade_light(n, v, in.world_pos, uniforms.fill_light_pos.xyz, uniforms.fill_light_color, in.color);

    // Rim glint
    let rim = pow(1.0 - max(dot(n, v), 0.0), 3.0);
    color += in.color * rim * 0.5;

    // Reinhard tone mapping
    let exposed = color * uniforms.camera.w;
    let mapped = exposed / (vec3<f32>(1.0) + exposed);
    return vec4<f32>(mapped, 1.0);
}
"#;
