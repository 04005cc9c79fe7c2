//! Forward lighting shader

/// Single-pass forward shader: one ambient, hemisphere, directional, point
/// and rectangular area light over a roughness/metalness surface.
pub const FORWARD_SHADER: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    position: vec4<f32>,
    near_far: vec4<f32>,
}

struct LightsUniform {
    ambient: vec4<f32>,
    hemisphere_sky: vec4<f32>,
    hemisphere_ground: vec4<f32>,
    directional_direction: vec4<f32>,
    directional_color: vec4<f32>,
    point_position: vec4<f32>,
    point_color: vec4<f32>,
    point_params: vec4<f32>,
    area_position: vec4<f32>,
    area_normal: vec4<f32>,
    area_color: vec4<f32>,
    area_size: vec4<f32>,
}

struct ObjectUniform {
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
}

struct MaterialUniform {
    color: vec4<f32>,
    // x = roughness, y = metalness
    params: vec4<f32>,
}

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(0) @binding(1) var<uniform> lights: LightsUniform;
@group(1) @binding(0) var<uniform> object: ObjectUniform;
@group(2) @binding(0) var<uniform> material: MaterialUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;

    let world_pos = object.model * vec4<f32>(in.position, 1.0);
    out.world_position = world_pos.xyz;
    out.clip_position = camera.view_proj * world_pos;
    out.world_normal = normalize((object.normal_matrix * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;

    return out;
}

// Inverse-power falloff windowed to reach zero at `cutoff` (0 = unbounded)
fn point_attenuation(d: f32, cutoff: f32, decay: f32) -> f32 {
    var falloff = 1.0 / max(pow(max(d, 1e-4), decay), 0.01);
    if (cutoff > 0.0) {
        let ratio = d / cutoff;
        let window = clamp(1.0 - ratio * ratio * ratio * ratio, 0.0, 1.0);
        falloff = falloff * window * window;
    }
    return falloff;
}

// Lambert diffuse plus Blinn-Phong specular, both scaled by N.L
fn shade(n: vec3<f32>, l: vec3<f32>, v: vec3<f32>) -> vec3<f32> {
    let ndotl = max(dot(n, l), 0.0);
    if (ndotl <= 0.0) {
        return vec3<f32>(0.0);
    }

    let roughness = clamp(material.params.x, 0.04, 1.0);
    let metalness = material.params.y;
    let albedo = material.color.rgb;

    let h = normalize(l + v);
    let shininess = 2.0 / (roughness * roughness * roughness * roughness) - 2.0;
    let normalization = (shininess + 8.0) / 25.1327;
    let specular = pow(max(dot(n, h), 0.0), max(shininess, 1.0)) * normalization;

    let diffuse = albedo * (1.0 - metalness);
    let spec_color = mix(vec3<f32>(0.04), albedo, metalness);

    return (diffuse + spec_color * specular) * ndotl;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(camera.position.xyz - in.world_position);
    let albedo = material.color.rgb * (1.0 - material.params.y);

    // Ambient and hemisphere only carry diffuse
    var color = lights.ambient.rgb * albedo;
    let sky_weight = 0.5 * n.y + 0.5;
    let hemisphere = mix(lights.hemisphere_ground.rgb, lights.hemisphere_sky.rgb, sky_weight);
    color += hemisphere * lights.hemisphere_sky.w * albedo;

    // Directional
    let dir_l = -normalize(lights.directional_direction.xyz);
    color += shade(n, dir_l, v) * lights.directional_color.rgb * lights.directional_color.w;

    // Point
    let to_point = lights.point_position.xyz - in.world_position;
    let point_distance = length(to_point);
    let point_l = to_point / max(point_distance, 1e-4);
    let point_falloff = point_attenuation(
        point_distance,
        lights.point_position.w,
        lights.point_params.x,
    );
    color += shade(n, point_l, v) * lights.point_color.rgb * lights.point_color.w * point_falloff;

    // Rect area: treated as a one-sided emitter at its center, weighted by
    // how squarely it faces the fragment and its subtended size
    let to_area = lights.area_position.xyz - in.world_position;
    let area_distance_sq = max(dot(to_area, to_area), 1e-6);
    let area_l = to_area * inverseSqrt(area_distance_sq);
    let facing = max(dot(lights.area_normal.xyz, -area_l), 0.0);
    let area = lights.area_size.x * lights.area_size.y;
    let coverage = area / (area_distance_sq + area);
    color += shade(n, area_l, v) * lights.area_color.rgb * lights.area_color.w * facing * coverage;

    return vec4<f32>(color, material.color.a);
}
"#;
