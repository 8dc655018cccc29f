/// WGSL shader for the instanced proxy boxes (boat, character, trash).
pub const OBJECT_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    sun_dir: vec4<f32>,
    // rgb = fog colour, a = exp2 density
    fog: vec4<f32>,
    // rgb = sky colour, a = hemisphere intensity
    sky: vec4<f32>,
    ground: vec4<f32>,
    // rgb = sun colour, a = directional intensity
    sun: vec4<f32>,
    water: vec4<f32>,
    // x = seconds since start
    time: vec4<f32>,
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
    @location(1) world_pos: vec3<f32>,
    @location(2) color: vec4<f32>,
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
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.world_pos = world_pos.xyz;
    out.color = instance.color;
    return out;
}

fn apply_fog(color: vec3<f32>, world_pos: vec3<f32>) -> vec3<f32> {
    let dist = distance(world_pos, uniforms.camera_pos.xyz);
    let d = uniforms.fog.a * dist;
    let fog_factor = 1.0 - exp(-d * d);
    return mix(color, uniforms.fog.rgb, clamp(fog_factor, 0.0, 1.0));
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let hemi_weight = 0.5 * n.y + 0.5;
    let hemi = mix(uniforms.ground.rgb, uniforms.sky.rgb, hemi_weight) * uniforms.sky.a * 0.1;
    let diffuse = max(dot(n, normalize(uniforms.sun_dir.xyz)), 0.0);
    let direct = uniforms.sun.rgb * uniforms.sun.a * 0.01 * diffuse;
    let lit = in.color.rgb * (hemi + direct);
    return vec4<f32>(apply_fog(lit, in.world_pos), in.color.a);
}
"#;

/// WGSL shader for the water plane. Ripple normals are procedural.
pub const WATER_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    sun_dir: vec4<f32>,
    fog: vec4<f32>,
    sky: vec4<f32>,
    ground: vec4<f32>,
    sun: vec4<f32>,
    water: vec4<f32>,
    time: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct WaterVertex {
    @location(0) position: vec3<f32>,
};

struct WaterOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
};

@vertex
fn vs_water(vertex: WaterVertex) -> WaterOutput {
    var out: WaterOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.world_pos = vertex.position;
    return out;
}

fn ripple_normal(p: vec2<f32>, t: f32) -> vec3<f32> {
    let a = cos(p.x * 0.05 + t * 0.8) * 0.08;
    let b = cos(p.y * 0.07 - t * 0.6) * 0.08;
    let c = cos((p.x + p.y) * 0.11 + t * 1.3) * 0.04;
    return normalize(vec3<f32>(-(a + c), 1.0, -(b + c)));
}

@fragment
fn fs_water(in: WaterOutput) -> @location(0) vec4<f32> {
    let n = ripple_normal(in.world_pos.xz, uniforms.time.x);
    let view_dir = normalize(uniforms.camera_pos.xyz - in.world_pos);
    let sun_dir = normalize(uniforms.sun_dir.xyz);

    let hemi = mix(uniforms.ground.rgb, uniforms.sky.rgb, 0.5 * n.y + 0.5) * uniforms.sky.a * 0.1;
    let diffuse = max(dot(n, sun_dir), 0.0);
    let half_dir = normalize(sun_dir + view_dir);
    let specular = pow(max(dot(n, half_dir), 0.0), 100.0);
    let sun = uniforms.sun.rgb * uniforms.sun.a * 0.01;

    let base = uniforms.water.rgb * (hemi + sun * diffuse) + sun * specular;

    let dist = distance(in.world_pos, uniforms.camera_pos.xyz);
    let d = uniforms.fog.a * dist;
    let fog_factor = clamp(1.0 - exp(-d * d), 0.0, 1.0);
    return vec4<f32>(mix(base, uniforms.fog.rgb, fog_factor), 1.0);
}
"#;

/// WGSL shader for the sky: one fullscreen triangle, each pixel lit by
/// Rayleigh and Mie scattering along its view ray.
pub const SKY_SHADER: &str = r#"
struct SkyUniforms {
    inv_view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    sun_dir: vec4<f32>,
    // x = turbidity, y = rayleigh, z = mie coefficient, w = mie directional g
    scattering: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> sky: SkyUniforms;

const PI: f32 = 3.141592653589793;
const UP: vec3<f32> = vec3<f32>(0.0, 1.0, 0.0);
const SUN_E: f32 = 1000.0;
const SUN_DISK_COS: f32 = 0.99995667694;
const TOTAL_RAYLEIGH: vec3<f32> = vec3<f32>(5.804542996261093e-6, 1.3562911419845635e-5, 3.0265902468824876e-5);
const MIE_CONST: vec3<f32> = vec3<f32>(1.8399918514433978e14, 2.7798023919660528e14, 4.0790479543861094e14);
const CUTOFF_ANGLE: f32 = 1.6110731556870734;
const STEEPNESS: f32 = 1.5;
const RAYLEIGH_ZENITH_LENGTH: f32 = 8400.0;
const MIE_ZENITH_LENGTH: f32 = 1250.0;

struct SkyOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

@vertex
fn vs_sky(@builtin(vertex_index) index: u32) -> SkyOutput {
    let x = f32((index << 1u) & 2u) * 2.0 - 1.0;
    let y = f32(index & 2u) * 2.0 - 1.0;
    var out: SkyOutput;
    out.clip_position = vec4<f32>(x, y, 1.0, 1.0);
    out.ndc = vec2<f32>(x, y);
    return out;
}

fn sun_intensity(zenith_cos: f32) -> f32 {
    let c = clamp(zenith_cos, -1.0, 1.0);
    return SUN_E * max(0.0, 1.0 - exp(-((CUTOFF_ANGLE - acos(c)) / STEEPNESS)));
}

fn total_mie(turbidity: f32) -> vec3<f32> {
    let c = 0.2 * turbidity * 10e-18;
    return 0.434 * c * MIE_CONST;
}

fn rayleigh_phase(cos_theta: f32) -> f32 {
    return (3.0 / (16.0 * PI)) * (1.0 + cos_theta * cos_theta);
}

fn hg_phase(cos_theta: f32, g: f32) -> f32 {
    let g2 = g * g;
    let inverse = 1.0 / pow(1.0 - 2.0 * g * cos_theta + g2, 1.5);
    return (1.0 / (4.0 * PI)) * ((1.0 - g2) * inverse);
}

@fragment
fn fs_sky(in: SkyOutput) -> @location(0) vec4<f32> {
    let far = sky.inv_view_proj * vec4<f32>(in.ndc, 1.0, 1.0);
    let direction = normalize(far.xyz / far.w - sky.camera_pos.xyz);
    let sun_dir = normalize(sky.sun_dir.xyz);

    let sun_fade = 1.0 - clamp(1.0 - exp(sun_dir.y / 450000.0), 0.0, 1.0);
    let beta_r = TOTAL_RAYLEIGH * (sky.scattering.y - (1.0 - sun_fade));
    let beta_m = total_mie(sky.scattering.x) * sky.scattering.z;
    let sun_e = sun_intensity(dot(sun_dir, UP));

    let zenith = acos(max(0.0, dot(UP, direction)));
    let inverse = 1.0 / (cos(zenith) + 0.15 * pow(93.885 - degrees(zenith), -1.253));
    let extinction = exp(-(beta_r * RAYLEIGH_ZENITH_LENGTH * inverse + beta_m * MIE_ZENITH_LENGTH * inverse));

    let cos_theta = dot(direction, sun_dir);
    let beta_r_theta = beta_r * rayleigh_phase(cos_theta * 0.5 + 0.5);
    let beta_m_theta = beta_m * hg_phase(cos_theta, sky.scattering.w);
    let scatter = sun_e * ((beta_r_theta + beta_m_theta) / (beta_r + beta_m));

    var lin = pow(scatter * (1.0 - extinction), vec3<f32>(1.5));
    let low_sun = clamp(pow(1.0 - dot(UP, sun_dir), 5.0), 0.0, 1.0);
    lin = lin * mix(vec3<f32>(1.0), pow(scatter * extinction, vec3<f32>(0.5)), low_sun);

    var l0 = vec3<f32>(0.1) * extinction;
    let disk = smoothstep(SUN_DISK_COS, SUN_DISK_COS + 0.00002, cos_theta);
    l0 = l0 + sun_e * 19000.0 * extinction * disk;

    let color = (lin + l0) * 0.04 + vec3<f32>(0.0, 0.0003, 0.00075);
    let graded = pow(color, vec3<f32>(1.0 / (1.2 + 1.2 * sun_fade)));
    return vec4<f32>(clamp(graded, vec3<f32>(0.0), vec3<f32>(1.0)), 1.0);
}
"#;
