/// Names the host binds by. Attribute and uniform names are kept verbatim so
/// the shader can be matched against the buffers that feed it.
pub const ATTRIBUTE_NAMES: [(&str, u32); 4] = [
    ("VertexPosition", 0),
    ("InTextureCoord", 1),
    ("InNormalVector", 2),
    ("InSurfaceColor", 3),
];
pub const UNIFORM_NAMES: [&str; 5] = [
    "VertexTransformationMatrix",
    "NormalTransformationMatrix",
    "LightSpaceMatrix",
    "ModelMatrix",
    "Time",
];
/// Group 1 bindings: (name, binding).
pub const TEXTURE_NAMES: [(&str, u32); 3] =
    [("ShadowMap", 0), ("TextTexture", 1), ("TextSampler", 2)];

pub const SCENE_VERTEX_ENTRY: &str = "vs_scene";
pub const SCENE_FRAGMENT_ENTRY: &str = "fs_scene";
pub const SHADOW_VERTEX_ENTRY: &str = "vs_shadow";

/// Light-space height gating the bezel glow in `SCENE_SHADER`.
pub const GLOW_LIGHT_FLOOR: f32 = -0.457;

/// Lit scene with PCF shadows, plus the CRT effects for fragments whose
/// surface color marks them as the screen.
pub const SCENE_SHADER: &str = r#"
struct FrameUniforms {
    VertexTransformationMatrix: mat4x4<f32>,
    NormalTransformationMatrix: mat4x4<f32>,
    LightSpaceMatrix: mat4x4<f32>,
    ModelMatrix: mat4x4<f32>,
    Time: f32,
};

@group(0) @binding(0) var<uniform> frame: FrameUniforms;

@group(1) @binding(0) var ShadowMap: texture_depth_2d;
@group(1) @binding(1) var TextTexture: texture_2d<f32>;
@group(1) @binding(2) var TextSampler: sampler;

struct VertexInput {
    @location(0) VertexPosition: vec3<f32>,
    @location(1) InTextureCoord: vec2<f32>,
    @location(2) InNormalVector: vec3<f32>,
    @location(3) InSurfaceColor: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) surface_to_camera: vec3<f32>,
    @location(1) texture_coord: vec2<f32>,
    @location(2) normal: vec3<f32>,
    @location(3) position_from_light: vec4<f32>,
    @location(4) surface_color: vec4<f32>,
};

const LIGHT_COLOR = vec3<f32>(0.52, 0.36, 0.2);
// normalize(vec3(0.0, 5.0, 1.0))
const SURFACE_TO_LIGHT = vec3<f32>(0.0, 0.98058068, 0.19611614);
const AMBIENT_INTENSITY: f32 = 0.175;
const SHADOW_BIAS: f32 = 0.02;

// Screen rectangle in mesh texture space.
const SCREEN_UV_MIN = vec2<f32>(0.402778, 0.5225);
const SCREEN_UV_SPAN = vec2<f32>(0.194444, 0.205);
const SCREEN_UV_CENTER = vec2<f32>(0.5, 0.625);
const TEXT_BORDER: f32 = 0.075;

// Light-space height below which the bezel glow is suppressed. The light looks
// down and forward, so this cuts off geometry well in front of the screen.
const GLOW_LIGHT_FLOOR: f32 = -0.457;
const GLOW_SAMPLES: f32 = 150.0;
const GLOW_SPREAD: f32 = 0.3;

@vertex
fn vs_scene(vertex_in: VertexInput) -> VertexOutput {
    let position = vec4<f32>(vertex_in.VertexPosition, 1.0);

    var out: VertexOutput;
    out.clip_position = frame.VertexTransformationMatrix * position;
    out.surface_to_camera = -normalize(position * frame.ModelMatrix).xyz;
    out.texture_coord = vertex_in.InTextureCoord;
    out.normal = (frame.NormalTransformationMatrix * vec4<f32>(vertex_in.InNormalVector, 0.0)).xyz;
    out.position_from_light = frame.LightSpaceMatrix * position;
    out.surface_color = vec4<f32>(vertex_in.InSurfaceColor, 1.0);
    return out;
}

fn glsl_mod(x: f32, y: f32) -> f32 {
    return x - y * floor(x / y);
}

fn random(seed: vec2<f32>) -> f32 {
    let scaled = seed * (glsl_mod(frame.Time, 1.0) + 1.0);
    return fract(sin(dot(scaled, vec2<f32>(11.9898, 78.233))) * 43758.5453);
}

fn curved_surface(coords: vec2<f32>, radius: f32) -> vec2<f32> {
    return radius * coords / sqrt(radius * radius - dot(coords, coords));
}

fn compress_color(color: vec3<f32>, amount: f32) -> vec3<f32> {
    let average = (color.r + color.g + color.b) / 3.0;
    return mix(color, vec3<f32>(average), amount);
}

// 3x3 percentage-closer filter over the static shadow map.
fn calculate_shadow(position_from_light: vec4<f32>) -> f32 {
    let projected = position_from_light.xyz / position_from_light.w;
    let uv = vec2<f32>(projected.x * 0.5 + 0.5, 0.5 - projected.y * 0.5);
    let current_depth = projected.z;

    let size = vec2<i32>(textureDimensions(ShadowMap));
    let center = vec2<i32>(floor(uv * vec2<f32>(size)));

    var shadow = 0.0;
    for (var x = -1; x <= 1; x++) {
        for (var y = -1; y <= 1; y++) {
            let texel = clamp(center + vec2<i32>(x, y), vec2<i32>(0), size - vec2<i32>(1));
            let depth = textureLoad(ShadowMap, texel, 0);
            if current_depth - SHADOW_BIAS > depth {
                shadow += 1.0;
            }
        }
    }
    shadow /= 9.0;

    if current_depth > 1.0 {
        shadow = 1.0;
    }
    return shadow;
}

// Mesh texture coordinate to 0..1 across the screen rectangle, (v, u) order.
fn screen_uv(texture_coord: vec2<f32>) -> vec2<f32> {
    return (texture_coord.yx - SCREEN_UV_MIN.yx) / SCREEN_UV_SPAN.yx;
}

fn text_uv(uv: vec2<f32>) -> vec2<f32> {
    return vec2<f32>(1.0) - (uv - vec2<f32>(TEXT_BORDER)) / (1.0 - TEXT_BORDER * 2.0);
}

fn screen_shader(light_intensity: f32, specular: f32, texture_coord: vec2<f32>, text_color: vec3<f32>) -> vec4<f32> {
    let uv = screen_uv(texture_coord);

    var scan_lines = glsl_mod(uv.y, 0.01) / 0.01;
    scan_lines = min(abs((scan_lines - 0.2) / 0.2), 1.0) * 0.5;

    let noise = 0.1 * (random(uv) - 0.5);

    let scan_position = 1.0 - glsl_mod(frame.Time / 5.0, 2.0);
    let dist_to_scan = 1.0 - (uv.y - scan_position) * 4.0;
    var screen_scan = vec3<f32>(0.0);
    if dist_to_scan > 0.0 && dist_to_scan < 1.0 {
        screen_scan = compress_color(LIGHT_COLOR, 0.5) * 0.075 * dist_to_scan;
    }

    let backlight = max(0.0, 2.0 - length((uv * 2.0 - vec2<f32>(1.0)) / 0.5));

    var color = vec3<f32>(specular + noise) + screen_scan
        + light_intensity * scan_lines * backlight * LIGHT_COLOR;

    let offset = abs(uv - vec2<f32>(0.5));
    if max(offset.x, offset.y) + TEXT_BORDER < 0.5 {
        let coords = text_uv(uv);
        let glow = (textureSampleLevel(TextTexture, TextSampler, coords, 3.0).rgb
            + textureSampleLevel(TextTexture, TextSampler, coords, 4.0).rgb
            + textureSampleLevel(TextTexture, TextSampler, coords, 5.0).rgb) * 0.5;
        color += (text_color + glow) * min(1.0, scan_lines + 0.65);
    }

    // Darken the rounded edge of the tube.
    let curved = curved_surface((uv * 2.0 - vec2<f32>(1.0)) * 1.28, 5.0) / 2.0;
    let screen_sdf = 0.15 + (length(max(abs(curved) - vec2<f32>(0.5), vec2<f32>(0.0))) - 0.1) * 10.0;
    let occlusion = min(1.0, 1.0 - smoothstep(0.0, 1.0, screen_sdf));

    return vec4<f32>(color * occlusion, 1.0);
}

// Light spilling from the screen onto the bezel right around it.
fn screen_glow(texture_coord: vec2<f32>, lit: vec4<f32>) -> vec4<f32> {
    let offsets = abs(texture_coord - SCREEN_UV_CENTER) - SCREEN_UV_SPAN * 0.5;
    let edge_distance = length(max(offsets, vec2<f32>(0.0)));
    let intensity = 1.0 - min(edge_distance / 0.001, 1.0);
    if intensity <= 0.0 {
        return vec4<f32>(0.0);
    }

    let base = vec2<f32>(1.0) - screen_uv(texture_coord);
    var glow = vec4<f32>(0.0);
    for (var i = 0.0; i < GLOW_SAMPLES; i += 1.0) {
        let jitter = vec2<f32>(
            random(base + vec2<f32>(i)),
            random(base.yx + vec2<f32>(i + 1.0)),
        ) - vec2<f32>(0.5);
        let coords = clamp(base + jitter * GLOW_SPREAD, vec2<f32>(0.0), vec2<f32>(1.0));
        let sampled = textureSampleLevel(TextTexture, TextSampler, coords, 5.0) / GLOW_SAMPLES;
        glow += (vec4<f32>(1.0) - lit) * sampled;
    }
    return glow * intensity * 10.0;
}

@fragment
fn fs_scene(fragment_in: VertexOutput) -> @location(0) vec4<f32> {
    // Implicit-LOD sampling must happen in uniform control flow.
    let text_color = textureSample(TextTexture, TextSampler, text_uv(screen_uv(fragment_in.texture_coord))).rgb;

    let directional = (dot(fragment_in.normal, SURFACE_TO_LIGHT) + 1.0) * 0.5 * 0.575;
    let shadow = calculate_shadow(fragment_in.position_from_light);

    let half_vector = normalize(fragment_in.surface_to_camera + SURFACE_TO_LIGHT);
    var specular = pow(max(0.0, dot(fragment_in.normal, half_vector)), 2.0);
    specular = mix(specular, 0.0, shadow);

    var color: vec4<f32>;
    if fragment_in.surface_color.g < 0.1 && fragment_in.surface_color.r > 0.9 {
        color = screen_shader(AMBIENT_INTENSITY + directional, specular, fragment_in.texture_coord, text_color);
    } else {
        let ambient_light = fragment_in.surface_color * AMBIENT_INTENSITY;
        var directional_light = fragment_in.surface_color * directional;
        directional_light = mix(directional_light, directional_light * 0.5, shadow);
        color = ambient_light + directional_light
            + vec4<f32>(specular * clamp(fragment_in.surface_color.r, 0.5, 0.75));

        if fragment_in.position_from_light.y > GLOW_LIGHT_FLOOR {
            color += screen_glow(fragment_in.texture_coord, color);
        }
    }

    return vec4<f32>(clamp(color.rgb, vec3<f32>(0.0), vec3<f32>(1.0)), 1.0);
}
"#;

/// Depth-only pass from the light's point of view.
pub const SHADOW_SHADER: &str = r#"
struct ShadowUniforms {
    LightSpaceMatrix: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> light: ShadowUniforms;

@vertex
fn vs_shadow(@location(0) VertexPosition: vec3<f32>) -> @builtin(position) vec4<f32> {
    return light.LightSpaceMatrix * vec4<f32>(VertexPosition, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(source: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|e| panic!("{}", e.emit_to_string(source)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("{e:?}"));
        module
    }

    fn entry_points(module: &naga::Module) -> Vec<&str> {
        module.entry_points.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn scene_shader_validates() {
        let module = validate(SCENE_SHADER);
        assert_eq!(
            entry_points(&module),
            vec![SCENE_VERTEX_ENTRY, SCENE_FRAGMENT_ENTRY]
        );
    }

    #[test]
    fn shadow_shader_validates() {
        let module = validate(SHADOW_SHADER);
        assert_eq!(entry_points(&module), vec![SHADOW_VERTEX_ENTRY]);
    }

    #[test]
    fn attributes_keep_their_names_and_locations() {
        for (name, location) in ATTRIBUTE_NAMES {
            let declaration = format!("@location({location}) {name}:");
            assert!(SCENE_SHADER.contains(&declaration), "{declaration}");
        }
    }

    #[test]
    fn uniform_block_fields_are_named() {
        let module = validate(SCENE_SHADER);
        let block = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some("FrameUniforms"))
            .map(|(_, ty)| &ty.inner);
        let Some(naga::TypeInner::Struct { members, span }) = block else {
            panic!("FrameUniforms struct missing");
        };
        let names: Vec<_> = members.iter().filter_map(|m| m.name.as_deref()).collect();
        assert_eq!(names, UNIFORM_NAMES);
        assert_eq!(
            *span as usize,
            std::mem::size_of::<retroscene_frame::FrameUniforms>()
        );
    }

    #[test]
    fn glow_gate_matches_shader_constant() {
        let declaration = format!("const GLOW_LIGHT_FLOOR: f32 = {GLOW_LIGHT_FLOOR};");
        assert!(SCENE_SHADER.contains(&declaration), "{declaration}");
        assert!(SCENE_SHADER.contains("position_from_light.y > GLOW_LIGHT_FLOOR"));
    }

    #[test]
    fn glow_reaches_the_whole_fallback_bezel() {
        use retroscene_scene::{LightRig, Placement, fallback};

        let light_space = LightRig::default().light_space_matrix(&Placement::default());
        let mesh = fallback::retro_monitor().unwrap();
        let mut bezel = 0;
        for i in 0..mesh.vertex_count() {
            let normal = &mesh.normals()[i * 3..i * 3 + 3];
            let uv = &mesh.texcoords()[i * 2..i * 2 + 2];
            if normal != [1.0, 0.0, 0.0] || uv == [0.0, 0.0] {
                continue;
            }
            let position = glam::Vec3::from_slice(&mesh.positions()[i * 3..]);
            let from_light = light_space * position.extend(1.0);
            assert!(from_light.y > GLOW_LIGHT_FLOOR, "{position:?} -> {from_light:?}");
            bezel += 1;
        }
        // Case front face and the screen quad.
        assert_eq!(bezel, 12);
    }

    #[test]
    fn textures_bind_to_group_one() {
        let module = validate(SCENE_SHADER);
        for (name, binding) in TEXTURE_NAMES {
            let global = module
                .global_variables
                .iter()
                .map(|(_, g)| g)
                .find(|g| g.name.as_deref() == Some(name))
                .unwrap_or_else(|| panic!("{name} missing"));
            let resource = global.binding.as_ref().unwrap();
            assert_eq!((resource.group, resource.binding), (1, binding), "{name}");
        }
    }
}
