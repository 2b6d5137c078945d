//! Extension capability set and the per-field extension payloads.

use crate::json::deserialize;
use crate::{Error, Light, LightType, TextureTransform};
use serde::Deserialize;
use serde_json::{Map, Value};

pub type ExtensionMap = Map<String, Value>;

bitflags::bitflags! {
    /// Extensions a [`crate::Parser`] is allowed to interpret.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Extensions: u32 {
        const KHR_TEXTURE_TRANSFORM = 1 << 0;
        const KHR_TEXTURE_BASISU = 1 << 1;
        const MSFT_TEXTURE_DDS = 1 << 2;
        const EXT_TEXTURE_WEBP = 1 << 3;
        const KHR_MESH_QUANTIZATION = 1 << 4;
        const KHR_LIGHTS_PUNCTUAL = 1 << 5;
        const KHR_MATERIALS_EMISSIVE_STRENGTH = 1 << 6;
    }
}

const EXTENSION_NAMES: [(Extensions, &str); 7] = [
    (Extensions::KHR_TEXTURE_TRANSFORM, "KHR_texture_transform"),
    (Extensions::KHR_TEXTURE_BASISU, "KHR_texture_basisu"),
    (Extensions::MSFT_TEXTURE_DDS, "MSFT_texture_dds"),
    (Extensions::EXT_TEXTURE_WEBP, "EXT_texture_webp"),
    (Extensions::KHR_MESH_QUANTIZATION, "KHR_mesh_quantization"),
    (Extensions::KHR_LIGHTS_PUNCTUAL, "KHR_lights_punctual"),
    (
        Extensions::KHR_MATERIALS_EMISSIVE_STRENGTH,
        "KHR_materials_emissive_strength",
    ),
];

impl Extensions {
    pub fn from_extension_name(name: &str) -> Option<Self> {
        EXTENSION_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(flag, _)| *flag)
    }

    /// Document name of a single-flag value.
    pub fn extension_name(self) -> Option<&'static str> {
        EXTENSION_NAMES
            .iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, n)| *n)
    }
}

fn is_enabled(name: &str, enabled: Extensions) -> bool {
    Extensions::from_extension_name(name).is_some_and(|flag| enabled.contains(flag))
}

/// Fails with every entry of `required` the enabled set cannot honour.
pub(crate) fn check_required(required: &[String], enabled: Extensions) -> Result<(), Error> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !is_enabled(name, enabled))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingExtensions { extensions: missing })
    }
}

/// Names in `used` that will be skipped because they are unknown or not enabled.
pub(crate) fn ignored_extensions(used: &[String], enabled: Extensions) -> Vec<&str> {
    used.iter()
        .map(String::as_str)
        .filter(|name| !is_enabled(name, enabled))
        .collect()
}

fn payload<'a>(
    extensions: Option<&'a ExtensionMap>,
    enabled: Extensions,
    flag: Extensions,
) -> Option<&'a Value> {
    if !enabled.contains(flag) {
        return None;
    }
    extensions?.get(flag.extension_name()?)
}

fn default_uv_scale() -> [f32; 2] {
    [1.0, 1.0]
}

#[derive(Debug, Deserialize)]
struct TextureTransformDef {
    #[serde(default)]
    offset: [f32; 2],
    #[serde(default)]
    rotation: f32,
    #[serde(default = "default_uv_scale")]
    scale: [f32; 2],
    #[serde(default, rename = "texCoord")]
    tex_coord: Option<usize>,
}

pub(crate) fn texture_transform(
    extensions: Option<&ExtensionMap>,
    enabled: Extensions,
    context: &str,
) -> Result<Option<TextureTransform>, Error> {
    let Some(value) = payload(extensions, enabled, Extensions::KHR_TEXTURE_TRANSFORM) else {
        return Ok(None);
    };
    let def: TextureTransformDef = deserialize(
        &format!("{context}.extensions.KHR_texture_transform"),
        value,
    )?;
    Ok(Some(TextureTransform {
        uv_offset: def.offset,
        rotation: def.rotation,
        uv_scale: def.scale,
        tex_coord: def.tex_coord,
    }))
}

#[derive(Debug, Deserialize)]
struct TextureSourceDef {
    source: Option<usize>,
}

/// Image index contributed by an enabled image-format extension, if any.
pub(crate) fn texture_image_source(
    extensions: Option<&ExtensionMap>,
    enabled: Extensions,
    context: &str,
) -> Result<Option<usize>, Error> {
    for flag in [
        Extensions::KHR_TEXTURE_BASISU,
        Extensions::MSFT_TEXTURE_DDS,
        Extensions::EXT_TEXTURE_WEBP,
    ] {
        let Some(value) = payload(extensions, enabled, flag) else {
            continue;
        };
        let name = flag.extension_name().unwrap_or_default();
        let ext_context = format!("{context}.extensions.{name}");
        let def: TextureSourceDef = deserialize(&ext_context, value)?;
        let source = def
            .source
            .ok_or_else(|| Error::missing_field(ext_context, "source"))?;
        return Ok(Some(source));
    }
    Ok(None)
}

#[derive(Debug, Deserialize)]
struct NodeLightDef {
    light: Option<usize>,
}

pub(crate) fn node_light(
    extensions: Option<&ExtensionMap>,
    enabled: Extensions,
    context: &str,
) -> Result<Option<usize>, Error> {
    let Some(value) = payload(extensions, enabled, Extensions::KHR_LIGHTS_PUNCTUAL) else {
        return Ok(None);
    };
    let ext_context = format!("{context}.extensions.KHR_lights_punctual");
    let def: NodeLightDef = deserialize(&ext_context, value)?;
    def.light
        .map(Some)
        .ok_or_else(|| Error::missing_field(ext_context, "light"))
}

#[derive(Debug, Deserialize)]
struct EmissiveStrengthDef {
    #[serde(default = "default_one", rename = "emissiveStrength")]
    emissive_strength: f32,
}

fn default_one() -> f32 {
    1.0
}

pub(crate) fn emissive_strength(
    extensions: Option<&ExtensionMap>,
    enabled: Extensions,
    context: &str,
) -> Result<Option<f32>, Error> {
    let Some(value) = payload(extensions, enabled, Extensions::KHR_MATERIALS_EMISSIVE_STRENGTH)
    else {
        return Ok(None);
    };
    let def: EmissiveStrengthDef = deserialize(
        &format!("{context}.extensions.KHR_materials_emissive_strength"),
        value,
    )?;
    Ok(Some(def.emissive_strength))
}

#[derive(Debug, Deserialize)]
struct LightsDef {
    #[serde(default)]
    lights: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct LightDef {
    name: Option<String>,
    #[serde(rename = "type")]
    light_type: Option<String>,
    #[serde(default = "default_color")]
    color: [f32; 3],
    #[serde(default = "default_one")]
    intensity: f32,
    range: Option<f32>,
    spot: Option<SpotDef>,
}

fn default_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_outer_cone_angle() -> f32 {
    std::f32::consts::FRAC_PI_4
}

#[derive(Debug, Deserialize)]
struct SpotDef {
    #[serde(default, rename = "innerConeAngle")]
    inner_cone_angle: f32,
    #[serde(default = "default_outer_cone_angle", rename = "outerConeAngle")]
    outer_cone_angle: f32,
}

/// Document-level `KHR_lights_punctual.lights`.
pub(crate) fn lights(
    extensions: Option<&ExtensionMap>,
    enabled: Extensions,
) -> Result<Vec<Light>, Error> {
    let Some(value) = payload(extensions, enabled, Extensions::KHR_LIGHTS_PUNCTUAL) else {
        return Ok(Vec::new());
    };
    let def: LightsDef = deserialize("extensions.KHR_lights_punctual", value)?;

    let mut out = Vec::with_capacity(def.lights.len());
    for (index, value) in def.lights.iter().enumerate() {
        let context = format!("KHR_lights_punctual.lights[{index}]");
        let light: LightDef = deserialize(&context, value)?;
        let light_type = match light.light_type.as_deref() {
            Some("directional") => LightType::Directional,
            Some("point") => LightType::Point,
            Some("spot") => {
                let spot = light
                    .spot
                    .ok_or_else(|| Error::missing_field(context.as_str(), "spot"))?;
                LightType::Spot {
                    inner_cone_angle: spot.inner_cone_angle,
                    outer_cone_angle: spot.outer_cone_angle,
                }
            }
            Some(other) => {
                return Err(Error::invalid(
                    context,
                    format!("unknown light type '{other}'"),
                ));
            }
            None => return Err(Error::missing_field(context, "type")),
        };
        out.push(Light {
            name: light.name,
            light_type,
            color: light.color,
            intensity: light.intensity,
            range: light.range,
        });
    }
    Ok(out)
}
