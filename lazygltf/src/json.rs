//! glTF JSON document handle and per-category extraction into the typed model.

use crate::extensions::{self, ExtensionMap};
use crate::location::{BufferInfo, Locator};
use crate::{
    Accessor, AccessorType, AlphaMode, Animation, AnimationChannel, AnimationInterpolation,
    AnimationPath, AssetInfo, Buffer, BufferTarget, BufferView, Camera, CameraProjection,
    ComponentType, Error, Extensions, Filter, GLTF_MAJOR_VERSION, Image, Material, Mesh, Node,
    NodeTransform, Options, PbrData, Primitive, PrimitiveType, Sampler, Scene, Skin,
    SparseAccessor, Texture, TextureInfo, Trs, Wrap, decompose_transform_matrix,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Parsed, read-only glTF JSON document.
#[derive(Clone, Debug)]
pub struct JsonData {
    root: Value,
}

impl JsonData {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let root = serde_json::from_slice(bytes).map_err(|e| Error::InvalidJson {
            message: e.to_string(),
        })?;
        Ok(Self { root })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self, Error> {
        Self::from_slice(input.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_slice(&crate::fs::read_all(path.as_ref())?)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub(crate) fn root_object(&self) -> Result<&Map<String, Value>, Error> {
        self.root.as_object().ok_or_else(|| Error::InvalidJson {
            message: "document root is not a JSON object".to_string(),
        })
    }
}

impl FromStr for JsonData {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::from_slice(input.as_bytes())
    }
}

impl From<Value> for JsonData {
    fn from(root: Value) -> Self {
        Self { root }
    }
}

pub(crate) fn deserialize<'de, T: Deserialize<'de>>(
    context: &str,
    value: &'de Value,
) -> Result<T, Error> {
    T::deserialize(value).map_err(|e| Error::invalid(context, e.to_string()))
}

/// Elements of a top-level category array; an absent key is an empty category.
fn category_array<'a>(root: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], Error> {
    match root.get(key) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(Error::invalid(key, "expected an array")),
    }
}

fn extract<T>(
    root: &Map<String, Value>,
    key: &str,
    mut convert: impl FnMut(usize, &str, &Value) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let items = category_array(root, key)?;
    let mut out = Vec::with_capacity(items.len());
    for (index, value) in items.iter().enumerate() {
        let context = format!("{key}[{index}]");
        out.push(convert(index, &context, value)?);
    }
    log::debug!("parsed {} {key}", out.len());
    Ok(out)
}

fn required<T>(value: Option<T>, context: &str, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::missing_field(context, field))
}

fn default_one() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct AssetDef {
    version: Option<String>,
    #[serde(rename = "minVersion")]
    min_version: Option<String>,
    generator: Option<String>,
    copyright: Option<String>,
}

/// Reads the top-level `asset` object; `None` when it is absent or malformed.
pub(crate) fn asset_info(root: &Map<String, Value>) -> Option<AssetInfo> {
    let def = AssetDef::deserialize(root.get("asset")?).ok()?;
    let version = def.version?;
    if !is_supported_version(&version) {
        return None;
    }
    Some(AssetInfo {
        version,
        min_version: def.min_version,
        generator: def.generator,
        copyright: def.copyright,
    })
}

fn is_supported_version(value: &str) -> bool {
    let mut parts = value.split('.');
    let major = parts.next().and_then(|m| m.parse::<u32>().ok());
    let minor = parts.next().and_then(|m| m.parse::<u32>().ok());
    major == Some(GLTF_MAJOR_VERSION) && minor.is_some() && parts.next().is_none()
}

pub(crate) fn string_list(root: &Map<String, Value>, key: &str) -> Result<Vec<String>, Error> {
    match root.get(key) {
        None => Ok(Vec::new()),
        Some(value) => deserialize(key, value),
    }
}

pub(crate) fn default_scene(root: &Map<String, Value>) -> Result<Option<usize>, Error> {
    match root.get("scene") {
        None => Ok(None),
        Some(value) => deserialize("scene", value).map(Some),
    }
}

pub(crate) fn root_extensions(root: &Map<String, Value>) -> Result<Option<&ExtensionMap>, Error> {
    match root.get("extensions") {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(Error::invalid("extensions", "expected an object")),
    }
}

#[derive(Debug, Deserialize)]
struct BufferDef {
    name: Option<String>,
    uri: Option<String>,
    #[serde(rename = "byteLength")]
    byte_length: Option<u64>,
}

pub(crate) fn buffers(
    root: &Map<String, Value>,
    locator: &Locator<'_>,
    allocations: &mut Vec<BufferInfo>,
) -> Result<Vec<Buffer>, Error> {
    extract(root, "buffers", |index, context, value| {
        let def: BufferDef = deserialize(context, value)?;
        let byte_length = required(def.byte_length, context, "byteLength")?;
        let data = locator.locate_buffer(
            context,
            index,
            def.uri.as_deref(),
            byte_length,
            allocations,
        )?;
        Ok(Buffer {
            name: def.name,
            byte_length,
            data,
        })
    })
}

#[derive(Debug, Deserialize)]
struct BufferViewDef {
    name: Option<String>,
    buffer: Option<usize>,
    #[serde(default, rename = "byteOffset")]
    byte_offset: u64,
    #[serde(rename = "byteLength")]
    byte_length: Option<u64>,
    #[serde(rename = "byteStride")]
    byte_stride: Option<u64>,
    target: Option<u64>,
}

pub(crate) fn buffer_views(root: &Map<String, Value>) -> Result<Vec<BufferView>, Error> {
    extract(root, "bufferViews", |_, context, value| {
        let def: BufferViewDef = deserialize(context, value)?;
        let target = def
            .target
            .map(|code| {
                BufferTarget::from_code(code)
                    .ok_or_else(|| Error::invalid(context, format!("unknown target {code}")))
            })
            .transpose()?;
        Ok(BufferView {
            name: def.name,
            buffer_index: required(def.buffer, context, "buffer")?,
            byte_offset: def.byte_offset,
            byte_length: required(def.byte_length, context, "byteLength")?,
            byte_stride: def.byte_stride,
            target,
        })
    })
}

#[derive(Debug, Deserialize)]
struct SparseIndicesDef {
    #[serde(rename = "bufferView")]
    buffer_view: Option<usize>,
    #[serde(default, rename = "byteOffset")]
    byte_offset: u64,
    #[serde(rename = "componentType")]
    component_type: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SparseValuesDef {
    #[serde(rename = "bufferView")]
    buffer_view: Option<usize>,
    #[serde(default, rename = "byteOffset")]
    byte_offset: u64,
}

#[derive(Debug, Deserialize)]
struct SparseDef {
    count: Option<u64>,
    indices: Option<SparseIndicesDef>,
    values: Option<SparseValuesDef>,
}

#[derive(Debug, Deserialize)]
struct AccessorDef {
    name: Option<String>,
    #[serde(rename = "bufferView")]
    buffer_view: Option<usize>,
    #[serde(default, rename = "byteOffset")]
    byte_offset: u64,
    #[serde(rename = "componentType")]
    component_type: Option<u64>,
    #[serde(default)]
    normalized: bool,
    count: Option<u64>,
    #[serde(rename = "type")]
    accessor_type: Option<String>,
    max: Option<Vec<f64>>,
    min: Option<Vec<f64>>,
    sparse: Option<SparseDef>,
}

fn component_type(code: u64, options: Options, context: &str) -> Result<ComponentType, Error> {
    match ComponentType::from_code(code) {
        ComponentType::Invalid => Err(Error::invalid(
            context,
            format!("unknown componentType {code}"),
        )),
        ComponentType::Double if !options.contains(Options::ALLOW_DOUBLE) => Err(Error::invalid(
            context,
            "componentType 5130 (double) requires Options::ALLOW_DOUBLE",
        )),
        ty => Ok(ty),
    }
}

pub(crate) fn accessors(
    root: &Map<String, Value>,
    options: Options,
) -> Result<Vec<Accessor>, Error> {
    extract(root, "accessors", |_, context, value| {
        let def: AccessorDef = deserialize(context, value)?;
        let type_name = required(def.accessor_type, context, "type")?;
        let accessor_type = AccessorType::from_json_name(&type_name).ok_or_else(|| {
            Error::invalid(context, format!("unknown accessor type '{type_name}'"))
        })?;
        let code = required(def.component_type, context, "componentType")?;

        let sparse = match def.sparse {
            None => None,
            Some(sparse) => {
                let sparse_context = format!("{context}.sparse");
                let indices = required(sparse.indices, &sparse_context, "indices")?;
                let values = required(sparse.values, &sparse_context, "values")?;
                let indices_code =
                    required(indices.component_type, &sparse_context, "indices.componentType")?;
                Some(SparseAccessor {
                    count: required(sparse.count, &sparse_context, "count")?,
                    indices_buffer_view: required(
                        indices.buffer_view,
                        &sparse_context,
                        "indices.bufferView",
                    )?,
                    indices_byte_offset: indices.byte_offset,
                    indices_component_type: component_type(indices_code, options, &sparse_context)?,
                    values_buffer_view: required(
                        values.buffer_view,
                        &sparse_context,
                        "values.bufferView",
                    )?,
                    values_byte_offset: values.byte_offset,
                })
            }
        };

        Ok(Accessor {
            name: def.name,
            buffer_view_index: def.buffer_view,
            byte_offset: def.byte_offset,
            component_type: component_type(code, options, context)?,
            accessor_type,
            count: required(def.count, context, "count")?,
            normalized: def.normalized,
            min: def.min,
            max: def.max,
            sparse,
        })
    })
}

#[derive(Debug, Deserialize)]
struct ImageDef {
    name: Option<String>,
    uri: Option<String>,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
    #[serde(rename = "bufferView")]
    buffer_view: Option<usize>,
}

pub(crate) fn images(
    root: &Map<String, Value>,
    locator: &Locator<'_>,
    buffer_view_count: usize,
) -> Result<Vec<Image>, Error> {
    extract(root, "images", |_, context, value| {
        let def: ImageDef = deserialize(context, value)?;
        let data = locator.locate_image(
            context,
            def.uri.as_deref(),
            def.buffer_view,
            def.mime_type.as_deref(),
            buffer_view_count,
        )?;
        Ok(Image {
            name: def.name,
            data,
        })
    })
}

#[derive(Debug, Deserialize)]
struct SamplerDef {
    name: Option<String>,
    #[serde(rename = "magFilter")]
    mag_filter: Option<u64>,
    #[serde(rename = "minFilter")]
    min_filter: Option<u64>,
    #[serde(rename = "wrapS")]
    wrap_s: Option<u64>,
    #[serde(rename = "wrapT")]
    wrap_t: Option<u64>,
}

pub(crate) fn samplers(root: &Map<String, Value>) -> Result<Vec<Sampler>, Error> {
    extract(root, "samplers", |_, context, value| {
        let def: SamplerDef = deserialize(context, value)?;
        let filter = |code: Option<u64>, field: &str| {
            code.map(|code| {
                Filter::from_code(code)
                    .ok_or_else(|| Error::invalid(context, format!("unknown {field} {code}")))
            })
            .transpose()
        };
        let wrap = |code: Option<u64>, field: &str| {
            code.map(|code| {
                Wrap::from_code(code)
                    .ok_or_else(|| Error::invalid(context, format!("unknown {field} {code}")))
            })
            .transpose()
            .map(Option::unwrap_or_default)
        };
        Ok(Sampler {
            name: def.name,
            mag_filter: filter(def.mag_filter, "magFilter")?,
            min_filter: filter(def.min_filter, "minFilter")?,
            wrap_s: wrap(def.wrap_s, "wrapS")?,
            wrap_t: wrap(def.wrap_t, "wrapT")?,
        })
    })
}

#[derive(Debug, Deserialize)]
struct TextureDef {
    name: Option<String>,
    sampler: Option<usize>,
    source: Option<usize>,
    extensions: Option<ExtensionMap>,
}

pub(crate) fn textures(
    root: &Map<String, Value>,
    enabled: Extensions,
) -> Result<Vec<Texture>, Error> {
    extract(root, "textures", |_, context, value| {
        let def: TextureDef = deserialize(context, value)?;
        let extension_source =
            extensions::texture_image_source(def.extensions.as_ref(), enabled, context)?;
        let (image_index, fallback_image_index) = match extension_source {
            Some(image) => (Some(image), def.source),
            None => (def.source, None),
        };
        Ok(Texture {
            name: def.name,
            image_index,
            fallback_image_index,
            sampler_index: def.sampler,
        })
    })
}

#[derive(Debug, Deserialize)]
struct TextureInfoDef {
    index: Option<usize>,
    #[serde(default, rename = "texCoord")]
    tex_coord: usize,
    scale: Option<f32>,
    strength: Option<f32>,
    extensions: Option<ExtensionMap>,
}

fn texture_info(
    def: Option<TextureInfoDef>,
    enabled: Extensions,
    context: &str,
    slot: &str,
) -> Result<Option<TextureInfo>, Error> {
    let Some(def) = def else {
        return Ok(None);
    };
    let slot_context = format!("{context}.{slot}");
    Ok(Some(TextureInfo {
        texture_index: required(def.index, &slot_context, "index")?,
        tex_coord: def.tex_coord,
        scale: def.scale.or(def.strength).unwrap_or(1.0),
        transform: extensions::texture_transform(def.extensions.as_ref(), enabled, &slot_context)?,
    }))
}

fn default_base_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

#[derive(Debug, Deserialize)]
struct PbrDef {
    #[serde(default = "default_base_color", rename = "baseColorFactor")]
    base_color_factor: [f32; 4],
    #[serde(default = "default_one", rename = "metallicFactor")]
    metallic_factor: f32,
    #[serde(default = "default_one", rename = "roughnessFactor")]
    roughness_factor: f32,
    #[serde(rename = "baseColorTexture")]
    base_color_texture: Option<TextureInfoDef>,
    #[serde(rename = "metallicRoughnessTexture")]
    metallic_roughness_texture: Option<TextureInfoDef>,
}

fn default_alpha_cutoff() -> f32 {
    0.5
}

#[derive(Debug, Deserialize)]
struct MaterialDef {
    name: Option<String>,
    #[serde(rename = "pbrMetallicRoughness")]
    pbr_metallic_roughness: Option<PbrDef>,
    #[serde(rename = "normalTexture")]
    normal_texture: Option<TextureInfoDef>,
    #[serde(rename = "occlusionTexture")]
    occlusion_texture: Option<TextureInfoDef>,
    #[serde(rename = "emissiveTexture")]
    emissive_texture: Option<TextureInfoDef>,
    #[serde(default, rename = "emissiveFactor")]
    emissive_factor: [f32; 3],
    #[serde(rename = "alphaMode")]
    alpha_mode: Option<String>,
    #[serde(default = "default_alpha_cutoff", rename = "alphaCutoff")]
    alpha_cutoff: f32,
    #[serde(default, rename = "doubleSided")]
    double_sided: bool,
    extensions: Option<ExtensionMap>,
}

pub(crate) fn materials(
    root: &Map<String, Value>,
    enabled: Extensions,
) -> Result<Vec<Material>, Error> {
    extract(root, "materials", |_, context, value| {
        let def: MaterialDef = deserialize(context, value)?;
        let pbr_data = match def.pbr_metallic_roughness {
            None => None,
            Some(pbr) => {
                let pbr_context = format!("{context}.pbrMetallicRoughness");
                Some(PbrData {
                    base_color_factor: pbr.base_color_factor,
                    metallic_factor: pbr.metallic_factor,
                    roughness_factor: pbr.roughness_factor,
                    base_color_texture: texture_info(
                        pbr.base_color_texture,
                        enabled,
                        &pbr_context,
                        "baseColorTexture",
                    )?,
                    metallic_roughness_texture: texture_info(
                        pbr.metallic_roughness_texture,
                        enabled,
                        &pbr_context,
                        "metallicRoughnessTexture",
                    )?,
                })
            }
        };
        let alpha_mode = match def.alpha_mode.as_deref() {
            None => AlphaMode::Opaque,
            Some(name) => AlphaMode::from_json_name(name).ok_or_else(|| {
                Error::invalid(context, format!("unknown alphaMode '{name}'"))
            })?,
        };
        Ok(Material {
            name: def.name,
            pbr_data,
            normal_texture: texture_info(def.normal_texture, enabled, context, "normalTexture")?,
            occlusion_texture: texture_info(
                def.occlusion_texture,
                enabled,
                context,
                "occlusionTexture",
            )?,
            emissive_texture: texture_info(
                def.emissive_texture,
                enabled,
                context,
                "emissiveTexture",
            )?,
            emissive_factor: def.emissive_factor,
            emissive_strength: extensions::emissive_strength(
                def.extensions.as_ref(),
                enabled,
                context,
            )?,
            alpha_mode,
            alpha_cutoff: def.alpha_cutoff,
            double_sided: def.double_sided,
        })
    })
}

#[derive(Debug, Deserialize)]
struct PrimitiveDef {
    attributes: Option<BTreeMap<String, usize>>,
    indices: Option<usize>,
    material: Option<usize>,
    mode: Option<u64>,
    #[serde(default)]
    targets: Vec<BTreeMap<String, usize>>,
}

#[derive(Debug, Deserialize)]
struct MeshDef {
    name: Option<String>,
    primitives: Option<Vec<PrimitiveDef>>,
    #[serde(default)]
    weights: Vec<f32>,
}

pub(crate) fn meshes(root: &Map<String, Value>) -> Result<Vec<Mesh>, Error> {
    extract(root, "meshes", |_, context, value| {
        let def: MeshDef = deserialize(context, value)?;
        let mut primitives = Vec::new();
        for (index, primitive) in required(def.primitives, context, "primitives")?
            .into_iter()
            .enumerate()
        {
            let primitive_context = format!("{context}.primitives[{index}]");
            let attributes = required(primitive.attributes, &primitive_context, "attributes")?;
            let mode = match primitive.mode {
                None => PrimitiveType::Triangles,
                Some(code) => PrimitiveType::from_code(code).ok_or_else(|| {
                    Error::invalid(primitive_context.as_str(), format!("unknown mode {code}"))
                })?,
            };
            primitives.push(Primitive {
                attributes: attributes.into_iter().collect(),
                mode,
                indices_accessor: primitive.indices,
                material_index: primitive.material,
                targets: primitive
                    .targets
                    .into_iter()
                    .map(|target| target.into_iter().collect())
                    .collect(),
            });
        }
        Ok(Mesh {
            name: def.name,
            primitives,
            weights: def.weights,
        })
    })
}

#[derive(Debug, Deserialize)]
struct SkinDef {
    name: Option<String>,
    #[serde(rename = "inverseBindMatrices")]
    inverse_bind_matrices: Option<usize>,
    skeleton: Option<usize>,
    joints: Option<Vec<usize>>,
}

pub(crate) fn skins(root: &Map<String, Value>) -> Result<Vec<Skin>, Error> {
    extract(root, "skins", |_, context, value| {
        let def: SkinDef = deserialize(context, value)?;
        Ok(Skin {
            name: def.name,
            inverse_bind_matrices: def.inverse_bind_matrices,
            skeleton: def.skeleton,
            joints: required(def.joints, context, "joints")?,
        })
    })
}

#[derive(Debug, Deserialize)]
struct PerspectiveDef {
    #[serde(rename = "aspectRatio")]
    aspect_ratio: Option<f32>,
    yfov: Option<f32>,
    zfar: Option<f32>,
    znear: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct OrthographicDef {
    xmag: Option<f32>,
    ymag: Option<f32>,
    zfar: Option<f32>,
    znear: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct CameraDef {
    name: Option<String>,
    #[serde(rename = "type")]
    camera_type: Option<String>,
    perspective: Option<PerspectiveDef>,
    orthographic: Option<OrthographicDef>,
}

pub(crate) fn cameras(root: &Map<String, Value>) -> Result<Vec<Camera>, Error> {
    extract(root, "cameras", |_, context, value| {
        let def: CameraDef = deserialize(context, value)?;
        let projection = match required(def.camera_type, context, "type")?.as_str() {
            "perspective" => {
                let p = required(def.perspective, context, "perspective")?;
                let c = format!("{context}.perspective");
                CameraProjection::Perspective {
                    aspect_ratio: p.aspect_ratio,
                    yfov: required(p.yfov, &c, "yfov")?,
                    zfar: p.zfar,
                    znear: required(p.znear, &c, "znear")?,
                }
            }
            "orthographic" => {
                let o = required(def.orthographic, context, "orthographic")?;
                let c = format!("{context}.orthographic");
                CameraProjection::Orthographic {
                    xmag: required(o.xmag, &c, "xmag")?,
                    ymag: required(o.ymag, &c, "ymag")?,
                    zfar: required(o.zfar, &c, "zfar")?,
                    znear: required(o.znear, &c, "znear")?,
                }
            }
            other => {
                return Err(Error::invalid(
                    context,
                    format!("unknown camera type '{other}'"),
                ));
            }
        };
        Ok(Camera {
            name: def.name,
            projection,
        })
    })
}

#[derive(Debug, Deserialize)]
struct NodeDef {
    name: Option<String>,
    camera: Option<usize>,
    #[serde(default)]
    children: Vec<usize>,
    skin: Option<usize>,
    matrix: Option<[f32; 16]>,
    mesh: Option<usize>,
    rotation: Option<[f32; 4]>,
    scale: Option<[f32; 3]>,
    translation: Option<[f32; 3]>,
    #[serde(default)]
    weights: Vec<f32>,
    extensions: Option<ExtensionMap>,
}

pub(crate) fn nodes(
    root: &Map<String, Value>,
    enabled: Extensions,
    options: Options,
) -> Result<Vec<Node>, Error> {
    extract(root, "nodes", |_, context, value| {
        let def: NodeDef = deserialize(context, value)?;
        let transform = match def.matrix {
            Some(matrix) => {
                if def.translation.is_some() || def.rotation.is_some() || def.scale.is_some() {
                    log::warn!("{context}: has both matrix and TRS; using the matrix");
                }
                if options.contains(Options::DECOMPOSE_NODE_MATRICES) {
                    NodeTransform::Trs(decompose_transform_matrix(&matrix))
                } else {
                    NodeTransform::Matrix(matrix)
                }
            }
            None => {
                let identity = Trs::default();
                NodeTransform::Trs(Trs {
                    translation: def.translation.unwrap_or(identity.translation),
                    rotation: def.rotation.unwrap_or(identity.rotation),
                    scale: def.scale.unwrap_or(identity.scale),
                })
            }
        };
        Ok(Node {
            name: def.name,
            mesh_index: def.mesh,
            skin_index: def.skin,
            camera_index: def.camera,
            light_index: extensions::node_light(def.extensions.as_ref(), enabled, context)?,
            children: def.children,
            weights: def.weights,
            transform,
        })
    })
}

#[derive(Debug, Deserialize)]
struct SceneDef {
    name: Option<String>,
    #[serde(default)]
    nodes: Vec<usize>,
}

pub(crate) fn scenes(root: &Map<String, Value>) -> Result<Vec<Scene>, Error> {
    extract(root, "scenes", |_, context, value| {
        let def: SceneDef = deserialize(context, value)?;
        Ok(Scene {
            name: def.name,
            node_indices: def.nodes,
        })
    })
}

#[derive(Debug, Deserialize)]
struct ChannelTargetDef {
    node: Option<usize>,
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelDef {
    sampler: Option<usize>,
    target: Option<ChannelTargetDef>,
}

#[derive(Debug, Deserialize)]
struct AnimationSamplerDef {
    input: Option<usize>,
    output: Option<usize>,
    interpolation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnimationDef {
    name: Option<String>,
    channels: Option<Vec<ChannelDef>>,
    samplers: Option<Vec<AnimationSamplerDef>>,
}

pub(crate) fn animations(root: &Map<String, Value>) -> Result<Vec<Animation>, Error> {
    extract(root, "animations", |_, context, value| {
        let def: AnimationDef = deserialize(context, value)?;

        let mut channels = Vec::new();
        for (index, channel) in required(def.channels, context, "channels")?
            .into_iter()
            .enumerate()
        {
            let c = format!("{context}.channels[{index}]");
            let target = required(channel.target, &c, "target")?;
            let path_name = required(target.path, &c, "target.path")?;
            let path = AnimationPath::from_json_name(&path_name).ok_or_else(|| {
                Error::invalid(c.as_str(), format!("unknown target path '{path_name}'"))
            })?;
            channels.push(AnimationChannel {
                sampler_index: required(channel.sampler, &c, "sampler")?,
                node_index: target.node,
                path,
            });
        }

        let mut samplers = Vec::new();
        for (index, sampler) in required(def.samplers, context, "samplers")?
            .into_iter()
            .enumerate()
        {
            let c = format!("{context}.samplers[{index}]");
            let interpolation = match sampler.interpolation.as_deref() {
                None => AnimationInterpolation::Linear,
                Some(name) => AnimationInterpolation::from_json_name(name).ok_or_else(|| {
                    Error::invalid(c.as_str(), format!("unknown interpolation '{name}'"))
                })?,
            };
            samplers.push(crate::AnimationSampler {
                input_accessor: required(sampler.input, &c, "input")?,
                output_accessor: required(sampler.output, &c, "output")?,
                interpolation,
            });
        }

        Ok(Animation {
            name: def.name,
            channels,
            samplers,
        })
    })
}
