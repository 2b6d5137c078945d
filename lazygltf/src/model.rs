use crate::{
    AccessorType, AlphaMode, AnimationInterpolation, AnimationPath, BufferTarget, ComponentType,
    DataSource, Filter, NodeTransform, PrimitiveType, Wrap,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssetInfo {
    pub version: String,
    pub min_version: Option<String>,
    pub generator: Option<String>,
    pub copyright: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Buffer {
    pub name: Option<String>,
    pub byte_length: u64,
    pub data: DataSource,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BufferView {
    pub name: Option<String>,
    pub buffer_index: usize,
    pub byte_offset: u64,
    pub byte_length: u64,
    pub byte_stride: Option<u64>,
    pub target: Option<BufferTarget>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SparseAccessor {
    pub count: u64,
    pub indices_buffer_view: usize,
    pub indices_byte_offset: u64,
    pub indices_component_type: ComponentType,
    pub values_buffer_view: usize,
    pub values_byte_offset: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Accessor {
    pub name: Option<String>,
    pub buffer_view_index: Option<usize>,
    pub byte_offset: u64,
    pub component_type: ComponentType,
    pub accessor_type: AccessorType,
    pub count: u64,
    pub normalized: bool,
    pub min: Option<Vec<f64>>,
    pub max: Option<Vec<f64>>,
    pub sparse: Option<SparseAccessor>,
}

#[derive(Clone, Debug)]
pub struct Image {
    pub name: Option<String>,
    pub data: DataSource,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sampler {
    pub name: Option<String>,
    pub mag_filter: Option<Filter>,
    pub min_filter: Option<Filter>,
    pub wrap_s: Wrap,
    pub wrap_t: Wrap,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Texture {
    pub name: Option<String>,
    /// Image to use. With an image-format extension enabled this is the extension's image.
    pub image_index: Option<usize>,
    /// Core image kept for clients that cannot decode the extension's format.
    pub fallback_image_index: Option<usize>,
    pub sampler_index: Option<usize>,
}

/// `KHR_texture_transform` payload on a texture reference.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextureTransform {
    pub uv_offset: [f32; 2],
    /// Radians, as stored in the document.
    pub rotation: f32,
    pub uv_scale: [f32; 2],
    pub tex_coord: Option<usize>,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self {
            uv_offset: [0.0, 0.0],
            rotation: 0.0,
            uv_scale: [1.0, 1.0],
            tex_coord: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureInfo {
    pub texture_index: usize,
    pub tex_coord: usize,
    /// Normal scale or occlusion strength; 1.0 for other slots.
    pub scale: f32,
    pub transform: Option<TextureTransform>,
}

impl TextureInfo {
    /// UV channel after applying a texture-transform override.
    pub fn effective_tex_coord(&self) -> usize {
        self.transform
            .and_then(|t| t.tex_coord)
            .unwrap_or(self.tex_coord)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PbrData {
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub base_color_texture: Option<TextureInfo>,
    pub metallic_roughness_texture: Option<TextureInfo>,
}

impl Default for PbrData {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            base_color_texture: None,
            metallic_roughness_texture: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub pbr_data: Option<PbrData>,
    pub normal_texture: Option<TextureInfo>,
    pub occlusion_texture: Option<TextureInfo>,
    pub emissive_texture: Option<TextureInfo>,
    pub emissive_factor: [f32; 3],
    pub emissive_strength: Option<f32>,
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: f32,
    pub double_sided: bool,
}

impl Material {
    /// All texture slots that are present, in a fixed order.
    pub fn texture_infos(&self) -> impl Iterator<Item = (&'static str, &TextureInfo)> {
        let pbr = self.pbr_data.as_ref();
        [
            ("baseColorTexture", pbr.and_then(|p| p.base_color_texture.as_ref())),
            (
                "metallicRoughnessTexture",
                pbr.and_then(|p| p.metallic_roughness_texture.as_ref()),
            ),
            ("normalTexture", self.normal_texture.as_ref()),
            ("occlusionTexture", self.occlusion_texture.as_ref()),
            ("emissiveTexture", self.emissive_texture.as_ref()),
        ]
        .into_iter()
        .filter_map(|(slot, info)| info.map(|info| (slot, info)))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    /// Attribute semantic to accessor index, sorted by semantic.
    pub attributes: Vec<(String, usize)>,
    pub mode: PrimitiveType,
    pub indices_accessor: Option<usize>,
    pub material_index: Option<usize>,
    pub targets: Vec<Vec<(String, usize)>>,
}

impl Primitive {
    pub fn attribute(&self, semantic: &str) -> Option<usize> {
        self.attributes
            .iter()
            .find(|(name, _)| name == semantic)
            .map(|(_, accessor)| *accessor)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
    pub weights: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationChannel {
    pub sampler_index: usize,
    pub node_index: Option<usize>,
    pub path: AnimationPath,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSampler {
    pub input_accessor: usize,
    pub output_accessor: usize,
    pub interpolation: AnimationInterpolation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub name: Option<String>,
    pub channels: Vec<AnimationChannel>,
    pub samplers: Vec<AnimationSampler>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Skin {
    pub name: Option<String>,
    pub inverse_bind_matrices: Option<usize>,
    pub skeleton: Option<usize>,
    pub joints: Vec<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CameraProjection {
    Perspective {
        aspect_ratio: Option<f32>,
        yfov: f32,
        zfar: Option<f32>,
        znear: f32,
    },
    Orthographic {
        xmag: f32,
        ymag: f32,
        zfar: f32,
        znear: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub name: Option<String>,
    pub projection: CameraProjection,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightType {
    Directional,
    Point,
    Spot {
        inner_cone_angle: f32,
        outer_cone_angle: f32,
    },
}

/// `KHR_lights_punctual` light.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub name: Option<String>,
    pub light_type: LightType,
    pub color: [f32; 3],
    pub intensity: f32,
    pub range: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub name: Option<String>,
    pub mesh_index: Option<usize>,
    pub skin_index: Option<usize>,
    pub camera_index: Option<usize>,
    pub light_index: Option<usize>,
    pub children: Vec<usize>,
    pub weights: Vec<f32>,
    pub transform: NodeTransform,
}

impl Node {
    pub fn has_matrix(&self) -> bool {
        self.transform.is_matrix()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub name: Option<String>,
    pub node_indices: Vec<usize>,
}

/// Typed view of a glTF document. Entities reference each other by index.
#[derive(Clone, Debug, Default)]
pub struct Asset {
    pub asset_info: Option<AssetInfo>,
    pub extensions_used: Vec<String>,
    pub extensions_required: Vec<String>,
    pub default_scene: Option<usize>,

    pub accessors: Vec<Accessor>,
    pub animations: Vec<Animation>,
    pub buffers: Vec<Buffer>,
    pub buffer_views: Vec<BufferView>,
    pub cameras: Vec<Camera>,
    pub images: Vec<Image>,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,
    pub meshes: Vec<Mesh>,
    pub nodes: Vec<Node>,
    pub samplers: Vec<Sampler>,
    pub scenes: Vec<Scene>,
    pub skins: Vec<Skin>,
    pub textures: Vec<Texture>,
}
