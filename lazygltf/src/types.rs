//! Format-level enumerations and the size tables derived from them.

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AccessorType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AccessorType {
    pub fn from_json_name(name: &str) -> Option<Self> {
        match name {
            "SCALAR" => Some(Self::Scalar),
            "VEC2" => Some(Self::Vec2),
            "VEC3" => Some(Self::Vec3),
            "VEC4" => Some(Self::Vec4),
            "MAT2" => Some(Self::Mat2),
            "MAT3" => Some(Self::Mat3),
            "MAT4" => Some(Self::Mat4),
            _ => None,
        }
    }

    pub fn json_name(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Mat2 => "MAT2",
            Self::Mat3 => "MAT3",
            Self::Mat4 => "MAT4",
        }
    }
}

/// Numeric type of a single accessor component.
///
/// `Invalid` is what unrecognised codes map to; callers have to check for it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
    Double,
    #[default]
    Invalid,
}

impl ComponentType {
    pub fn from_code(code: u64) -> Self {
        match code {
            5120 => Self::Byte,
            5121 => Self::UnsignedByte,
            5122 => Self::Short,
            5123 => Self::UnsignedShort,
            5125 => Self::UnsignedInt,
            5126 => Self::Float,
            5130 => Self::Double,
            _ => Self::Invalid,
        }
    }

    pub fn code(self) -> Option<u32> {
        match self {
            Self::Byte => Some(5120),
            Self::UnsignedByte => Some(5121),
            Self::Short => Some(5122),
            Self::UnsignedShort => Some(5123),
            Self::UnsignedInt => Some(5125),
            Self::Float => Some(5126),
            Self::Double => Some(5130),
            Self::Invalid => None,
        }
    }
}

pub fn element_count(ty: AccessorType) -> usize {
    match ty {
        AccessorType::Scalar => 1,
        AccessorType::Vec2 => 2,
        AccessorType::Vec3 => 3,
        AccessorType::Vec4 => 4,
        AccessorType::Mat2 => 4,
        AccessorType::Mat3 => 9,
        AccessorType::Mat4 => 16,
    }
}

pub fn component_bit_size(component: ComponentType) -> usize {
    match component {
        ComponentType::Byte | ComponentType::UnsignedByte => 8,
        ComponentType::Short | ComponentType::UnsignedShort => 16,
        ComponentType::UnsignedInt | ComponentType::Float => 32,
        ComponentType::Double => 64,
        ComponentType::Invalid => 0,
    }
}

pub fn element_byte_size(ty: AccessorType, component: ComponentType) -> usize {
    element_count(ty) * component_bit_size(component) / 8
}

pub fn component_type_from_code(code: u64) -> ComponentType {
    ComponentType::from_code(code)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveType {
    pub(crate) fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Points),
            1 => Some(Self::Lines),
            2 => Some(Self::LineLoop),
            3 => Some(Self::LineStrip),
            4 => Some(Self::Triangles),
            5 => Some(Self::TriangleStrip),
            6 => Some(Self::TriangleFan),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BufferTarget {
    ArrayBuffer,
    ElementArrayBuffer,
}

impl BufferTarget {
    pub(crate) fn from_code(code: u64) -> Option<Self> {
        match code {
            34962 => Some(Self::ArrayBuffer),
            34963 => Some(Self::ElementArrayBuffer),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Filter {
    Nearest,
    Linear,
    NearestMipMapNearest,
    LinearMipMapNearest,
    NearestMipMapLinear,
    LinearMipMapLinear,
}

impl Filter {
    pub(crate) fn from_code(code: u64) -> Option<Self> {
        match code {
            9728 => Some(Self::Nearest),
            9729 => Some(Self::Linear),
            9984 => Some(Self::NearestMipMapNearest),
            9985 => Some(Self::LinearMipMapNearest),
            9986 => Some(Self::NearestMipMapLinear),
            9987 => Some(Self::LinearMipMapLinear),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Wrap {
    ClampToEdge,
    MirroredRepeat,
    #[default]
    Repeat,
}

impl Wrap {
    pub(crate) fn from_code(code: u64) -> Option<Self> {
        match code {
            33071 => Some(Self::ClampToEdge),
            33648 => Some(Self::MirroredRepeat),
            10497 => Some(Self::Repeat),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

impl AlphaMode {
    pub(crate) fn from_json_name(name: &str) -> Option<Self> {
        match name {
            "OPAQUE" => Some(Self::Opaque),
            "MASK" => Some(Self::Mask),
            "BLEND" => Some(Self::Blend),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AnimationPath {
    Translation,
    Rotation,
    Scale,
    Weights,
}

impl AnimationPath {
    pub(crate) fn from_json_name(name: &str) -> Option<Self> {
        match name {
            "translation" => Some(Self::Translation),
            "rotation" => Some(Self::Rotation),
            "scale" => Some(Self::Scale),
            "weights" => Some(Self::Weights),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum AnimationInterpolation {
    #[default]
    Linear,
    Step,
    CubicSpline,
}

impl AnimationInterpolation {
    pub(crate) fn from_json_name(name: &str) -> Option<Self> {
        match name {
            "LINEAR" => Some(Self::Linear),
            "STEP" => Some(Self::Step),
            "CUBICSPLINE" => Some(Self::CubicSpline),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum MimeType {
    #[default]
    None,
    GltfBuffer,
    OctetStream,
    Jpeg,
    Png,
    Ktx2,
    Dds,
    Webp,
}

impl MimeType {
    pub fn from_mime_str(value: &str) -> Option<Self> {
        match value {
            "application/gltf-buffer" => Some(Self::GltfBuffer),
            "application/octet-stream" => Some(Self::OctetStream),
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/ktx2" => Some(Self::Ktx2),
            "image/vnd-ms.dds" => Some(Self::Dds),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub(crate) fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "bin" | "glbin" => Self::OctetStream,
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "ktx2" => Self::Ktx2,
            "dds" => Self::Dds,
            "webp" => Self::Webp,
            _ => Self::None,
        }
    }

    pub fn as_mime_str(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::GltfBuffer => Some("application/gltf-buffer"),
            Self::OctetStream => Some("application/octet-stream"),
            Self::Jpeg => Some("image/jpeg"),
            Self::Png => Some("image/png"),
            Self::Ktx2 => Some("image/ktx2"),
            Self::Dds => Some("image/vnd-ms.dds"),
            Self::Webp => Some("image/webp"),
        }
    }
}
