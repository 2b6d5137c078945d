//! Node transforms: raw column-major matrices and translation/rotation/scale.

use glam::{Mat4, Quat, Vec3};

pub const IDENTITY_MATRIX: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Trs {
    pub translation: [f32; 3],
    /// Quaternion in (x, y, z, w) order.
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for Trs {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NodeTransform {
    /// Column-major 4x4 matrix.
    Matrix([f32; 16]),
    Trs(Trs),
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::Trs(Trs::default())
    }
}

impl NodeTransform {
    pub fn is_matrix(&self) -> bool {
        matches!(self, Self::Matrix(_))
    }

    pub fn to_matrix(&self) -> [f32; 16] {
        match self {
            Self::Matrix(matrix) => *matrix,
            Self::Trs(trs) => compose_transform_matrix(trs),
        }
    }

    pub fn to_trs(&self) -> Trs {
        match self {
            Self::Matrix(matrix) => decompose_transform_matrix(matrix),
            Self::Trs(trs) => *trs,
        }
    }
}

/// Splits a column-major affine matrix into translation, rotation and scale.
///
/// Mirrored matrices (negative basis determinant) get their X scale negated so the
/// remaining basis is a proper rotation. Shear and perspective are not represented.
/// A basis with a zero-length axis keeps the identity rotation.
pub fn decompose_transform_matrix(matrix: &[f32; 16]) -> Trs {
    let (scale, rotation, translation) =
        Mat4::from_cols_array(matrix).to_scale_rotation_translation();
    let rotation = if rotation.is_finite() {
        rotation
    } else {
        Quat::IDENTITY
    };
    Trs {
        translation: translation.to_array(),
        rotation: rotation.to_array(),
        scale: scale.to_array(),
    }
}

/// Builds `translate * rotate * scale` as a column-major matrix.
pub fn compose_transform_matrix(trs: &Trs) -> [f32; 16] {
    Mat4::from(*trs).to_cols_array()
}

impl From<Trs> for Mat4 {
    fn from(trs: Trs) -> Self {
        Mat4::from_scale_rotation_translation(
            Vec3::from_array(trs.scale),
            Quat::from_array(trs.rotation),
            Vec3::from_array(trs.translation),
        )
    }
}

impl From<NodeTransform> for Mat4 {
    fn from(transform: NodeTransform) -> Self {
        Mat4::from_cols_array(&transform.to_matrix())
    }
}

impl From<Mat4> for NodeTransform {
    fn from(matrix: Mat4) -> Self {
        NodeTransform::Matrix(matrix.to_cols_array())
    }
}
