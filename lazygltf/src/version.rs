//! Supported glTF container version.

/// glTF major version accepted in the `asset.version` field and the GLB header.
pub const GLTF_MAJOR_VERSION: u32 = 2;

/// Highest glTF minor version this crate knows about.
pub const GLTF_MINOR_VERSION: u32 = 0;
