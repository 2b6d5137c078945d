//! Lazy, category-based glTF 2.0 loader and validator.
//!
//! A [`Parser`] holds configuration. [`Parser::load_gltf`] wraps a parsed JSON document in a
//! [`Gltf`] handle, which extracts only the requested [`Category`] sections (plus their
//! dependencies) into a typed, index-linked [`Asset`].
//!
//! ```no_run
//! use lazygltf::{Category, Extensions, JsonData, Options, Parser};
//!
//! let json = JsonData::from_path("scene.gltf")?;
//! let mut parser = Parser::new(Extensions::KHR_TEXTURE_TRANSFORM);
//! let mut gltf = parser.load_gltf(&json, ".", Options::empty())?;
//! gltf.parse(Category::SCENES)?;
//! gltf.validate()?;
//! println!("{} nodes", gltf.get_parsed_asset().nodes.len());
//! # Ok::<(), lazygltf::Error>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod extensions;
mod fs;
mod json;
mod location;
mod model;
mod parser;
mod transform;
mod types;
mod validate;
mod version;

#[cfg(feature = "binary")]
mod glb;

pub use error::*;
pub use extensions::{ExtensionMap, Extensions};
pub use json::JsonData;
pub use location::{
    BufferFreeCallback, BufferInfo, BufferMapCallback, DataLocation, DataSource, MappedMemory,
    UserPointer,
};
pub use model::*;
pub use parser::{Category, Gltf, Options, Parser};
pub use transform::*;
pub use types::*;
pub use version::*;

#[cfg(test)]
mod test_documents;



#[cfg(test)]
mod parser_tests;
