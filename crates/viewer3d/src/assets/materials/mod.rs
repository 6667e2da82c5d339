//! Material system
//!
//! MTL parsing into raw descriptors, and resolution of those descriptors
//! into renderer-facing materials with their texture maps loaded.

pub mod material;
pub mod material_resolver;
pub mod mtl_parser;
pub mod texture_params;

pub use material::{
    MapKind, MaterialHandle, MaterialMaps, MaterialProperty, ResolvedMaterial, Side, TextureHandle, TextureMap, Wrap,
};
pub use material_resolver::{resolve_url, MaterialOptions, MaterialResolver};
pub use mtl_parser::{parse_float, MaterialDescriptor, MtlLibrary, MtlParser, RawValue};
pub use texture_params::TextureParams;
