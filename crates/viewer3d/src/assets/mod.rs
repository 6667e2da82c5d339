//! Asset decoding
//!
//! Textures (DDS and common image formats), MTL materials and OBJ geometry.

pub mod geometry;
pub mod materials;
pub mod obj_loader;
pub mod textures;

pub use geometry::{GeometryDecoder, GeometryDecoders, GeometryError};
pub use materials::{MaterialOptions, MaterialResolver, MtlParser, ResolvedMaterial};
pub use obj_loader::{ObjDecoder, ObjError, ObjLoader};
pub use textures::{ImageData, TextureData, TextureLoader};

use thiserror::Error;

/// Asset decoding errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Bytes are not in a format the decoder understands
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
