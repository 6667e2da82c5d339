//! Texture decoding and loading
//!
//! DDS decoding for compressed textures, `image` based decoding for
//! everything else, and the loader that picks between them.

pub mod dds;
pub mod image_loader;
pub mod texture_loader;

pub use dds::{decode, CubeFace, DecodedTexture, FormatError, Mipmap, TextureFormat, TextureHeader};
pub use image_loader::ImageData;
pub use texture_loader::{NullTextureLoader, SourceTextureLoader, TextureData, TextureError, TextureLoader};
