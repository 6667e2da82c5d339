//! Texture loading dispatch
//!
//! Routes a texture URL to the DDS decoder or to generic image decoding and
//! returns the decoded payload. Loading is synchronous; callers that need to
//! keep a UI responsive run it off the main thread and apply results in
//! request order.

use thiserror::Error;

use super::dds::{self, DecodedTexture, FormatError};
use super::image_loader::ImageData;
use crate::assets::AssetError;
use crate::loading::fetch::{ByteSource, FetchError};

/// Decoded texture payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureData {
    /// Block-compressed or raw DDS surface with its mip chain
    Compressed(DecodedTexture),
    /// Generic image decoded to RGBA8
    Image(ImageData),
}

impl TextureData {
    /// Width and height of the top level
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Compressed(texture) => (texture.header.width, texture.header.height),
            Self::Image(image) => (image.width, image.height),
        }
    }

    /// Mip levels per face
    pub fn mip_levels(&self) -> u32 {
        match self {
            Self::Compressed(texture) => texture.header.mipmap_count,
            Self::Image(_) => 1,
        }
    }
}

/// Texture loading errors
#[derive(Error, Debug)]
pub enum TextureError {
    /// The bytes could not be fetched
    #[error("Failed to fetch texture: {0}")]
    Fetch(#[from] FetchError),

    /// The DDS header was rejected
    #[error("Invalid DDS texture: {0}")]
    Format(#[from] FormatError),

    /// The image could not be decoded
    #[error("Failed to decode texture image: {0}")]
    Image(#[from] AssetError),
}

/// Loads textures by URL
pub trait TextureLoader {
    /// Fetch and decode the texture at `url`
    fn load(&mut self, url: &str) -> Result<TextureData, TextureError>;
}

/// Texture loader reading bytes from a [`ByteSource`]
///
/// URLs ending in `.dds` (case-insensitive, ignoring query and fragment) and
/// payloads starting with the DDS magic go through the DDS decoder; anything
/// else goes through the `image` crate.
pub struct SourceTextureLoader<S> {
    source: S,
    load_mipmaps: bool,
}

impl<S: ByteSource> SourceTextureLoader<S> {
    /// Create a loader that reads full mip chains
    pub fn new(source: S) -> Self {
        Self {
            source,
            load_mipmaps: true,
        }
    }

    /// Whether DDS mip chains are read beyond the top level
    pub fn with_mipmaps(mut self, load_mipmaps: bool) -> Self {
        self.load_mipmaps = load_mipmaps;
        self
    }

    /// Decode already fetched bytes
    pub fn decode(&self, url: &str, bytes: &[u8]) -> Result<TextureData, TextureError> {
        if is_dds_url(url) || dds::is_dds(bytes) {
            let texture = dds::decode(bytes, self.load_mipmaps)?;
            log::info!(
                "Decoded DDS texture {}: {}x{} {:?}, {} level(s)",
                url,
                texture.header.width,
                texture.header.height,
                texture.header.format,
                texture.header.mipmap_count
            );
            Ok(TextureData::Compressed(texture))
        } else {
            let image = ImageData::from_bytes(bytes)?;
            log::info!("Decoded image texture {}: {}x{}", url, image.width, image.height);
            Ok(TextureData::Image(image))
        }
    }
}

impl<S: ByteSource> TextureLoader for SourceTextureLoader<S> {
    fn load(&mut self, url: &str) -> Result<TextureData, TextureError> {
        let bytes = self.source.read_bytes(url)?;
        self.decode(url, &bytes)
    }
}

/// Loader that never loads anything
///
/// Materials still get their texture maps (URL, repeat, offset), just
/// without decoded data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTextureLoader;

impl TextureLoader for NullTextureLoader {
    fn load(&mut self, url: &str) -> Result<TextureData, TextureError> {
        Err(TextureError::Fetch(FetchError::NotFound(url.to_string())))
    }
}

fn is_dds_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let bytes = path.as_bytes();
    bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".dds")
}
