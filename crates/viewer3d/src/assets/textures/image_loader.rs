//! Image loading utilities for uncompressed texture data
//!
//! Decodes PNG and JPEG payloads into RGBA8 for textures that are not DDS.

use crate::assets::AssetError;

/// Decoded image data ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of color channels (always 4, RGBA)
    pub channels: u8,
}

impl ImageData {
    /// Decode PNG or JPEG bytes to RGBA8
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| AssetError::UnsupportedFormat(format!("Failed to decode image: {}", e)))?
            .into_rgba8();

        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            channels: 4,
            data: decoded.into_raw(),
        })
    }

    /// Image filled with one RGBA color
    #[cfg(test)]
    pub(crate) fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            data: color.repeat(pixels),
            width,
            height,
            channels: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(img: &image::RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 4);
        assert_eq!(img.channels, 4);
        assert_eq!(img.data.len(), 4 * 4 * 4);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_from_bytes_png() {
        let mut source = image::RgbaImage::new(2, 3);
        source.put_pixel(1, 2, image::Rgba([1, 2, 3, 4]));
        let img = ImageData::from_bytes(&encode_png(&source)).unwrap();

        assert_eq!((img.width, img.height), (2, 3));
        assert_eq!(&img.data[(2 * 2 + 1) * 4..(2 * 2 + 2) * 4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_from_bytes_garbage() {
        let result = ImageData::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(AssetError::UnsupportedFormat(_))));
    }
}
