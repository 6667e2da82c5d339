//! DDS (DirectDraw Surface) compressed texture decoder
//!
//! Reads the legacy DDS container: a 128-byte little-endian header followed
//! by the surface data, face by face and mip level by mip level. Only the
//! read path is implemented. Supported payloads are the DXT1/DXT3/DXT5 and
//! ETC1 block formats plus 32-bit BGRA surfaces, which are swizzled to RGBA.
//!
//! Header words (32-bit, little-endian) used by the decoder:
//!
//! | word | field                    |
//! |------|--------------------------|
//! | 0    | magic `"DDS "`           |
//! | 1    | header size              |
//! | 2    | header flags             |
//! | 3    | height                   |
//! | 4    | width                    |
//! | 7    | mipmap count             |
//! | 20   | pixel format flags       |
//! | 21   | FourCC                   |
//! | 22   | RGB bit count            |
//! | 23-26| R, G, B, A bit masks     |
//! | 28   | caps2 (cubemap flags)    |

use bitflags::bitflags;
use thiserror::Error;

use crate::foundation::math::utils::{block_count, next_mip_dimension};

/// Magic number at the start of every DDS file (`"DDS "`)
pub const DDS_MAGIC: u32 = 0x2053_4444;

/// Length of the fixed header in bytes, magic included
pub const HEADER_LEN: usize = HEADER_WORDS * 4;

const HEADER_WORDS: usize = 32;

const OFF_MAGIC: usize = 0;
const OFF_SIZE: usize = 1;
const OFF_FLAGS: usize = 2;
const OFF_HEIGHT: usize = 3;
const OFF_WIDTH: usize = 4;
const OFF_MIPMAP_COUNT: usize = 7;
const OFF_PF_FLAGS: usize = 20;
const OFF_PF_FOURCC: usize = 21;
const OFF_RGB_BIT_COUNT: usize = 22;
const OFF_R_BIT_MASK: usize = 23;
const OFF_G_BIT_MASK: usize = 24;
const OFF_B_BIT_MASK: usize = 25;
const OFF_A_BIT_MASK: usize = 26;
const OFF_CAPS2: usize = 28;

/// FourCC code for BC1 / DXT1
pub const FOURCC_DXT1: u32 = fourcc_to_u32(*b"DXT1");
/// FourCC code for BC2 / DXT3
pub const FOURCC_DXT3: u32 = fourcc_to_u32(*b"DXT3");
/// FourCC code for BC3 / DXT5
pub const FOURCC_DXT5: u32 = fourcc_to_u32(*b"DXT5");
/// FourCC code for ETC1
pub const FOURCC_ETC1: u32 = fourcc_to_u32(*b"ETC1");

bitflags! {
    /// Header flags (word 2)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HeaderFlags: u32 {
        /// Caps words are valid
        const CAPS = 0x1;
        /// Height is valid
        const HEIGHT = 0x2;
        /// Width is valid
        const WIDTH = 0x4;
        /// Pitch is valid
        const PITCH = 0x8;
        /// Pixel format is valid
        const PIXEL_FORMAT = 0x1000;
        /// Mipmap count is valid
        const MIPMAP_COUNT = 0x2_0000;
        /// Linear size is valid
        const LINEAR_SIZE = 0x8_0000;
        /// Depth is valid
        const DEPTH = 0x80_0000;
    }

    /// Pixel format flags (word 20)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PixelFormatFlags: u32 {
        /// Surface has an alpha channel
        const ALPHA_PIXELS = 0x1;
        /// Surface format is named by the FourCC word
        const FOURCC = 0x4;
        /// Surface holds uncompressed RGB data described by the bit masks
        const RGB = 0x40;
    }

    /// Secondary capability flags (word 28)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Caps2: u32 {
        /// Surface is a cubemap
        const CUBEMAP = 0x200;
        /// +X face present
        const POSITIVE_X = 0x400;
        /// -X face present
        const NEGATIVE_X = 0x800;
        /// +Y face present
        const POSITIVE_Y = 0x1000;
        /// -Y face present
        const NEGATIVE_Y = 0x2000;
        /// +Z face present
        const POSITIVE_Z = 0x4000;
        /// -Z face present
        const NEGATIVE_Z = 0x8000;
        /// All six faces present
        const ALL_FACES = Self::POSITIVE_X.bits()
            | Self::NEGATIVE_X.bits()
            | Self::POSITIVE_Y.bits()
            | Self::NEGATIVE_Y.bits()
            | Self::POSITIVE_Z.bits()
            | Self::NEGATIVE_Z.bits();
    }
}

/// Pack four ASCII characters into a little-endian FourCC word
pub const fn fourcc_to_u32(code: [u8; 4]) -> u32 {
    u32::from_le_bytes(code)
}

/// Unpack a FourCC word into its characters, for diagnostics
pub fn u32_to_fourcc(value: u32) -> String {
    value
        .to_le_bytes()
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
        .collect()
}

/// Pixel format of a decoded surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// BC1, 8 bytes per 4x4 block
    Dxt1,
    /// BC2, 16 bytes per 4x4 block
    Dxt3,
    /// BC3, 16 bytes per 4x4 block
    Dxt5,
    /// ETC1, 8 bytes per 4x4 block
    Etc1,
    /// 8 bits per channel RGBA, already swizzled from the BGRA source layout
    RgbaUncompressed,
}

impl TextureFormat {
    /// Bytes per 4x4 block, `None` for uncompressed data
    pub fn block_bytes(self) -> Option<usize> {
        match self {
            Self::Dxt1 | Self::Etc1 => Some(8),
            Self::Dxt3 | Self::Dxt5 => Some(16),
            Self::RgbaUncompressed => None,
        }
    }

    /// Whether the format stores block-compressed data
    pub fn is_compressed(self) -> bool {
        self.block_bytes().is_some()
    }

    /// Byte length of one surface of the given size, `None` if it does not
    /// fit in `usize`
    pub fn surface_len(self, width: u32, height: u32) -> Option<usize> {
        let (columns, rows, unit) = match self.block_bytes() {
            Some(block_bytes) => (block_count(width), block_count(height), block_bytes),
            None => (width, height, 4),
        };
        (columns as usize).checked_mul(rows as usize)?.checked_mul(unit)
    }
}

/// Cubemap faces in storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    /// +X
    PositiveX,
    /// -X
    NegativeX,
    /// +Y
    PositiveY,
    /// -Y
    NegativeY,
    /// +Z
    PositiveZ,
    /// -Z
    NegativeZ,
}

impl CubeFace {
    /// All faces in the order they are stored in the file
    pub const ALL: [Self; 6] = [
        Self::PositiveX,
        Self::NegativeX,
        Self::PositiveY,
        Self::NegativeY,
        Self::PositiveZ,
        Self::NegativeZ,
    ];
}

/// Summary of a decoded texture header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHeader {
    /// Width of the top mip level
    pub width: u32,
    /// Height of the top mip level
    pub height: u32,
    /// Surface format
    pub format: TextureFormat,
    /// Mip levels decoded per face, always at least one
    pub mipmap_count: u32,
    /// Whether six faces were decoded
    pub is_cubemap: bool,
}

impl TextureHeader {
    /// Number of faces stored in the texture
    pub fn face_count(&self) -> usize {
        if self.is_cubemap { 6 } else { 1 }
    }
}

/// One mip level of one face
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mipmap {
    /// Level width in pixels
    pub width: u32,
    /// Level height in pixels
    pub height: u32,
    /// Level bytes (compressed blocks or RGBA8 pixels)
    pub data: Vec<u8>,
}

/// Fully decoded DDS texture
///
/// Mipmaps are stored face-major: all levels of the first face, then all
/// levels of the second face, and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTexture {
    /// Header summary
    pub header: TextureHeader,
    /// Mip levels, face-major
    pub mipmaps: Vec<Mipmap>,
}

impl DecodedTexture {
    /// Mip chain of a single face (`0` for non-cubemaps)
    pub fn face(&self, face: usize) -> Option<&[Mipmap]> {
        if face >= self.header.face_count() {
            return None;
        }
        let levels = self.header.mipmap_count as usize;
        self.mipmaps.get(face * levels..(face + 1) * levels)
    }

    /// Mip chain of a cubemap face
    pub fn cube_face(&self, face: CubeFace) -> Option<&[Mipmap]> {
        if !self.header.is_cubemap {
            return None;
        }
        let index = CubeFace::ALL.iter().position(|&f| f == face)?;
        self.face(index)
    }
}

/// Reasons a DDS buffer is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// First word is not `"DDS "`
    #[error("Invalid magic number in DDS header: {0:#010x}")]
    InvalidMagic(u32),

    /// Pixel format is neither FourCC nor RGB described
    #[error("Unsupported format, must contain a FourCC code (pixel format flags {0:#x})")]
    MissingFourCc(u32),

    /// FourCC not one of the supported codes and not 32-bit RGBA
    #[error("Unsupported FourCC code {0:?}")]
    UnsupportedFourCc(String),

    /// Surface size overflows the address space
    #[error("DDS dimensions {width}x{height} are too large")]
    InvalidDimensions {
        /// Declared or mip width
        width: u32,
        /// Declared or mip height
        height: u32,
    },

    /// Cubemap flag set without all six faces
    #[error("Incomplete cubemap faces (caps2 {0:#x})")]
    IncompleteCubemap(u32),

    /// Buffer ends before the header or a mip level does
    #[error("Truncated DDS data: need {needed} bytes at offset {offset}, buffer has {available}")]
    Truncated {
        /// Offset of the read that failed
        offset: usize,
        /// Bytes that read needed
        needed: usize,
        /// Total buffer length
        available: usize,
    },
}

/// Decode a DDS buffer into its header summary and mip chain
///
/// When `load_mipmaps` is false, or the header does not flag a mipmap
/// count, only the top level of each face is read.
pub fn decode(buffer: &[u8], load_mipmaps: bool) -> Result<DecodedTexture, FormatError> {
    let header = read_header_words(buffer)?;

    if header[OFF_MAGIC] != DDS_MAGIC {
        return Err(FormatError::InvalidMagic(header[OFF_MAGIC]));
    }

    let pf_flags = PixelFormatFlags::from_bits_retain(header[OFF_PF_FLAGS]);
    if !pf_flags.intersects(PixelFormatFlags::FOURCC | PixelFormatFlags::RGB) {
        return Err(FormatError::MissingFourCc(header[OFF_PF_FLAGS]));
    }

    let has_fourcc = pf_flags.contains(PixelFormatFlags::FOURCC);
    let format = match header[OFF_PF_FOURCC] {
        FOURCC_DXT1 if has_fourcc => TextureFormat::Dxt1,
        FOURCC_DXT3 if has_fourcc => TextureFormat::Dxt3,
        FOURCC_DXT5 if has_fourcc => TextureFormat::Dxt5,
        FOURCC_ETC1 if has_fourcc => TextureFormat::Etc1,
        _ if pf_flags.contains(PixelFormatFlags::RGB) && is_rgba32_layout(&header) => TextureFormat::RgbaUncompressed,
        _ if !has_fourcc => return Err(FormatError::MissingFourCc(header[OFF_PF_FLAGS])),
        fourcc => return Err(FormatError::UnsupportedFourCc(u32_to_fourcc(fourcc))),
    };

    let flags = HeaderFlags::from_bits_retain(header[OFF_FLAGS]);
    let mipmap_count = if flags.contains(HeaderFlags::MIPMAP_COUNT) && load_mipmaps {
        header[OFF_MIPMAP_COUNT].max(1)
    } else {
        1
    };

    let caps2 = Caps2::from_bits_retain(header[OFF_CAPS2]);
    let is_cubemap = caps2.contains(Caps2::CUBEMAP);
    if is_cubemap && !caps2.contains(Caps2::ALL_FACES) {
        return Err(FormatError::IncompleteCubemap(header[OFF_CAPS2]));
    }

    let texture_header = TextureHeader {
        width: header[OFF_WIDTH],
        height: header[OFF_HEIGHT],
        format,
        mipmap_count,
        is_cubemap,
    };

    log::debug!(
        "DDS header: {}x{} {:?}, {} mip level(s), cubemap: {}",
        texture_header.width,
        texture_header.height,
        format,
        mipmap_count,
        is_cubemap
    );

    let mut offset = (header[OFF_SIZE] as usize).saturating_add(4);
    let mut mipmaps = Vec::with_capacity(texture_header.face_count() * mipmap_count as usize);

    for _face in 0..texture_header.face_count() {
        let mut width = texture_header.width;
        let mut height = texture_header.height;

        for _level in 0..mipmap_count {
            let len = format
                .surface_len(width, height)
                .ok_or(FormatError::InvalidDimensions { width, height })?;
            let source = slice_at(buffer, offset, len)?;

            let data = if format == TextureFormat::RgbaUncompressed {
                bgra_to_rgba(source)
            } else {
                source.to_vec()
            };

            mipmaps.push(Mipmap { width, height, data });

            offset += len;
            width = next_mip_dimension(width);
            height = next_mip_dimension(height);
        }
    }

    Ok(DecodedTexture {
        header: texture_header,
        mipmaps,
    })
}

/// Whether a buffer starts with the DDS magic
pub fn is_dds(buffer: &[u8]) -> bool {
    buffer.len() >= 4 && buffer[..4] == DDS_MAGIC.to_le_bytes()
}

fn read_header_words(buffer: &[u8]) -> Result<[u32; HEADER_WORDS], FormatError> {
    let bytes = slice_at(buffer, 0, HEADER_LEN)?;
    let mut words = [0u32; HEADER_WORDS];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(words)
}

fn is_rgba32_layout(header: &[u32; HEADER_WORDS]) -> bool {
    header[OFF_RGB_BIT_COUNT] == 32
        && header[OFF_R_BIT_MASK] & 0x00ff_0000 != 0
        && header[OFF_G_BIT_MASK] & 0x0000_ff00 != 0
        && header[OFF_B_BIT_MASK] & 0x0000_00ff != 0
        && header[OFF_A_BIT_MASK] & 0xff00_0000 != 0
}

fn slice_at(buffer: &[u8], offset: usize, len: usize) -> Result<&[u8], FormatError> {
    offset
        .checked_add(len)
        .and_then(|end| buffer.get(offset..end))
        .ok_or(FormatError::Truncated {
            offset,
            needed: len,
            available: buffer.len(),
        })
}

fn bgra_to_rgba(source: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(source.len());
    for px in source.chunks_exact(4) {
        out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds DDS buffers for tests
    pub(crate) struct DdsBuilder {
        width: u32,
        height: u32,
        fourcc: u32,
        pf_flags: u32,
        mipmaps: Option<u32>,
        caps2: u32,
        rgba_masks: bool,
    }

    impl DdsBuilder {
        pub(crate) fn new(width: u32, height: u32, fourcc: u32) -> Self {
            Self {
                width,
                height,
                fourcc,
                pf_flags: PixelFormatFlags::FOURCC.bits(),
                mipmaps: None,
                caps2: 0,
                rgba_masks: false,
            }
        }

        pub(crate) fn rgba(width: u32, height: u32) -> Self {
            Self {
                pf_flags: (PixelFormatFlags::RGB | PixelFormatFlags::ALPHA_PIXELS).bits(),
                rgba_masks: true,
                ..Self::new(width, height, 0)
            }
        }

        pub(crate) fn mipmaps(mut self, count: u32) -> Self {
            self.mipmaps = Some(count);
            self
        }

        pub(crate) fn caps2(mut self, caps2: Caps2) -> Self {
            self.caps2 = caps2.bits();
            self
        }

        pub(crate) fn pf_flags(mut self, flags: u32) -> Self {
            self.pf_flags = flags;
            self
        }

        pub(crate) fn header(&self) -> Vec<u8> {
            let mut words = [0u32; HEADER_WORDS];
            words[OFF_MAGIC] = DDS_MAGIC;
            words[OFF_SIZE] = 124;
            let mut flags = HeaderFlags::CAPS | HeaderFlags::HEIGHT | HeaderFlags::WIDTH | HeaderFlags::PIXEL_FORMAT;
            if let Some(count) = self.mipmaps {
                flags |= HeaderFlags::MIPMAP_COUNT;
                words[OFF_MIPMAP_COUNT] = count;
            }
            words[OFF_FLAGS] = flags.bits();
            words[OFF_HEIGHT] = self.height;
            words[OFF_WIDTH] = self.width;
            words[19] = 32;
            words[OFF_PF_FLAGS] = self.pf_flags;
            words[OFF_PF_FOURCC] = self.fourcc;
            if self.rgba_masks {
                words[OFF_RGB_BIT_COUNT] = 32;
                words[OFF_R_BIT_MASK] = 0x00ff_0000;
                words[OFF_G_BIT_MASK] = 0x0000_ff00;
                words[OFF_B_BIT_MASK] = 0x0000_00ff;
                words[OFF_A_BIT_MASK] = 0xff00_0000;
            }
            words[OFF_CAPS2] = self.caps2;
            words.iter().flat_map(|w| w.to_le_bytes()).collect()
        }

        /// Header plus enough payload for every face and level; each level is
        /// filled with its index in the sequence so ordering can be checked
        pub(crate) fn build(&self) -> Vec<u8> {
            let mut bytes = self.header();
            let faces = if self.caps2 & Caps2::CUBEMAP.bits() != 0 { 6 } else { 1 };
            let levels = self.mipmaps.unwrap_or(1).max(1);
            let format = match self.fourcc {
                FOURCC_DXT1 => TextureFormat::Dxt1,
                FOURCC_DXT3 => TextureFormat::Dxt3,
                FOURCC_DXT5 => TextureFormat::Dxt5,
                FOURCC_ETC1 => TextureFormat::Etc1,
                _ => TextureFormat::RgbaUncompressed,
            };
            let mut index = 0u8;
            for _ in 0..faces {
                let (mut w, mut h) = (self.width, self.height);
                for _ in 0..levels {
                    bytes.extend(std::iter::repeat(index).take(format.surface_len(w, h).unwrap()));
                    index = index.wrapping_add(1);
                    w = next_mip_dimension(w);
                    h = next_mip_dimension(h);
                }
            }
            bytes
        }
    }

    #[test]
    fn test_fourcc_round_trip() {
        assert_eq!(FOURCC_DXT1, 0x3154_5844);
        assert_eq!(u32_to_fourcc(FOURCC_DXT5), "DXT5");
        assert_eq!(u32_to_fourcc(0), "????");
    }

    #[test]
    fn test_decode_dxt1_single_level() {
        let bytes = DdsBuilder::new(16, 8, FOURCC_DXT1).build();
        let texture = decode(&bytes, true).unwrap();

        assert_eq!(texture.header.format, TextureFormat::Dxt1);
        assert_eq!(texture.header.width, 16);
        assert_eq!(texture.header.height, 8);
        assert_eq!(texture.header.mipmap_count, 1);
        assert!(!texture.header.is_cubemap);
        assert_eq!(texture.mipmaps.len(), 1);
        // 4 x 2 blocks of 8 bytes
        assert_eq!(texture.mipmaps[0].data.len(), 64);
    }

    #[test]
    fn test_mip_chain_dimensions_and_sizes() {
        let bytes = DdsBuilder::new(64, 16, FOURCC_DXT5).mipmaps(7).build();
        let texture = decode(&bytes, true).unwrap();

        assert_eq!(texture.header.mipmap_count, 7);
        let dims: Vec<(u32, u32)> = texture.mipmaps.iter().map(|m| (m.width, m.height)).collect();
        assert_eq!(dims, vec![(64, 16), (32, 8), (16, 4), (8, 2), (4, 1), (2, 1), (1, 1)]);

        for pair in texture.mipmaps.windows(2) {
            assert_eq!(pair[1].width, (pair[0].width >> 1).max(1));
            assert_eq!(pair[1].height, (pair[0].height >> 1).max(1));
        }

        // Sub-block levels still occupy one full block
        let sizes: Vec<usize> = texture.mipmaps.iter().map(|m| m.data.len()).collect();
        assert_eq!(sizes, vec![1024, 256, 64, 32, 16, 16, 16]);

        // Each level read from its own offset
        for (i, mip) in texture.mipmaps.iter().enumerate() {
            assert!(mip.data.iter().all(|&b| b == i as u8));
        }
    }

    #[test]
    fn test_mipmaps_not_requested() {
        let bytes = DdsBuilder::new(32, 32, FOURCC_DXT3).mipmaps(6).build();
        let texture = decode(&bytes, false).unwrap();
        assert_eq!(texture.header.mipmap_count, 1);
        assert_eq!(texture.mipmaps.len(), 1);
    }

    #[test]
    fn test_mipmap_flag_missing_reads_one_level() {
        let mut bytes = DdsBuilder::new(8, 8, FOURCC_DXT1).build();
        // Mipmap count word set but flag clear
        bytes[OFF_MIPMAP_COUNT * 4..OFF_MIPMAP_COUNT * 4 + 4].copy_from_slice(&4u32.to_le_bytes());
        let texture = decode(&bytes, true).unwrap();
        assert_eq!(texture.mipmaps.len(), 1);
    }

    #[test]
    fn test_zero_mipmap_count_clamps_to_one() {
        let bytes = DdsBuilder::new(8, 8, FOURCC_ETC1).mipmaps(0).build();
        let texture = decode(&bytes, true).unwrap();
        assert_eq!(texture.header.mipmap_count, 1);
        assert_eq!(texture.header.format, TextureFormat::Etc1);
        assert_eq!(texture.mipmaps[0].data.len(), 32);
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let mut bytes = DdsBuilder::new(8, 8, FOURCC_DXT1).build();
        for magic in [0u32, 0x2053_4445, 0xffff_ffff] {
            bytes[..4].copy_from_slice(&magic.to_le_bytes());
            assert_eq!(decode(&bytes, true), Err(FormatError::InvalidMagic(magic)));
        }
    }

    #[test]
    fn test_missing_fourcc_flag_rejected() {
        let bytes = DdsBuilder::new(8, 8, FOURCC_DXT1).pf_flags(0).build();
        assert!(matches!(decode(&bytes, true), Err(FormatError::MissingFourCc(0))));
    }

    #[test]
    fn test_block_fourcc_requires_fourcc_flag() {
        let rgb_only = PixelFormatFlags::RGB.bits();
        let bytes = DdsBuilder::new(8, 8, FOURCC_DXT1).pf_flags(rgb_only).build();
        assert_eq!(decode(&bytes, true), Err(FormatError::MissingFourCc(rgb_only)));
    }

    #[test]
    fn test_rgba_layout_requires_rgb_flag() {
        let bytes = DdsBuilder::rgba(2, 2).pf_flags(PixelFormatFlags::FOURCC.bits()).build();
        assert_eq!(
            decode(&bytes, true),
            Err(FormatError::UnsupportedFourCc("????".to_string()))
        );
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let block = DdsBuilder::new(u32::MAX, u32::MAX, FOURCC_DXT5).header();
        let rgba = DdsBuilder::rgba(u32::MAX, u32::MAX).header();

        for bytes in [block, rgba] {
            assert_eq!(
                decode(&bytes, true),
                Err(FormatError::InvalidDimensions {
                    width: u32::MAX,
                    height: u32::MAX
                })
            );
        }
    }

    #[test]
    fn test_surface_len_overflow() {
        assert_eq!(TextureFormat::Dxt1.surface_len(8, 8), Some(32));
        assert_eq!(TextureFormat::RgbaUncompressed.surface_len(u32::MAX, u32::MAX), None);
        assert_eq!(TextureFormat::Dxt5.surface_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_unsupported_fourcc_rejected() {
        let bytes = DdsBuilder::new(8, 8, fourcc_to_u32(*b"ATI2")).build();
        assert_eq!(
            decode(&bytes, true),
            Err(FormatError::UnsupportedFourCc("ATI2".to_string()))
        );
    }

    #[test]
    fn test_uncompressed_bgra_swizzled() {
        let mut bytes = DdsBuilder::rgba(2, 1).header();
        bytes.extend_from_slice(&[10, 20, 30, 40, 50, 60, 70, 80]);
        let texture = decode(&bytes, true).unwrap();

        assert_eq!(texture.header.format, TextureFormat::RgbaUncompressed);
        assert_eq!(texture.mipmaps[0].data, vec![30, 20, 10, 40, 70, 60, 50, 80]);
    }

    #[test]
    fn test_uncompressed_mip_sizes() {
        let bytes = DdsBuilder::rgba(4, 2).mipmaps(3).build();
        let texture = decode(&bytes, true).unwrap();
        let sizes: Vec<usize> = texture.mipmaps.iter().map(|m| m.data.len()).collect();
        assert_eq!(sizes, vec![32, 8, 4]);
    }

    #[test]
    fn test_cubemap_faces_outer_levels_inner() {
        let bytes = DdsBuilder::new(8, 8, FOURCC_DXT1)
            .mipmaps(2)
            .caps2(Caps2::CUBEMAP | Caps2::ALL_FACES)
            .build();
        let texture = decode(&bytes, true).unwrap();

        assert!(texture.header.is_cubemap);
        assert_eq!(texture.mipmaps.len(), 12);
        for face in 0..6 {
            let chain = texture.face(face).unwrap();
            assert_eq!(chain[0].width, 8);
            assert_eq!(chain[1].width, 4);
            assert!(chain[0].data.iter().all(|&b| b == (face * 2) as u8));
            assert!(chain[1].data.iter().all(|&b| b == (face * 2 + 1) as u8));
        }
        let neg_z = texture.cube_face(CubeFace::NegativeZ).unwrap();
        assert!(neg_z[0].data.iter().all(|&b| b == 10));
    }

    #[test]
    fn test_incomplete_cubemap_rejected() {
        let faces = [
            Caps2::POSITIVE_X,
            Caps2::NEGATIVE_X,
            Caps2::POSITIVE_Y,
            Caps2::NEGATIVE_Y,
            Caps2::POSITIVE_Z,
            Caps2::NEGATIVE_Z,
        ];
        for missing in faces {
            let caps2 = (Caps2::CUBEMAP | Caps2::ALL_FACES).difference(missing);
            let bytes = DdsBuilder::new(4, 4, FOURCC_DXT1).caps2(caps2).build();
            assert!(matches!(decode(&bytes, true), Err(FormatError::IncompleteCubemap(_))));
        }
    }

    #[test]
    fn test_truncated_data_rejected() {
        let mut bytes = DdsBuilder::new(16, 16, FOURCC_DXT5).mipmaps(3).build();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(decode(&bytes, true), Err(FormatError::Truncated { .. })));

        assert!(matches!(decode(&bytes[..64], true), Err(FormatError::Truncated { .. })));
    }

    #[test]
    fn test_is_dds() {
        let bytes = DdsBuilder::new(4, 4, FOURCC_DXT1).build();
        assert!(is_dds(&bytes));
        assert!(!is_dds(b"\x89PNG"));
        assert!(!is_dds(b"DD"));
    }
}
