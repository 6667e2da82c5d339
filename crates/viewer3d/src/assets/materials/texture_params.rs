//! Inline options of MTL texture statements
//!
//! A map statement may prefix the file name with options, e.g.
//! `map_Kd -s 2 2 1 -o 0.5 0 0 textures/brick.dds`. Supported options:
//!
//! - `-bm <scale>`: bump multiplier, 2 tokens
//! - `-s <u> <v> <w>`: texture coordinate scale, 4 tokens, `w` ignored
//! - `-o <u> <v> <w>`: texture coordinate offset, 4 tokens, `w` ignored
//!
//! Whatever remains, joined by single spaces, is the texture URL.

use super::mtl_parser::parse_float;
use crate::foundation::math::Vec2;

/// Parsed texture statement
#[derive(Debug, Clone, PartialEq)]
pub struct TextureParams {
    /// Texture URL as written (not yet resolved against a base)
    pub url: String,
    /// Coordinate scale, (1, 1) by default
    pub scale: Vec2,
    /// Coordinate offset, (0, 0) by default
    pub offset: Vec2,
    /// Bump multiplier if `-bm` was given
    pub bump_scale: Option<f32>,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            url: String::new(),
            scale: Vec2::new(1.0, 1.0),
            offset: Vec2::zeros(),
            bump_scale: None,
        }
    }
}

impl TextureParams {
    /// Parse a texture statement value
    pub fn parse(value: &str) -> Self {
        let mut items: Vec<&str> = value.split_whitespace().collect();
        let mut params = Self::default();

        if let Some(args) = take_option(&mut items, "-bm", 2) {
            params.bump_scale = Some(parse_arg(&args, 1));
        }

        if let Some(args) = take_option(&mut items, "-s", 4) {
            params.scale = Vec2::new(parse_arg(&args, 1), parse_arg(&args, 2));
        }

        if let Some(args) = take_option(&mut items, "-o", 4) {
            params.offset = Vec2::new(parse_arg(&args, 1), parse_arg(&args, 2));
        }

        params.url = items.join(" ");
        params
    }
}

/// Remove the first occurrence of `flag` and up to `len - 1` following
/// tokens, returning the removed tokens
fn take_option<'a>(items: &mut Vec<&'a str>, flag: &str, len: usize) -> Option<Vec<&'a str>> {
    let pos = items.iter().position(|item| *item == flag)?;
    let end = (pos + len).min(items.len());
    Some(items.drain(pos..end).collect())
}

fn parse_arg(args: &[&str], index: usize) -> f32 {
    args.get(index).map_or(f32::NAN, |token| parse_float(token))
}
