//! Resolved material types
//!
//! The renderer-facing side of a material: Phong colors, shininess, opacity
//! and up to three texture maps. Only the diffuse/specular/bump/opacity/
//! shininess subset of the MTL model is represented.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::mtl_parser::{parse_float, RawValue};
use super::texture_params::TextureParams;
use crate::assets::textures::TextureData;
use crate::foundation::math::{Vec2, Vec3};

/// Which faces a material renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Front faces only
    #[default]
    Front,
    /// Back faces only
    Back,
    /// Both faces
    Double,
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wrap {
    /// Tile the texture
    #[default]
    Repeat,
    /// Clamp coordinates to the edge texels
    ClampToEdge,
    /// Tile with every other copy mirrored
    MirroredRepeat,
}

/// A texture bound to a material slot
#[derive(Debug, Clone, PartialEq)]
pub struct TextureMap {
    /// Resolved texture URL
    pub url: String,
    /// Texture coordinate scale (`-s`)
    pub repeat: Vec2,
    /// Texture coordinate offset (`-o`)
    pub offset: Vec2,
    /// Wrapping mode on both axes
    pub wrap: Wrap,
    /// Decoded payload, `None` when loading failed
    pub data: Option<TextureData>,
}

impl TextureMap {
    /// Whether the texture payload was loaded
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }
}

/// Shared texture map handle
pub type TextureHandle = Arc<TextureMap>;

/// Texture slots of a material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialMaps {
    /// Diffuse color map (`map_Kd`)
    pub diffuse: Option<TextureHandle>,
    /// Specular map (`map_Ks`)
    pub specular: Option<TextureHandle>,
    /// Bump map (`map_Bump` / `bump`)
    pub bump: Option<TextureHandle>,
}

impl MaterialMaps {
    /// Slot for a map kind
    pub fn slot(&self, kind: MapKind) -> Option<&TextureHandle> {
        match kind {
            MapKind::Diffuse => self.diffuse.as_ref(),
            MapKind::Specular => self.specular.as_ref(),
            MapKind::Bump => self.bump.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, kind: MapKind) -> &mut Option<TextureHandle> {
        match kind {
            MapKind::Diffuse => &mut self.diffuse,
            MapKind::Specular => &mut self.specular,
            MapKind::Bump => &mut self.bump,
        }
    }

    /// All bound maps
    pub fn iter(&self) -> impl Iterator<Item = (MapKind, &TextureHandle)> {
        MapKind::ALL
            .into_iter()
            .filter_map(move |kind| self.slot(kind).map(|handle| (kind, handle)))
    }
}

/// Texture slot kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// Diffuse color map
    Diffuse,
    /// Specular map
    Specular,
    /// Bump map
    Bump,
}

impl MapKind {
    /// Every slot kind
    pub const ALL: [Self; 3] = [Self::Diffuse, Self::Specular, Self::Bump];
}

/// Material ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMaterial {
    /// Material name
    pub name: String,
    /// Face culling side
    pub side: Side,
    /// Diffuse color (`Kd`), unset when absent or ignored
    pub color: Option<Vec3>,
    /// Specular color (`Ks`)
    pub specular: Option<Vec3>,
    /// Specular exponent (`Ns`)
    pub shininess: Option<f32>,
    /// Opacity, 1.0 unless `d` or `Tr` says otherwise
    pub opacity: f32,
    /// Whether the material needs blending
    pub transparent: bool,
    /// Bump scale from a `-bm` option
    pub bump_scale: Option<f32>,
    /// Texture maps
    pub maps: MaterialMaps,
}

impl ResolvedMaterial {
    /// Material with defaults and the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            side: Side::default(),
            color: None,
            specular: None,
            shininess: None,
            opacity: 1.0,
            transparent: false,
            bump_scale: None,
            maps: MaterialMaps::default(),
        }
    }
}

/// Shared material handle
pub type MaterialHandle = Arc<ResolvedMaterial>;

/// A raw property interpreted by key
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialProperty {
    /// RGB triple (`ka`, `kd`, `ks`)
    Color(Vec3),
    /// Scalar (`ns`, `d`, `tr`); NaN when unparsable
    Scalar(f32),
    /// Texture reference with its inline options
    Texture(MapKind, TextureParams),
    /// Any other key, carried verbatim
    Other(String),
}

impl MaterialProperty {
    /// Interpret a raw value according to its (lowercase) key
    pub fn from_raw(key: &str, value: &RawValue) -> Self {
        match (key, value) {
            (_, RawValue::Triple(rgb)) => Self::Color(*rgb),
            ("ns" | "d" | "tr", RawValue::Text(text)) => Self::Scalar(parse_float(text)),
            ("map_kd", RawValue::Text(text)) => Self::Texture(MapKind::Diffuse, TextureParams::parse(text)),
            ("map_ks", RawValue::Text(text)) => Self::Texture(MapKind::Specular, TextureParams::parse(text)),
            ("map_bump" | "bump", RawValue::Text(text)) => Self::Texture(MapKind::Bump, TextureParams::parse(text)),
            (_, RawValue::Text(text)) => Self::Other(text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_typing() {
        assert_eq!(
            MaterialProperty::from_raw("kd", &RawValue::Triple(Vec3::new(1.0, 0.0, 0.0))),
            MaterialProperty::Color(Vec3::new(1.0, 0.0, 0.0))
        );
        assert_eq!(
            MaterialProperty::from_raw("ns", &RawValue::Text("96.0".into())),
            MaterialProperty::Scalar(96.0)
        );
        assert!(matches!(
            MaterialProperty::from_raw("bump", &RawValue::Text("-bm 2 n.png".into())),
            MaterialProperty::Texture(MapKind::Bump, TextureParams { ref url, bump_scale: Some(s), .. }) if url == "n.png" && s == 2.0
        ));
        assert_eq!(
            MaterialProperty::from_raw("illum", &RawValue::Text("2".into())),
            MaterialProperty::Other("2".into())
        );
    }

    #[test]
    fn test_unparsable_scalar_is_nan() {
        match MaterialProperty::from_raw("d", &RawValue::Text("opaque".into())) {
            MaterialProperty::Scalar(v) => assert!(v.is_nan()),
            other => panic!("Expected scalar, got {:?}", other),
        }
    }

    #[test]
    fn test_maps_iter() {
        let mut maps = MaterialMaps::default();
        *maps.slot_mut(MapKind::Bump) = Some(Arc::new(TextureMap {
            url: "b.png".into(),
            repeat: Vec2::new(1.0, 1.0),
            offset: Vec2::zeros(),
            wrap: Wrap::Repeat,
            data: None,
        }));
        let kinds: Vec<MapKind> = maps.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![MapKind::Bump]);
        assert!(!maps.bump.as_ref().unwrap().is_loaded());
    }
}
