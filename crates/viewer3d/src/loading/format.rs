//! Geometry format detection and companion URL derivation

use std::fmt;

use serde::{Deserialize, Serialize};

/// Geometry file formats the viewer can dispatch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryFormat {
    /// Wavefront OBJ, with an optional MTL companion
    Obj,
    /// Autodesk FBX
    Fbx,
    /// COLLADA (`.dae`)
    Collada,
    /// Stereolithography
    Stl,
    /// Polygon file format
    Ply,
    /// glTF, text or binary (`.gltf` / `.glb`)
    Gltf,
}

impl GeometryFormat {
    /// Every known format
    pub const ALL: [Self; 6] = [Self::Obj, Self::Fbx, Self::Collada, Self::Stl, Self::Ply, Self::Gltf];

    /// Format for a file extension (case-insensitive, without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "obj" => Some(Self::Obj),
            "fbx" => Some(Self::Fbx),
            "dae" => Some(Self::Collada),
            "stl" => Some(Self::Stl),
            "ply" => Some(Self::Ply),
            "gltf" | "glb" => Some(Self::Gltf),
            _ => None,
        }
    }

    /// Format from the extension of a URL's last path segment
    pub fn from_url(url: &str) -> Option<Self> {
        extension(url).and_then(Self::from_extension)
    }

    /// Label shown while geometry of this format loads
    pub fn detail_label(self) -> &'static str {
        match self {
            Self::Obj => "OBJECTS",
            Self::Fbx => "FBX",
            Self::Collada => "COLLADA",
            Self::Stl => "STL",
            Self::Ply => "PLY",
            Self::Gltf => "GLTF",
        }
    }

    /// Whether a material library is fetched before the geometry
    pub fn has_material_library(self) -> bool {
        matches!(self, Self::Obj)
    }
}

impl fmt::Display for GeometryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.detail_label())
    }
}

/// Split a URL into path and its `?query#fragment` suffix
fn split_suffix(url: &str) -> (&str, &str) {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url.split_at(end)
}

/// Byte offset of the last path segment within `path`
fn last_segment_start(path: &str) -> usize {
    path.rfind('/').map_or(0, |i| i + 1)
}

/// Extension of the last path segment, without the dot
pub fn extension(url: &str) -> Option<&str> {
    let (path, _) = split_suffix(url);
    let segment = &path[last_segment_start(path)..];
    let dot = segment.rfind('.')?;
    Some(&segment[dot + 1..])
}

/// Material library URL for a geometry URL
///
/// Swaps the extension of the last path segment for `mtl` (or appends
/// `.mtl` when there is none). Query and fragment are kept.
pub fn derive_material_url(url: &str) -> String {
    let (path, suffix) = split_suffix(url);
    let start = last_segment_start(path);
    let stem = match path[start..].rfind('.') {
        Some(dot) => &path[..start + dot],
        None => path,
    };
    format!("{}.mtl{}", stem, suffix)
}

/// Directory part of a URL including the trailing `/`, empty if none
pub fn base_directory(url: &str) -> &str {
    let (path, _) = split_suffix(url);
    &path[..last_segment_start(path)]
}

/// Last path segment without query or fragment
pub fn file_name(url: &str) -> &str {
    let (path, _) = split_suffix(url);
    &path[last_segment_start(path)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_url() {
        assert_eq!(GeometryFormat::from_url("models/car.obj"), Some(GeometryFormat::Obj));
        assert_eq!(GeometryFormat::from_url("CAR.OBJ"), Some(GeometryFormat::Obj));
        assert_eq!(GeometryFormat::from_url("a/b.GLB?x=1"), Some(GeometryFormat::Gltf));
        assert_eq!(GeometryFormat::from_url("room.dae#top"), Some(GeometryFormat::Collada));
        assert_eq!(GeometryFormat::from_url("scene.xyz"), None);
        assert_eq!(GeometryFormat::from_url("models.v2/readme"), None);
        assert_eq!(GeometryFormat::from_url(""), None);
    }

    #[test]
    fn test_detail_labels() {
        assert_eq!(GeometryFormat::Obj.detail_label(), "OBJECTS");
        assert_eq!(GeometryFormat::Collada.to_string(), "COLLADA");
        assert!(GeometryFormat::Obj.has_material_library());
        assert!(GeometryFormat::ALL[1..].iter().all(|f| !f.has_material_library()));
    }

    #[test]
    fn test_derive_material_url() {
        assert_eq!(derive_material_url("car.obj"), "car.mtl");
        assert_eq!(derive_material_url("models/car.OBJ"), "models/car.mtl");
        assert_eq!(derive_material_url("https://x.org/m.v2/car.obj?t=1#a"), "https://x.org/m.v2/car.mtl?t=1#a");
        assert_eq!(derive_material_url("models.v2/car"), "models.v2/car.mtl");
    }

    #[test]
    fn test_base_directory_and_file_name() {
        assert_eq!(base_directory("models/car/car.mtl"), "models/car/");
        assert_eq!(base_directory("car.mtl?v=1"), "");
        assert_eq!(file_name("models/car/car.obj?v=1"), "car.obj");
    }
}
