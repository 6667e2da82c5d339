//! Material resolver
//!
//! Converts raw MTL descriptors into [`ResolvedMaterial`]s, loading the
//! texture maps they reference through a [`TextureLoader`]. Materials are
//! built lazily on first lookup and cached by name until the next
//! [`MaterialResolver::set_materials`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::material::{
    MapKind, MaterialHandle, MaterialProperty, ResolvedMaterial, Side, TextureMap, Wrap,
};
use super::mtl_parser::{MtlLibrary, RawValue};
use super::texture_params::TextureParams;
use crate::assets::textures::TextureLoader;

/// How descriptors are turned into materials
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialOptions {
    /// Face side applied to every material
    pub side: Side,
    /// Wrapping applied to every texture map
    pub wrap: Wrap,
    /// Colors are 0-255 and need dividing by 255
    pub normalize_rgb: bool,
    /// Drop `Ka`/`Kd`/`Ks` values that are all zero
    pub ignore_zero_rgbs: bool,
    /// Base for texture URLs; defaults to the material file's directory
    pub texture_path: Option<String>,
}

impl MaterialOptions {
    /// Set the face side
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Set texture wrapping
    pub fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    /// Divide colors by 255
    pub fn with_normalize_rgb(mut self, enabled: bool) -> Self {
        self.normalize_rgb = enabled;
        self
    }

    /// Ignore all-zero colors
    pub fn with_ignore_zero_rgbs(mut self, enabled: bool) -> Self {
        self.ignore_zero_rgbs = enabled;
        self
    }

    /// Override the texture base path
    pub fn with_texture_path(mut self, path: impl Into<String>) -> Self {
        self.texture_path = Some(path.into());
        self
    }
}

/// Builds and caches materials for one material library
pub struct MaterialResolver {
    base_url: String,
    options: MaterialOptions,
    library: MtlLibrary,
    materials: HashMap<String, MaterialHandle>,
    materials_array: Vec<MaterialHandle>,
    name_lookup: HashMap<String, usize>,
    texture_loader: Box<dyn TextureLoader>,
    texture_requests: usize,
}

impl MaterialResolver {
    /// Create a resolver loading textures through `texture_loader`
    pub fn new(texture_loader: Box<dyn TextureLoader>) -> Self {
        Self {
            base_url: String::new(),
            options: MaterialOptions::default(),
            library: MtlLibrary::new(),
            materials: HashMap::new(),
            materials_array: Vec::new(),
            name_lookup: HashMap::new(),
            texture_loader,
            texture_requests: 0,
        }
    }

    /// Set the texture base URL and conversion options
    ///
    /// Takes effect for descriptors passed to the next
    /// [`set_materials`](Self::set_materials) call.
    pub fn configure(&mut self, base_url: impl Into<String>, options: MaterialOptions) {
        self.base_url = base_url.into();
        self.options = options;
    }

    /// Resolve texture URLs against `path` instead of the material directory
    pub fn set_texture_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.base_url.clone_from(&path);
        self.options.texture_path = Some(path);
    }

    /// Base URL textures are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current options
    pub fn options(&self) -> &MaterialOptions {
        &self.options
    }

    /// Replace the descriptors and drop every cached material
    pub fn set_materials(&mut self, library: MtlLibrary) {
        self.library = self.convert(library);
        self.materials.clear();
        self.materials_array.clear();
        self.name_lookup.clear();
    }

    /// Resolve every material now
    pub fn preload(&mut self) {
        let names: Vec<String> = self.library.names().map(str::to_string).collect();
        for name in names {
            self.resolve(&name);
        }
    }

    /// Resolve every material in library order and record their indices
    pub fn resolve_all(&mut self) -> &[MaterialHandle] {
        let names: Vec<String> = self.library.names().map(str::to_string).collect();
        self.materials_array.clear();
        self.name_lookup.clear();
        for name in names {
            if let Some(material) = self.resolve(&name) {
                self.name_lookup.insert(name, self.materials_array.len());
                self.materials_array.push(material);
            }
        }
        &self.materials_array
    }

    /// Index of a material in the last [`resolve_all`](Self::resolve_all) result
    pub fn get_index(&self, name: &str) -> Option<usize> {
        self.name_lookup.get(name).copied()
    }

    /// Material by name, built on first access
    ///
    /// Returns `None` when the library has no material of that name.
    pub fn resolve(&mut self, name: &str) -> Option<MaterialHandle> {
        if let Some(material) = self.materials.get(name) {
            return Some(Arc::clone(material));
        }

        let material = Arc::new(self.create_material(name)?);
        self.materials.insert(name.to_string(), Arc::clone(&material));
        Some(material)
    }

    /// Cached material without building it
    pub fn get_cached(&self, name: &str) -> Option<MaterialHandle> {
        self.materials.get(name).cloned()
    }

    /// Names in library order
    pub fn material_names(&self) -> impl Iterator<Item = &str> {
        self.library.names()
    }

    /// Number of descriptors
    pub fn len(&self) -> usize {
        self.library.len()
    }

    /// Whether there are no descriptors
    pub fn is_empty(&self) -> bool {
        self.library.is_empty()
    }

    /// Texture loads issued since creation
    pub fn texture_requests(&self) -> usize {
        self.texture_requests
    }

    /// Apply `normalize_rgb` and `ignore_zero_rgbs` to the color triples
    fn convert(&self, mut library: MtlLibrary) -> MtlLibrary {
        if !self.options.normalize_rgb && !self.options.ignore_zero_rgbs {
            return library;
        }

        for descriptor in library.iter_mut() {
            let properties = descriptor.properties_mut();
            properties.retain_mut(|(key, value)| {
                if !matches!(key.as_str(), "ka" | "kd" | "ks") {
                    return true;
                }
                let RawValue::Triple(rgb) = value else {
                    return true;
                };
                if self.options.normalize_rgb {
                    *rgb /= 255.0;
                }
                !(self.options.ignore_zero_rgbs && rgb.iter().all(|&c| c == 0.0))
            });
        }

        library
    }

    fn create_material(&mut self, name: &str) -> Option<ResolvedMaterial> {
        let descriptor = self.library.get(name)?.clone();
        let mut material = ResolvedMaterial::new(name);
        material.side = self.options.side;

        for (key, raw) in descriptor.properties() {
            if matches!(raw, RawValue::Text(text) if text.is_empty()) {
                continue;
            }

            match (key, MaterialProperty::from_raw(key, raw)) {
                ("kd", MaterialProperty::Color(rgb)) => material.color = Some(rgb),
                ("ks", MaterialProperty::Color(rgb)) => material.specular = Some(rgb),
                ("ns", MaterialProperty::Scalar(value)) => material.shininess = Some(value),
                ("d", MaterialProperty::Scalar(value)) => {
                    if value < 1.0 {
                        material.opacity = value;
                        material.transparent = true;
                    }
                }
                ("tr", MaterialProperty::Scalar(value)) => {
                    if value > 0.0 {
                        material.opacity = 1.0 - value;
                        material.transparent = true;
                    }
                }
                (_, MaterialProperty::Texture(kind, params)) => {
                    self.set_map_for_type(&mut material, kind, params);
                }
                _ => {}
            }
        }

        log::debug!(
            "Resolved material '{}' (opacity {}, {} map(s))",
            material.name,
            material.opacity,
            material.maps.iter().count()
        );
        Some(material)
    }

    /// Bind a texture to a slot unless the slot is already taken
    fn set_map_for_type(&mut self, material: &mut ResolvedMaterial, kind: MapKind, params: TextureParams) {
        if material.maps.slot_mut(kind).is_some() {
            log::trace!("Material '{}' already has a {:?} map, ignoring {}", material.name, kind, params.url);
            return;
        }

        if let Some(scale) = params.bump_scale {
            material.bump_scale = Some(scale);
        }

        let url = resolve_url(&self.base_url, &params.url);
        let data = if url.is_empty() {
            log::warn!("Material '{}' has an empty {:?} map reference", material.name, kind);
            None
        } else {
            self.texture_requests += 1;
            match self.texture_loader.load(&url) {
                Ok(data) => Some(data),
                Err(e) => {
                    log::warn!("Failed to load {:?} map {} for material '{}': {}", kind, url, material.name, e);
                    None
                }
            }
        };

        *material.maps.slot_mut(kind) = Some(Arc::new(TextureMap {
            url,
            repeat: params.scale,
            offset: params.offset,
            wrap: self.options.wrap,
            data,
        }));
    }
}

/// Resolve a texture URL against a base URL
///
/// Absolute `http://` / `https://` URLs (any case) are returned unchanged;
/// anything else is appended to `base_url`.
pub fn resolve_url(base_url: &str, url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    if is_absolute_url(url) {
        return url.to_string();
    }

    format!("{}{}", base_url, url)
}

fn is_absolute_url(url: &str) -> bool {
    let bytes = url.as_bytes();
    let starts_with = |prefix: &[u8]| bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix);
    starts_with(b"http://") || starts_with(b"https://")
}
