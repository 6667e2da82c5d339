//! MTL (Material Template Library) file parser
//!
//! Turns Wavefront .mtl text into raw per-material property sets. The parser
//! is a forgiving line scanner: it never fails. Unknown keys are carried
//! through as text, malformed color components become NaN, and properties
//! before the first `newmtl` are dropped. Interpretation of the values is
//! left to [`MaterialResolver`](super::MaterialResolver).

use std::collections::HashMap;

use crate::foundation::math::Vec3;

/// Raw property value as scanned from the file
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Three floats (`ka`, `kd`, `ks`); unparsable components are NaN
    Triple(Vec3),
    /// Trimmed remainder of the line
    Text(String),
}

impl RawValue {
    /// The triple, if this is one
    pub fn as_triple(&self) -> Option<Vec3> {
        match self {
            Self::Triple(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// The text, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Triple(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

/// One material block: everything between a `newmtl` and the next one
///
/// Properties keep source order, repeated keys included, so consumers can
/// choose between first-wins and last-wins per key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialDescriptor {
    /// Material name as written after `newmtl`
    pub name: String,
    properties: Vec<(String, RawValue)>,
}

impl MaterialDescriptor {
    /// Create an empty descriptor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Append a property; `key` is lowercased
    pub fn push(&mut self, key: &str, value: RawValue) {
        self.properties.push((key.to_ascii_lowercase(), value));
    }

    /// Last value recorded for `key` (case-insensitive)
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        let key = key.to_ascii_lowercase();
        self.properties
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// All properties in source order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mutable access to all properties in source order
    pub(crate) fn properties_mut(&mut self) -> &mut Vec<(String, RawValue)> {
        &mut self.properties
    }

    /// Number of recorded properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties were recorded
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Parsed materials in order of first appearance
///
/// A repeated `newmtl` name replaces the earlier descriptor but keeps its
/// position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MtlLibrary {
    descriptors: Vec<MaterialDescriptor>,
    index: HashMap<String, usize>,
}

impl MtlLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, replacing any with the same name
    pub fn insert(&mut self, descriptor: MaterialDescriptor) {
        if let Some(&i) = self.index.get(&descriptor.name) {
            self.descriptors[i] = descriptor;
        } else {
            self.index.insert(descriptor.name.clone(), self.descriptors.len());
            self.descriptors.push(descriptor);
        }
    }

    /// Descriptor by exact name
    pub fn get(&self, name: &str) -> Option<&MaterialDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// Descriptors in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = &MaterialDescriptor> {
        self.descriptors.iter()
    }

    /// Mutable descriptors in order of first appearance
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut MaterialDescriptor> {
        self.descriptors.iter_mut()
    }

    /// Material names in order of first appearance
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.name.as_str())
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL file contents into a library of raw descriptors
    ///
    /// # Arguments
    /// * `contents` - The text contents of the MTL file
    ///
    /// # Returns
    /// Every material block in the file, in order of first appearance
    pub fn parse(contents: &str) -> MtlLibrary {
        let mut library = MtlLibrary::new();
        let mut current: Option<MaterialDescriptor> = None;

        for line in contents.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.find(char::is_whitespace) {
                Some(pos) => (&line[..pos], line[pos..].trim()),
                None => (line, ""),
            };
            let key = key.to_ascii_lowercase();

            if key == "newmtl" {
                if let Some(done) = current.take() {
                    library.insert(done);
                }
                current = Some(MaterialDescriptor::new(value));
                continue;
            }

            let Some(material) = current.as_mut() else {
                log::trace!("Ignoring '{}' outside of any material", key);
                continue;
            };

            let raw = match key.as_str() {
                "ka" | "kd" | "ks" => RawValue::Triple(Self::parse_triple(value)),
                _ => RawValue::Text(value.to_string()),
            };
            material.push(&key, raw);
        }

        if let Some(done) = current {
            library.insert(done);
        }

        log::debug!("Parsed {} material(s)", library.len());
        library
    }

    /// Parse three whitespace separated floats; missing or bad ones are NaN
    fn parse_triple(value: &str) -> Vec3 {
        let mut tokens = value.split_whitespace();
        let mut next = || parse_float(tokens.next().unwrap_or(""));
        let r = next();
        let g = next();
        let b = next();
        Vec3::new(r, g, b)
    }
}

/// Parse the first whitespace separated token as a float, NaN on failure
pub fn parse_float(value: &str) -> f32 {
    value
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<f32>().ok())
        .unwrap_or(f32::NAN)
}
