//! Geometry decoders
//!
//! One decoder per [`GeometryFormat`]. The orchestrator owns a
//! [`GeometryDecoders`] registry and hands each fetched payload to the
//! decoder registered for the session's format.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::materials::MaterialResolver;
use super::obj_loader::{ObjDecoder, ObjError};
use crate::loading::format::GeometryFormat;
use crate::scene::SceneObject;

/// Geometry decoding errors
#[derive(Error, Debug)]
pub enum GeometryError {
    /// OBJ content was rejected
    #[error("OBJ decode failed: {0}")]
    Obj(#[from] ObjError),

    /// Any other decoder failure
    #[error("Invalid geometry: {0}")]
    Invalid(String),
}

/// Turns fetched bytes into a scene object
pub trait GeometryDecoder {
    /// Decode `bytes` fetched from `url`
    ///
    /// `materials` is the resolver for the companion material library, if
    /// the format has one and it loaded.
    fn decode(
        &self,
        bytes: &[u8],
        url: &str,
        materials: Option<&mut MaterialResolver>,
    ) -> Result<SceneObject, GeometryError>;
}

/// Decoders keyed by format
#[derive(Default)]
pub struct GeometryDecoders {
    decoders: HashMap<GeometryFormat, Box<dyn GeometryDecoder>>,
}

impl GeometryDecoders {
    /// Registry without any decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the decoders this crate ships (OBJ)
    pub fn with_defaults() -> Self {
        Self::new().with(GeometryFormat::Obj, Box::new(ObjDecoder))
    }

    /// Register a decoder (builder pattern)
    pub fn with(mut self, format: GeometryFormat, decoder: Box<dyn GeometryDecoder>) -> Self {
        self.register(format, decoder);
        self
    }

    /// Register or replace the decoder for a format
    pub fn register(&mut self, format: GeometryFormat, decoder: Box<dyn GeometryDecoder>) {
        self.decoders.insert(format, decoder);
    }

    /// Decoder for a format
    pub fn get(&self, format: GeometryFormat) -> Option<&dyn GeometryDecoder> {
        self.decoders.get(&format).map(AsRef::as_ref)
    }

    /// Whether a decoder is registered for the format
    pub fn supports(&self, format: GeometryFormat) -> bool {
        self.decoders.contains_key(&format)
    }
}

impl fmt::Debug for GeometryDecoders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats: Vec<GeometryFormat> = self.decoders.keys().copied().collect();
        formats.sort_by_key(|format| format.detail_label());
        f.debug_struct("GeometryDecoders").field("formats", &formats).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyDecoder;

    impl GeometryDecoder for EmptyDecoder {
        fn decode(&self, _: &[u8], url: &str, _: Option<&mut MaterialResolver>) -> Result<SceneObject, GeometryError> {
            Ok(SceneObject::new(url))
        }
    }

    #[test]
    fn test_registry() {
        let mut decoders = GeometryDecoders::with_defaults();
        assert!(decoders.supports(GeometryFormat::Obj));
        assert!(!decoders.supports(GeometryFormat::Stl));

        decoders.register(GeometryFormat::Stl, Box::new(EmptyDecoder));
        let object = decoders.get(GeometryFormat::Stl).unwrap().decode(b"", "part.stl", None).unwrap();
        assert_eq!(object.name, "part.stl");
    }

    #[test]
    fn test_obj_errors_convert() {
        let decoders = GeometryDecoders::with_defaults();
        let result = decoders.get(GeometryFormat::Obj).unwrap().decode(b"# nothing\n", "empty.obj", None);
        assert!(matches!(result, Err(GeometryError::Obj(ObjError::InvalidFormat(_)))));
    }
}
