//! # viewer3d
//!
//! Asset decoding and load orchestration for an embeddable 3D model viewer.
//!
//! ## Features
//!
//! - **DDS Decoding**: DXT1/DXT3/DXT5/ETC1 and uncompressed RGBA surfaces,
//!   mip chains and cubemaps
//! - **MTL Materials**: Forgiving parser plus a resolver that loads the
//!   referenced texture maps
//! - **Load Orchestration**: Materials-then-geometry state machine with
//!   observable progress, stale-result cancellation and optional retry
//! - **OBJ Geometry**: Stock decoder binding mesh groups to resolved materials
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use viewer3d::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ViewerConfig::default();
//!     let source = FileSource::new("assets");
//!     let textures = SourceTextureLoader::new(source.clone()).with_mipmaps(config.loader.load_mipmaps);
//!
//!     let mut orchestrator = LoadOrchestrator::new(&config, GeometryDecoders::with_defaults(), Box::new(textures));
//!     let (mut scene, mut camera) = (SceneGraph::new(), ViewCamera::default());
//!     let phase = orchestrator.run_blocking("models/car.obj", &source, &mut ViewerContext::new(&mut scene, &mut camera))?;
//!
//!     println!("{} object(s) loaded, phase {}", scene.len(), phase);
//!     Ok(())
//! }
//! ```

pub mod core;

pub mod assets;
pub mod config;
pub mod foundation;
pub mod loading;
pub mod scene;

/// Common imports for viewer users
pub mod prelude {
    pub use crate::{
        assets::{
            materials::{MaterialOptions, MaterialResolver, MtlParser, ResolvedMaterial, Side, Wrap},
            textures::{decode as decode_dds, FormatError, NullTextureLoader, SourceTextureLoader, TextureData, TextureLoader},
            GeometryDecoder, GeometryDecoders, ObjDecoder,
        },
        config::Config,
        core::config::{CameraConfig, EngineConfig, FrameTarget, LoaderConfig, ViewerConfig},
        foundation::math::Vec3,
        loading::{
            ByteSource, FetchEvent, FetchRequest, FileSource, LoadEvent, LoadOrchestrator, LoadPhase, MemorySource,
            RetryPolicy, ViewerContext,
        },
        scene::{CameraRig, Scene, SceneGraph, SceneObject, ViewCamera},
    };
}
