//! Core viewer types

pub mod config;

pub use config::{CameraConfig, EngineConfig, FrameTarget, LoaderConfig, ViewerConfig};
