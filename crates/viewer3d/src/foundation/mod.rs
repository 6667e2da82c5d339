//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types for colors, texture coordinates and camera vectors
//! - Handle-based collections for observer registration
//! - Logging setup

pub mod math;
pub mod collections;
pub mod logging;
