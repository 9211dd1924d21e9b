//! Obligo Core — error type, configuration, data directory layout.

pub mod config;
pub mod error;

pub use config::{DataPaths, DetectionConfig, ObligoConfig};
pub use error::{Error, Result};
