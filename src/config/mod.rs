//! Configuration module for page inspection
//!
//! This module provides the `InspectConfig` struct and its builder. Every
//! delay and limit the engine uses comes from here, so tests and the CLI can
//! shorten or widen them without touching the extractors.

pub mod builder;
pub mod getters;
pub mod types;

pub use builder::InspectConfigBuilder;
pub use types::InspectConfig;
