//! The `PageReport` value and the types it is built from.

pub mod fixed;
pub mod schema;

pub use fixed::Fixed;
pub use schema::{DetectedService, DetectedServices, PageReport, SpeedProfile, TopImage};
