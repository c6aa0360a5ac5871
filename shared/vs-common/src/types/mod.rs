//! Shared Types

mod quality;
mod viewer;

pub use quality::{ParseTierError, QualityTier};
pub use viewer::{Viewer, ViewerRole};
