//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers live here with:
//! - Units (world units, degrees, pixels, clock units, RGBA)
//! - Documented ranges and meanings
//! - Defaults matching the tuned look of each regime

mod camera;
mod lighting;
mod render;
mod waves;

pub use camera::CameraDefaults;
pub use lighting::LightingParams;
pub use render::{RenderConfig, TickConfig};
pub use waves::WaveRanges;
