//! Export-time frame assembly: the map snapshot plus badges, indicator and watermark.

/// Frame compositor and output resolutions.
pub mod frame;
/// Text sprites rasterized through `usvg`/`resvg`.
pub mod text;

pub use frame::{Compositor, Resolution};
