//! FlyPath renders animated fly-throughs of travel routes.
//!
//! A route is an ordered list of destinations joined by great-circle arcs. The public API is
//! tick-driven and deterministic:
//!
//! - Build a [`DestinationList`] and a [`SettingsStore`]
//! - Drive a [`RouteAnimator`] over a [`MapView`] (the bundled [`HeadlessMap`] or your own)
//! - Record a run with an [`ExportSession`] into MP4/GIF (or the raw capture container)
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

/// Timed phases, control flags and frame clocks.
pub mod animation;
/// Route choreography.
pub mod animator;
/// Export-time frame assembly.
pub mod compositor;
/// Capture sinks and transcoders.
pub mod encode;
/// Export state and driver.
pub mod export;
/// Place search boundary.
pub mod geocode;
/// Geodesy helpers.
pub mod geo;
/// Map view seam.
pub mod map;
/// Destinations.
pub mod model;
/// CPU raster glue.
pub mod render;
/// Live animation settings.
pub mod settings;
/// Share-link encoding.
pub mod share;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, LngLat, Point, Rgba8, Vec2};
pub use crate::foundation::error::{FlyPathError, FlyPathResult};

pub use crate::animation::clock::{FixedStepClock, FrameClock};
pub use crate::animation::control::AnimationControl;
pub use crate::animator::{AnimatorPhase, RouteAnimator, RunOutcome};
pub use crate::compositor::{Compositor, Resolution};
pub use crate::encode::ffmpeg::FfmpegTranscoder;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::transcode::{ArtifactFormat, DeliveryFormat, TranscodeRequest, Transcoder};
pub use crate::export::{
    ExportArtifact, ExportJob, ExportOptions, ExportSession, ExportState, ExportStatus,
    ExporterConfig,
};
pub use crate::geocode::{Gazetteer, Geocoder, SearchResult};
pub use crate::map::headless::HeadlessMap;
pub use crate::map::view::{Camera, MapView, MarkerId, RoutePaint};
pub use crate::model::destination::{Destination, DestinationList};
pub use crate::render::raster::FrameRGBA;
pub use crate::settings::{AnimationSettings, LineStyle, MapStyle, SettingChange, SettingsStore};
pub use crate::share::{RouteDocument, decode_token, document_from_url, encode_token, share_url};
