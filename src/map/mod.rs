//! Mapping collaborator seam and the bundled headless implementation.

/// Software basemap used by the CLI and tests.
pub mod headless;
/// The [`view::MapView`] trait and its value types.
pub mod view;
