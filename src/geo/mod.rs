//! Geodesy: great-circle arcs, bounding boxes and Web Mercator math.

/// Geographic bounding boxes.
pub mod bounds;
/// Great-circle interpolation and per-leg arc computation.
pub mod great_circle;
/// Web Mercator projection and camera fitting.
pub mod mercator;
