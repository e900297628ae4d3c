//! CPU rasterization glue around `vello_cpu`.

/// Frame buffers, pixmap conversion and path helpers.
pub mod raster;
