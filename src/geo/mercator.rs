use std::f64::consts::PI;

use crate::foundation::core::{Canvas, LngLat, Point};
use crate::geo::bounds::GeoBounds;
use crate::map::view::Camera;

/// Pixel size of the whole world at zoom 0.
pub const TILE_SIZE: f64 = 512.0;
/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;
/// Lowest supported camera zoom.
pub const MIN_ZOOM: f64 = 0.0;
/// Highest supported camera zoom.
pub const MAX_ZOOM: f64 = 22.0;
/// Zoom used when fitting bounds that collapse to a single point.
pub const MAX_FIT_ZOOM: f64 = 12.0;

const NARROW_VIEWPORT_PX: u32 = 768;

/// Screen-space insets (pixels) kept free when fitting bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Padding {
    /// Top inset.
    pub top: f64,
    /// Bottom inset.
    pub bottom: f64,
    /// Left inset.
    pub left: f64,
    /// Right inset.
    pub right: f64,
}

impl Padding {
    /// Same inset on every edge.
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            bottom: v,
            left: v,
            right: v,
        }
    }

    /// Insets for a viewport: wide viewports reserve the sidebar on the left, narrow ones use a
    /// small relative inset.
    pub fn for_viewport(viewport: Canvas) -> Self {
        if viewport.width >= NARROW_VIEWPORT_PX {
            Self {
                top: 80.0,
                bottom: 80.0,
                left: 420.0,
                right: 80.0,
            }
        } else {
            Self::uniform(f64::from(viewport.width.min(viewport.height)) * 0.08)
        }
    }
}

/// World size in pixels at `zoom`.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Wrap a longitude into `[-180, 180)`.
pub fn wrap_lng(lng: f64) -> f64 {
    let w = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if w == -180.0 && lng > 0.0 { 180.0 } else { w }
}

/// Project to unit Mercator space (`x` east, `y` south, both `0..1` inside the world square).
pub fn to_unit(p: LngLat) -> (f64, f64) {
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (p.lng + 180.0) / 360.0;
    let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0;
    (x, y)
}

/// Inverse of [`to_unit`]; the longitude is wrapped into range.
pub fn from_unit(x: f64, y: f64) -> LngLat {
    let lng = wrap_lng(x * 360.0 - 180.0);
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    LngLat::new(lng, lat)
}

/// Project `p` to viewport pixels, choosing the world copy nearest the camera.
pub fn project(camera: Camera, viewport: Canvas, p: LngLat) -> Point {
    let (cx, _) = to_unit(camera.center);
    let (mut x, _) = to_unit(p);
    x -= (x - cx).round();
    project_unit(camera, viewport, x, to_unit(p).1)
}

/// Project without choosing a world copy, for longitudes already unwrapped along a line.
pub fn project_unwrapped(camera: Camera, viewport: Canvas, p: LngLat) -> Point {
    let (x, y) = to_unit(p);
    project_unit(camera, viewport, x, y)
}

fn project_unit(camera: Camera, viewport: Canvas, x: f64, y: f64) -> Point {
    let (cx, cy) = to_unit(camera.center);
    let ws = world_size(camera.zoom);
    Point::new(
        (x - cx) * ws + f64::from(viewport.width) / 2.0,
        (y - cy) * ws + f64::from(viewport.height) / 2.0,
    )
}

/// Camera that shows `bounds` inside the padded viewport area.
pub fn fit_camera(bounds: GeoBounds, viewport: Canvas, padding: Padding, max_zoom: f64) -> Camera {
    let (wx, ny) = to_unit(LngLat::new(bounds.west, bounds.north));
    let (ex, sy) = to_unit(LngLat::new(bounds.east, bounds.south));
    let dx = (ex - wx).abs();
    let dy = (sy - ny).abs();

    let avail_w = (f64::from(viewport.width) - padding.left - padding.right).max(1.0);
    let avail_h = (f64::from(viewport.height) - padding.top - padding.bottom).max(1.0);

    let scale_x = if dx > f64::EPSILON {
        avail_w / (dx * TILE_SIZE)
    } else {
        f64::INFINITY
    };
    let scale_y = if dy > f64::EPSILON {
        avail_h / (dy * TILE_SIZE)
    } else {
        f64::INFINITY
    };
    let scale = scale_x.min(scale_y);
    let zoom = if scale.is_finite() {
        scale.log2().clamp(MIN_ZOOM, max_zoom)
    } else {
        max_zoom
    };

    // Shift the centre so the bounds sit in the middle of the padded area.
    let ws = world_size(zoom);
    let off_x = (padding.left - padding.right) / 2.0;
    let off_y = (padding.top - padding.bottom) / 2.0;
    let cx = (wx + ex) / 2.0 - off_x / ws;
    let cy = ((ny + sy) / 2.0 - off_y / ws).clamp(0.0, 1.0);

    Camera {
        center: from_unit(cx, cy),
        zoom,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geo/mercator.rs"]
mod tests;
