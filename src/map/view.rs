use crate::foundation::core::{Canvas, LngLat, Point, Rgba8};
use crate::foundation::error::FlyPathResult;
use crate::foundation::math::lerp;
use crate::geo::bounds::GeoBounds;
use crate::geo::mercator::{self, MAX_FIT_ZOOM, Padding};
use crate::render::raster::FrameRGBA;
use crate::settings::{LineStyle, MapStyle};

/// Camera pose: centre and zoom level.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Camera {
    /// Geographic centre of the viewport.
    pub center: LngLat,
    /// Web Mercator zoom level.
    pub zoom: f64,
}

impl Camera {
    /// Interpolate centre and zoom linearly by `t`.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        Self {
            center: self.center.lerp(to.center, t),
            zoom: lerp(self.zoom, to.zoom, t),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: LngLat::new(15.0, 50.0),
            zoom: 3.0,
        }
    }
}

/// Paint properties of the route line layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoutePaint {
    /// Line colour.
    pub color: Rgba8,
    /// Dash pattern.
    pub line_style: LineStyle,
    /// Stroke width in viewport pixels.
    pub width_px: f64,
}

/// Handle of a marker placed on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

/// What the animator and compositor need from the mapping engine.
///
/// Implementations own camera state, layer data and marker placement. Rendering the basemap is
/// entirely their business; the compositor only asks for [`MapView::snapshot`].
pub trait MapView {
    /// Whether the view has finished loading and accepts camera/layer updates.
    fn is_ready(&self) -> bool;

    /// Viewport size in pixels.
    fn viewport(&self) -> Canvas;

    /// Current camera pose.
    fn camera(&self) -> Camera;

    /// Jump the camera to `camera`.
    fn set_camera(&mut self, camera: Camera);

    /// Camera that frames `bounds` inside `padding`.
    fn fit_camera(&self, bounds: GeoBounds, padding: Padding) -> Camera {
        mercator::fit_camera(bounds, self.viewport(), padding, MAX_FIT_ZOOM)
    }

    /// Replace the route line geometry (one polyline per entry).
    fn set_route(&mut self, lines: Vec<Vec<LngLat>>);

    /// Update route paint properties.
    fn set_route_paint(&mut self, paint: RoutePaint);

    /// Switch the basemap style.
    fn set_map_style(&mut self, style: MapStyle);

    /// Place a marker and return its handle.
    fn add_marker(&mut self, at: LngLat) -> MarkerId;

    /// Move an existing marker. Unknown ids are ignored.
    fn move_marker(&mut self, id: MarkerId, at: LngLat);

    /// Remove a marker. Unknown ids are ignored.
    fn remove_marker(&mut self, id: MarkerId);

    /// Current marker position, if the marker exists.
    fn marker_position(&self, id: MarkerId) -> Option<LngLat>;

    /// Project a coordinate to viewport pixels.
    fn project(&self, at: LngLat) -> Point {
        mercator::project(self.camera(), self.viewport(), at)
    }

    /// Rasterize the current view (basemap plus layers, without markers).
    fn snapshot(&mut self) -> FlyPathResult<FrameRGBA>;
}
