use std::collections::BTreeMap;

use crate::foundation::core::{Canvas, LngLat, Point};
use crate::foundation::error::FlyPathResult;
use crate::geo::mercator;
use crate::map::view::{Camera, MapView, MarkerId, RoutePaint};
use crate::render::raster::{
    FrameRGBA, RenderScratch, color_to_cpu, dash_polyline, dims_u16, frame_from_pixmap,
    polyline_path,
};
use crate::settings::{AnimationSettings, MapStyle};

const GRATICULE_STEP_DEG: f64 = 15.0;
const GRATICULE_WIDTH_PX: f64 = 1.0;

/// In-memory [`MapView`] that rasterizes a flat basemap with `vello_cpu`.
///
/// The basemap is a style-coloured background with a graticule; the route layer is drawn on top
/// with the current [`RoutePaint`]. Markers are tracked but not drawn.
pub struct HeadlessMap {
    viewport: Canvas,
    ready: bool,
    camera: Camera,
    style: MapStyle,
    paint: RoutePaint,
    route: Vec<Vec<LngLat>>,
    markers: BTreeMap<MarkerId, LngLat>,
    next_marker: u64,
    scratch: RenderScratch,
}

impl HeadlessMap {
    /// Create a ready view of `viewport` pixels with the default camera.
    pub fn new(viewport: Canvas) -> Self {
        let defaults = AnimationSettings::default();
        Self {
            viewport,
            ready: true,
            camera: Camera::default(),
            style: defaults.map_style,
            paint: defaults.route_paint(),
            route: Vec::new(),
            markers: BTreeMap::new(),
            next_marker: 0,
            scratch: RenderScratch::default(),
        }
    }

    /// Mark the view loaded or not (a view that is not ready refuses to animate).
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Current route geometry.
    pub fn route(&self) -> &[Vec<LngLat>] {
        &self.route
    }

    /// Current route paint.
    pub fn route_paint(&self) -> RoutePaint {
        self.paint
    }

    /// Current basemap style.
    pub fn map_style(&self) -> MapStyle {
        self.style
    }

    /// Number of live markers.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn graticule(&self) -> Vec<Vec<Point>> {
        let (w, h) = (
            f64::from(self.viewport.width),
            f64::from(self.viewport.height),
        );
        let mut lines = Vec::new();

        let mut lng = -180.0;
        while lng < 180.0 {
            let top = mercator::project(self.camera, self.viewport, LngLat::new(lng, 85.0));
            let x = top.x;
            if (0.0..=w).contains(&x) {
                let bottom =
                    mercator::project(self.camera, self.viewport, LngLat::new(lng, -85.0));
                lines.push(vec![Point::new(x, top.y), Point::new(x, bottom.y)]);
            }
            lng += GRATICULE_STEP_DEG;
        }

        let mut lat = -75.0;
        while lat <= 75.0 {
            let y = mercator::project(self.camera, self.viewport, LngLat::new(0.0, lat)).y;
            if (0.0..=h).contains(&y) {
                lines.push(vec![Point::new(0.0, y), Point::new(w, y)]);
            }
            lat += GRATICULE_STEP_DEG;
        }
        lines
    }

    /// Route lines in viewport pixels, unwrapped so antimeridian crossings stay continuous.
    fn projected_route(&self) -> Vec<Vec<Point>> {
        self.route
            .iter()
            .filter(|line| line.len() >= 2)
            .map(|line| {
                let mut prev = line[0].lng;
                let unwrapped: Vec<LngLat> = line
                    .iter()
                    .map(|p| {
                        let mut lng = p.lng;
                        while lng - prev > 180.0 {
                            lng -= 360.0;
                        }
                        while lng - prev < -180.0 {
                            lng += 360.0;
                        }
                        prev = lng;
                        LngLat::new(lng, p.lat)
                    })
                    .collect();
                // Pick the world copy whose start lies nearest the camera.
                let shift = ((self.camera.center.lng - unwrapped[0].lng) / 360.0).round() * 360.0;
                unwrapped
                    .into_iter()
                    .map(|p| {
                        mercator::project_unwrapped(
                            self.camera,
                            self.viewport,
                            LngLat::new(p.lng + shift, p.lat),
                        )
                    })
                    .collect()
            })
            .collect()
    }
}

impl MapView for HeadlessMap {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn viewport(&self) -> Canvas {
        self.viewport
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn set_camera(&mut self, camera: Camera) {
        self.camera = Camera {
            center: LngLat::new(
                mercator::wrap_lng(camera.center.lng),
                camera
                    .center
                    .lat
                    .clamp(-mercator::MAX_LATITUDE, mercator::MAX_LATITUDE),
            ),
            zoom: camera.zoom.clamp(mercator::MIN_ZOOM, mercator::MAX_ZOOM),
        };
    }

    fn set_route(&mut self, lines: Vec<Vec<LngLat>>) {
        self.route = lines;
    }

    fn set_route_paint(&mut self, paint: RoutePaint) {
        self.paint = paint;
    }

    fn set_map_style(&mut self, style: MapStyle) {
        self.style = style;
    }

    fn add_marker(&mut self, at: LngLat) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(id, at);
        id
    }

    fn move_marker(&mut self, id: MarkerId, at: LngLat) {
        if let Some(slot) = self.markers.get_mut(&id) {
            *slot = at;
        }
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
    }

    fn marker_position(&self, id: MarkerId) -> Option<LngLat> {
        self.markers.get(&id).copied()
    }

    fn snapshot(&mut self) -> FlyPathResult<FrameRGBA> {
        let (w, h) = dims_u16(self.viewport.width, self.viewport.height)?;
        let background = color_to_cpu(self.style.background());
        let grid_color = color_to_cpu(self.style.graticule());
        let grid = self.graticule();
        let route = self.projected_route();
        let paint = self.paint;

        let mut route_runs = Vec::new();
        for line in &route {
            match paint.line_style.dash_pattern() {
                Some((dash, gap)) => route_runs.extend(dash_polyline(
                    line,
                    dash * paint.width_px,
                    gap * paint.width_px,
                )),
                None => route_runs.push(line.clone()),
            }
        }
        let cap = if paint.line_style.round_caps() {
            vello_cpu::kurbo::Cap::Round
        } else {
            vello_cpu::kurbo::Cap::Butt
        };

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.scratch.with_ctx(w, h, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(background);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(w),
                f64::from(h),
            ));

            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(GRATICULE_WIDTH_PX));
            ctx.set_paint(grid_color);
            for line in &grid {
                ctx.stroke_path(&polyline_path(line));
            }

            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(paint.width_px)
                    .with_caps(cap)
                    .with_join(vello_cpu::kurbo::Join::Round),
            );
            ctx.set_paint(color_to_cpu(paint.color));
            for run in &route_runs {
                ctx.stroke_path(&polyline_path(run));
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;
        Ok(frame_from_pixmap(&pixmap))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/map/headless.rs"]
mod tests;
