use crate::foundation::core::LngLat;
use crate::model::destination::Destination;

/// Number of samples per leg produced by [`compute_arcs`].
pub const ARC_SAMPLES: usize = 100;

const COINCIDENT_EPS: f64 = 1e-12;
const ANTIPODAL_EPS: f64 = 1e-9;

/// Polyline that may be split into several parts at the antimeridian.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiLine {
    /// Parts in travel order; each part is continuous in longitude.
    pub parts: Vec<Vec<LngLat>>,
}

impl MultiLine {
    /// Return `true` when the line was split at the antimeridian.
    pub fn is_multi_part(&self) -> bool {
        self.parts.len() > 1
    }

    /// Concatenate all parts into one ordered point list.
    pub fn flatten(self) -> Vec<LngLat> {
        let len = self.parts.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(len);
        for part in self.parts {
            out.extend(part);
        }
        out
    }
}

/// Great circle between two coordinates.
#[derive(Clone, Copy, Debug)]
pub struct GreatCircle {
    start: LngLat,
    end: LngLat,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    d: f64,
}

impl GreatCircle {
    /// Precompute the angular distance between `start` and `end`.
    pub fn new(start: LngLat, end: LngLat) -> Self {
        let x1 = start.lng.to_radians();
        let y1 = start.lat.to_radians();
        let x2 = end.lng.to_radians();
        let y2 = end.lat.to_radians();

        let h = ((y1 - y2) / 2.0).sin().powi(2)
            + y1.cos() * y2.cos() * ((x1 - x2) / 2.0).sin().powi(2);
        let d = 2.0 * h.sqrt().clamp(0.0, 1.0).asin();

        Self {
            start,
            end,
            x1,
            y1,
            x2,
            y2,
            d,
        }
    }

    /// Central angle between the endpoints, in radians.
    pub fn angular_distance(&self) -> f64 {
        self.d
    }

    /// Point at fraction `f` (`0..=1`) along the great circle.
    pub fn interpolate(&self, f: f64) -> LngLat {
        if f <= 0.0 {
            return self.start;
        }
        if f >= 1.0 {
            return self.end;
        }
        if self.d < COINCIDENT_EPS {
            return self.start;
        }
        let sin_d = self.d.sin();
        if sin_d.abs() < ANTIPODAL_EPS {
            // Antipodal endpoints: every meridian is a shortest path.
            return self.start.lerp(self.end, f);
        }

        let a = ((1.0 - f) * self.d).sin() / sin_d;
        let b = (f * self.d).sin() / sin_d;
        let x = a * self.y1.cos() * self.x1.cos() + b * self.y2.cos() * self.x2.cos();
        let y = a * self.y1.cos() * self.x1.sin() + b * self.y2.cos() * self.x2.sin();
        let z = a * self.y1.sin() + b * self.y2.sin();

        LngLat {
            lng: y.atan2(x).to_degrees(),
            lat: z.atan2((x * x + y * y).sqrt()).to_degrees(),
        }
    }

    /// Sample `npoints` points (at least 2) and split the result at the antimeridian.
    pub fn arc(&self, npoints: usize) -> MultiLine {
        let n = npoints.max(2);
        let last = (n - 1) as f64;

        let mut parts = Vec::new();
        let mut current: Vec<LngLat> = Vec::with_capacity(n);
        let mut prev: Option<LngLat> = None;

        for i in 0..n {
            let p = self.interpolate(i as f64 / last);
            if let Some(q) = prev
                && (p.lng - q.lng).abs() > 180.0
            {
                let edge = if q.lng > 0.0 { 180.0 } else { -180.0 };
                let p_lng_unwrapped = p.lng + 2.0 * edge;
                let t = (edge - q.lng) / (p_lng_unwrapped - q.lng);
                let lat = q.lat + (p.lat - q.lat) * t;
                current.push(LngLat::new(edge, lat));
                parts.push(std::mem::take(&mut current));
                current.push(LngLat::new(-edge, lat));
            }
            current.push(p);
            prev = Some(p);
        }
        parts.push(current);

        MultiLine { parts }
    }
}

/// Compute one great-circle polyline per consecutive destination pair.
///
/// Multi-part arcs (antimeridian crossings) are flattened into a single ordered list per pair.
/// Fewer than two destinations yields an empty result.
#[tracing::instrument(skip(destinations), fields(n = destinations.len()))]
pub fn compute_arcs(destinations: &[Destination]) -> Vec<Vec<LngLat>> {
    if destinations.len() < 2 {
        return Vec::new();
    }
    destinations
        .windows(2)
        .map(|pair| {
            GreatCircle::new(pair[0].position(), pair[1].position())
                .arc(ARC_SAMPLES)
                .flatten()
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/geo/great_circle.rs"]
mod tests;
