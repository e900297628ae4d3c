use crate::foundation::core::LngLat;

/// Axis-aligned lng/lat envelope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

impl GeoBounds {
    /// Envelope of all points, or `None` when the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = LngLat>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = Self {
            west: first.lng,
            south: first.lat,
            east: first.lng,
            north: first.lat,
        };
        for p in it {
            b.extend(p);
        }
        Some(b)
    }

    /// Grow the envelope to include `p`.
    pub fn extend(&mut self, p: LngLat) {
        self.west = self.west.min(p.lng);
        self.east = self.east.max(p.lng);
        self.south = self.south.min(p.lat);
        self.north = self.north.max(p.lat);
    }

    /// Geometric centre in lng/lat.
    pub fn center(&self) -> LngLat {
        LngLat::new((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geo/bounds.rs"]
mod tests;
