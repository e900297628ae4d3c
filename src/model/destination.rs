use std::sync::Arc;

use crate::foundation::core::LngLat;
use crate::foundation::error::{FlyPathError, FlyPathResult};

/// One stop on the route.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Destination {
    /// Opaque unique token.
    pub id: String,
    /// Display name (usually a city).
    pub name: String,
    /// Country name, may be empty.
    pub country: String,
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Destination {
    /// Create a destination with validated coordinates.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
        at: LngLat,
    ) -> FlyPathResult<Self> {
        let at = at.validate()?;
        let id = id.into();
        if id.is_empty() {
            return Err(FlyPathError::validation("destination id must not be empty"));
        }
        Ok(Self {
            id,
            name: name.into(),
            country: country.into(),
            lng: at.lng,
            lat: at.lat,
        })
    }

    /// Create a destination from a search hit, assigning a fresh random id.
    pub fn from_search(
        name: impl Into<String>,
        country: impl Into<String>,
        at: LngLat,
    ) -> FlyPathResult<Self> {
        Self::new(uuid::Uuid::new_v4().to_string(), name, country, at)
    }

    /// Coordinates of this destination.
    pub fn position(&self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }

    /// Re-check coordinates and id (for values that came from deserialization).
    pub fn validate(&self) -> FlyPathResult<()> {
        if self.id.is_empty() {
            return Err(FlyPathError::validation("destination id must not be empty"));
        }
        self.position().validate().map(|_| ())
    }
}

/// Ordered, immutable destination sequence.
///
/// Edits return a new list; clones are cheap and share storage, so a running animation keeps
/// reading the list it started with.
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DestinationList(Arc<[Destination]>);

impl DestinationList {
    /// Build a list, validating every entry.
    pub fn new(items: Vec<Destination>) -> FlyPathResult<Self> {
        let list = Self(items.into());
        list.validate()?;
        Ok(list)
    }

    /// Validate every entry and reject duplicate ids.
    pub fn validate(&self) -> FlyPathResult<()> {
        for (i, d) in self.0.iter().enumerate() {
            d.validate()?;
            if self.0[..i].iter().any(|o| o.id == d.id) {
                return Err(FlyPathError::validation(format!(
                    "duplicate destination id '{}'",
                    d.id
                )));
            }
        }
        Ok(())
    }

    /// Number of destinations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no destinations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the destinations in route order.
    pub fn as_slice(&self) -> &[Destination] {
        &self.0
    }

    /// Iterate in route order.
    pub fn iter(&self) -> std::slice::Iter<'_, Destination> {
        self.0.iter()
    }

    /// Coordinates in route order.
    pub fn positions(&self) -> Vec<LngLat> {
        self.0.iter().map(Destination::position).collect()
    }

    /// New list with `d` appended.
    pub fn push(&self, d: Destination) -> FlyPathResult<Self> {
        let mut items = self.0.to_vec();
        items.push(d);
        Self::new(items)
    }

    /// New list without the destination whose id is `id` (unchanged if absent).
    pub fn remove(&self, id: &str) -> Self {
        Self(self.0.iter().filter(|d| d.id != id).cloned().collect())
    }

    /// New list with the item at `from` moved to index `to`.
    ///
    /// Out-of-range indices leave the order unchanged.
    pub fn move_item(&self, from: usize, to: usize) -> Self {
        let len = self.0.len();
        if from >= len || to >= len || from == to {
            return self.clone();
        }
        let mut items = self.0.to_vec();
        let item = items.remove(from);
        items.insert(to, item);
        Self(items.into())
    }
}

impl<'a> IntoIterator for &'a DestinationList {
    type Item = &'a Destination;
    type IntoIter = std::slice::Iter<'a, Destination>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/destination.rs"]
mod tests;
