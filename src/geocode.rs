//! Destination search.
//!
//! The animator only needs plain destinations; [`Geocoder`] is the seam where a real geocoding
//! service plugs in. [`Gazetteer`] is an offline implementation over a fixed city table.

use crate::foundation::core::LngLat;
use crate::foundation::error::FlyPathResult;
use crate::model::destination::Destination;

/// Queries shorter than this (in characters, after trimming) return nothing.
pub const MIN_QUERY_CHARS: usize = 2;
/// Upper bound on results per query.
pub const MAX_RESULTS: usize = 5;

/// One ranked search hit.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchResult {
    /// Provider-specific id.
    pub id: String,
    /// Place name.
    pub name: String,
    /// Country name, may be empty.
    pub country: String,
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl SearchResult {
    /// Convert into a route stop with a fresh id.
    pub fn into_destination(self) -> FlyPathResult<Destination> {
        Destination::from_search(self.name, self.country, LngLat::new(self.lng, self.lat))
    }
}

/// Free-text place search.
pub trait Geocoder {
    /// Ranked results for `query`, best first.
    fn search(&self, query: &str) -> Vec<SearchResult>;
}

/// In-memory place table with case-insensitive prefix matching on the name.
#[derive(Clone, Debug)]
pub struct Gazetteer {
    places: Vec<SearchResult>,
}

impl Gazetteer {
    /// Gazetteer over `places`, ranked in the given order.
    pub fn new(places: Vec<SearchResult>) -> Self {
        Self { places }
    }

    /// Gazetteer over a built-in table of major cities.
    pub fn builtin() -> Self {
        let places = BUILTIN_CITIES
            .iter()
            .map(|&(name, country, lng, lat)| SearchResult {
                id: format!("city.{}", name.to_lowercase().replace(' ', "-")),
                name: name.to_owned(),
                country: country.to_owned(),
                lng,
                lat,
            })
            .collect();
        Self { places }
    }

    /// Number of places.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Geocoder for Gazetteer {
    fn search(&self, query: &str) -> Vec<SearchResult> {
        let q = query.trim().to_lowercase();
        if q.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }
        self.places
            .iter()
            .filter(|p| p.name.to_lowercase().starts_with(&q))
            .take(MAX_RESULTS)
            .cloned()
            .collect()
    }
}

// (name, country, lng, lat)
const BUILTIN_CITIES: &[(&str, &str, f64, f64)] = &[
    ("Amsterdam", "Netherlands", 4.9041, 52.3676),
    ("Athens", "Greece", 23.7275, 37.9838),
    ("Auckland", "New Zealand", 174.7633, -36.8485),
    ("Bangkok", "Thailand", 100.5018, 13.7563),
    ("Barcelona", "Spain", 2.1734, 41.3851),
    ("Beijing", "China", 116.4074, 39.9042),
    ("Berlin", "Germany", 13.4050, 52.5200),
    ("Bogotá", "Colombia", -74.0721, 4.7110),
    ("Buenos Aires", "Argentina", -58.3816, -34.6037),
    ("Cairo", "Egypt", 31.2357, 30.0444),
    ("Cape Town", "South Africa", 18.4241, -33.9249),
    ("Chicago", "United States", -87.6298, 41.8781),
    ("Copenhagen", "Denmark", 12.5683, 55.6761),
    ("Dubai", "United Arab Emirates", 55.2708, 25.2048),
    ("Dublin", "Ireland", -6.2603, 53.3498),
    ("Hanoi", "Vietnam", 105.8342, 21.0278),
    ("Havana", "Cuba", -82.3666, 23.1136),
    ("Helsinki", "Finland", 24.9384, 60.1699),
    ("Hong Kong", "China", 114.1694, 22.3193),
    ("Honolulu", "United States", -157.8583, 21.3069),
    ("Istanbul", "Turkey", 28.9784, 41.0082),
    ("Jakarta", "Indonesia", 106.8456, -6.2088),
    ("Kyoto", "Japan", 135.7681, 35.0116),
    ("Lima", "Peru", -77.0428, -12.0464),
    ("Lisbon", "Portugal", -9.1393, 38.7223),
    ("London", "United Kingdom", -0.1276, 51.5072),
    ("Los Angeles", "United States", -118.2437, 34.0522),
    ("Madrid", "Spain", -3.7038, 40.4168),
    ("Marrakesh", "Morocco", -7.9811, 31.6295),
    ("Melbourne", "Australia", 144.9631, -37.8136),
    ("Mexico City", "Mexico", -99.1332, 19.4326),
    ("Miami", "United States", -80.1918, 25.7617),
    ("Montreal", "Canada", -73.5673, 45.5017),
    ("Moscow", "Russia", 37.6173, 55.7558),
    ("Mumbai", "India", 72.8777, 19.0760),
    ("Munich", "Germany", 11.5820, 48.1351),
    ("Nairobi", "Kenya", 36.8219, -1.2921),
    ("New Delhi", "India", 77.2090, 28.6139),
    ("New York", "United States", -74.0060, 40.7128),
    ("Oslo", "Norway", 10.7522, 59.9139),
    ("Paris", "France", 2.3522, 48.8566),
    ("Prague", "Czechia", 14.4378, 50.0755),
    ("Reykjavík", "Iceland", -21.9426, 64.1466),
    ("Rio de Janeiro", "Brazil", -43.1729, -22.9068),
    ("Rome", "Italy", 12.4964, 41.9028),
    ("San Francisco", "United States", -122.4194, 37.7749),
    ("Santiago", "Chile", -70.6693, -33.4489),
    ("São Paulo", "Brazil", -46.6333, -23.5505),
    ("Seattle", "United States", -122.3321, 47.6062),
    ("Seoul", "South Korea", 126.9780, 37.5665),
    ("Shanghai", "China", 121.4737, 31.2304),
    ("Singapore", "Singapore", 103.8198, 1.3521),
    ("Stockholm", "Sweden", 18.0686, 59.3293),
    ("Sydney", "Australia", 151.2093, -33.8688),
    ("Taipei", "Taiwan", 121.5654, 25.0330),
    ("Tokyo", "Japan", 139.6917, 35.6895),
    ("Toronto", "Canada", -79.3832, 43.6532),
    ("Vancouver", "Canada", -123.1207, 49.2827),
    ("Vienna", "Austria", 16.3738, 48.2082),
    ("Zurich", "Switzerland", 8.5417, 47.3769),
];

#[cfg(test)]
#[path = "../tests/unit/geocode/geocode.rs"]
mod tests;
