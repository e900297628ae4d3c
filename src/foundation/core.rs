use crate::foundation::error::{FlyPathError, FlyPathResult};
use crate::foundation::math::lerp;

pub use kurbo::{Affine, Point, Vec2};

/// Geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LngLat {
    /// Longitude in degrees, `[-180, 180]` for user-supplied points.
    pub lng: f64,
    /// Latitude in degrees, `[-90, 90]`.
    pub lat: f64,
}

impl LngLat {
    /// Create a coordinate without validation.
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Validate that the coordinate is finite and within the WGS84 ranges.
    pub fn validate(self) -> FlyPathResult<Self> {
        if !self.lng.is_finite() || !self.lat.is_finite() {
            return Err(FlyPathError::validation("coordinates must be finite"));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(FlyPathError::validation(format!(
                "longitude {} outside [-180, 180]",
                self.lng
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(FlyPathError::validation(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        Ok(self)
    }

    /// Linear interpolation in lng/lat space.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            lng: lerp(self.lng, other.lng, t),
            lat: lerp(self.lat, other.lat, t),
        }
    }

    /// Return `true` when both components are within `eps` of `other`.
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        (self.lng - other.lng).abs() <= eps && (self.lat - other.lat).abs() <= eps
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

/// Absolute 0-based frame index in a recording.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> FlyPathResult<Self> {
        if den == 0 {
            return Err(FlyPathError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(FlyPathError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Timestamp of frame `frames` since the start of the clock, in whole nanoseconds.
    ///
    /// Computed from the frame count (not accumulated) so long recordings never drift.
    pub fn frames_to_duration(self, frames: u64) -> std::time::Duration {
        let nanos =
            u128::from(frames) * 1_000_000_000u128 * u128::from(self.den) / u128::from(self.num);
        std::time::Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Number of whole frames needed to cover `ms` milliseconds (ceiling).
    pub fn frames_for_ms(self, ms: u64) -> u64 {
        let num = u128::from(ms) * u128::from(self.num);
        let den = 1000u128 * u128::from(self.den);
        u64::try_from(num.div_ceil(den)).unwrap_or(u64::MAX)
    }
}

/// Raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Straight-alpha RGBA8 colour, serialized as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque colour from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same colour with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(s: &str) -> FlyPathResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || FlyPathError::validation(format!("invalid hex colour '{s}'"));
        if !hex.is_ascii() {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        match hex.len() {
            3 => {
                let nib = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| bad())
                };
                Ok(Self::rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(bad()),
        }
    }

    /// Format as `#RRGGBB` (opaque) or `#RRGGBBAA`.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Premultiplied RGBA8 bytes.
    pub fn premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| (((u16::from(c) * a) + 127) / 255) as u8;
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = FlyPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(c: Rgba8) -> Self {
        c.to_hex()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
