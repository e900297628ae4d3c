use std::str::FromStr;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{FlyPathError, FlyPathResult};
use crate::geo::mercator::{MAX_ZOOM, MIN_ZOOM};
use crate::map::view::RoutePaint;

/// Route stroke width in viewport pixels.
pub const ROUTE_WIDTH_PX: f64 = 4.0;

/// Dash pattern of the route line.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Long dashes.
    Dashed,
    /// Round dots.
    Dotted,
}

impl LineStyle {
    /// Every style, in display order.
    pub const ALL: [Self; 3] = [Self::Solid, Self::Dashed, Self::Dotted];

    /// Stable identifier used in route documents and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }

    /// `(dash, gap)` in multiples of the line width, `None` for a solid line.
    pub fn dash_pattern(self) -> Option<(f64, f64)> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some((2.0, 1.5)),
            Self::Dotted => Some((0.2, 1.5)),
        }
    }

    /// Whether line ends are rounded.
    pub fn round_caps(self) -> bool {
        matches!(self, Self::Dotted)
    }
}

impl FromStr for LineStyle {
    type Err = FlyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FlyPathError::validation(format!("unknown line style '{s}'")))
    }
}

/// Basemap style identifier.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    /// Dark navy basemap.
    #[default]
    Dark,
    /// Satellite imagery.
    Satellite,
    /// Light paper basemap.
    Light,
    /// Terrain-oriented basemap.
    Outdoors,
    /// Sepia basemap.
    Vintage,
}

impl MapStyle {
    /// Every style, in display order.
    pub const ALL: [Self; 5] = [
        Self::Dark,
        Self::Satellite,
        Self::Light,
        Self::Outdoors,
        Self::Vintage,
    ];

    /// Stable identifier used in route documents and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Satellite => "satellite",
            Self::Light => "light",
            Self::Outdoors => "outdoors",
            Self::Vintage => "vintage",
        }
    }

    /// Swatch colour shown for the style.
    pub fn background(self) -> Rgba8 {
        match self {
            Self::Dark => Rgba8::rgb(0x1a, 0x1a, 0x2e),
            Self::Satellite => Rgba8::rgb(0x2d, 0x4a, 0x3e),
            Self::Light => Rgba8::rgb(0xe8, 0xe4, 0xdb),
            Self::Outdoors => Rgba8::rgb(0x4a, 0x67, 0x41),
            Self::Vintage => Rgba8::rgb(0xc4, 0xb6, 0x9c),
        }
    }

    /// Colour of graticule lines drawn over [`MapStyle::background`].
    pub fn graticule(self) -> Rgba8 {
        match self {
            Self::Light | Self::Vintage => Rgba8::rgb(0, 0, 0).with_alpha(40),
            _ => Rgba8::WHITE.with_alpha(36),
        }
    }
}

impl FromStr for MapStyle {
    type Err = FlyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FlyPathError::validation(format!("unknown map style '{s}'")))
    }
}

/// User-tunable animation parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationSettings {
    /// Playback speed multiplier, `> 0`.
    pub speed: f64,
    /// Pause at each destination, in seconds.
    pub pause_duration: f64,
    /// Camera zoom while stopped at a destination.
    pub stop_zoom: f64,
    /// Route dash pattern.
    pub line_style: LineStyle,
    /// Route line colour.
    pub route_color: Rgba8,
    /// Draw destination names next to export badges.
    pub show_labels: bool,
    /// Basemap style.
    pub map_style: MapStyle,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            pause_duration: 1.5,
            stop_zoom: 5.0,
            line_style: LineStyle::Solid,
            route_color: Rgba8::rgb(0x00, 0xD4, 0xFF),
            show_labels: true,
            map_style: MapStyle::Dark,
        }
    }
}

impl AnimationSettings {
    /// Check numeric ranges.
    pub fn validate(&self) -> FlyPathResult<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(FlyPathError::validation(format!(
                "speed must be finite and > 0, got {}",
                self.speed
            )));
        }
        if !self.pause_duration.is_finite() || self.pause_duration < 0.0 {
            return Err(FlyPathError::validation(format!(
                "pauseDuration must be finite and >= 0, got {}",
                self.pause_duration
            )));
        }
        if !self.stop_zoom.is_finite() || !(MIN_ZOOM..=MAX_ZOOM).contains(&self.stop_zoom) {
            return Err(FlyPathError::validation(format!(
                "stopZoom must be within [{MIN_ZOOM}, {MAX_ZOOM}], got {}",
                self.stop_zoom
            )));
        }
        Ok(())
    }

    /// Pause length in whole milliseconds.
    pub fn pause_ms(&self) -> u64 {
        (self.pause_duration * 1000.0).round().max(0.0) as u64
    }

    /// Route layer paint derived from these settings.
    pub fn route_paint(&self) -> RoutePaint {
        RoutePaint {
            color: self.route_color,
            line_style: self.line_style,
            width_px: ROUTE_WIDTH_PX,
        }
    }

    /// Copy with `change` applied (not validated).
    pub fn with_change(mut self, change: SettingChange) -> Self {
        match change {
            SettingChange::Speed(v) => self.speed = v,
            SettingChange::PauseDuration(v) => self.pause_duration = v,
            SettingChange::StopZoom(v) => self.stop_zoom = v,
            SettingChange::LineStyle(v) => self.line_style = v,
            SettingChange::RouteColor(v) => self.route_color = v,
            SettingChange::ShowLabels(v) => self.show_labels = v,
            SettingChange::MapStyle(v) => self.map_style = v,
        }
        self
    }
}

/// A single-field settings edit, as emitted by a settings form.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum SettingChange {
    Speed(f64),
    PauseDuration(f64),
    StopZoom(f64),
    LineStyle(LineStyle),
    RouteColor(Rgba8),
    ShowLabels(bool),
    MapStyle(MapStyle),
}

#[cfg(test)]
#[path = "../../tests/unit/settings/options.rs"]
mod tests;
