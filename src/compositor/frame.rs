use std::str::FromStr;

use crate::compositor::text::{FontWeight, TextAnchor, TextCache, TextSprite, TextStyle};
use crate::foundation::core::{Canvas, LngLat, Point, Rgba8};
use crate::foundation::error::{FlyPathError, FlyPathResult};
use crate::map::view::MapView;
use crate::model::destination::DestinationList;
use crate::render::raster::{
    FrameRGBA, RenderScratch, circle_path, color_to_cpu, dims_u16, frame_from_pixmap,
    image_from_premul_bytes,
};
use crate::settings::AnimationSettings;

/// Text of the bottom-right watermark.
pub const WATERMARK_TEXT: &str = "Made with FlyPath";

const BADGE_FILL: Rgba8 = Rgba8::rgb(0x3B, 0x82, 0xF6);
const BADGE_RADIUS: f64 = 14.0;
const BADGE_RING: f64 = 2.0;
const BADGE_FONT: f64 = 13.0;
const LABEL_FONT: f64 = 13.0;
const LABEL_GAP: f64 = 6.0;
const INDICATOR_RADIUS: f64 = 9.0;
const INDICATOR_RING: f64 = 3.0;
const WATERMARK_ALPHA: u8 = 153;
const WATERMARK_FONT_FRAC: f64 = 0.024;
const WATERMARK_MARGIN_FRAC: f64 = 0.02;

/// Export resolution preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Resolution {
    /// 1280×720.
    #[default]
    #[serde(rename = "720p")]
    Hd720,
    /// 1920×1080.
    #[serde(rename = "1080p")]
    Hd1080,
}

impl Resolution {
    /// Output size in pixels.
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Hd720 => Canvas::new(1280, 720),
            Self::Hd1080 => Canvas::new(1920, 1080),
        }
    }

    /// Overlay scale factor relative to 720p.
    pub fn scale(self) -> f64 {
        f64::from(self.canvas().height) / 720.0
    }

    /// Display identifier (`720p`, `1080p`).
    pub fn id(self) -> &'static str {
        match self {
            Self::Hd720 => "720p",
            Self::Hd1080 => "1080p",
        }
    }
}

impl FromStr for Resolution {
    type Err = FlyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "720p" | "720" => Ok(Self::Hd720),
            "1080p" | "1080" => Ok(Self::Hd1080),
            other => Err(FlyPathError::validation(format!(
                "unknown resolution '{other}' (expected 720p or 1080p)"
            ))),
        }
    }
}

/// Draws export frames from live map state.
///
/// The compositor only produces frames while active; callers must [`Compositor::stop`] it when
/// the recording ends.
pub struct Compositor {
    resolution: Resolution,
    watermark: bool,
    active: bool,
    frames: u64,
    scratch: RenderScratch,
    text: TextCache,
}

struct Badge {
    at: Point,
    number: Option<std::sync::Arc<TextSprite>>,
    label: Option<std::sync::Arc<TextSprite>>,
}

impl Compositor {
    /// Inactive compositor for `resolution`.
    pub fn new(resolution: Resolution, watermark: bool) -> Self {
        Self {
            resolution,
            watermark,
            active: false,
            frames: 0,
            scratch: RenderScratch::default(),
            text: TextCache::default(),
        }
    }

    /// Output resolution.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Begin producing frames.
    pub fn start(&mut self) {
        self.active = true;
        self.frames = 0;
    }

    /// Stop producing frames; [`Compositor::compose`] returns `None` afterwards.
    pub fn stop(&mut self) {
        if self.active {
            tracing::debug!(frames = self.frames, "compositor stopped");
        }
        self.active = false;
    }

    /// Whether frames are being produced.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Frames composed since the last [`Compositor::start`].
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Compose one frame from the current state of `view`.
    ///
    /// Returns `Ok(None)` when the compositor is not active.
    pub fn compose<V: MapView>(
        &mut self,
        view: &mut V,
        destinations: &DestinationList,
        indicator: Option<LngLat>,
        settings: &AnimationSettings,
    ) -> FlyPathResult<Option<FrameRGBA>> {
        if !self.active {
            return Ok(None);
        }
        let target = self.resolution.canvas();
        let (w, h) = dims_u16(target.width, target.height)?;
        let s = self.resolution.scale();

        let snapshot = view.snapshot()?;
        let map_image = image_from_premul_bytes(&snapshot.data, snapshot.width, snapshot.height)?;
        let sx = f64::from(target.width) / f64::from(snapshot.width);
        let sy = f64::from(target.height) / f64::from(snapshot.height);
        let to_target = |p: Point| Point::new(p.x * sx, p.y * sy);

        let margin = (BADGE_RADIUS + BADGE_RING) * s;
        let mut badges = Vec::with_capacity(destinations.len());
        for (i, d) in destinations.iter().enumerate() {
            let at = to_target(view.project(d.position()));
            if at.x < -margin
                || at.y < -margin
                || at.x > f64::from(w) + margin
                || at.y > f64::from(h) + margin
            {
                continue;
            }
            let number = self.text.sprite(
                &(i + 1).to_string(),
                TextStyle {
                    size_px: BADGE_FONT * s,
                    color: Rgba8::WHITE,
                    weight: FontWeight::Bold,
                    anchor: TextAnchor::Middle,
                },
            )?;
            let label = if settings.show_labels {
                self.text.sprite(
                    &d.name,
                    TextStyle {
                        size_px: LABEL_FONT * s,
                        color: Rgba8::WHITE,
                        weight: FontWeight::Bold,
                        anchor: TextAnchor::Start,
                    },
                )?
            } else {
                None
            };
            badges.push(Badge { at, number, label });
        }

        let indicator_at = indicator.map(|p| to_target(view.project(p)));
        let watermark = if self.watermark {
            self.text.sprite(
                WATERMARK_TEXT,
                TextStyle {
                    size_px: f64::from(h) * WATERMARK_FONT_FRAC,
                    color: Rgba8::WHITE.with_alpha(WATERMARK_ALPHA),
                    weight: FontWeight::Regular,
                    anchor: TextAnchor::End,
                },
            )?
        } else {
            None
        };
        let route_color = settings.route_color;

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.scratch.with_ctx(w, h, |ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy));
            ctx.set_paint(map_image);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(snapshot.width),
                f64::from(snapshot.height),
            ));
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

            for badge in &badges {
                let circle = circle_path(badge.at, BADGE_RADIUS * s);
                ctx.set_paint(color_to_cpu(BADGE_FILL));
                ctx.fill_path(&circle);
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(BADGE_RING * s));
                ctx.set_paint(color_to_cpu(Rgba8::WHITE));
                ctx.stroke_path(&circle);

                if let Some(number) = &badge.number {
                    // Optical centre of digits sits about 0.35em above the baseline.
                    draw_sprite(
                        ctx,
                        number,
                        Point::new(badge.at.x, badge.at.y + BADGE_FONT * s * 0.35),
                    );
                }
                if let Some(label) = &badge.label {
                    draw_sprite(
                        ctx,
                        label,
                        Point::new(
                            badge.at.x + (BADGE_RADIUS + BADGE_RING + LABEL_GAP) * s,
                            badge.at.y + LABEL_FONT * s * 0.35,
                        ),
                    );
                }
            }

            if let Some(at) = indicator_at {
                ctx.set_paint(color_to_cpu(route_color));
                ctx.fill_path(&circle_path(at, (INDICATOR_RADIUS + INDICATOR_RING) * s));
                ctx.set_paint(color_to_cpu(Rgba8::WHITE));
                ctx.fill_path(&circle_path(at, INDICATOR_RADIUS * s));
            }

            if let Some(mark) = &watermark {
                draw_sprite(
                    ctx,
                    mark,
                    Point::new(
                        f64::from(w) * (1.0 - WATERMARK_MARGIN_FRAC),
                        f64::from(h) * (1.0 - WATERMARK_MARGIN_FRAC),
                    ),
                );
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        self.frames += 1;
        Ok(Some(frame_from_pixmap(&pixmap)))
    }
}

/// Draw `sprite` with its anchor point at `anchor` (x) and its baseline at `anchor.y`.
fn draw_sprite(ctx: &mut vello_cpu::RenderContext, sprite: &TextSprite, anchor: Point) {
    let x = (anchor.x - sprite.anchor_x).round();
    let y = (anchor.y - sprite.baseline).round();
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    ctx.set_paint(sprite.image.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(sprite.width),
        f64::from(sprite.height),
    ));
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/frame.rs"]
mod tests;
