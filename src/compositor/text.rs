use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{FlyPathError, FlyPathResult};
use crate::render::raster::image_from_premul_bytes;

const FONT_FAMILIES: &str = "Inter, Helvetica, Arial, sans-serif";
const MAX_SPRITE_DIM: u32 = 4096;

/// Horizontal alignment of a text sprite relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    Start,
    /// Text is centred on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

impl TextAnchor {
    fn svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Font weight of a text sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// 400.
    Regular,
    /// 700.
    Bold,
}

impl FontWeight {
    fn css(self) -> u16 {
        match self {
            Self::Regular => 400,
            Self::Bold => 700,
        }
    }
}

/// Style of a run of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f64,
    /// Fill colour (alpha becomes fill opacity).
    pub color: Rgba8,
    /// Weight.
    pub weight: FontWeight,
    /// Alignment relative to the anchor point.
    pub anchor: TextAnchor,
}

/// Rasterized text with the pixel offset of its anchor point.
#[derive(Clone)]
pub(crate) struct TextSprite {
    pub(crate) image: vello_cpu::Image,
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Anchor x within the sprite.
    pub(crate) anchor_x: f64,
    /// Baseline y within the sprite.
    pub(crate) baseline: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TextKey {
    text: String,
    size_centipx: u32,
    color: Rgba8,
    weight: FontWeight,
    anchor: TextAnchor,
}

/// Per-compositor cache of text sprites keyed by content and style.
#[derive(Default)]
pub(crate) struct TextCache {
    sprites: HashMap<TextKey, Option<Arc<TextSprite>>>,
}

impl TextCache {
    /// Sprite for `text` in `style`; `None` for empty text.
    pub(crate) fn sprite(
        &mut self,
        text: &str,
        style: TextStyle,
    ) -> FlyPathResult<Option<Arc<TextSprite>>> {
        if text.trim().is_empty() || !(style.size_px.is_finite() && style.size_px > 0.0) {
            return Ok(None);
        }
        let key = TextKey {
            text: text.to_owned(),
            size_centipx: (style.size_px * 100.0).round() as u32,
            color: style.color,
            weight: style.weight,
            anchor: style.anchor,
        };
        if let Some(hit) = self.sprites.get(&key) {
            return Ok(hit.clone());
        }
        let sprite = rasterize_text(text, style)?.map(Arc::new);
        self.sprites.insert(key, sprite.clone());
        Ok(sprite)
    }

    pub(crate) fn len(&self) -> usize {
        self.sprites.len()
    }
}

fn svg_fontdb() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.faces().count(), "loaded system fonts");
        Arc::new(db)
    })
    .clone()
}

fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Sprite box for `text`: generous enough for wide glyphs, tight enough to stay cheap.
fn sprite_box(text: &str, style: TextStyle) -> (u32, u32, f64, f64) {
    let chars = text.chars().count().max(1) as f64;
    let w = (chars * style.size_px * 0.75 + style.size_px).ceil();
    let h = (style.size_px * 1.4).ceil();
    let anchor_x = match style.anchor {
        TextAnchor::Start => style.size_px * 0.25,
        TextAnchor::Middle => w / 2.0,
        TextAnchor::End => w - style.size_px * 0.25,
    };
    let baseline = (style.size_px * 1.05).round();
    (
        (w as u32).clamp(1, MAX_SPRITE_DIM),
        (h as u32).clamp(1, MAX_SPRITE_DIM),
        anchor_x,
        baseline,
    )
}

pub(crate) fn text_svg(text: &str, style: TextStyle) -> (String, u32, u32, f64, f64) {
    let (w, h, anchor_x, baseline) = sprite_box(text, style);
    let c = style.color;
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><text x="{anchor_x}" y="{baseline}" font-family="{FONT_FAMILIES}" font-size="{size}" font-weight="{weight}" fill="#{r:02X}{g:02X}{b:02X}" fill-opacity="{opacity:.3}" text-anchor="{anchor}">{body}</text></svg>"##,
        size = style.size_px,
        weight = style.weight.css(),
        r = c.r,
        g = c.g,
        b = c.b,
        opacity = f64::from(c.a) / 255.0,
        anchor = style.anchor.svg(),
        body = escape_xml(text),
    );
    (svg, w, h, anchor_x, baseline)
}

fn rasterize_text(text: &str, style: TextStyle) -> FlyPathResult<Option<TextSprite>> {
    let (svg, width, height, anchor_x, baseline) = text_svg(text, style);
    let opts = usvg::Options {
        fontdb: svg_fontdb(),
        font_resolver: font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&svg, &opts)
        .map_err(|e| FlyPathError::render(format!("text svg: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| FlyPathError::render("failed to allocate text pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    Ok(Some(TextSprite {
        image: image_from_premul_bytes(pixmap.data(), width, height)?,
        width,
        height,
        anchor_x,
        baseline,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/text.rs"]
mod tests;
