use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{FlyPathError, FlyPathResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by this crate are premultiplied; the flag makes that explicit at sink
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA bytes of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Reusable `vello_cpu` render context, recreated only when the target size changes.
#[derive(Default)]
pub(crate) struct RenderScratch {
    ctx: Option<vello_cpu::RenderContext>,
}

impl RenderScratch {
    pub(crate) fn with_ctx<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> FlyPathResult<R>,
    ) -> FlyPathResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

pub(crate) fn dims_u16(width: u32, height: u32) -> FlyPathResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| FlyPathError::render(format!("raster width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FlyPathError::render(format!("raster height {height} exceeds u16")))?;
    if w == 0 || h == 0 {
        return Err(FlyPathError::render("raster size must be non-zero"));
    }
    Ok((w, h))
}

pub(crate) fn frame_from_pixmap(pixmap: &vello_cpu::Pixmap) -> FrameRGBA {
    FrameRGBA {
        width: u32::from(pixmap.width()),
        height: u32::from(pixmap.height()),
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    }
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> FlyPathResult<vello_cpu::Pixmap> {
    let (w, h) = dims_u16(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(FlyPathError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn image_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> FlyPathResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub(crate) fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn polyline_path(points: &[Point]) -> vello_cpu::kurbo::BezPath {
    let mut path = vello_cpu::kurbo::BezPath::new();
    let mut it = points.iter();
    if let Some(first) = it.next() {
        path.move_to(point_to_cpu(*first));
        for p in it {
            path.line_to(point_to_cpu(*p));
        }
    }
    path
}

pub(crate) fn circle_path(center: Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius).to_path(0.1)
}

/// Split a polyline into dash runs of `dash` length separated by `gap`, in pixels.
///
/// The pattern continues across vertices, so corners do not reset the phase.
pub(crate) fn dash_polyline(points: &[Point], dash: f64, gap: f64) -> Vec<Vec<Point>> {
    if points.len() < 2 || dash <= 0.0 || gap <= 0.0 {
        return vec![points.to_vec()];
    }

    let mut runs = Vec::new();
    let mut current = vec![points[0]];
    let mut drawing = true;
    let mut remaining = dash;

    for w in points.windows(2) {
        let (mut a, b) = (w[0], w[1]);
        let mut seg_len = a.distance(b);
        while seg_len > 0.0 {
            if seg_len < remaining {
                remaining -= seg_len;
                if drawing {
                    current.push(b);
                }
                break;
            }
            let cut = a.lerp(b, remaining / seg_len);
            seg_len -= remaining;
            a = cut;
            if drawing {
                current.push(cut);
                runs.push(std::mem::take(&mut current));
                remaining = gap;
            } else {
                current.push(cut);
                remaining = dash;
            }
            drawing = !drawing;
        }
    }
    if drawing && current.len() >= 2 {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
