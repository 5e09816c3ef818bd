// The drawable canvas: an immediate-mode RGBA rasterizer.
// Visual: this is the white area under the HUD that you scribble on.

use crate::error::{Error, Result};
use crate::export::encode_png;
use crate::types::{LineCap, PenStyle, PixelBuffer, PixelRect, Point, Rgba, ScreenRect};

/// What the widget needs from a paintable canvas.
///
/// Pixel reads always return an owned copy and pixel writes always copy in,
/// so nothing handed out ever aliases the live pixels.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Pen used by every following `draw_line`.
    fn set_pen(&mut self, pen: PenStyle);

    /// Stroke a straight segment with the current pen (surface-local coords).
    fn draw_line(&mut self, from: Point, to: Point);

    /// Reset `rect` to transparent.
    fn clear_rect(&mut self, rect: PixelRect);

    /// Copy `rect` out. Pixels outside the surface read as transparent.
    fn get_pixels(&self, rect: PixelRect) -> PixelBuffer;

    /// Copy `pixels` in with its top-left at (x, y). Clipped to the surface.
    fn put_pixels(&mut self, pixels: &PixelBuffer, x: i32, y: i32);

    /// Current on-screen placement in device coordinates.
    fn bounding_rect(&self) -> ScreenRect;

    fn full_rect(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width(), self.height())
    }

    /// Lossless encoding of the whole surface.
    fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.get_pixels(self.full_rect()))
    }
}

/// Longest canvas edge we agree to paint on.
pub const MAX_CANVAS_SIDE: u32 = 32_767;
/// Largest canvas area in pixels (16384 x 16384). Every snapshot is a full copy.
pub const MAX_CANVAS_AREA: u64 = 16_384 * 16_384;

/// Software canvas backed by a `Vec<u8>` of straight RGBA.
pub struct RasterSurface {
    pixels: PixelBuffer,
    pen: PenStyle,
    origin: Point, // top-left on screen; the host moves it when layout changes
}

impl RasterSurface {
    /// Make a transparent canvas. Fails when the size cannot be painted on.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::ContextUnavailable(format!(
                "canvas has no area ({width}x{height})"
            )));
        }
        if width > MAX_CANVAS_SIDE
            || height > MAX_CANVAS_SIDE
            || (width as u64) * (height as u64) > MAX_CANVAS_AREA
        {
            return Err(Error::ContextUnavailable(format!(
                "canvas too large ({width}x{height}, at most {MAX_CANVAS_SIDE} per side and {MAX_CANVAS_AREA} pixels)"
            )));
        }
        let pixels = PixelBuffer::try_new(width, height).ok_or_else(|| {
            Error::ContextUnavailable(format!("could not allocate a {width}x{height} canvas"))
        })?;

        Ok(Self {
            pixels,
            pen: PenStyle::default(),
            origin: Point::default(),
        })
    }

    /// Move the canvas on screen (device pixels).
    pub fn set_origin(&mut self, left: f32, top: f32) {
        self.origin = Point::new(left, top);
    }

    #[cfg(test)]
    pub fn pen(&self) -> PenStyle {
        self.pen
    }

    /// Read one pixel (no copy of the whole surface).
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels.pixel(x, y)
    }

    /// Borrow the live pixels, e.g. for blitting into the window.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Paint one pixel with source-over blending.
    #[inline]
    fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = ((y as usize) * (self.pixels.width() as usize) + x as usize) * 4;
        let dst = &mut self.pixels.bytes_mut()[idx..idx + 4];
        if color.a == 255 {
            dst.copy_from_slice(&color.to_array());
            return;
        }
        if color.a == 0 {
            return;
        }

        let sa = color.a as f32 / 255.0;
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let src = color.to_array();
        for c in 0..3 {
            let mixed = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
            dst[c] = mixed.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Does the pen footprint of segment `a`→`b` cover point `p`?
fn covers(p: Point, a: Point, b: Point, radius: f32, cap: LineCap) -> bool {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let (px, py) = (p.x - a.x, p.y - a.y);
    let len2 = dx * dx + dy * dy;

    // Degenerate segment: only caps have any extent.
    if len2 <= f32::EPSILON {
        return match cap {
            LineCap::Butt => false,
            LineCap::Round => px * px + py * py <= radius * radius,
            LineCap::Square => px.abs() <= radius && py.abs() <= radius,
        };
    }

    let t = (px * dx + py * dy) / len2;
    match cap {
        LineCap::Round => {
            let t = t.clamp(0.0, 1.0);
            let (ex, ey) = (px - dx * t, py - dy * t);
            ex * ex + ey * ey <= radius * radius
        }
        LineCap::Butt | LineCap::Square => {
            let ext = if cap == LineCap::Square { radius / len2.sqrt() } else { 0.0 };
            if t < -ext || t > 1.0 + ext {
                return false;
            }
            let cross = px * dy - py * dx;
            cross * cross <= radius * radius * len2
        }
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn set_pen(&mut self, pen: PenStyle) {
        self.pen = pen;
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        let pen = self.pen;
        let radius = pen.width / 2.0;
        if radius <= 0.0 {
            return;
        }

        // Scan just the bounding box of the footprint, clipped to the canvas.
        let pad = radius + 1.0;
        let x0 = (from.x.min(to.x) - pad).floor().max(0.0) as i64;
        let y0 = (from.y.min(to.y) - pad).floor().max(0.0) as i64;
        let x1 = ((from.x.max(to.x) + pad).ceil() as i64).min(self.width() as i64 - 1);
        let y1 = ((from.y.max(to.y) + pad).ceil() as i64).min(self.height() as i64 - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                // Sample at pixel centers.
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if covers(center, from, to, radius, pen.cap) {
                    self.blend_pixel(x as u32, y as u32, pen.color);
                }
            }
        }
    }

    fn clear_rect(&mut self, rect: PixelRect) {
        let empty = PixelBuffer::new(rect.width, rect.height);
        self.put_pixels(&empty, rect.x, rect.y);
    }

    fn get_pixels(&self, rect: PixelRect) -> PixelBuffer {
        let mut out = PixelBuffer::new(rect.width, rect.height);
        let Some(span) = overlap(rect, self.width(), self.height()) else {
            return out;
        };

        let src_stride = self.width() as usize * 4;
        let dst_stride = rect.width as usize * 4;
        let row_bytes = span.cols * 4;
        let src = self.pixels.as_bytes();
        let dst = out.bytes_mut();
        for row in 0..span.rows {
            let s = (span.surf_y + row) * src_stride + span.surf_x * 4;
            let d = (span.buf_y + row) * dst_stride + span.buf_x * 4;
            dst[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
        }
        out
    }

    fn put_pixels(&mut self, pixels: &PixelBuffer, x: i32, y: i32) {
        let rect = PixelRect::new(x, y, pixels.width(), pixels.height());
        let Some(span) = overlap(rect, self.width(), self.height()) else {
            return;
        };

        let dst_stride = self.width() as usize * 4;
        let src_stride = pixels.width() as usize * 4;
        let row_bytes = span.cols * 4;
        let src = pixels.as_bytes();
        let dst = self.pixels.bytes_mut();
        for row in 0..span.rows {
            let s = (span.buf_y + row) * src_stride + span.buf_x * 4;
            let d = (span.surf_y + row) * dst_stride + span.surf_x * 4;
            dst[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
        }
    }

    fn bounding_rect(&self) -> ScreenRect {
        ScreenRect {
            left: self.origin.x,
            top: self.origin.y,
            width: self.width() as f32,
            height: self.height() as f32,
        }
    }
}

/// Intersection of a rect with the surface, in both coordinate systems.
struct Span {
    surf_x: usize,
    surf_y: usize,
    buf_x: usize,
    buf_y: usize,
    cols: usize,
    rows: usize,
}

fn overlap(rect: PixelRect, width: u32, height: u32) -> Option<Span> {
    let left = (rect.x as i64).max(0);
    let top = (rect.y as i64).max(0);
    let right = (rect.x as i64 + rect.width as i64).min(width as i64);
    let bottom = (rect.y as i64 + rect.height as i64).min(height as i64);
    if left >= right || top >= bottom {
        return None;
    }
    Some(Span {
        surf_x: left as usize,
        surf_y: top as usize,
        buf_x: (left - rect.x as i64) as usize,
        buf_y: (top - rect.y as i64) as usize,
        cols: (right - left) as usize,
        rows: (bottom - top) as usize,
    })
}
