// Core types shared by the canvas, the history and the window shell.

/// What the window shows. Each entry is 0x00RRGGBB for minifb.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Reallocate when the window was resized; keeps the buffer otherwise.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }
}

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };
    /// The value an empty (cleared) canvas pixel holds.
    #[cfg(test)]
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[cfg(test)]
    pub const fn from_array(px: [u8; 4]) -> Self {
        Self { r: px[0], g: px[1], b: px[2], a: px[3] }
    }

    /// Parse CSS-style hex colors: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`.
    /// The leading `#` is optional.
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self { r: nib(0)?, g: nib(1)?, b: nib(2)?, a: 255 }),
            4 => Some(Self { r: nib(0)?, g: nib(1)?, b: nib(2)?, a: nib(3)? }),
            6 => Some(Self { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: 255 }),
            8 => Some(Self { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => None,
        }
    }
}

/// A position in floating point pixels (either device or surface-local).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Integer pixel rectangle on the surface (for clear / read).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Where the surface currently sits on screen, in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// How the ends of a line segment are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat, ends exactly at the endpoints.
    Butt,
    /// Half-disc around each endpoint.
    #[default]
    Round,
    /// Flat, extended by half the width past each endpoint.
    Square,
}

/// Everything the pen needs to paint a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenStyle {
    pub width: f32,
    pub cap: LineCap,
    pub color: Rgba,
}

impl Default for PenStyle {
    fn default() -> Self {
        Self { width: 5.0, cap: LineCap::Round, color: Rgba::BLACK }
    }
}

/// Owned RGBA bytes tagged with their size. Row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize) * 4;
        Self { width, height, data: vec![0u8; len] }
    }

    /// Like `new`, but reports allocation failure instead of aborting.
    pub fn try_new(width: u32, height: u32) -> Option<Self> {
        let len = (width as usize).checked_mul(height as usize)?.checked_mul(4)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).ok()?;
        data.resize(len, 0);
        Some(Self { width, height, data })
    }

    /// Wrap raw bytes; `None` when the length does not match the size.
    #[cfg(test)]
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Rgba::from_array([self.data[idx], self.data[idx + 1], self.data[idx + 2], self.data[idx + 3]])
    }

    /// True when every pixel equals `color`.
    #[cfg(test)]
    pub fn is_uniform(&self, color: Rgba) -> bool {
        let want = color.to_array();
        self.data.chunks_exact(4).all(|px| px == want)
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_shorthand_matches_css() {
        assert_eq!(Rgba::from_hex("#000"), Some(Rgba::BLACK));
        assert_eq!(Rgba::from_hex("fff"), Some(Rgba::WHITE));
        assert_eq!(
            Rgba::from_hex("#ff880080"),
            Some(Rgba { r: 0xff, g: 0x88, b: 0x00, a: 0x80 })
        );
        assert_eq!(Rgba::from_hex("#f808"), Some(Rgba { r: 0xff, g: 0x88, b: 0x00, a: 0x88 }));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert_eq!(Rgba::from_hex(""), None);
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::from_hex("#zzz"), None);
        assert_eq!(Rgba::from_hex("#é12"), None);
    }

    #[test]
    fn pixel_buffer_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_some());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 15]).is_none());
        assert!(PixelBuffer::new(3, 1).is_uniform(Rgba::TRANSPARENT));
        assert_eq!(PixelBuffer::try_new(3, 1), Some(PixelBuffer::new(3, 1)));
    }
}
