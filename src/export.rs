// "Save drawing": PNG-encode the canvas and hand it to a file sink.
// Visual: nothing changes on the canvas; a drawing.png appears on disk.

use crate::error::{Error, Result};
use crate::surface::Surface;
use crate::types::PixelBuffer;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::fs;
use std::path::{Path, PathBuf};

/// Every export lands under this name.
pub const EXPORT_FILENAME: &str = "drawing.png";

/// Somewhere an encoded image can be saved to.
pub trait ImageSink {
    /// Store `payload` as `filename`; returns where it ended up.
    fn save(&mut self, payload: &[u8], filename: &str) -> Result<PathBuf>;
}

/// Writes files into one directory (created on first save).
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSink for DirectorySink {
    fn save(&mut self, payload: &[u8], filename: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, payload)?;
        Ok(path)
    }
}

/// Lossless RGBA PNG of `pixels`.
pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out).write_image(
        pixels.as_bytes(),
        pixels.width(),
        pixels.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(out)
}

/// Encode + save, reporting the first failure.
pub fn try_export_image<S, K>(surface: &S, sink: &mut K) -> Result<PathBuf>
where
    S: Surface + ?Sized,
    K: ImageSink + ?Sized,
{
    let png = surface.to_png()?;
    if png.is_empty() {
        return Err(Error::Export("encoder produced no bytes".into()));
    }
    sink.save(&png, EXPORT_FILENAME)
}

/// Export the canvas. Failures are logged and swallowed: the user simply
/// gets no file, the app keeps running.
pub fn export_image<S, K>(surface: &S, sink: &mut K) -> Option<PathBuf>
where
    S: Surface + ?Sized,
    K: ImageSink + ?Sized,
{
    match try_export_image(surface, sink) {
        Ok(path) => {
            tracing::info!(path = %path.display(), "saved drawing");
            Some(path)
        }
        Err(e) => {
            tracing::error!("Error saving drawing: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RasterSurface;
    use crate::types::{Point, Rgba};

    struct BrokenSink;

    impl ImageSink for BrokenSink {
        fn save(&mut self, _payload: &[u8], _filename: &str) -> Result<PathBuf> {
            Err(Error::Export("disk on fire".into()))
        }
    }

    #[test]
    fn export_writes_decodable_png_with_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = RasterSurface::new(32, 16).unwrap();
        surface.draw_line(Point::new(4.0, 8.0), Point::new(28.0, 8.0));

        let mut sink = DirectorySink::new(dir.path().join("out"));
        let path = export_image(&surface, &mut sink).expect("export should succeed");
        assert_eq!(path.file_name().unwrap(), EXPORT_FILENAME);

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (32, 16));
        assert_eq!(decoded.get_pixel(16, 8).0, Rgba::BLACK.to_array());
        assert_eq!(decoded.get_pixel(16, 0).0, Rgba::TRANSPARENT.to_array());
    }

    #[test]
    fn second_export_overwrites_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = RasterSurface::new(8, 8).unwrap();
        let mut sink = DirectorySink::new(dir.path());
        let first = export_image(&surface, &mut sink).unwrap();

        surface.draw_line(Point::new(0.0, 4.0), Point::new(8.0, 4.0));
        let second = export_image(&surface, &mut sink).unwrap();
        assert_eq!(first, second);
        let decoded = image::open(&second).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(4, 4).0, Rgba::BLACK.to_array());
    }

    #[test]
    fn failing_sink_is_swallowed() {
        let surface = RasterSurface::new(8, 8).unwrap();
        assert!(export_image(&surface, &mut BrokenSink).is_none());
        assert!(matches!(
            try_export_image(&surface, &mut BrokenSink),
            Err(Error::Export(_))
        ));
    }

    #[test]
    fn unwritable_directory_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"not a dir").unwrap();

        let surface = RasterSurface::new(8, 8).unwrap();
        let mut sink = DirectorySink::new(blocker.join("nested"));
        assert!(export_image(&surface, &mut sink).is_none());
    }
}
