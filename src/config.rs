// Command-line flags and the validated settings the app runs with.

use crate::error::{Error, Result};
use crate::types::{LineCap, PenStyle, Rgba};
use clap::{Parser, ValueEnum};
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sketchpad", version, about = "Freehand drawing pad with undo/redo and PNG export")]
pub struct Cli {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Pen width in pixels
    #[arg(long, default_value_t = 5.0)]
    pub stroke_width: f32,

    /// Pen cap style
    #[arg(long, value_enum, default_value_t = CapArg::Round)]
    pub cap: CapArg,

    /// Pen color as hex (#000, #ff8800, #ff880080)
    #[arg(long, default_value = "#000")]
    pub color: String,

    /// Directory drawing.png is saved into
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Keep at most this many undo snapshots (unbounded when omitted)
    #[arg(long)]
    pub history_limit: Option<usize>,

    /// Verbose logging (RUST_LOG is honoured)
    #[arg(long)]
    pub debug: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CapArg {
    Butt,
    Round,
    Square,
}

impl From<CapArg> for LineCap {
    fn from(cap: CapArg) -> Self {
        match cap {
            CapArg::Butt => LineCap::Butt,
            CapArg::Round => LineCap::Round,
            CapArg::Square => LineCap::Square,
        }
    }
}

/// Settings after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchConfig {
    pub width: u32,
    pub height: u32,
    pub pen: PenStyle,
    pub export_dir: PathBuf,
    pub history_limit: Option<NonZeroUsize>,
    pub debug: bool,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            pen: PenStyle::default(),
            export_dir: PathBuf::from("."),
            history_limit: None,
            debug: false,
        }
    }
}

impl TryFrom<Cli> for SketchConfig {
    type Error = Error;

    fn try_from(cli: Cli) -> Result<Self> {
        let color = Rgba::from_hex(&cli.color)
            .ok_or_else(|| Error::Config(format!("bad color '{}'", cli.color)))?;
        if !(cli.stroke_width.is_finite() && cli.stroke_width > 0.0) {
            return Err(Error::Config(format!(
                "stroke width must be positive, got {}",
                cli.stroke_width
            )));
        }
        let history_limit = match cli.history_limit {
            None => None,
            // One slot would only ever hold the current state.
            Some(n) if n < 2 => {
                return Err(Error::Config(format!("history limit must be at least 2, got {n}")));
            }
            Some(n) => NonZeroUsize::new(n),
        };

        Ok(Self {
            width: cli.width,
            height: cli.height,
            pen: PenStyle { width: cli.stroke_width, cap: cli.cap.into(), color },
            export_dir: cli.export_dir,
            history_limit,
            debug: cli.debug,
        })
    }
}
