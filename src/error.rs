// One error type for the whole app.
// Every variant states *where* things went wrong.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// The canvas could not be made paintable (zero or oversized surface)
    #[error("Rendering context unavailable: {0}")]
    ContextUnavailable(String),

    /// Bad command-line value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// PNG encoding failed
    #[error("Image encode error: {0}")]
    Encode(#[from] image::ImageError),

    /// Writing the exported file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The export target refused the payload
    #[error("Export error: {0}")]
    Export(String),
}
