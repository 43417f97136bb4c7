use std::fmt;
use std::path::PathBuf;

/// Everything that can stop the viewer before (or while) the window is up.
///
/// Per-file decode failures inside the tileset folder are *not* represented
/// here; the catalog loader logs and skips those.
#[derive(Debug)]
pub enum Error {
    /// The platform event loop could not be created or exited abnormally.
    EventLoop(winit::error::EventLoopError),
    /// Window creation failed.
    Window(String),
    /// No adapter, no device, or no usable surface.
    Graphics(String),
    /// Font atlas image or glyph map missing / malformed.
    Font { path: PathBuf, reason: String },
    /// The tileset directory itself could not be read.
    TilesetDir { path: PathBuf, source: walkdir::Error },
    /// The tileset directory yielded no decodable tiles.
    EmptyCatalog { path: PathBuf },
    /// Grid generation was asked to draw from an empty set of tile types.
    NoTileTypes,
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EventLoop(e) => write!(f, "event loop error: {e}"),
            Error::Window(msg) => write!(f, "could not create window: {msg}"),
            Error::Graphics(msg) => write!(f, "graphics initialisation failed: {msg}"),
            Error::Font { path, reason } => {
                write!(f, "failed to load font {}: {reason}", path.display())
            }
            Error::TilesetDir { path, source } => {
                write!(f, "cannot read tileset folder {}: {source}", path.display())
            }
            Error::EmptyCatalog { path } => {
                write!(f, "no usable tiles found in {}", path.display())
            }
            Error::NoTileTypes => write!(f, "cannot generate a grid from an empty tile set"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::EventLoop(e) => Some(e),
            Error::TilesetDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<winit::error::EventLoopError> for Error {
    fn from(e: winit::error::EventLoopError) -> Self {
        Error::EventLoop(e)
    }
}
