pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod grid;
pub mod renderer;
pub mod view;

pub use app::run;
pub use catalog::TileCatalog;
pub use config::MapConfig;
pub use error::{Error, Result};
pub use grid::{Grid, NO_TILE, Tile};
