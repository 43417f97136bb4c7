use std::sync::Arc;

use glam::{UVec2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::TileCatalog;
use crate::config::MapConfig;
use crate::error::{Error, Result};

/// Tile type reported by hit-testing when the point is outside the grid.
pub const NO_TILE: &str = "None";

/// The only tile type that cannot be walked on.
pub const WATER: &str = "water";

// ── Tile ──────────────────────────────────────────────────────────────────────

/// One grid cell.  The texture is looked up by `tile_type` in the catalog /
/// atlas, so cells only carry the (shared) name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub tile_type: Arc<str>,
    pub walkable: bool,
}

impl Tile {
    pub fn new(tile_type: Arc<str>) -> Self {
        let walkable = &*tile_type != WATER;
        Self { tile_type, walkable }
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Fixed-size, row-major grid of tiles.  Fully populated on creation and
/// never mutated afterwards.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Tile>,
}

impl Grid {
    /// Fill a `width × height` grid by drawing every cell independently and
    /// uniformly from `tile_types`.
    ///
    /// The draw indexes into `tile_types` as given, so pass a stable order
    /// (e.g. [`TileCatalog::tile_types`](crate::catalog::TileCatalog::tile_types))
    /// if the same seed should reproduce the same grid.
    pub fn generate<S, R>(tile_types: &[S], width: u32, height: u32, rng: &mut R) -> Result<Self>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        if tile_types.is_empty() {
            return Err(Error::NoTileTypes);
        }

        let palette: Vec<Tile> = tile_types
            .iter()
            .map(|t| Tile::new(Arc::from(t.as_ref())))
            .collect();

        let count = width as usize * height as usize;
        let cells = (0..count)
            .map(|_| palette[rng.gen_range(0..palette.len())].clone())
            .collect();

        Ok(Self { width, height, cells })
    }

    /// Build a grid from explicit rows, e.g. for fixtures.  Every row must be
    /// `width` long; returns `None` when the rows are ragged.
    pub fn from_rows(rows: &[&[&str]]) -> Option<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        if rows.iter().any(|r| r.len() as u32 != width) {
            return None;
        }
        let cells = rows
            .iter()
            .flat_map(|r| r.iter().map(|t| Tile::new(Arc::from(*t))))
            .collect();
        Some(Self { width, height, cells })
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn len(&self) -> usize { self.cells.len() }
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    pub fn get(&self, x: u32, y: u32) -> Option<&Tile> {
        if x < self.width && y < self.height {
            self.cells.get((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Iterate `(x, y, tile)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &Tile)> {
        let w = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, t)| (i as u32 % w, i as u32 / w, t))
    }

    // ── Hit-testing ──────────────────────────────────────────────────────────

    /// Map a window pixel to the grid cell containing it.
    ///
    /// Negative coordinates and anything at or beyond `width * tile_size` /
    /// `height * tile_size` yield `None`.
    pub fn cell_at_pixel(&self, pos: Vec2, tile_size: u32) -> Option<UVec2> {
        if tile_size == 0 || pos.x < 0.0 || pos.y < 0.0 || !pos.is_finite() {
            return None;
        }
        let cell = (pos / tile_size as f32).floor();
        let (cx, cy) = (cell.x as u32, cell.y as u32);
        (cx < self.width && cy < self.height).then_some(UVec2::new(cx, cy))
    }

    pub fn tile_at_pixel(&self, pos: Vec2, tile_size: u32) -> Option<&Tile> {
        let cell = self.cell_at_pixel(pos, tile_size)?;
        self.get(cell.x, cell.y)
    }

    /// Tile type under `pos`, or [`NO_TILE`].
    pub fn tile_type_at(&self, pos: Vec2, tile_size: u32) -> &str {
        self.tile_at_pixel(pos, tile_size)
            .map_or(NO_TILE, |t| &*t.tile_type)
    }
}

/// Generate the grid described by `config` from every type in `catalog`.
///
/// Uses `config.seed` when set, otherwise a fresh random seed.  The seed is
/// logged either way so a map can be reproduced.
pub fn generate_map(catalog: &TileCatalog, config: &MapConfig) -> Result<Grid> {
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!(
        "grid: generating {}x{} map with seed {seed}",
        config.grid_width, config.grid_height
    );
    let mut rng = StdRng::seed_from_u64(seed);
    Grid::generate(&catalog.tile_types(), config.grid_width, config.grid_height, &mut rng)
}
