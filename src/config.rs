use std::path::PathBuf;

// ── MapConfig ─────────────────────────────────────────────────────────────────

/// Everything the viewer needs to know before it opens a window.
///
/// The defaults reproduce the classic layout: a 50 × 50 grid of 16 px tiles
/// with a 50 px status panel underneath, i.e. an 800 × 850 window.
#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
    /// Edge length of one square tile in pixels.
    pub tile_size: u32,
    /// Number of columns in the grid.
    pub grid_width: u32,
    /// Number of rows in the grid.
    pub grid_height: u32,
    /// Height of the status panel drawn below the grid.
    pub panel_height: u32,
    /// Folder scanned (non-recursively) for tile images.
    pub tileset_folder: PathBuf,
    /// Bitmap font atlas; its glyph map is the sibling `.json` file.
    pub font_path: PathBuf,
    /// Line height of the status label in pixels.
    pub font_size: f32,
    pub title: String,
    /// Fixed RNG seed for the grid; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_size:      16,
            grid_width:     50,
            grid_height:    50,
            panel_height:   50,
            tileset_folder: PathBuf::from("tilesets"),
            font_path:      PathBuf::from("assets/font.png"),
            font_size:      36.0,
            title:          "Tile Map".into(),
            seed:           None,
        }
    }
}

impl MapConfig {
    pub fn with_tile_size(mut self, tile_size: u32) -> Self { self.tile_size = tile_size; self }
    pub fn with_grid_size(mut self, width: u32, height: u32) -> Self {
        self.grid_width = width; self.grid_height = height; self
    }
    pub fn with_panel_height(mut self, height: u32) -> Self { self.panel_height = height; self }
    pub fn with_tileset_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.tileset_folder = path.into(); self
    }
    pub fn with_font(mut self, path: impl Into<PathBuf>, size: f32) -> Self {
        self.font_path = path.into(); self.font_size = size; self
    }
    pub fn with_title(mut self, title: &str) -> Self { self.title = title.into(); self }
    pub fn with_seed(mut self, seed: u64) -> Self { self.seed = Some(seed); self }

    /// Pixel size of the area covered by the grid, `(W*T, H*T)`.
    pub fn map_pixel_size(&self) -> (u32, u32) {
        (self.grid_width * self.tile_size, self.grid_height * self.tile_size)
    }

    /// Inner window size: the map plus the status panel below it.
    pub fn window_size(&self) -> (u32, u32) {
        let (w, h) = self.map_pixel_size();
        (w, h + self.panel_height)
    }

    /// Top-left corner of the status panel in window pixels.
    pub fn panel_origin(&self) -> [f32; 2] {
        [0.0, self.map_pixel_size().1 as f32]
    }
}
