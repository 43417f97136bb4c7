//! CPU-side frame building: turns the grid, the status panel and the status
//! label into vertex lists for the renderer.  No GPU state, fully testable.

use std::collections::HashMap;

use crate::config::MapConfig;
use crate::grid::Grid;
use crate::renderer::font::{Font, GlyphQuad, layout_text};
use crate::renderer::pipeline::TileVertex;
use crate::renderer::tile_atlas::AtlasRegion;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
}

/// Padding between the panel's top-left corner and the label.
pub const LABEL_INSET: f32 = 10.0;

/// Text shown in the status panel for the hovered tile type.
pub fn status_text(tile_type: &str) -> String {
    format!("Tile Type: {tile_type}")
}

// ── Quad helpers ─────────────────────────────────────────────────────────────

/// Append two triangles covering `[min, max]` (TL, BL, TR, TR, BL, BR).
fn push_quad(
    out: &mut Vec<TileVertex>,
    min: [f32; 2],
    max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: Color,
    fill: f32,
) {
    let v = |position: [f32; 2], uv: [f32; 2]| TileVertex { position, uv, color: color.0, fill };
    let tl = v(min, uv_min);
    let tr = v([max[0], min[1]], [uv_max[0], uv_min[1]]);
    let bl = v([min[0], max[1]], [uv_min[0], uv_max[1]]);
    let br = v(max, uv_max);
    out.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
}

/// Solid rectangle, texture ignored.
pub fn rect_vertices(origin: [f32; 2], size: [f32; 2], color: Color) -> Vec<TileVertex> {
    let mut out = Vec::with_capacity(6);
    push_quad(
        &mut out,
        origin,
        [origin[0] + size[0], origin[1] + size[1]],
        [0.0; 2],
        [0.0; 2],
        color,
        1.0,
    );
    out
}

/// Textured quads for every cell, at `(x * tile_size, y * tile_size)`.
///
/// Cells whose type has no atlas region are skipped.
pub fn map_vertices(
    grid: &Grid,
    regions: &HashMap<String, AtlasRegion>,
    tile_size: u32,
) -> Vec<TileVertex> {
    let ts = tile_size as f32;
    let mut out = Vec::with_capacity(grid.len() * 6);
    for (x, y, tile) in grid.iter() {
        let Some(region) = regions.get(&*tile.tile_type) else {
            continue;
        };
        let min = [x as f32 * ts, y as f32 * ts];
        push_quad(
            &mut out,
            min,
            [min[0] + ts, min[1] + ts],
            region.uv_min,
            region.uv_max,
            Color::WHITE,
            0.0,
        );
    }
    out
}

/// Glyph quads for `quads`, tinted `color`.
pub fn text_vertices(quads: &[GlyphQuad], color: Color) -> Vec<TileVertex> {
    let mut out = Vec::with_capacity(quads.len() * 6);
    for q in quads {
        push_quad(&mut out, q.pos_min, q.pos_max, q.uv_min, q.uv_max, color, 0.0);
    }
    out
}

// ── StatusBar ────────────────────────────────────────────────────────────────

/// The panel below the map and its label.
///
/// The panel background never changes, so it is built once; the label mesh is
/// rebuilt only when the hovered tile type changes.
pub struct StatusBar {
    origin: [f32; 2],
    background: Vec<TileVertex>,
    font_size: f32,
    shown: Option<String>,
    label: Vec<TileVertex>,
}

impl StatusBar {
    pub fn new(config: &MapConfig) -> Self {
        let origin = config.panel_origin();
        let width = config.map_pixel_size().0 as f32;
        let background = rect_vertices(origin, [width, config.panel_height as f32], Color::BLACK);
        Self {
            origin,
            background,
            font_size: config.font_size,
            shown: None,
            label: Vec::new(),
        }
    }

    pub fn background(&self) -> &[TileVertex] {
        &self.background
    }

    /// Point the label at `tile_type`; the mesh is rebuilt only on change.
    pub fn set_tile_type(&mut self, font: &Font, tile_type: &str) {
        if self.shown.as_deref() == Some(tile_type) {
            return;
        }
        let at = [self.origin[0] + LABEL_INSET, self.origin[1] + LABEL_INSET];
        let quads = layout_text(&status_text(tile_type), font, at, self.font_size);
        self.label = text_vertices(&quads, Color::WHITE);
        self.shown = Some(tile_type.to_string());
    }

    pub fn label(&self) -> &[TileVertex] {
        &self.label
    }
}
