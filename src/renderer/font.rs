use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use serde::Deserialize;

use crate::error::{Error, Result};

// ── Glyph ────────────────────────────────────────────────────────────────────

/// Metrics for a single character in the bitmap font atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Top-left pixel X of the glyph region in the atlas.
    pub x: u32,
    /// Top-left pixel Y of the glyph region in the atlas.
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Horizontal offset applied when rendering (may be negative).
    pub x_offset: i32,
    /// Vertical offset applied when rendering (may be negative).
    pub y_offset: i32,
    /// How far to advance the cursor after drawing this glyph.
    pub x_advance: u32,
}

// ── Font ─────────────────────────────────────────────────────────────────────

/// A bitmap font: glyph metrics plus the dimensions of the atlas they index.
#[derive(Debug, Clone)]
pub struct Font {
    pub glyphs: HashMap<char, Glyph>,
    /// Vertical distance between successive baselines in pixels.
    pub line_height: u32,
    pub texture_width: u32,
    pub texture_height: u32,
}

impl Font {
    /// Parse a glyph map.  Two layouts are accepted:
    ///
    /// - the metrics format, an object with `line_height` and a `glyphs`
    ///   array of `{id, x, y, width, height, x_offset, y_offset, x_advance}`;
    /// - the atlas format, an object keyed by single characters with
    ///   `{x, y, w, h}` rectangles (uniform-grid fonts).
    ///
    /// An object with a `glyphs` key is read as the metrics format, so a
    /// malformed metrics file reports its own error.  The texture size always
    /// comes from the atlas image so the two can never disagree.
    pub fn parse(json: &str, texture_width: u32, texture_height: u32) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("glyphs").is_some() {
            let raw: RawFont = serde_json::from_value(value)?;
            Ok(Self::from_raw(raw, texture_width, texture_height))
        } else {
            Self::from_atlas_value(value, texture_width, texture_height)
        }
    }

    fn from_raw(raw: RawFont, texture_width: u32, texture_height: u32) -> Self {
        let glyphs = raw
            .glyphs
            .into_iter()
            .filter_map(|g| {
                // Skip any code-point that isn't a valid Unicode scalar value.
                char::from_u32(g.id).map(|ch| {
                    (ch, Glyph {
                        x: g.x,
                        y: g.y,
                        width: g.width,
                        height: g.height,
                        x_offset: g.x_offset,
                        y_offset: g.y_offset,
                        x_advance: g.x_advance,
                    })
                })
            })
            .collect();

        Self { glyphs, line_height: raw.line_height, texture_width, texture_height }
    }

    /// Atlas-format glyph map: `{ "A": { "x": 0, "y": 0, "w": 16, "h": 24 }, ... }`.
    /// `x_advance` is the glyph width and both offsets are zero.
    pub fn from_atlas_json(
        json: &str,
        texture_width: u32,
        texture_height: u32,
    ) -> serde_json::Result<Self> {
        Self::from_atlas_value(serde_json::from_str(json)?, texture_width, texture_height)
    }

    fn from_atlas_value(
        value: serde_json::Value,
        texture_width: u32,
        texture_height: u32,
    ) -> serde_json::Result<Self> {
        #[derive(Deserialize)]
        struct AtlasEntry { x: u32, y: u32, w: u32, h: u32 }

        let raw: HashMap<String, AtlasEntry> = serde_json::from_value(value)?;

        let line_height = raw.values().map(|e| e.h).max().unwrap_or(0);

        let glyphs = raw
            .into_iter()
            .filter_map(|(key, entry)| {
                // Only accept single-character keys.
                let mut chars = key.chars();
                let ch = chars.next()?;
                if chars.next().is_some() { return None; }

                Some((ch, Glyph {
                    x: entry.x,
                    y: entry.y,
                    width:    entry.w,
                    height:   entry.h,
                    x_offset: 0,
                    y_offset: 0,
                    x_advance: entry.w,
                }))
            })
            .collect();

        Ok(Self { glyphs, line_height, texture_width, texture_height })
    }
}

// ── FontAtlas ─────────────────────────────────────────────────────────────────

/// A font as loaded from disk: the atlas image and the parsed glyph map.
pub struct FontAtlas {
    pub font: Font,
    pub image: RgbaImage,
}

impl FontAtlas {
    /// Load `path` (the atlas image) and its sibling glyph map
    /// (`path` with a `.json` extension).  Any failure is a [`Error::Font`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let font_err = |reason: String| Error::Font { path: path.to_path_buf(), reason };

        let image = image::open(path)
            .map_err(|e| font_err(format!("atlas image: {e}")))?
            .to_rgba8();

        let glyph_path = path.with_extension("json");
        let json = std::fs::read_to_string(&glyph_path)
            .map_err(|e| font_err(format!("glyph map {}: {e}", glyph_path.display())))?;

        let font = Font::parse(&json, image.width(), image.height())
            .map_err(|e| font_err(format!("glyph map {}: {e}", glyph_path.display())))?;

        if font.glyphs.is_empty() || font.line_height == 0 {
            return Err(font_err("glyph map defines no glyphs".into()));
        }

        log::info!("font: {} glyph(s) from {}", font.glyphs.len(), path.display());
        Ok(Self { font, image })
    }
}

// ── Text layout ───────────────────────────────────────────────────────────────

/// One positioned glyph: a screen rectangle and the atlas UVs to fill it with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub pos_min: [f32; 2],
    pub pos_max: [f32; 2],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Lay out `text` starting at `origin` (top-left, pixels) with a line height
/// of `font_size` pixels.
///
/// `'\n'` returns to `origin.x` and moves down one line.  Characters absent
/// from the font are skipped without advancing.  Returns nothing when the
/// font has a zero line height.
pub fn layout_text(text: &str, font: &Font, origin: [f32; 2], font_size: f32) -> Vec<GlyphQuad> {
    if font.line_height == 0 {
        return Vec::new();
    }

    let scale = font_size / font.line_height as f32;
    let tw = font.texture_width.max(1) as f32;
    let th = font.texture_height.max(1) as f32;

    let mut quads = Vec::with_capacity(text.len());
    let [mut cx, mut cy] = origin;

    for ch in text.chars() {
        if ch == '\n' {
            cx = origin[0];
            cy += font.line_height as f32 * scale;
            continue;
        }

        let Some(glyph) = font.glyphs.get(&ch) else { continue };

        let x0 = cx + glyph.x_offset as f32 * scale;
        let y0 = cy + glyph.y_offset as f32 * scale;
        quads.push(GlyphQuad {
            pos_min: [x0, y0],
            pos_max: [x0 + glyph.width as f32 * scale, y0 + glyph.height as f32 * scale],
            uv_min: [glyph.x as f32 / tw, glyph.y as f32 / th],
            uv_max: [(glyph.x + glyph.width) as f32 / tw, (glyph.y + glyph.height) as f32 / th],
        });

        cx += glyph.x_advance as f32 * scale;
    }

    quads
}

// ── Raw (JSON-facing) types ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawGlyph {
    /// Unicode code point (e.g. 65 for 'A').
    id: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    #[serde(default)]
    x_offset: i32,
    #[serde(default)]
    y_offset: i32,
    x_advance: u32,
}

#[derive(Deserialize)]
struct RawFont {
    line_height: u32,
    glyphs: Vec<RawGlyph>,
}
