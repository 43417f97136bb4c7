use std::fs;
use std::path::Path;

use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, Rgba, RgbaImage};
use tempfile::TempDir;
use tilemap::{Error, TileCatalog};

// ── helpers ───────────────────────────────────────────────────────────────────

fn write_png(dir: &Path, name: &str, w: u32, h: u32) {
    RgbaImage::from_pixel(w, h, Rgba([10, 200, 30, 255]))
        .save(dir.join(name))
        .unwrap();
}

fn write_webp(dir: &Path, name: &str, colour: [u8; 4]) {
    let img = RgbaImage::from_pixel(16, 16, Rgba(colour));
    let file = fs::File::create(dir.join(name)).unwrap();
    WebPEncoder::new_lossless(file)
        .encode(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
        .unwrap();
}

fn tileset(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        write_png(dir.path(), name, 16, 16);
    }
    dir
}

// ── load_folder ───────────────────────────────────────────────────────────────

#[test]
fn every_image_becomes_a_tile_type() {
    let dir = tileset(&["grass.png", "water.png", "rock.png"]);
    let cat = TileCatalog::load_folder(dir.path()).unwrap();
    assert_eq!(cat.len(), 3);
    assert_eq!(cat.tile_types(), vec!["grass", "rock", "water"]);
}

#[test]
fn webp_tiles_are_loaded() {
    let dir = TempDir::new().unwrap();
    write_webp(dir.path(), "grass.webp", [20, 180, 40, 255]);
    write_webp(dir.path(), "water.webp", [30, 60, 220, 255]);
    write_webp(dir.path(), "rock.WEBP", [120, 120, 120, 255]);
    let cat = TileCatalog::load_folder(dir.path()).unwrap();
    assert_eq!(cat.tile_types(), vec!["grass", "rock", "water"]);
    let water = cat.get("water").unwrap();
    assert_eq!(water.dimensions(), (16, 16));
    assert_eq!(water.get_pixel(8, 8), &Rgba([30, 60, 220, 255]));
}

#[test]
fn webp_and_png_mix_in_one_folder() {
    let dir = tileset(&["sand.png"]);
    write_webp(dir.path(), "grass.webp", [20, 180, 40, 255]);
    let cat = TileCatalog::load_folder(dir.path()).unwrap();
    assert_eq!(cat.tile_types(), vec!["grass", "sand"]);
}

#[test]
fn images_are_decoded_to_rgba() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "sand.png", 8, 4);
    let cat = TileCatalog::load_folder(dir.path()).unwrap();
    let img = cat.get("sand").unwrap();
    assert_eq!(img.dimensions(), (8, 4));
    assert_eq!(img.get_pixel(0, 0), &Rgba([10, 200, 30, 255]));
}

#[test]
fn extension_match_is_case_insensitive() {
    let dir = tileset(&["lava.PNG"]);
    let cat = TileCatalog::load_folder(dir.path()).unwrap();
    assert!(cat.contains("lava"));
}

#[test]
fn unsupported_files_are_ignored() {
    let dir = tileset(&["grass.png"]);
    fs::write(dir.path().join("notes.txt"), "not a tile").unwrap();
    fs::write(dir.path().join("snow.bmp"), b"BM").unwrap();
    let cat = TileCatalog::load_folder(dir.path()).unwrap();
    assert_eq!(cat.tile_types(), vec!["grass"]);
}

#[test]
fn subdirectories_are_not_scanned() {
    let dir = tileset(&["grass.png"]);
    let nested = dir.path().join("extra");
    fs::create_dir(&nested).unwrap();
    write_png(&nested, "water.png", 16, 16);
    let cat = TileCatalog::load_folder(dir.path()).unwrap();
    assert_eq!(cat.tile_types(), vec!["grass"]);
}

#[test]
fn undecodable_file_is_skipped() {
    let dir = tileset(&["grass.png"]);
    fs::write(dir.path().join("broken.png"), b"definitely not a png").unwrap();
    let cat = TileCatalog::load_folder(dir.path()).unwrap();
    assert_eq!(cat.tile_types(), vec!["grass"]);
}

#[test]
fn first_file_name_wins_for_duplicate_stems() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "grass.PNG", 4, 4);
    write_png(dir.path(), "grass.png", 8, 8);
    let cat = TileCatalog::load_folder(dir.path()).unwrap();
    assert_eq!(cat.len(), 1);
    // "grass.PNG" sorts before "grass.png".
    assert_eq!(cat.get("grass").unwrap().dimensions(), (4, 4));
}

#[test]
fn empty_folder_loads_an_empty_catalog() {
    let dir = TempDir::new().unwrap();
    let cat = TileCatalog::load_folder(dir.path()).unwrap();
    assert!(cat.is_empty());
}

#[test]
fn missing_folder_is_a_tileset_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    match TileCatalog::load_folder(&missing) {
        Err(Error::TilesetDir { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected TilesetDir, got {other:?}"),
    }
}

// ── load_non_empty ────────────────────────────────────────────────────────────

#[test]
fn load_non_empty_rejects_folder_without_tiles() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("readme.txt"), "").unwrap();
    let err = TileCatalog::load_non_empty(dir.path()).unwrap_err();
    assert!(matches!(err, Error::EmptyCatalog { .. }), "{err}");
    assert!(err.to_string().contains("no usable tiles"));
}

#[test]
fn load_non_empty_passes_through_a_populated_folder() {
    let dir = tileset(&["grass.png", "water.png"]);
    let cat = TileCatalog::load_non_empty(dir.path()).unwrap();
    assert_eq!(cat.len(), 2);
}
