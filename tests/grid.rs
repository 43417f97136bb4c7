use glam::{UVec2, Vec2};
use image::RgbaImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tilemap::grid::{WATER, generate_map};
use tilemap::{Error, Grid, MapConfig, NO_TILE, TileCatalog};

const TYPES: [&str; 3] = ["grass", "rock", "water"];

fn seeded(seed: u64, w: u32, h: u32) -> Grid {
    let mut rng = StdRng::seed_from_u64(seed);
    Grid::generate(&TYPES, w, h, &mut rng).unwrap()
}

// ── Generation ────────────────────────────────────────────────────────────────

#[test]
fn grid_has_width_times_height_cells() {
    let g = seeded(7, 50, 50);
    assert_eq!(g.width(), 50);
    assert_eq!(g.height(), 50);
    assert_eq!(g.len(), 2500);
}

#[test]
fn every_cell_uses_a_known_type() {
    let g = seeded(3, 20, 10);
    assert!(g.iter().all(|(_, _, t)| TYPES.contains(&&*t.tile_type)));
}

#[test]
fn walkability_follows_water() {
    let g = seeded(11, 30, 30);
    for (_, _, t) in g.iter() {
        assert_eq!(t.walkable, &*t.tile_type != WATER);
    }
}

#[test]
fn same_seed_same_grid() {
    let a = seeded(42, 16, 16);
    let b = seeded(42, 16, 16);
    let ta: Vec<&str> = a.iter().map(|(_, _, t)| &*t.tile_type).collect();
    let tb: Vec<&str> = b.iter().map(|(_, _, t)| &*t.tile_type).collect();
    assert_eq!(ta, tb);
}

#[test]
fn large_grid_draws_every_type() {
    let g = seeded(5, 50, 50);
    for ty in TYPES {
        assert!(g.iter().any(|(_, _, t)| &*t.tile_type == ty), "{ty} never drawn");
    }
}

#[test]
fn empty_type_set_is_an_error() {
    let mut rng = StdRng::seed_from_u64(1);
    let none: [&str; 0] = [];
    let err = Grid::generate(&none, 4, 4, &mut rng).unwrap_err();
    assert!(matches!(err, Error::NoTileTypes));
}

#[test]
fn generate_map_uses_config_size_and_seed() {
    let mut catalog = TileCatalog::default();
    for ty in TYPES {
        catalog.insert(ty, RgbaImage::new(16, 16));
    }
    let config = MapConfig::default().with_grid_size(12, 9).with_seed(99);

    let a = generate_map(&catalog, &config).unwrap();
    let b = generate_map(&catalog, &config).unwrap();
    assert_eq!((a.width(), a.height()), (12, 9));
    assert!(a.iter().zip(b.iter()).all(|(x, y)| x.2 == y.2));
}

#[test]
fn generate_map_with_empty_catalog_fails() {
    let config = MapConfig::default().with_seed(1);
    assert!(generate_map(&TileCatalog::default(), &config).is_err());
}

// ── Hit-testing ───────────────────────────────────────────────────────────────

fn scenario() -> Grid {
    // 2x2 map: grass water / rock grass
    Grid::from_rows(&[&["grass", "water"], &["rock", "grass"]]).unwrap()
}

#[test]
fn hovering_reports_the_cell_type() {
    let g = scenario();
    assert_eq!(g.tile_type_at(Vec2::new(5.0, 5.0), 16), "grass");
    assert_eq!(g.tile_type_at(Vec2::new(20.0, 5.0), 16), "water");
    assert_eq!(g.tile_type_at(Vec2::new(5.0, 20.0), 16), "rock");
    assert_eq!(g.tile_type_at(Vec2::new(31.0, 31.0), 16), "grass");
}

#[test]
fn water_at_origin_is_reported_and_not_walkable() {
    let g = Grid::from_rows(&[&["water", "grass"], &["rock", "grass"]]).unwrap();
    assert_eq!(g.tile_type_at(Vec2::new(0.0, 0.0), 16), "water");
    let origin = g.tile_at_pixel(Vec2::new(0.0, 0.0), 16).unwrap();
    assert!(!origin.walkable);
    assert!(g.get(1, 0).unwrap().walkable);
    assert!(g.get(0, 1).unwrap().walkable);
}

#[test]
fn cell_origin_maps_back_to_its_cell() {
    let g = seeded(8, 50, 50);
    for (x, y, t) in g.iter() {
        let pos = Vec2::new((x * 16) as f32, (y * 16) as f32);
        assert_eq!(g.cell_at_pixel(pos, 16), Some(UVec2::new(x, y)));
        assert_eq!(g.tile_type_at(pos, 16), &*t.tile_type);
    }
}

#[test]
fn pixels_past_the_grid_report_no_tile() {
    let g = scenario();
    assert_eq!(g.tile_type_at(Vec2::new(32.0, 0.0), 16), NO_TILE);
    assert_eq!(g.tile_type_at(Vec2::new(0.0, 32.0), 16), NO_TILE);
    // The status panel below the map.
    assert_eq!(g.tile_type_at(Vec2::new(10.0, 40.0), 16), NO_TILE);
}

#[test]
fn negative_pixels_report_no_tile() {
    let g = scenario();
    assert_eq!(g.tile_type_at(Vec2::new(-1.0, 5.0), 16), NO_TILE);
    assert_eq!(g.tile_type_at(Vec2::new(5.0, -20.0), 16), NO_TILE);
}

#[test]
fn default_layout_panel_is_outside_the_map() {
    let config = MapConfig::default();
    let g = seeded(2, config.grid_width, config.grid_height);
    assert_ne!(g.tile_type_at(Vec2::new(799.0, 799.0), config.tile_size), NO_TILE);
    assert_eq!(g.tile_type_at(Vec2::new(400.0, 820.0), config.tile_size), NO_TILE);
}
