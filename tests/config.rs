use tilemap::MapConfig;

#[test]
fn default_window_is_800x850() {
    let cfg = MapConfig::default();
    assert_eq!(cfg.window_size(), (800, 850));
    assert_eq!(cfg.title, "Tile Map");
}

#[test]
fn default_map_is_50x50_of_16px_tiles() {
    let cfg = MapConfig::default();
    assert_eq!((cfg.grid_width, cfg.grid_height, cfg.tile_size), (50, 50, 16));
    assert_eq!(cfg.map_pixel_size(), (800, 800));
    assert!(cfg.seed.is_none());
}

#[test]
fn panel_sits_directly_below_the_map() {
    let cfg = MapConfig::default().with_grid_size(10, 5).with_tile_size(32);
    assert_eq!(cfg.panel_origin(), [0.0, 160.0]);
    assert_eq!(cfg.window_size(), (320, 210));
}

#[test]
fn builders_override_fields() {
    let cfg = MapConfig::default()
        .with_panel_height(20)
        .with_tileset_folder("assets/tiles")
        .with_font("assets/mono.png", 18.0)
        .with_title("Islands")
        .with_seed(1234);
    assert_eq!(cfg.panel_height, 20);
    assert_eq!(cfg.tileset_folder, std::path::PathBuf::from("assets/tiles"));
    assert_eq!(cfg.font_path, std::path::PathBuf::from("assets/mono.png"));
    assert_eq!(cfg.font_size, 18.0);
    assert_eq!(cfg.title, "Islands");
    assert_eq!(cfg.seed, Some(1234));
    assert_eq!(cfg.window_size(), (800, 820));
}
