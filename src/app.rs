use std::sync::Arc;

use glam::Vec2;
use log::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::catalog::TileCatalog;
use crate::config::MapConfig;
use crate::error::{Error, Result};
use crate::grid::{Grid, NO_TILE, generate_map};
use crate::renderer::Renderer;
use crate::renderer::font::{Font, FontAtlas};
use crate::view::{StatusBar, map_vertices};

// ── AppState ─────────────────────────────────────────────────────────────────

/// Lifecycle of the viewer.  `Quitting` is terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

impl AppState {
    /// The only transition: a close request moves `Running` to `Quitting`.
    pub fn on_close_requested(self) -> Self {
        AppState::Quitting
    }
}

/// Tile type under `cursor`, or [`NO_TILE`] when the cursor is outside the
/// window.
pub fn hovered_tile_type(grid: &Grid, cursor: Option<Vec2>, tile_size: u32) -> &str {
    cursor.map_or(NO_TILE, |pos| grid.tile_type_at(pos, tile_size))
}

// ── Startup ──────────────────────────────────────────────────────────────────

/// Everything loaded from disk before a window exists.
struct Assets {
    font: FontAtlas,
    catalog: TileCatalog,
    grid: Grid,
}

impl Assets {
    fn load(config: &MapConfig) -> Result<Self> {
        let font = FontAtlas::load(&config.font_path)?;
        let catalog = TileCatalog::load_non_empty(&config.tileset_folder)?;
        let grid = generate_map(&catalog, config)?;
        Ok(Self { font, catalog, grid })
    }
}

/// Live state once the window and renderer are up.
struct Session {
    renderer: Renderer,
    font: Font,
    grid: Grid,
    status_bar: StatusBar,
    /// Last cursor position in window pixels; `None` while outside.
    cursor: Option<Vec2>,
}

impl Session {
    fn start(event_loop: &ActiveEventLoop, config: &MapConfig, assets: Assets) -> Result<Self> {
        let (width, height) = config.window_size();
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(&config.title)
                        .with_inner_size(winit::dpi::PhysicalSize::new(width, height))
                        .with_resizable(false),
                )
                .map_err(|e| Error::Window(e.to_string()))?,
        );
        info!("window: {width}x{height} \"{}\"", config.title);

        let Assets { font, catalog, grid } = assets;
        let mut renderer =
            pollster::block_on(Renderer::new(window, &catalog, &font, config.tile_size))?;
        // Decoded tile images are on the GPU now.
        drop(catalog);

        let map = map_vertices(&grid, &renderer.tile_atlas().regions, config.tile_size);
        renderer.set_map(&map);

        Ok(Self {
            renderer,
            font: font.font,
            grid,
            status_bar: StatusBar::new(config),
            cursor: None,
        })
    }

    fn redraw(&mut self, tile_size: u32) {
        let tile_type = hovered_tile_type(&self.grid, self.cursor, tile_size);
        self.status_bar.set_tile_type(&self.font, tile_type);

        match self.renderer.render(self.status_bar.background(), self.status_bar.label()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.renderer.recover_surface();
            }
            Err(e) => warn!("render error: {e}"),
        }
    }
}

// ── App (winit ApplicationHandler) ───────────────────────────────────────────

struct App {
    config: MapConfig,
    state: AppState,
    /// Loaded assets waiting for the first `resumed`.
    pending: Option<Assets>,
    session: Option<Session>,
    /// First fatal error; reported by [`run`] once the loop returns.
    failure: Option<Error>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        self.failure.get_or_insert(err);
        self.state = AppState::Quitting;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(assets) = self.pending.take() else { return };
        match Session::start(event_loop, &self.config, assets) {
            Ok(session) => {
                self.session = Some(session);
                self.state = AppState::Running;
                debug!("state: Running");
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.state != AppState::Running {
            return;
        }
        if let Some(session) = self.session.as_ref() {
            session.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(session) = self.session.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => {
                self.state = self.state.on_close_requested();
                debug!("state: Quitting");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => session.renderer.resize(size),

            WindowEvent::CursorMoved { position, .. } => {
                session.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::CursorLeft { .. } => session.cursor = None,

            WindowEvent::RedrawRequested if self.state == AppState::Running => {
                session.redraw(self.config.tile_size);
            }

            _ => {}
        }
    }
}

// ── run ──────────────────────────────────────────────────────────────────────

/// Load the assets, open the window and run until it is closed.
///
/// Every startup failure is returned before or instead of entering the loop;
/// GPU resources, the window and the event loop are released on all paths.
pub fn run(config: MapConfig) -> Result<()> {
    let assets = Assets::load(&config)?;

    let event_loop = EventLoop::new()?;
    let mut app = App {
        config,
        state: AppState::Running,
        pending: Some(assets),
        session: None,
        failure: None,
    };
    event_loop.run_app(&mut app)?;

    // Tear down the renderer (and its window) before reporting.
    app.session = None;
    match app.failure.take() {
        Some(err) => Err(err),
        None => {
            info!("quit");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_request_is_terminal() {
        assert_eq!(AppState::Running.on_close_requested(), AppState::Quitting);
        assert_eq!(AppState::Quitting.on_close_requested(), AppState::Quitting);
    }

    #[test]
    fn cursor_outside_window_reports_no_tile() {
        let grid = Grid::from_rows(&[&["grass"]]).unwrap();
        assert_eq!(hovered_tile_type(&grid, None, 16), NO_TILE);
        assert_eq!(hovered_tile_type(&grid, Some(Vec2::new(3.0, 3.0)), 16), "grass");
    }
}
