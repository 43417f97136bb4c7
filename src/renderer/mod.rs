pub mod font;
pub mod pipeline;
pub mod tile_atlas;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::catalog::TileCatalog;
use crate::error::{Error, Result};
use font::FontAtlas;
use pipeline::{ProjectionUniform, TilePipeline, TileVertex, create_tile_pipeline};
use tile_atlas::{GpuTexture, TileAtlas, ensure_fits};

/// Owns the window surface and every GPU resource the viewer uses.
///
/// Fields drop in declaration order: buffers and textures first, then the
/// device, the surface, and finally the window.
pub struct Renderer {
    tile_atlas: TileAtlas,
    tile_bind_group: wgpu::BindGroup,
    _font_texture: GpuTexture,
    font_bind_group: wgpu::BindGroup,
    /// Static map geometry, uploaded once by [`Renderer::set_map`].
    map_buffer: Option<(wgpu::Buffer, u32)>,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    tile_pipeline: TilePipeline,
    config: wgpu::SurfaceConfiguration,
    queue: wgpu::Queue,
    device: wgpu::Device,
    surface: wgpu::Surface<'static>,
    pub window: Arc<Window>,
}

impl Renderer {
    /// Create the surface, pipeline, tile atlas and font texture for `window`.
    ///
    /// Tiles are baked at `tile_size` pixels.  Textures larger than the
    /// adapter allows are reported as [`Error::Graphics`].
    pub async fn new(
        window: Arc<Window>,
        catalog: &TileCatalog,
        font: &FontAtlas,
        tile_size: u32,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| Error::Graphics(format!("surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(|e| Error::Graphics(format!("no suitable GPU adapter: {e}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| Error::Graphics(format!("device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| Error::Graphics("surface reports no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let tile_pipeline = create_tile_pipeline(&device, format);

        let projection = ProjectionUniform::new(config.width as f32, config.height as f32);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&[projection]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bg"),
            layout: &tile_pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        let tile_atlas = TileAtlas::upload(&device, &queue, catalog, tile_size)?;
        let tile_bind_group = tile_atlas.texture.bind_group(
            &device,
            &tile_pipeline.texture_bind_group_layout,
            "tile_atlas_bg",
        );

        ensure_fits("font atlas", &font.image, device.limits().max_texture_dimension_2d)?;
        let font_texture = GpuTexture::from_rgba(&device, &queue, "font_atlas_tex", &font.image);
        let font_bind_group = font_texture.bind_group(
            &device,
            &tile_pipeline.texture_bind_group_layout,
            "font_atlas_bg",
        );

        log::info!(
            "renderer: {}x{} surface, format {:?}",
            config.width, config.height, config.format
        );

        Ok(Self {
            tile_atlas,
            tile_bind_group,
            _font_texture: font_texture,
            font_bind_group,
            map_buffer: None,
            projection_buffer,
            projection_bind_group,
            tile_pipeline,
            config,
            queue,
            device,
            surface,
            window,
        })
    }

    pub fn tile_atlas(&self) -> &TileAtlas {
        &self.tile_atlas
    }

    /// Upload the (immutable) map geometry once.
    pub fn set_map(&mut self, verts: &[TileVertex]) {
        if verts.is_empty() {
            self.map_buffer = None;
            return;
        }
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("map_vertex_buffer"),
            contents: bytemuck::cast_slice(verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.map_buffer = Some((buffer, verts.len() as u32));
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let projection = ProjectionUniform::new(new_size.width as f32, new_size.height as f32);
        self.queue
            .write_buffer(&self.projection_buffer, 0, bytemuck::cast_slice(&[projection]));
    }

    /// Render one frame.
    ///
    /// Draw order within the single render pass:
    /// 1. map quads: tile atlas
    /// 2. `panel_verts`: solid fills (bound to the font atlas, unsampled)
    /// 3. `text_verts`: font atlas glyphs
    pub fn render(
        &mut self,
        panel_verts: &[TileVertex],
        text_verts: &[TileVertex],
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });

        // Transient per-frame buffers; they must outlive the render pass.
        let panel_buf = self.transient_buffer("panel_vertex_buffer", panel_verts);
        let text_buf = self.transient_buffer("text_vertex_buffer", text_verts);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(&self.tile_pipeline.render_pipeline);
            pass.set_bind_group(0, &self.projection_bind_group, &[]);

            // ── Pass 1: map ──────────────────────────────────────────────────
            if let Some((buf, count)) = &self.map_buffer {
                pass.set_bind_group(1, &self.tile_bind_group, &[]);
                pass.set_vertex_buffer(0, buf.slice(..));
                pass.draw(0..*count, 0..1);
            }

            // ── Pass 2 + 3: status panel and label ───────────────────────────
            pass.set_bind_group(1, &self.font_bind_group, &[]);
            for (buf, count) in [&panel_buf, &text_buf].into_iter().flatten() {
                pass.set_vertex_buffer(0, buf.slice(..));
                pass.draw(0..*count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Reconfigure after a lost / outdated surface.
    pub fn recover_surface(&mut self) {
        let size = self.window.inner_size();
        self.resize(size);
    }

    fn transient_buffer(&self, label: &str, verts: &[TileVertex]) -> Option<(wgpu::Buffer, u32)> {
        if verts.is_empty() {
            return None;
        }
        let buf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Some((buf, verts.len() as u32))
    }
}
