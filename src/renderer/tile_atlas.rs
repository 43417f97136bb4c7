use std::borrow::Cow;
use std::collections::HashMap;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use wgpu::util::DeviceExt;

use crate::catalog::TileCatalog;
use crate::error::{Error, Result};

// ── AtlasRegion ──────────────────────────────────────────────────────────────

/// Normalised UV rectangle of one tile type inside the atlas texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtlasRegion {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

// ── Shelf packing (pure, GPU-free) ───────────────────────────────────────────

/// One tile image's position inside the packed atlas.
#[derive(Debug, PartialEq)]
pub struct PlacedTile {
    pub name: String,
    /// Top-left pixel coordinate inside the atlas.
    pub atlas_x: u32,
    pub atlas_y: u32,
    pub pixel_w: u32,
    pub pixel_h: u32,
}

/// Narrowest row the atlas is packed into.
pub const MIN_ATLAS_WIDTH: u32 = 512;

/// Shelf-pack `items` (`(name, pixel_w, pixel_h)`), tallest first.
///
/// The row width is the largest of `MIN_ATLAS_WIDTH`, the widest item and the
/// side of a square holding the total item area, so the atlas grows in both
/// directions instead of stacking one shelf per large item.  Returns
/// `(placements, atlas_w, atlas_h)`, both dimensions rounded up to a power of
/// two.  Ties in height keep input order.
pub fn pack(items: &[(String, u32, u32)]) -> (Vec<PlacedTile>, u32, u32) {
    let area: u64 = items.iter().map(|i| i.1 as u64 * i.2 as u64).sum();
    let square_side = (area as f64).sqrt().ceil() as u32;
    let max_width = items
        .iter()
        .map(|i| i.1)
        .max()
        .unwrap_or(0)
        .max(MIN_ATLAS_WIDTH)
        .max(square_side);

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].2.cmp(&items[a].2));

    let mut placements = Vec::with_capacity(items.len());
    let mut cur_x = 0u32;
    let mut cur_y = 0u32;
    let mut row_h = 0u32;

    for i in order {
        let (ref name, w, h) = items[i];
        if cur_x + w > max_width {
            cur_y += row_h;
            cur_x = 0;
            row_h = 0;
        }
        placements.push(PlacedTile {
            name: name.clone(),
            atlas_x: cur_x,
            atlas_y: cur_y,
            pixel_w: w,
            pixel_h: h,
        });
        cur_x += w;
        row_h = row_h.max(h);
    }

    let atlas_w = max_width.next_power_of_two();
    let atlas_h = (cur_y + row_h).next_power_of_two().max(1);
    (placements, atlas_w, atlas_h)
}

/// CPU side of the atlas: the composited image plus the UV region per tile.
pub struct BakedAtlas {
    pub image: RgbaImage,
    pub regions: HashMap<String, AtlasRegion>,
}

/// Composite every catalog image into a single RGBA image.
///
/// Each image is first scaled (nearest neighbour) to `tile_size` square, the
/// size it is drawn at, so the atlas size depends on the number of tile types
/// and not on the source resolution.
pub fn bake(catalog: &TileCatalog, tile_size: u32) -> BakedAtlas {
    let cell = tile_size.max(1);
    // Sorted so the layout is identical from run to run.
    let names = catalog.tile_types();
    let tiles: HashMap<&str, Cow<'_, RgbaImage>> = names
        .iter()
        .filter_map(|&name| catalog.get(name).map(|img| (name, fit_tile(img, cell))))
        .collect();
    let dims: Vec<(String, u32, u32)> = names
        .iter()
        .filter_map(|&name| tiles.get(name).map(|img| (name.to_string(), img.width(), img.height())))
        .collect();

    let (placements, atlas_w, atlas_h) = pack(&dims);
    let mut image = RgbaImage::new(atlas_w, atlas_h);
    let mut regions = HashMap::with_capacity(placements.len());

    for p in &placements {
        let Some(src) = tiles.get(p.name.as_str()) else { continue };
        imageops::replace(&mut image, &**src, p.atlas_x as i64, p.atlas_y as i64);

        let uv_min = [
            p.atlas_x as f32 / atlas_w as f32,
            p.atlas_y as f32 / atlas_h as f32,
        ];
        let uv_max = [
            (p.atlas_x + p.pixel_w) as f32 / atlas_w as f32,
            (p.atlas_y + p.pixel_h) as f32 / atlas_h as f32,
        ];
        regions.insert(p.name.clone(), AtlasRegion { uv_min, uv_max });
    }

    BakedAtlas { image, regions }
}

fn fit_tile(img: &RgbaImage, cell: u32) -> Cow<'_, RgbaImage> {
    if img.dimensions() == (cell, cell) {
        Cow::Borrowed(img)
    } else {
        Cow::Owned(imageops::resize(img, cell, cell, FilterType::Nearest))
    }
}

/// Reject an image the device cannot hold as a single 2D texture.
pub fn ensure_fits(label: &str, img: &RgbaImage, max_dimension: u32) -> Result<()> {
    let (w, h) = img.dimensions();
    if w > max_dimension || h > max_dimension {
        return Err(Error::Graphics(format!(
            "{label} is {w}x{h}, larger than the device limit of {max_dimension}"
        )));
    }
    Ok(())
}

// ── GpuTexture ───────────────────────────────────────────────────────────────

/// Sampled texture plus its nearest-filter sampler.  Dropping it releases
/// the GPU allocation.
pub struct GpuTexture {
    pub texture_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    pub fn from_rgba(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, img: &RgbaImage) -> Self {
        let (w, h) = img.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d { width: w.max(1), height: h.max(1), depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            img.as_raw(),
        );
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        Self { texture_view, sampler }
    }

    pub fn bind_group(&self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}

// ── TileAtlas ────────────────────────────────────────────────────────────────

/// GPU-resident tile atlas: the "texture handle" for every tile type is its
/// region in this one texture.
pub struct TileAtlas {
    pub regions: HashMap<String, AtlasRegion>,
    pub texture: GpuTexture,
}

impl TileAtlas {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        catalog: &TileCatalog,
        tile_size: u32,
    ) -> Result<Self> {
        let BakedAtlas { image, regions } = bake(catalog, tile_size);
        log::debug!(
            "tile atlas: {} region(s) in a {}x{} texture",
            regions.len(), image.width(), image.height()
        );
        ensure_fits("tile atlas", &image, device.limits().max_texture_dimension_2d)?;
        let texture = GpuTexture::from_rgba(device, queue, "tile_atlas_tex", &image);
        Ok(Self { regions, texture })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
