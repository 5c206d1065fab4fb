use crate::error::TextureError;
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::time::Duration;
use virtworld_common::Rgb;
use virtworld_render::TextureSlot;

/// Decoded RGBA8 pixels, rows bottom-up so `v = 0` is the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// A 1x1 image of one colour, shown until a real texture arrives.
    pub fn solid(color: Rgb) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: color.to_rgba8().to_vec(),
        }
    }

    /// Decode an encoded image (PNG) and flip it vertically.
    pub fn decode(bytes: &[u8]) -> Result<Self, TextureError> {
        let mut rgba = image::load_from_memory(bytes)?.to_rgba8();
        image::imageops::flip_vertical_in_place(&mut rgba);
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode(&bytes)
    }
}

/// Fallback colour per slot: grey stone and green grass.
pub fn fallback_color(slot: TextureSlot) -> Rgb {
    match slot {
        TextureSlot::Zero => Rgb::new(0.5, 0.5, 0.5),
        TextureSlot::One => Rgb::new(0.3, 0.6, 0.2),
    }
}

/// Outcome of one background load.
#[derive(Debug)]
pub struct LoadedTexture {
    pub slot: TextureSlot,
    pub path: PathBuf,
    pub result: Result<TextureImage, TextureError>,
}

/// Loads texture files on background threads.
///
/// Finished loads queue on a channel; the render loop drains it once per
/// frame with `poll`, so a texture appears on the first frame after its
/// decode completes and never blocks a frame.
#[derive(Debug)]
pub struct TextureLoader {
    sender: Sender<LoadedTexture>,
    receiver: Receiver<LoadedTexture>,
    pending: usize,
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureLoader {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Start loading `path` into `slot`.
    pub fn request(&mut self, slot: TextureSlot, path: impl Into<PathBuf>) {
        let path = path.into();
        let sender = self.sender.clone();
        self.pending += 1;
        tracing::debug!("loading texture {} into slot {}", path.display(), slot.index());
        std::thread::spawn(move || {
            let result = TextureImage::load(&path);
            // The receiver only disappears when the loader is dropped.
            let _ = sender.send(LoadedTexture { slot, path, result });
        });
    }

    /// Loads that finished since the last call.
    pub fn poll(&mut self) -> Vec<LoadedTexture> {
        let done: Vec<LoadedTexture> = self.receiver.try_iter().collect();
        self.pending -= done.len();
        done
    }

    /// Block until the next load finishes or `timeout` passes.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<LoadedTexture> {
        if self.pending == 0 {
            return None;
        }
        let loaded = self.receiver.recv_timeout(timeout).ok()?;
        self.pending -= 1;
        Some(loaded)
    }

    /// Requests not yet delivered.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

/// Texels are sampled as stored, matching the unconverted surface.
const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A sampled texture resident on the GPU.
pub struct GpuTexture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Upload `image` with repeat wrapping. Slot 0 magnifies linearly, slot 1
    /// with nearest filtering.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: TextureSlot,
        image: &TextureImage,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(match slot {
                TextureSlot::Zero => "texture0",
                TextureSlot::One => "texture1",
            }),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mag_filter = match slot {
            TextureSlot::Zero => wgpu::FilterMode::Linear,
            TextureSlot::One => wgpu::FilterMode::Nearest,
        };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        Self { view, sampler }
    }
}
