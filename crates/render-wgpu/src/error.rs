use std::path::PathBuf;
use thiserror::Error;

/// Failures while bringing up or driving the GPU. Setup errors are fatal.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    UnsupportedSurface,

    #[error("{needed} bytes of instance data exceed the device limit of {limit}")]
    InstanceBufferTooLarge { needed: u64, limit: u64 },
}

/// Failures while loading a texture image. Never fatal: the slot keeps its
/// fallback colour.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has zero size")]
    Empty,
}
