//! Error types for shardmorph.
//!
//! Configuration problems are caught before any particle is generated.
//! GPU and windowing errors only come from the viewer.

use thiserror::Error;

/// A configuration value that would produce a degenerate particle table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Particle count is above the supported maximum.
    #[error("particle count {count} exceeds the maximum of {max}")]
    TooManyParticles { count: u32, max: u32 },

    /// A length (radius, height, time constant) is zero, negative or not finite.
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    /// A value that must be non-negative was negative or not finite.
    #[error("{name} must be a non-negative finite number, got {value}")]
    Negative { name: &'static str, value: f32 },

    /// A value that must be finite was NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    /// A probability outside [0, 1].
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidRatio { name: &'static str, value: f32 },

    /// Scale range with min above max or a non-positive bound.
    #[error("invalid scale range [{min}, {max})")]
    InvalidScaleRange { min: f32, max: f32 },

    /// A palette entry that is not a `#RRGGBB` hex string.
    #[error("invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
}

/// Errors from loading or saving a config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Reading or writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for [`MorphConfig`](crate::MorphConfig).
    #[error("malformed config file: {0}")]
    Json(#[from] serde_json::Error),

    /// The file parsed but its values were rejected.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a Vulkan/Metal/DX12/WebGPU capable device is required")]
    NoAdapter,

    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    /// Surface reported no usable texture format.
    #[error("surface has no supported texture format")]
    NoSurfaceFormat,
}

/// Errors that can occur when running the viewer.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    /// The configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The config file could not be loaded.
    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),
}
