//! Error types for glowfield.
//!
//! The particle core itself cannot fail. These errors cover the outer shell:
//! GPU presentation, window creation, snapshot output, and configuration text.

use std::fmt;

/// Errors that can occur while setting up frame presentation on the GPU.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for the window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// The surface reports no usable texture format.
    UnsupportedSurface,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with Vulkan/Metal/DX12 support."),
            GpuError::UnsupportedSurface => write!(f, "Window surface has no supported texture format"),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter | GpuError::UnsupportedSurface => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when writing a rendered frame to disk.
#[derive(Debug)]
pub enum SnapshotError {
    /// Failed to encode the image.
    Image(image::ImageError),
    /// Failed to write the file.
    Io(std::io::Error),
    /// The pixel buffer does not match the canvas dimensions.
    BufferSize { width: u32, height: u32 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Image(e) => write!(f, "Failed to encode snapshot: {}", e),
            SnapshotError::Io(e) => write!(f, "Failed to write snapshot file: {}", e),
            SnapshotError::BufferSize { width, height } => {
                write!(f, "Pixel buffer does not match a {}x{} image", width, height)
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Image(e) => Some(e),
            SnapshotError::Io(e) => Some(e),
            SnapshotError::BufferSize { .. } => None,
        }
    }
}

impl From<image::ImageError> for SnapshotError {
    fn from(e: image::ImageError) -> Self {
        SnapshotError::Image(e)
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

/// Errors that can occur when parsing configuration text (env vars, flags).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A tint was not three comma-separated numbers.
    InvalidTint(String),
    /// A numeric option could not be parsed.
    InvalidNumber { key: String, value: String },
    /// A boolean option was not one of the accepted spellings.
    InvalidBool { key: String, value: String },
    /// A `WIDTHxHEIGHT` size could not be parsed.
    InvalidSize(String),
    /// An unrecognised command-line flag.
    UnknownFlag(String),
    /// A flag that needs a value was given none.
    MissingValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTint(s) => write!(f, "Invalid tint '{}': expected three numbers like 0.5,0.8,1.0", s),
            ConfigError::InvalidNumber { key, value } => write!(f, "Invalid number for {}: '{}'", key, value),
            ConfigError::InvalidBool { key, value } => write!(f, "Invalid boolean for {}: '{}'", key, value),
            ConfigError::InvalidSize(s) => write!(f, "Invalid size '{}': expected WIDTHxHEIGHT", s),
            ConfigError::UnknownFlag(s) => write!(f, "Unknown flag '{}'", s),
            ConfigError::MissingValue(s) => write!(f, "Flag '{}' needs a value", s),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur when running the windowed backdrop.
#[derive(Debug)]
pub enum AppError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            AppError::Window(e) => write!(f, "Failed to create window: {}", e),
            AppError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}
