//! Error types for the particle field host.
//!
//! The simulation itself never fails; these cover configuration checks and
//! the window/GPU setup that happens before the first frame.

use thiserror::Error;

/// A tunable in [`FieldConfig`](crate::FieldConfig) or [`Style`](crate::Style)
/// is outside the range the simulation can work with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value that must be strictly positive was zero, negative or NaN.
    #[error("{name} must be positive, got {value}")]
    NotPositive {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A `low..high` range was empty or inverted.
    #[error("{name} range is empty: {low}..{high}")]
    EmptyRange {
        /// Name of the offending setting.
        name: &'static str,
        /// Lower bound.
        low: f32,
        /// Upper bound.
        high: f32,
    },

    /// A fraction (opacity, relaxation rate) was outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfUnitRange {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
}

/// Errors that can occur during GPU initialization.
#[derive(Error, Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support")]
    NoAdapter,

    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running a simulation window.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    /// The field or style configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
