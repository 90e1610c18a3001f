//! Error types for pendulograph.
//!
//! [`SimulationError`] covers the math layer and the start-of-run validation
//! gate. [`ConfigError`] wraps file and JSON failures when loading settings,
//! while [`GpuError`] and [`ViewerError`] belong to the live window.

use std::fmt;

/// Errors raised by the simulation core.
///
/// `DimensionMismatch` and `InvalidInterpolationInput` are contract violations
/// inside the math layer and abort the current run. `InvalidOperand` and
/// `ConfigurationOutOfRange` are reported before any simulation state exists.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Two vectors of different length were combined.
    DimensionMismatch {
        /// Length of the left-hand operand.
        left: usize,
        /// Length of the right-hand operand.
        right: usize,
    },
    /// A scalar operand was not a real number.
    InvalidOperand {
        /// Name of the field the operand came from.
        field: String,
        /// The offending text.
        value: String,
    },
    /// The interpolator was handed something other than four control points.
    InvalidInterpolationInput {
        /// Number of points actually supplied.
        points: usize,
    },
    /// A configuration value lies outside the range the simulation supports.
    ConfigurationOutOfRange {
        /// Name of the field that failed validation.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::DimensionMismatch { left, right } => write!(
                f,
                "Dimension mismatch on vector addition: {} vs {} components",
                left, right
            ),
            SimulationError::InvalidOperand { field, value } => {
                write!(f, "Field '{}' is not a scalar: {:?}", field, value)
            }
            SimulationError::InvalidInterpolationInput { points } => write!(
                f,
                "Cubic interpolation needs exactly 4 control points, got {}",
                points
            ),
            SimulationError::ConfigurationOutOfRange { field, reason } => {
                write!(f, "Configuration value '{}' out of range: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Errors that can occur while loading or saving a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    Io(std::io::Error),
    /// The file is not valid configuration JSON.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access configuration file: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
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

/// Errors that can occur when running the live viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The animation aborted with a math-layer error.
    Simulation(SimulationError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            ViewerError::Window(e) => write!(f, "Failed to create window: {}", e),
            ViewerError::Gpu(e) => write!(f, "GPU error: {}", e),
            ViewerError::Simulation(e) => write!(f, "Animation aborted: {}", e),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::Gpu(e) => Some(e),
            ViewerError::Simulation(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        ViewerError::Window(e)
    }
}

impl From<GpuError> for ViewerError {
    fn from(e: GpuError) -> Self {
        ViewerError::Gpu(e)
    }
}

impl From<SimulationError> for ViewerError {
    fn from(e: SimulationError) -> Self {
        ViewerError::Simulation(e)
    }
}
