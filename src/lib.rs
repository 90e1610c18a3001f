//! # Pendulograph
//!
//! Drawings traced by a spherical pendulum.
//!
//! A pendulum on a very long string swings while its plane of motion slowly
//! rotates. A handful of colored markers orbit the pendulum tip, and the
//! paths they trace are stroked onto a canvas, one short smooth segment per
//! frame, until the configured time horizon is reached.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pendulograph::prelude::*;
//!
//! let config = SimulationConfig {
//!     radius: 800.0,
//!     num_colors: 4,
//!     ..Default::default()
//! };
//!
//! let mut animation = Animation::new(&config)?;
//! let mut canvas = Canvas::new(1920, 1920);
//! animation.run(&mut canvas, &mut ImmediateScheduler::new())?;
//! canvas.save_png("pendulum.png".as_ref())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Core Concepts
//!
//! ### Physics
//!
//! The deflection angle from vertical follows `φ'' = -(g/L)·sin φ`, advanced
//! with classical fourth-order Runge-Kutta ([`integrator`]). The azimuth of
//! the swing plane advances at the fixed rate `v / |r|` set by the initial
//! tangential velocity and radius.
//!
//! ### Drawing
//!
//! Each frame samples four positions per marker, fits a cubic through them
//! ([`interpolate`]) and strokes overlapping three-point polylines through
//! the densified curve ([`animation`]). Anything that implements
//! [`DrawingSurface`] can be drawn on: the raster [`Canvas`], or a
//! [`RecordingSurface`] for tests.
//!
//! ### Configuration
//!
//! [`SimulationConfig`] holds the user-facing parameters, loads from JSON,
//! and accepts string overrides through a [`FieldSource`]. It is validated
//! into a [`SimulationEnvironment`] before any state exists.
//!
//! ## Viewing
//!
//! [`viewer::run`] opens a window and presents the canvas through wgpu as the
//! animation draws itself.

pub mod animation;
pub mod config;
pub mod error;
mod gpu;
pub mod integrator;
pub mod interpolate;
pub mod raster;
mod shader;
pub mod surface;
pub mod transform;
pub mod vector;
pub mod viewer;

pub use animation::{
    animate_frame, Animation, AnimationState, Frame, FrameScheduler, ImmediateScheduler, RunSummary,
};
pub use config::{Color, FieldSource, SimulationConfig, SimulationEnvironment};
pub use error::{ConfigError, GpuError, SimulationError, ViewerError};
pub use glam::DVec2;
pub use integrator::{AzimuthState, PendulumState};
pub use raster::Canvas;
pub use shader::BLIT_SOURCE;
pub use surface::{DrawCommand, DrawingSurface, LineJoin, RecordingSurface};
pub use transform::CanvasGeometry;
pub use vector::Vector;

/// Common imports.
///
/// ```
/// use pendulograph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::{
        Animation, AnimationState, FrameScheduler, ImmediateScheduler, RunSummary,
    };
    pub use crate::config::{Color, FieldSource, SimulationConfig};
    pub use crate::error::SimulationError;
    pub use crate::raster::Canvas;
    pub use crate::surface::{DrawingSurface, LineJoin, RecordingSurface};
    pub use crate::DVec2;
}
