//! Run configuration.
//!
//! [`SimulationConfig`] holds every user-editable parameter. It serializes to
//! JSON for saving and loading, and it can be overridden field by field from
//! any [`FieldSource`], such as a settings form or command-line overrides.
//!
//! A run never sees the config directly. [`SimulationConfig::environment`] is
//! the validation gate: it either rejects the parameters or returns the
//! immutable [`SimulationEnvironment`] the animation runs against.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SimulationError};
use crate::integrator::{AzimuthState, PendulumState};
use crate::interpolate::DEFAULT_INTERPOLATION_DENSITY;
use crate::transform::CanvasGeometry;

/// Maximum number of color tracks (and palette entries).
pub const MAX_COLORS: usize = 10;

/// A stroke color, passed through to the drawing surface untouched.
///
/// The simulation never interprets the text. Only surfaces such as
/// [`Canvas`](crate::raster::Canvas) parse it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    /// The encoded color text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color("#000000".into())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Color(value.to_string())
    }
}

/// Named text fields a configuration can be read from.
///
/// Field names follow the settings form: `g`, `omega`, `v`, `r`,
/// `resolution`, `time`, `color-speed`, `color-radius`, `color-width`,
/// `num-colors` and `color1` through `color10`.
pub trait FieldSource {
    /// Current text of `name`, or `None` if the source has no such field.
    fn field(&self, name: &str) -> Option<String>;
}

impl FieldSource for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// All user-editable parameters of one run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Gravitational acceleration.
    pub gravity: f64,
    /// Starting azimuth ω in radians.
    pub omega: f64,
    /// Tangential speed at the starting radius; sets the azimuth rate.
    pub velocity: f64,
    /// Starting distance of the tip from the point below the pivot.
    pub radius: f64,
    /// Step-size control in `[0, 1)`; the time step is `1 - resolution`.
    pub resolution: f64,
    /// Simulated time after which the animation stops.
    pub time: f64,
    /// Angular speed of the color markers around the tip.
    pub color_speed: f64,
    /// Orbit radius of the color markers.
    pub color_radius: f64,
    /// Stroke width.
    pub color_width: f64,
    /// Number of color tracks.
    pub num_colors: usize,
    /// Track colors, in order. Only the first `num_colors` are used.
    pub palette: Vec<Color>,
    /// Line segments drawn per unit of the interpolation parameter.
    pub interpolation_density: usize,
    /// Canvas size and string length.
    pub canvas: CanvasGeometry,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            omega: 0.0,
            velocity: 150.0,
            radius: 600.0,
            resolution: 0.99,
            time: 120.0,
            color_speed: 2.0,
            color_radius: 40.0,
            color_width: 2.0,
            num_colors: 3,
            palette: default_palette(),
            interpolation_density: DEFAULT_INTERPOLATION_DENSITY,
            canvas: CanvasGeometry::default(),
        }
    }
}

fn default_palette() -> Vec<Color> {
    [
        "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6",
        "#bfef45", "#fabed4", "#469990",
    ]
    .into_iter()
    .map(Color::from)
    .collect()
}

fn parse_scalar(field: &str, text: &str) -> Result<f64, SimulationError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| SimulationError::InvalidOperand {
            field: field.to_string(),
            value: text.to_string(),
        })
}

fn out_of_range(field: &'static str, reason: String) -> SimulationError {
    SimulationError::ConfigurationOutOfRange { field, reason }
}

impl SimulationConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Integrator step size derived from the resolution setting.
    #[inline]
    pub fn time_step(&self) -> f64 {
        1.0 - self.resolution
    }

    /// Override every field present in `source`.
    ///
    /// Numeric fields that do not hold a real number fail with
    /// [`SimulationError::InvalidOperand`]; the config is left unchanged in
    /// that case.
    pub fn apply_fields(&mut self, source: &impl FieldSource) -> Result<(), SimulationError> {
        let mut next = self.clone();

        let scalars: [(&str, &mut f64); 9] = [
            ("g", &mut next.gravity),
            ("omega", &mut next.omega),
            ("v", &mut next.velocity),
            ("r", &mut next.radius),
            ("resolution", &mut next.resolution),
            ("time", &mut next.time),
            ("color-speed", &mut next.color_speed),
            ("color-radius", &mut next.color_radius),
            ("color-width", &mut next.color_width),
        ];
        for (name, slot) in scalars {
            if let Some(text) = source.field(name) {
                *slot = parse_scalar(name, &text)?;
            }
        }

        if let Some(text) = source.field("num-colors") {
            let count = parse_scalar("num-colors", &text)?;
            if count.fract() != 0.0 || count < 0.0 {
                return Err(out_of_range(
                    "num-colors",
                    format!("{} is not a whole number of tracks", text.trim()),
                ));
            }
            next.num_colors = count as usize;
        }

        for i in 0..MAX_COLORS {
            if let Some(text) = source.field(&format!("color{}", i + 1)) {
                if next.palette.len() <= i {
                    next.palette.resize(i + 1, Color::default());
                }
                next.palette[i] = Color(text);
            }
        }

        *self = next;
        Ok(())
    }

    /// Validate the parameters and build the environment for one run.
    pub fn environment(&self) -> Result<SimulationEnvironment, SimulationError> {
        let string_length = self.canvas.string_length;
        if self.radius > string_length {
            return Err(out_of_range(
                "r",
                format!(
                    "starting radius {} is outside the reach of a string of length {}",
                    self.radius, string_length
                ),
            ));
        }

        if self.palette.len() > MAX_COLORS {
            return Err(out_of_range(
                "palette",
                format!("{} colors given, at most {} supported", self.palette.len(), MAX_COLORS),
            ));
        }

        if self.num_colors == 0 || self.num_colors > self.palette.len() {
            return Err(out_of_range(
                "num-colors",
                format!(
                    "{} tracks requested, palette provides {}",
                    self.num_colors,
                    self.palette.len()
                ),
            ));
        }

        let time_step = self.time_step();
        if !(time_step > 0.0) {
            return Err(out_of_range(
                "resolution",
                format!("resolution {} leaves no forward time step", self.resolution),
            ));
        }

        if self.interpolation_density == 0 {
            return Err(out_of_range(
                "interpolation_density",
                "at least one segment per interval is required".into(),
            ));
        }

        Ok(SimulationEnvironment {
            gravity: self.gravity,
            time_step,
            final_time: self.time,
            color_speed: self.color_speed,
            color_radius: self.color_radius,
            color_width: self.color_width,
            colors: self.palette[..self.num_colors].to_vec(),
            interpolation_density: self.interpolation_density,
            geometry: self.canvas,
            initial_pendulum: PendulumState::from_radius(self.radius, string_length),
            initial_azimuth: AzimuthState::from_initial(self.omega, self.velocity, self.radius),
        })
    }
}

/// Read-only snapshot of one run's parameters.
///
/// Only [`SimulationConfig::environment`] builds one, so the number of
/// colors always equals the number of tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationEnvironment {
    /// Gravitational acceleration.
    pub gravity: f64,
    /// Integrator step size.
    pub time_step: f64,
    /// Simulated time horizon.
    pub final_time: f64,
    /// Angular speed of the color markers.
    pub color_speed: f64,
    /// Orbit radius of the color markers.
    pub color_radius: f64,
    /// Stroke width.
    pub color_width: f64,
    /// One color per track.
    pub colors: Vec<Color>,
    /// Line segments per unit of the interpolation parameter.
    pub interpolation_density: usize,
    /// Canvas size and string length.
    pub geometry: CanvasGeometry,
    /// Deflection state at time zero.
    pub initial_pendulum: PendulumState,
    /// Azimuth state at time zero.
    pub initial_azimuth: AzimuthState,
}

impl SimulationEnvironment {
    /// Number of color tracks.
    #[inline]
    pub fn track_count(&self) -> usize {
        self.colors.len()
    }
}
