//! Frame-by-frame orchestration of integration, sampling and stroking.
//!
//! Each frame takes [`INTERPOLATION_POINTS`] samples per color track, stepping
//! the pendulum between samples. It fits a cubic through every track, strokes
//! the densified curves, and hands the advanced [`Frame`] on to the next one.
//!
//! [`Animation`] wraps that in the `Idle → Running → Finished` state machine.
//! The host decides when frames happen: a windowed host ticks on every
//! redraw, while [`Animation::run`] drives the loop through an injected
//! [`FrameScheduler`].
//!
//! # Example
//!
//! ```
//! use pendulograph::prelude::*;
//!
//! let config = SimulationConfig { time: 0.5, ..Default::default() };
//! let mut animation = Animation::new(&config).unwrap();
//! let mut surface = RecordingSurface::new();
//! let summary = animation
//!     .run(&mut surface, &mut ImmediateScheduler::new())
//!     .unwrap();
//!
//! assert_eq!(animation.state(), AnimationState::Finished);
//! assert!(summary.frames > 0);
//! ```

use std::f64::consts::TAU;

use glam::DVec2;
use tracing::{debug, error, info};

use crate::config::{SimulationConfig, SimulationEnvironment};
use crate::error::SimulationError;
use crate::integrator::{mechanical_energy, rk4_step, AzimuthState, PendulumState};
use crate::interpolate::{interpolate, INTERPOLATION_POINTS};
use crate::surface::{DrawingSurface, LineJoin};
use crate::vector::Vector;

/// State handed from one frame to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Deflection state at the first sample of the frame.
    pub pendulum: PendulumState,
    /// Azimuth state at the first sample of the frame.
    pub azimuth: AzimuthState,
    /// Simulated time at the first sample of the frame.
    pub elapsed: f64,
}

impl Frame {
    /// The frame a run starts with.
    pub fn initial(env: &SimulationEnvironment) -> Self {
        Self {
            pendulum: env.initial_pendulum,
            azimuth: env.initial_azimuth,
            elapsed: 0.0,
        }
    }
}

/// Raw samples of one orbiting marker within a frame.
#[derive(Debug, Clone, Default)]
pub struct ColorTrack {
    points: Vec<Vector>,
}

impl ColorTrack {
    /// An empty track with room for one frame of samples.
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(INTERPOLATION_POINTS),
        }
    }

    /// Append a sample.
    pub fn push(&mut self, point: DVec2) {
        self.points.push(Vector::from(point));
    }

    /// Samples taken so far.
    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    /// Densify the samples into a polyline, consuming the track.
    pub fn interpolate(self, density: usize) -> Result<Vec<DVec2>, SimulationError> {
        interpolate(&self.points, density)?
            .iter()
            .map(Vector::to_dvec2)
            .collect()
    }
}

/// Draw one frame onto `surface` and return the state for the next one.
pub fn animate_frame<S: DrawingSurface + ?Sized>(
    frame: Frame,
    env: &SimulationEnvironment,
    surface: &mut S,
) -> Result<Frame, SimulationError> {
    let dt = env.time_step;
    let track_count = env.track_count();
    let mut tracks = vec![ColorTrack::new(); track_count];
    let mut pendulum = frame.pendulum;
    let mut azimuth = frame.azimuth;

    for i in 0..INTERPOLATION_POINTS {
        let center = env.geometry.to_cartesian(pendulum.angle, azimuth.angle);
        let delta = frame.elapsed + i as f64 * dt;

        for (c, track) in tracks.iter_mut().enumerate() {
            let offset = TAU * c as f64 / track_count as f64;
            let theta = env.color_speed * delta + offset;
            track.push(center + env.color_radius * DVec2::new(theta.cos(), theta.sin()));
        }

        if i < INTERPOLATION_POINTS - 1 {
            pendulum = rk4_step(pendulum, dt, env.gravity, env.geometry.string_length);
            azimuth = azimuth.advance(dt);
        }
    }

    let lines = tracks
        .into_iter()
        .map(|track| track.interpolate(env.interpolation_density))
        .collect::<Result<Vec<_>, _>>()?;

    let len = lines.iter().map(Vec::len).min().unwrap_or(0);
    for i in 0..len.saturating_sub(2) {
        for (line, color) in lines.iter().zip(&env.colors) {
            let (first, middle, last) = (line[i], line[i + 1], line[i + 2]);

            surface.set_stroke_color(color);
            surface.begin_path();
            surface.move_to(first.x, first.y);
            surface.line_to(middle.x, middle.y);
            surface.line_to(last.x, last.y);
            surface.stroke();
        }
    }

    Ok(Frame {
        pendulum,
        azimuth,
        elapsed: frame.elapsed + dt * (INTERPOLATION_POINTS - 1) as f64,
    })
}

/// Lifecycle of an [`Animation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Validated but not yet drawn.
    Idle,
    /// Drawing frames.
    Running,
    /// Reached the time horizon or aborted. No further work is done.
    Finished,
}

/// Host hook that decides when the next frame runs.
pub trait FrameScheduler {
    /// Wait for the next frame slot. Returning `false` stops the run.
    fn next_frame(&mut self) -> bool;
}

/// Scheduler that grants every frame immediately, optionally up to a limit.
#[derive(Debug, Clone, Default)]
pub struct ImmediateScheduler {
    scheduled: u64,
    limit: Option<u64>,
}

impl ImmediateScheduler {
    /// Grant frames until the animation finishes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the run after `limit` frames.
    pub fn with_limit(limit: u64) -> Self {
        Self {
            scheduled: 0,
            limit: Some(limit),
        }
    }

    /// Frames granted so far.
    pub fn scheduled(&self) -> u64 {
        self.scheduled
    }
}

impl FrameScheduler for ImmediateScheduler {
    fn next_frame(&mut self) -> bool {
        if self.limit.is_some_and(|limit| self.scheduled >= limit) {
            return false;
        }
        self.scheduled += 1;
        true
    }
}

/// Outcome of [`Animation::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Frames drawn.
    pub frames: u64,
    /// Simulated time reached.
    pub elapsed: f64,
    /// Pendulum state after the last frame.
    pub pendulum: PendulumState,
    /// Relative change in mechanical energy since the start.
    pub energy_drift: f64,
    /// Whether the scheduler stopped the run before the horizon.
    pub cancelled: bool,
}

/// One pendulum drawing, from validated configuration to its final frame.
#[derive(Debug, Clone)]
pub struct Animation {
    env: SimulationEnvironment,
    frame: Frame,
    state: AnimationState,
    frames: u64,
    initial_energy: f64,
}

impl Animation {
    /// Validate `config` and prepare an idle animation.
    ///
    /// Fails with [`SimulationError::ConfigurationOutOfRange`] (for example
    /// when the starting radius exceeds the string length) before any
    /// simulation state is created.
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        Ok(Self::from_environment(config.environment()?))
    }

    /// Prepare an idle animation for an already validated environment.
    pub fn from_environment(env: SimulationEnvironment) -> Self {
        let frame = Frame::initial(&env);
        let initial_energy =
            mechanical_energy(frame.pendulum, env.gravity, env.geometry.string_length);
        Self {
            env,
            frame,
            state: AnimationState::Idle,
            frames: 0,
            initial_energy,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// State the next frame will start from.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// The run's parameters.
    pub fn environment(&self) -> &SimulationEnvironment {
        &self.env
    }

    /// Frames drawn so far.
    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    /// Clear the surface and set up stroke style. Only acts when idle.
    pub fn start<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.state != AnimationState::Idle {
            return;
        }

        let geometry = self.env.geometry;
        surface.clear(geometry.width, geometry.height);
        surface.set_line_width(self.env.color_width);
        surface.set_line_join(LineJoin::Round);
        self.state = AnimationState::Running;

        info!(
            tracks = self.env.track_count(),
            time_step = self.env.time_step,
            final_time = self.env.final_time,
            "animation started"
        );
    }

    /// Draw one frame. An idle animation is started first; a finished one
    /// does nothing.
    ///
    /// A math-layer error aborts the run: the animation becomes
    /// [`AnimationState::Finished`] and the error is returned.
    pub fn tick<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<AnimationState, SimulationError> {
        match self.state {
            AnimationState::Finished => return Ok(AnimationState::Finished),
            AnimationState::Idle => self.start(surface),
            AnimationState::Running => {}
        }

        let next = match animate_frame(self.frame, &self.env, surface) {
            Ok(next) => next,
            Err(e) => {
                self.state = AnimationState::Finished;
                error!(frame = self.frames, error = %e, "animation aborted");
                return Err(e);
            }
        };

        self.frame = next;
        self.frames += 1;
        debug!(frame = self.frames, elapsed = next.elapsed, angle = next.pendulum.angle, "frame drawn");

        // Running only while strictly below the horizon; NaN finishes.
        if !(next.elapsed < self.env.final_time) {
            self.state = AnimationState::Finished;
            info!(frames = self.frames, elapsed = next.elapsed, "animation finished");
        }
        Ok(self.state)
    }

    /// Start the animation and draw a frame each time `scheduler` grants one,
    /// until the time horizon is reached or the scheduler declines.
    pub fn run<S, F>(&mut self, surface: &mut S, scheduler: &mut F) -> Result<RunSummary, SimulationError>
    where
        S: DrawingSurface + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        self.start(surface);

        let mut cancelled = false;
        while self.state == AnimationState::Running {
            if !scheduler.next_frame() {
                cancelled = true;
                info!(frames = self.frames, elapsed = self.frame.elapsed, "animation cancelled");
                break;
            }
            self.tick(surface)?;
        }

        Ok(self.summary(cancelled))
    }

    /// Snapshot of progress so far.
    pub fn summary(&self, cancelled: bool) -> RunSummary {
        let energy = mechanical_energy(
            self.frame.pendulum,
            self.env.gravity,
            self.env.geometry.string_length,
        );
        let energy_drift = if self.initial_energy != 0.0 {
            (energy - self.initial_energy) / self.initial_energy
        } else {
            energy
        };

        RunSummary {
            frames: self.frames,
            elapsed: self.frame.elapsed,
            pendulum: self.frame.pendulum,
            energy_drift,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn test_config() -> SimulationConfig {
        SimulationConfig {
            radius: 100.0,
            velocity: 0.0,
            time: 1.0,
            num_colors: 2,
            palette: vec![Color::from("red"), Color::from("blue")],
            ..Default::default()
        }
    }

    #[test]
    fn test_frame_strokes_triplets_per_track() {
        let config = test_config();
        let env = config.environment().unwrap();
        let mut surface = RecordingSurface::new();

        let next = animate_frame(Frame::initial(&env), &env, &mut surface).unwrap();

        // 12 interpolated points per track give 10 overlapping triplets.
        assert_eq!(surface.strokes(), 10 * 2);
        assert!((next.elapsed - 3.0 * env.time_step).abs() < 1e-12);

        let commands = surface.commands();
        assert_eq!(commands[0], DrawCommand::StrokeColor(Color::from("red")));
        assert_eq!(commands[1], DrawCommand::BeginPath);
        assert!(matches!(commands[2], DrawCommand::MoveTo(..)));
        assert!(matches!(commands[3], DrawCommand::LineTo(..)));
        assert!(matches!(commands[4], DrawCommand::LineTo(..)));
        assert_eq!(commands[5], DrawCommand::Stroke);
        assert_eq!(commands[6], DrawCommand::StrokeColor(Color::from("blue")));
    }

    #[test]
    fn test_triplets_overlap_by_one_index() {
        let env = test_config().environment().unwrap();
        let mut surface = RecordingSurface::new();
        animate_frame(Frame::initial(&env), &env, &mut surface).unwrap();

        let commands = surface.commands();
        // Track 0 stroke k starts at commands[12k]; its middle point is the
        // first point of stroke k + 1.
        let point = |cmd: &DrawCommand| match *cmd {
            DrawCommand::MoveTo(x, y) | DrawCommand::LineTo(x, y) => (x, y),
            ref other => panic!("unexpected command {other:?}"),
        };
        assert_eq!(point(&commands[3]), point(&commands[12 + 2]));
        assert_eq!(point(&commands[4]), point(&commands[12 + 3]));
    }

    #[test]
    fn test_tracks_are_phase_offset() {
        let env = test_config().environment().unwrap();
        let frame = Frame::initial(&env);
        let mut surface = RecordingSurface::new();
        animate_frame(frame, &env, &mut surface).unwrap();

        // With two tracks the markers sit on opposite sides of the tip.
        let center = env.geometry.to_cartesian(frame.pendulum.angle, frame.azimuth.angle);
        let start = |k: usize| match surface.commands()[6 * k + 2] {
            DrawCommand::MoveTo(x, y) => DVec2::new(x, y),
            _ => unreachable!(),
        };
        let mid = (start(0) + start(1)) / 2.0;
        assert!(mid.distance(center) < 0.5);
    }

    #[test]
    fn test_start_sets_up_surface_once() {
        let mut animation = Animation::new(&test_config()).unwrap();
        let mut surface = RecordingSurface::new();
        animation.start(&mut surface);
        animation.start(&mut surface);

        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Clear {
                    width: 1920.0,
                    height: 1920.0
                },
                DrawCommand::LineWidth(2.0),
                DrawCommand::LineJoin(LineJoin::Round),
            ]
        );
        assert_eq!(animation.state(), AnimationState::Running);
    }

    #[test]
    fn test_state_machine() {
        let config = SimulationConfig {
            time: 0.05,
            ..test_config()
        };
        let mut animation = Animation::new(&config).unwrap();
        let mut surface = RecordingSurface::new();
        assert_eq!(animation.state(), AnimationState::Idle);

        // dt = 0.01: the first frame reaches 0.03, the second 0.06.
        assert_eq!(animation.tick(&mut surface).unwrap(), AnimationState::Running);
        assert_eq!(animation.tick(&mut surface).unwrap(), AnimationState::Finished);

        let strokes = surface.strokes();
        assert_eq!(animation.tick(&mut surface).unwrap(), AnimationState::Finished);
        assert_eq!(surface.strokes(), strokes);
        assert_eq!(animation.frames_drawn(), 2);
    }

    #[test]
    fn test_nan_horizon_finishes_after_one_frame() {
        let fields: std::collections::HashMap<String, String> =
            [("time".to_string(), "NaN".to_string())].into_iter().collect();
        let mut config = test_config();
        config.apply_fields(&fields).unwrap();
        assert!(config.time.is_nan());

        let mut animation = Animation::new(&config).unwrap();
        let mut surface = RecordingSurface::new();
        let mut scheduler = ImmediateScheduler::with_limit(10_000);
        let summary = animation.run(&mut surface, &mut scheduler).unwrap();

        assert!(!summary.cancelled);
        assert_eq!(summary.frames, 1);
        assert_eq!(animation.state(), AnimationState::Finished);
    }

    #[test]
    fn test_cancellation_stops_run() {
        let mut animation = Animation::new(&test_config()).unwrap();
        let mut surface = RecordingSurface::new();
        let mut scheduler = ImmediateScheduler::with_limit(5);

        let summary = animation.run(&mut surface, &mut scheduler).unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.frames, 5);
        assert_eq!(animation.state(), AnimationState::Running);
    }

    #[test]
    fn test_non_finite_state_still_completes() {
        // Zero radius makes the azimuth rate 0/0; NaN flows through silently.
        let config = SimulationConfig {
            radius: 0.0,
            ..test_config()
        };
        let mut animation = Animation::new(&config).unwrap();
        let mut surface = RecordingSurface::new();
        let summary = animation
            .run(&mut surface, &mut ImmediateScheduler::new())
            .unwrap();
        assert!(!summary.cancelled);
        assert_eq!(animation.state(), AnimationState::Finished);
    }
}
