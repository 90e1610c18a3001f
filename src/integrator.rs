//! Fixed-step integration of the pendulum's angular state.
//!
//! The deflection angle obeys `φ̈ = -(g/L)·sin(φ)`, integrated with classical
//! fourth-order Runge-Kutta on the first-order system `(φ, φ̇)`. The azimuth
//! turns at a constant rate fixed when the run starts, advanced with explicit
//! Euler steps.

/// Deflection from vertical and its rate of change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumState {
    /// Deflection angle φ in radians.
    pub angle: f64,
    /// Angular velocity φ̇ in radians per unit time.
    pub velocity: f64,
}

impl PendulumState {
    /// State at rest with the tip `radius` away from the point below the pivot.
    ///
    /// `radius` must not exceed `string_length`; the configuration layer
    /// checks this before a run starts.
    pub fn from_radius(radius: f64, string_length: f64) -> Self {
        Self {
            angle: (radius / string_length).asin(),
            velocity: 0.0,
        }
    }
}

/// Rotation about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AzimuthState {
    /// Azimuth ω in radians.
    pub angle: f64,
    /// Azimuth rate in radians per unit time.
    pub rate: f64,
}

impl AzimuthState {
    /// Azimuth `omega` turning at `velocity / |radius|`.
    ///
    /// The rate is taken at the starting radius and never recomputed, so it
    /// only approximates conservation of angular momentum once φ changes.
    pub fn from_initial(omega: f64, velocity: f64, radius: f64) -> Self {
        Self {
            angle: omega,
            rate: velocity / radius.abs(),
        }
    }

    /// One explicit Euler step of size `dt`.
    #[inline]
    pub fn advance(self, dt: f64) -> Self {
        Self {
            angle: self.angle + dt * self.rate,
            rate: self.rate,
        }
    }
}

/// Angular acceleration of the pendulum at `angle`.
#[inline]
pub fn acceleration(angle: f64, gravity: f64, string_length: f64) -> f64 {
    -gravity / string_length * angle.sin()
}

/// Advance `state` by one RK4 step of size `dt`.
pub fn rk4_step(state: PendulumState, dt: f64, gravity: f64, string_length: f64) -> PendulumState {
    let accel = |angle: f64| acceleration(angle, gravity, string_length);

    // Each stage is (Δφ, Δφ̇) over a full step.
    let k1 = (dt * state.velocity, dt * accel(state.angle));
    let k2 = (
        dt * (state.velocity + k1.1 / 2.0),
        dt * accel(state.angle + k1.0 / 2.0),
    );
    let k3 = (
        dt * (state.velocity + k2.1 / 2.0),
        dt * accel(state.angle + k2.0 / 2.0),
    );
    let k4 = (
        dt * (state.velocity + k3.1),
        dt * accel(state.angle + k3.0),
    );

    PendulumState {
        angle: state.angle + (k1.0 + 2.0 * k2.0 + 2.0 * k3.0 + k4.0) / 6.0,
        velocity: state.velocity + (k1.1 + 2.0 * k2.1 + 2.0 * k3.1 + k4.1) / 6.0,
    }
}

/// Kinetic plus potential energy per unit mass, zero at rest.
pub fn mechanical_energy(state: PendulumState, gravity: f64, string_length: f64) -> f64 {
    let kinetic = 0.5 * string_length * string_length * state.velocity * state.velocity;
    let potential = gravity * string_length * (1.0 - state.angle.cos());
    kinetic + potential
}
