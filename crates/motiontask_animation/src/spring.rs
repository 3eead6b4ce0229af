//! Spring physics
//!
//! RK4-integrated springs drive interactive transforms (hover lift, press
//! scale) so that a new target mid-flight keeps the current velocity.

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// A gentle, slow spring
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// A stiff, snappy spring
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Quick response with a hint of overshoot, for hover and press feedback
    pub fn interactive() -> Self {
        Self::new(500.0, 25.0, 1.0)
    }

    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}

/// Distance and speed below which a spring counts as settled
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RestThreshold {
    pub delta: f32,
    pub speed: f32,
}

impl RestThreshold {
    /// Pixel-scale values (offsets, positions)
    pub const PIXELS: Self = Self {
        delta: 0.5,
        speed: 5.0,
    };

    /// Unit-scale values (scale factors, opacity)
    pub const UNIT: Self = Self {
        delta: 0.001,
        speed: 0.01,
    };
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    rest: RestThreshold,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            rest: RestThreshold::PIXELS,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    /// Override the settle thresholds
    pub fn with_rest(mut self, rest: RestThreshold) -> Self {
        self.rest = rest;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.rest.delta
            && self.velocity.abs() < self.rest.speed
    }

    /// Step the simulation by `dt` seconds using RK4 integration
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}
