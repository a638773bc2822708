//! A single particle: kinematic state, per-tick update, self-rendering.
//!
//! Each tick a particle picks one of two behaviours from the shared pointer
//! state, fresh every time (see [`Behavior::select`]):
//!
//! - **Influenced**: the pointer is over the surface. Particles within
//!   `pointer_radius` are pushed away, harder the closer they are and the
//!   higher their density. Particles out of reach settle back home.
//! - **Drift**: no pointer. Particles wander along their drift velocity and
//!   are softly reeled in once they stray past the tether.

use glam::Vec2;
use rand::Rng;

use crate::config::{FieldConfig, Style};
use crate::input::PointerState;
use crate::surface::{Fill, Surface};

/// Behaviour for one tick, chosen from the pointer state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Pointer present at this position.
    Influenced { pointer: Vec2 },
    /// No pointer, ambient drift.
    Drift,
}

impl Behavior {
    pub fn select(pointer: PointerState) -> Self {
        match pointer {
            PointerState::Present(pointer) => Behavior::Influenced { pointer },
            PointerState::Absent => Behavior::Drift,
        }
    }
}

/// A point entity anchored to a home position.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current render position.
    pub position: Vec2,
    /// Fixed anchor. Never changes after creation.
    base: Vec2,
    /// Render radius.
    size: f32,
    /// Pointer responsiveness multiplier.
    density: f32,
    /// Drift applied each tick while no pointer is present.
    velocity: Vec2,
}

impl Particle {
    /// Create a particle resting at `home`.
    pub fn new(home: Vec2, size: f32, density: f32, velocity: Vec2) -> Self {
        Self {
            position: home,
            base: home,
            size,
            density,
            velocity,
        }
    }

    /// Create a particle at `home` with size, density and drift drawn from the config ranges.
    pub fn spawn<R: Rng + ?Sized>(home: Vec2, config: &FieldConfig, rng: &mut R) -> Self {
        let size = rng.gen_range(config.size_range.clone());
        let density = rng.gen_range(config.density_range.clone());
        let velocity = if config.drift_speed > 0.0 {
            let s = config.drift_speed;
            Vec2::new(rng.gen_range(-s..s), rng.gen_range(-s..s))
        } else {
            Vec2::ZERO
        };
        Self::new(home, size, density, velocity)
    }

    pub fn base(&self) -> Vec2 {
        self.base
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Advance one tick.
    pub fn update(&mut self, behavior: Behavior, config: &FieldConfig) {
        match behavior {
            Behavior::Influenced { pointer } => self.react(pointer, config),
            Behavior::Drift => self.drift(config),
        }
    }

    fn react(&mut self, pointer: Vec2, config: &FieldConfig) {
        let delta = pointer - self.position;
        let distance = delta.length();

        if distance < config.pointer_radius {
            // Clamp keeps the direction finite when the pointer sits exactly
            // on the particle; a zero delta then yields a zero push.
            let direction = delta / distance.max(config.min_pointer_distance);
            let force = (config.pointer_radius - distance) / config.pointer_radius;
            self.position -= direction * force * self.density;
        } else {
            self.position -= (self.position - self.base) * config.settle_rate;
        }
    }

    fn drift(&mut self, config: &FieldConfig) {
        self.position += self.velocity;

        let offset = self.position - self.base;
        if offset.x.abs() > config.tether || offset.y.abs() > config.tether {
            self.position -= offset * config.drift_return_rate;
        }
    }

    /// Draw the particle as a glowing disc.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, style: &Style) {
        let fill = Fill {
            color: style.particle_color,
            glow: style.glow,
        };
        surface.fill_circle(self.position, self.size, &fill);
    }
}
