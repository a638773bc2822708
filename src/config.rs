//! Tunables for the particle field.
//!
//! [`FieldConfig`] controls how particles are populated and how they move,
//! [`Style`] controls how they look. Both default to the classic green
//! "constellation" look and are configured builder-style:
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_pointer_radius(200.0)
//!     .with_link_distance(120.0)
//!     .with_seed(7);
//! ```

use std::ops::Range;

use crate::error::ConfigError;
use crate::surface::Color;

/// Behavioural tunables for the particle field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Hard cap on the number of particles, whatever the viewport area.
    pub max_particles: usize,
    /// Viewport area (square pixels) that earns one particle.
    pub area_per_particle: f32,
    /// Radius around the pointer inside which particles are pushed away.
    pub pointer_radius: f32,
    /// Lower bound on the particle-to-pointer distance used for the push direction.
    pub min_pointer_distance: f32,
    /// Fraction of the home offset recovered per tick while the pointer is
    /// present but out of reach.
    pub settle_rate: f32,
    /// Per-axis offset from home beyond which a drifting particle is pulled back.
    pub tether: f32,
    /// Fraction of the home offset recovered per tick once past the tether.
    pub drift_return_rate: f32,
    /// Pairs closer than this are linked.
    pub link_distance: f32,
    /// Opacity of a link between two coincident particles.
    pub link_max_opacity: f32,
    /// Render radius range.
    pub size_range: Range<f32>,
    /// Pointer responsiveness range.
    pub density_range: Range<f32>,
    /// Each drift velocity axis is drawn from `[-drift_speed, drift_speed)`.
    pub drift_speed: f32,
    /// Seed for particle generation. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_particles: 300,
            area_per_particle: 5000.0,
            pointer_radius: 150.0,
            min_pointer_distance: 1e-3,
            settle_rate: 0.1,
            tether: 50.0,
            drift_return_rate: 0.05,
            link_distance: 100.0,
            link_max_opacity: 0.3,
            size_range: 1.0..4.0,
            density_range: 1.0..31.0,
            drift_speed: 0.25,
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Number of particles for a viewport: `min(max_particles, floor(w * h / area_per_particle))`.
    pub fn population(&self, width: u32, height: u32) -> usize {
        let area = f64::from(width) * f64::from(height);
        let count = (area / f64::from(self.area_per_particle)).floor() as usize;
        count.min(self.max_particles)
    }

    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.max_particles = max;
        self
    }

    pub fn with_area_per_particle(mut self, area: f32) -> Self {
        self.area_per_particle = area;
        self
    }

    pub fn with_pointer_radius(mut self, radius: f32) -> Self {
        self.pointer_radius = radius;
        self
    }

    pub fn with_min_pointer_distance(mut self, epsilon: f32) -> Self {
        self.min_pointer_distance = epsilon;
        self
    }

    /// Set the drift tether and the rate at which drifting particles return past it.
    pub fn with_tether(mut self, tether: f32, return_rate: f32) -> Self {
        self.tether = tether;
        self.drift_return_rate = return_rate;
        self
    }

    pub fn with_settle_rate(mut self, rate: f32) -> Self {
        self.settle_rate = rate;
        self
    }

    /// Set the distance below which two particles are linked.
    pub fn with_link_distance(mut self, distance: f32) -> Self {
        self.link_distance = distance;
        self
    }

    pub fn with_link_max_opacity(mut self, opacity: f32) -> Self {
        self.link_max_opacity = opacity;
        self
    }

    pub fn with_size_range(mut self, range: Range<f32>) -> Self {
        self.size_range = range;
        self
    }

    pub fn with_density_range(mut self, range: Range<f32>) -> Self {
        self.density_range = range;
        self
    }

    /// Set the drift speed. Zero disables ambient drift entirely.
    pub fn with_drift_speed(mut self, speed: f32) -> Self {
        self.drift_speed = speed;
        self
    }

    /// Make particle generation reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every tunable is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("area_per_particle", self.area_per_particle)?;
        positive("pointer_radius", self.pointer_radius)?;
        positive("min_pointer_distance", self.min_pointer_distance)?;
        positive("tether", self.tether)?;
        positive("link_distance", self.link_distance)?;
        unit("settle_rate", self.settle_rate)?;
        unit("drift_return_rate", self.drift_return_rate)?;
        unit("link_max_opacity", self.link_max_opacity)?;
        non_empty("size_range", &self.size_range)?;
        non_empty("density_range", &self.density_range)?;
        if self.drift_speed.is_nan() || self.drift_speed < 0.0 {
            return Err(ConfigError::NotPositive {
                name: "drift_speed",
                value: self.drift_speed,
            });
        }
        Ok(())
    }
}

/// Visual tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Colour the surface is cleared to every tick.
    pub background: Color,
    /// Particle fill colour.
    pub particle_color: Color,
    /// Soft halo radius around each particle, in pixels. Zero disables it.
    pub glow: f32,
    /// Link colour. Its alpha is replaced by the per-link opacity.
    pub link_color: Color,
    /// Link stroke width in pixels.
    pub link_width: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            particle_color: Color::rgb8(0x00, 0xff, 0x00),
            glow: 10.0,
            link_color: Color::rgb8(0, 255, 0),
            link_width: 0.5,
        }
    }
}

impl Style {
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_particle_color(mut self, color: Color) -> Self {
        self.particle_color = color;
        self
    }

    pub fn with_glow(mut self, glow: f32) -> Self {
        self.glow = glow;
        self
    }

    pub fn with_link_color(mut self, color: Color) -> Self {
        self.link_color = color;
        self
    }

    pub fn with_link_width(mut self, width: f32) -> Self {
        self.link_width = width;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("link_width", self.link_width)?;
        if self.glow.is_nan() || self.glow < 0.0 {
            return Err(ConfigError::NotPositive {
                name: "glow",
                value: self.glow,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    // Written this way round so NaN is rejected too.
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

fn non_empty(name: &'static str, range: &Range<f32>) -> Result<(), ConfigError> {
    if range.start.is_finite() && range.end.is_finite() && range.start < range.end {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange {
            name,
            low: range.start,
            high: range.end,
        })
    }
}
