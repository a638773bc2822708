//! The particle field: population, resize, and the per-tick pass.
//!
//! The number of particles scales with viewport area and is capped (see
//! [`FieldConfig::population`]), so density looks the same across window
//! sizes while the pairwise link scan stays cheap.
//!
//! A resize is a hard reset. The surface is resized first, then the whole
//! collection is thrown away and regenerated against the new bounds; old
//! positions are not re-projected.
//!
//! # Example
//!
//! ```ignore
//! let mut field = ParticleField::new(FieldConfig::default().with_seed(3), Style::default(), 1000, 1000)?;
//! assert_eq!(field.len(), 200);
//!
//! let mut surface = RecordingSurface::new(1000, 1000);
//! field.tick(&mut surface, PointerState::Absent);
//! ```

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::{FieldConfig, Style};
use crate::connections::ConnectionGraph;
use crate::error::ConfigError;
use crate::input::PointerState;
use crate::particle::{Behavior, Particle};
use crate::surface::{Rect, Surface};

/// Owner of the particle collection.
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    style: Style,
    graph: ConnectionGraph,
    particles: Vec<Particle>,
    width: u32,
    height: u32,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field populated for a `width x height` viewport.
    ///
    /// Fails if `config` or `style` doesn't validate. The configuration is
    /// fixed for the field's lifetime, so later resizes can't fail.
    pub fn new(
        config: FieldConfig,
        style: Style,
        width: u32,
        height: u32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        style.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let graph = ConnectionGraph::new(&config);

        let mut field = Self {
            config,
            style,
            graph,
            particles: Vec::new(),
            width,
            height,
            rng,
        };
        field.populate();
        Ok(field)
    }

    /// Discard every particle and scatter a fresh set over the current viewport.
    fn populate(&mut self) {
        let count = self.config.population(self.width, self.height);
        let (w, h) = (self.width as f32, self.height as f32);

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            // count > 0 implies a non-empty viewport
            let home = Vec2::new(self.rng.gen_range(0.0..w), self.rng.gen_range(0.0..h));
            self.particles
                .push(Particle::spawn(home, &self.config, &mut self.rng));
        }

        debug!(
            width = self.width,
            height = self.height,
            count,
            "particle field populated"
        );
    }

    /// Resize the surface to the new viewport, then rebuild the collection.
    pub fn resize<S: Surface + ?Sized>(&mut self, surface: &mut S, width: u32, height: u32) {
        surface.resize(width, height);
        self.width = width;
        self.height = height;
        self.populate();
    }

    /// One full pass: clear, update and draw each particle, then draw links.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S, pointer: PointerState) {
        surface.clear(Rect::from_size(self.width, self.height));

        let behavior = Behavior::select(pointer);
        for particle in &mut self.particles {
            particle.update(behavior, &self.config);
            particle.draw(surface, &self.style);
        }

        let links = self.graph.draw(&self.particles, surface, &self.style);
        trace!(particles = self.particles.len(), links, "tick");
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for hosts that want to place particles by hand.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn style(&self) -> &Style {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn seeded(width: u32, height: u32) -> ParticleField {
        ParticleField::new(
            FieldConfig::default().with_seed(9),
            Style::default(),
            width,
            height,
        )
        .unwrap()
    }

    #[test]
    fn test_population_matches_viewport() {
        assert_eq!(seeded(1000, 1000).len(), 200);
        assert_eq!(seeded(2560, 1440).len(), 300);
        assert_eq!(seeded(70, 70).len(), 0);
    }

    #[test]
    fn test_zero_viewport_is_empty() {
        let field = seeded(0, 0);
        assert!(field.is_empty());
    }

    #[test]
    fn test_initial_positions_are_home() {
        let field = seeded(800, 600);
        for p in field.particles() {
            assert_eq!(p.position, p.base());
            assert!(p.base().x >= 0.0 && p.base().x < 800.0);
            assert!(p.base().y >= 0.0 && p.base().y < 600.0);
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = seeded(640, 480);
        let b = seeded(640, 480);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_tick_order() {
        let mut field = ParticleField::new(
            FieldConfig::default().with_seed(1).with_drift_speed(0.0),
            Style::default(),
            300,
            300,
        )
        .unwrap();
        let mut surface = RecordingSurface::new(300, 300);
        field.tick(&mut surface, PointerState::Absent);

        let commands = surface.commands();
        assert!(matches!(commands[0], DrawCommand::Clear(r) if r.covers(300, 300)));

        // All circles come before any line
        let first_line = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Line { .. }))
            .unwrap_or(commands.len());
        let circles = commands[1..first_line]
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        assert_eq!(circles, field.len());
        assert_eq!(first_line, field.len() + 1);
    }

    #[test]
    fn test_resize_rebuilds_and_resizes_surface() {
        let mut field = seeded(1000, 1000);
        let mut surface = RecordingSurface::new(1000, 1000);
        let before = field.particles().to_vec();

        field.resize(&mut surface, 500, 400);

        assert_eq!(surface.size(), (500, 400));
        assert_eq!(field.size(), (500, 400));
        assert_eq!(field.len(), 40);
        assert_ne!(field.particles(), &before[..40]);
        for p in field.particles() {
            assert_eq!(p.position, p.base());
            assert!(p.base().x < 500.0 && p.base().y < 400.0);
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let inverted = FieldConfig::default().with_size_range(4.0..1.0);
        let err = ParticleField::new(inverted, Style::default(), 1000, 1000).unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyRange {
                name: "size_range",
                low: 4.0,
                high: 1.0,
            }
        );

        let empty = FieldConfig::default().with_density_range(5.0..5.0);
        assert!(ParticleField::new(empty, Style::default(), 1000, 1000).is_err());

        let unbounded = FieldConfig::default().with_size_range(1.0..f32::INFINITY);
        assert!(ParticleField::new(unbounded, Style::default(), 1000, 1000).is_err());

        let style = Style::default().with_link_width(-1.0);
        assert!(ParticleField::new(FieldConfig::default(), style, 1000, 1000).is_err());
    }

    #[test]
    fn test_invalid_config_rejected_even_for_empty_viewport() {
        let inverted = FieldConfig::default().with_size_range(4.0..1.0);
        assert!(ParticleField::new(inverted, Style::default(), 0, 0).is_err());
    }
}
