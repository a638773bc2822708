//! # Ambient Particles
//!
//! A pointer-reactive particle field: a few hundred glowing points anchored
//! around the screen, drifting gently, scattering away from the pointer and
//! linked to their neighbours by faint lines.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ambient_particles::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Simulation::new()
//!         .with_config(FieldConfig::default().with_pointer_radius(180.0))
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### The field
//!
//! [`ParticleField`] owns the particles. Its population follows the viewport
//! area, `min(300, floor(width * height / 5000))` with the default
//! [`FieldConfig`], and is regenerated from scratch on every resize.
//!
//! ### Behaviour
//!
//! Each tick every particle reads the shared [`PointerState`] and either
//! reacts to the pointer or drifts (see [`Behavior`]). Nothing about the
//! previous tick's mode is remembered.
//!
//! ### Links
//!
//! [`ConnectionGraph`] draws a line between every pair closer than
//! `link_distance`, fading out linearly with distance.
//!
//! ### Driving it yourself
//!
//! The window host is optional. Any [`Surface`] implementation can be driven
//! by a [`FrameScheduler`]:
//!
//! ```ignore
//! let field = ParticleField::new(FieldConfig::default(), Style::default(), 800, 600)?;
//! let mut scheduler = FrameScheduler::new(field);
//! let mut surface = RecordingSurface::new(800, 600);
//!
//! scheduler.sink().send(FieldEvent::PointerMoved(Vec2::new(400.0, 300.0)));
//! scheduler.run_frames(&mut surface, 60);
//! ```

pub mod config;
pub mod connections;
pub mod error;
pub mod field;
pub mod gpu;
pub mod input;
pub mod particle;
pub mod scheduler;
mod simulation;
pub mod surface;
pub mod time;

pub use config::{FieldConfig, Style};
pub use connections::{link_opacity, ConnectionGraph, Link};
pub use error::{ConfigError, GpuError, SimulationError};
pub use field::ParticleField;
pub use glam::Vec2;
pub use gpu::GpuSurface;
pub use input::{PointerState, PointerTracker};
pub use particle::{Behavior, Particle};
pub use scheduler::{EventSink, FieldEvent, FrameScheduler, FrameStatus, StopToken};
pub use simulation::Simulation;
pub use surface::{Color, DrawCommand, Fill, RecordingSurface, Rect, Stroke, Surface};
pub use time::FrameClock;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::{
        Color, FieldConfig, FieldEvent, FrameScheduler, FrameStatus, ParticleField,
        PointerState, RecordingSurface, Simulation, SimulationError, StopToken, Style, Surface,
        Vec2,
    };
}
