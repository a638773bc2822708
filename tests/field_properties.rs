//! Integration tests for the particle field's observable behaviour.
//!
//! Everything here runs headless against a `RecordingSurface`.

use ambient_particles::{
    link_opacity, ConfigError, ConnectionGraph, FieldConfig, FieldEvent, FrameScheduler, Particle,
    ParticleField, PointerState, RecordingSurface, Style, Surface, Vec2,
};

fn field(config: FieldConfig, width: u32, height: u32) -> ParticleField {
    ParticleField::new(config, Style::default(), width, height).unwrap()
}

fn at(x: f32, y: f32) -> Particle {
    Particle::new(Vec2::new(x, y), 2.0, 1.0, Vec2::ZERO)
}

// ============================================================================
// Population
// ============================================================================

#[test]
fn test_new_field_rests_at_home() {
    let field = field(FieldConfig::default().with_seed(11), 1280, 720);
    assert_eq!(field.len(), 184);
    for p in field.particles() {
        assert_eq!(p.position, p.base());
    }
}

#[test]
fn test_inverted_ranges_are_errors_not_panics() {
    let sizes = FieldConfig::default().with_size_range(4.0..1.0);
    let result = ParticleField::new(sizes, Style::default(), 1000, 1000);
    assert!(matches!(
        result,
        Err(ConfigError::EmptyRange { name: "size_range", .. })
    ));

    let densities = FieldConfig::default().with_density_range(31.0..1.0);
    let result = ParticleField::new(densities, Style::default(), 1000, 1000);
    assert!(matches!(
        result,
        Err(ConfigError::EmptyRange { name: "density_range", .. })
    ));
}

#[test]
fn test_square_viewport_scenario() {
    let field = field(FieldConfig::default().with_seed(1), 1000, 1000);
    assert_eq!(field.len(), 200);
}

#[test]
fn test_resize_repopulates_for_many_sizes() {
    let config = FieldConfig::default().with_seed(2);
    let mut field = field(config.clone(), 640, 480);
    let mut surface = RecordingSurface::new(640, 480);

    for &(w, h) in &[(1, 1), (100, 50), (333, 777), (1920, 1080), (3840, 2160), (0, 500)] {
        field.resize(&mut surface, w, h);

        let expected = ((w as u64 * h as u64) / 5000).min(300) as usize;
        assert_eq!(field.len(), expected, "viewport {w}x{h}");
        assert_eq!(surface.size(), (w, h));

        for p in field.particles() {
            let base = p.base();
            assert!(base.x >= 0.0 && base.x < w as f32);
            assert!(base.y >= 0.0 && base.y < h as f32);
            assert_eq!(p.position, base);
        }
    }
}

#[test]
fn test_resize_discards_displaced_positions() {
    let config = FieldConfig::default().with_seed(3).with_drift_speed(0.0);
    let mut field = field(config, 800, 800);
    let mut surface = RecordingSurface::new(800, 800);

    // Displace everything with the pointer
    for _ in 0..5 {
        field.tick(&mut surface, PointerState::Present(Vec2::new(400.0, 400.0)));
    }
    field.resize(&mut surface, 800, 800);

    for p in field.particles() {
        assert_eq!(p.position, p.base());
    }
}

// ============================================================================
// Links
// ============================================================================

#[test]
fn test_link_iff_closer_than_link_distance() {
    let graph = ConnectionGraph::new(&FieldConfig::default());
    let particles: Vec<Particle> = (0..40)
        .map(|i| {
            let t = i as f32;
            at((t * 37.0) % 400.0, (t * 53.0) % 300.0)
        })
        .collect();

    let links: Vec<_> = graph.links(&particles).collect();

    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            let d = particles[i].position.distance(particles[j].position);
            let link = links.iter().find(|l| l.a == i && l.b == j);
            if d < 100.0 {
                let link = link.expect("close pair must be linked");
                assert!((link.opacity - (1.0 - d / 100.0) * 0.3).abs() < 1e-6);
            } else {
                assert!(link.is_none());
            }
        }
    }
}

#[test]
fn test_link_at_fifty_units() {
    let graph = ConnectionGraph::new(&FieldConfig::default());
    let links: Vec<_> = graph.links(&[at(0.0, 0.0), at(50.0, 0.0)]).collect();
    assert_eq!(links.len(), 1);
    assert!((links[0].opacity - 0.15).abs() < 1e-6);
}

#[test]
fn test_link_boundary_is_exclusive() {
    let graph = ConnectionGraph::new(&FieldConfig::default());
    assert_eq!(graph.links(&[at(0.0, 0.0), at(100.0, 0.0)]).count(), 0);
    assert_eq!(graph.links(&[at(0.0, 0.0), at(99.9, 0.0)]).count(), 1);
    assert_eq!(link_opacity(100.0, 100.0, 0.3), None);
}

#[test]
fn test_link_opacity_monotonic() {
    let samples: Vec<f32> = (0..1000)
        .map(|i| link_opacity(i as f32 * 0.1, 100.0, 0.3).unwrap())
        .collect();
    assert!(samples.windows(2).all(|w| w[1] < w[0]));
    assert!(samples.iter().all(|&o| o > 0.0 && o <= 0.3));
}

// ============================================================================
// Motion
// ============================================================================

#[test]
fn test_drift_relaxation_never_increases_offset() {
    let config = FieldConfig::default();
    let mut p = at(0.0, 0.0);

    for &start in &[Vec2::new(51.0, 0.0), Vec2::new(-80.0, 30.0), Vec2::new(10.0, 300.0)] {
        p.position = start;
        let mut last = (p.position - p.base()).length();

        // Zero drift velocity: only the tether acts
        while (p.position - p.base()).abs().max_element() > config.tether {
            p.update(ambient_particles::Behavior::Drift, &config);
            let offset = (p.position - p.base()).length();
            assert!(offset < last);
            last = offset;
        }
    }
}

#[test]
fn test_pointer_push_points_away_and_scales_with_density() {
    let config = FieldConfig::default();
    let pointer = Vec2::new(130.0, 90.0);
    let home = Vec2::new(100.0, 100.0);
    let toward_pointer = (pointer - home).normalize();

    let mut last_magnitude = 0.0;
    for density in [1.0, 2.0, 5.0, 15.0, 31.0] {
        let mut p = Particle::new(home, 2.0, density, Vec2::ZERO);
        p.update(ambient_particles::Behavior::Influenced { pointer }, &config);

        let displacement = p.position - home;
        assert!(displacement.dot(toward_pointer) < 0.0);

        let magnitude = displacement.length();
        assert!(magnitude >= last_magnitude);
        last_magnitude = magnitude;
    }
}

#[test]
fn test_pointer_on_particle_keeps_field_finite() {
    let config = FieldConfig::default().with_seed(4);
    let mut field = field(config, 600, 600);
    let mut surface = RecordingSurface::new(600, 600);

    field.particles_mut()[0].position = Vec2::new(100.0, 100.0);
    for _ in 0..10 {
        field.tick(&mut surface, PointerState::Present(Vec2::new(100.0, 100.0)));
    }

    for p in field.particles() {
        assert!(p.position.is_finite());
    }
    for (center, _, _) in surface.circles() {
        assert!(center.is_finite());
    }
}

#[test]
fn test_positions_stay_near_home_over_time() {
    let config = FieldConfig::default().with_seed(8);
    let mut field = field(config, 1000, 1000);
    let mut surface = RecordingSurface::new(1000, 1000);

    for frame in 0..2000 {
        let pointer = if (frame / 200) % 2 == 0 {
            PointerState::Absent
        } else {
            PointerState::Present(Vec2::new(500.0, 500.0))
        };
        field.tick(&mut surface, pointer);
    }

    for p in field.particles() {
        // The push stops at the pointer radius plus one step of at most
        // density (< 31), and the home lies within the radius.
        assert!((p.position - p.base()).length() < 350.0);
    }
}

// ============================================================================
// Scheduler
// ============================================================================

#[test]
fn test_scheduler_frame_draws_full_scene() {
    let config = FieldConfig::default().with_seed(6);
    let mut scheduler = FrameScheduler::new(field(config, 400, 400));
    let mut surface = RecordingSurface::new(400, 400);

    scheduler.sink().send(FieldEvent::PointerMoved(Vec2::new(200.0, 200.0)));
    assert_eq!(scheduler.run_frames(&mut surface, 2), 2);

    let field = scheduler.field();
    assert_eq!(surface.circles().count(), field.len());

    let graph = ConnectionGraph::new(field.config());
    assert_eq!(surface.lines().count(), graph.links(field.particles()).count());
}
