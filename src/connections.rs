//! Proximity links between particles.
//!
//! Every unordered pair closer than `link_distance` gets a line whose opacity
//! fades linearly with distance: `(1 - d / link_distance) * link_max_opacity`.
//! Links are recomputed from scratch each tick with an exhaustive pairwise
//! scan. That is O(n^2), which the population cap keeps bounded (300
//! particles is under 45k pair checks).

use glam::Vec2;

use crate::config::{FieldConfig, Style};
use crate::particle::Particle;
use crate::surface::{Stroke, Surface};

/// A link between particles `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub from: Vec2,
    pub to: Vec2,
    pub opacity: f32,
}

/// Opacity of a link spanning `distance`, or `None` if the pair is too far apart.
pub fn link_opacity(distance: f32, link_distance: f32, max_opacity: f32) -> Option<f32> {
    if distance < link_distance {
        Some((1.0 - distance / link_distance) * max_opacity)
    } else {
        None
    }
}

/// Pairwise link finder and renderer.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionGraph {
    link_distance: f32,
    max_opacity: f32,
}

impl ConnectionGraph {
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            link_distance: config.link_distance,
            max_opacity: config.link_max_opacity,
        }
    }

    /// All links among `particles`, ordered by `(a, b)`.
    pub fn links<'a>(&self, particles: &'a [Particle]) -> impl Iterator<Item = Link> + 'a {
        let link_distance = self.link_distance;
        let max_opacity = self.max_opacity;

        particles.iter().enumerate().flat_map(move |(i, pi)| {
            particles[i + 1..]
                .iter()
                .enumerate()
                .filter_map(move |(k, pj)| {
                    let distance = pi.position.distance(pj.position);
                    link_opacity(distance, link_distance, max_opacity).map(|opacity| Link {
                        a: i,
                        b: i + 1 + k,
                        from: pi.position,
                        to: pj.position,
                        opacity,
                    })
                })
        })
    }

    /// Draw every link. Returns how many were drawn.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        particles: &[Particle],
        surface: &mut S,
        style: &Style,
    ) -> usize {
        let mut drawn = 0;
        for link in self.links(particles) {
            let stroke = Stroke {
                color: style.link_color.with_alpha(link.opacity),
                width: style.link_width,
            };
            surface.stroke_line(link.from, link.to, &stroke);
            drawn += 1;
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), 1.0, 1.0, Vec2::ZERO)
    }

    #[test]
    fn test_link_opacity_values() {
        assert_eq!(link_opacity(0.0, 100.0, 0.3), Some(0.3));
        assert!((link_opacity(50.0, 100.0, 0.3).unwrap() - 0.15).abs() < 1e-6);
        assert_eq!(link_opacity(100.0, 100.0, 0.3), None);
        assert_eq!(link_opacity(150.0, 100.0, 0.3), None);
    }

    #[test]
    fn test_link_opacity_decreases_with_distance() {
        let mut last = f32::INFINITY;
        for d in 0..100 {
            let o = link_opacity(d as f32, 100.0, 0.3).unwrap();
            assert!(o < last);
            last = o;
        }
    }

    #[test]
    fn test_links_only_close_pairs() {
        let graph = ConnectionGraph::new(&FieldConfig::default());
        let particles = vec![at(0.0, 0.0), at(50.0, 0.0), at(200.0, 0.0), at(0.0, 99.0)];

        let links: Vec<_> = graph.links(&particles).collect();
        let pairs: Vec<_> = links.iter().map(|l| (l.a, l.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 3)]);
        assert!((links[0].opacity - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_links_empty_and_single() {
        let graph = ConnectionGraph::new(&FieldConfig::default());
        assert_eq!(graph.links(&[]).count(), 0);
        assert_eq!(graph.links(&[at(1.0, 1.0)]).count(), 0);
    }

    #[test]
    fn test_draw_strokes_with_style() {
        let graph = ConnectionGraph::new(&FieldConfig::default());
        let style = Style::default();
        let particles = vec![at(0.0, 0.0), at(50.0, 0.0)];
        let mut surface = RecordingSurface::new(100, 100);

        assert_eq!(graph.draw(&particles, &mut surface, &style), 1);

        let (from, to, stroke) = surface.lines().next().unwrap();
        assert_eq!(from, Vec2::ZERO);
        assert_eq!(to, Vec2::new(50.0, 0.0));
        assert_eq!(stroke.width, 0.5);
        assert!((stroke.color.a - 0.15).abs() < 1e-6);
        assert_eq!(stroke.color.g, 1.0);
    }
}
