//! The 2D drawing surface the field renders onto.
//!
//! The simulation only ever issues three kinds of draw calls: clear a region,
//! fill a circle, stroke a line. [`Surface`] is that contract; the window host
//! implements it on the GPU ([`GpuSurface`](crate::gpu::GpuSurface)) and
//! [`RecordingSurface`] implements it in memory for headless use and tests.

use glam::Vec2;

/// Linear RGBA colour, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from 8-bit channels, as in `#00FF00`.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Same colour with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// The rectangle covering a whole `width x height` surface.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Whether this rectangle covers all of a `width x height` surface.
    pub fn covers(&self, width: u32, height: u32) -> bool {
        self.origin.x <= 0.0
            && self.origin.y <= 0.0
            && self.origin.x + self.size.x >= width as f32
            && self.origin.y + self.size.y >= height as f32
    }
}

/// How a circle is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
    /// Radius of the soft halo drawn around the disc, like a canvas shadow blur.
    pub glow: f32,
}

/// How a line is stroked. Opacity lives in `color.a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// A drawing target sized to the viewport.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the backing store to a new viewport.
    fn resize(&mut self, width: u32, height: u32);

    /// Reset a region to the background colour.
    fn clear(&mut self, region: Rect);

    /// Draw a filled circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: &Fill);

    /// Draw a straight line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Circle { center: Vec2, radius: f32, fill: Fill },
    Line { from: Vec2, to: Vec2, stroke: Stroke },
}

/// A surface that keeps the draw calls of the current frame in memory.
///
/// Clearing the full surface discards everything recorded so far, the same
/// way a real clear wipes the pixels underneath.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Everything drawn since the last full clear, in order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, &Fill)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle { center, radius, fill } => Some((*center, *radius, fill)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, &Stroke)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { from, to, stroke } => Some((*from, *to, stroke)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self, region: Rect) {
        if region.covers(self.width, self.height) {
            self.commands.clear();
        }
        self.commands.push(DrawCommand::Clear(region));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: &Fill) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill: *fill,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            stroke: *stroke,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb8() {
        let green = Color::rgb8(0, 255, 0);
        assert_eq!(green.to_array(), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(green.with_alpha(0.3).a, 0.3);
    }

    #[test]
    fn test_rect_covers() {
        assert!(Rect::from_size(800, 600).covers(800, 600));
        assert!(!Rect::new(10.0, 0.0, 800.0, 600.0).covers(800, 600));
        assert!(!Rect::from_size(400, 600).covers(800, 600));
    }

    #[test]
    fn test_full_clear_discards_previous_frame() {
        let mut surface = RecordingSurface::new(100, 100);
        let fill = Fill {
            color: Color::BLACK,
            glow: 0.0,
        };
        surface.fill_circle(Vec2::new(5.0, 5.0), 1.0, &fill);
        surface.clear(Rect::from_size(100, 100));
        assert_eq!(surface.commands().len(), 1);
        assert_eq!(surface.circles().count(), 0);
    }

    #[test]
    fn test_partial_clear_keeps_commands() {
        let mut surface = RecordingSurface::new(100, 100);
        let stroke = Stroke {
            color: Color::BLACK,
            width: 1.0,
        };
        surface.stroke_line(Vec2::ZERO, Vec2::ONE, &stroke);
        surface.clear(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(surface.lines().count(), 1);
        assert_eq!(surface.commands().len(), 2);
    }

    #[test]
    fn test_resize() {
        let mut surface = RecordingSurface::new(100, 100);
        surface.resize(640, 480);
        assert_eq!(surface.size(), (640, 480));
    }
}
