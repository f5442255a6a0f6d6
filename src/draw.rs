//! Draw commands
//!
//! The pipeline never talks to a drawing surface directly. Each frame it emits a list
//! of these commands per layer and the adapter replays them on a Canvas 2D context.

use std::fmt;

/// RGBA color with channels in 0..=255 and alpha in 0..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(255.0, 255.0, 255.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Darkens the color channels, flooring like integer pixel math would.
    pub fn shade(self, factor: f64) -> Self {
        Self {
            r: (self.r * factor).floor(),
            g: (self.g * factor).floor(),
            b: (self.b * factor).floor(),
            a: self.a,
        }
    }
}

/// CSS `rgba()` form, ready for `fillStyle` or a gradient stop.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = |v: f64| v.clamp(0.0, 255.0).round() as u32;
        write!(
            f,
            "rgba({},{},{},{})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// Compositing mode; `Additive` maps to the canvas `lighter` operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    Normal,
    Additive,
}

impl Blend {
    pub fn composite_operation(self) -> &'static str {
        match self {
            Blend::Normal => "source-over",
            Blend::Additive => "lighter",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Closed, filled polygon in screen space.
    FillPolygon { points: Vec<(f64, f64)>, color: Color },
    FillCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
        blend: Blend,
    },
    /// Circle filled with a radial gradient running from the center to `radius`.
    RadialGlow {
        x: f64,
        y: f64,
        radius: f64,
        stops: [GradientStop; 3],
        blend: Blend,
    },
    /// Circle drawn through a gaussian blur filter of `blur` pixels.
    BlurredCircle {
        x: f64,
        y: f64,
        radius: f64,
        blur: f64,
        color: Color,
        blend: Blend,
    },
    /// Rectangle centered on (x, y) and rotated by `rotation` radians.
    FillRotatedRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation: f64,
        color: Color,
    },
}
