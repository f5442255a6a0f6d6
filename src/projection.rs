//! Perspective projection around the vertical axis

use crate::constants::{CAMERA_FOCAL, CAMERA_OFFSET, PIXELS_PER_UNIT, TREE_HEIGHT};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Camera-relative depth used for back-to-front ordering. Larger is farther.
    #[inline]
    pub fn depth_key(&self, rotation: f64) -> f64 {
        self.z * rotation.cos() + self.x * rotation.sin()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub sx: f64,
    pub sy: f64,
    /// Perspective factor; `<= 0` means the point is behind the camera.
    pub scale: f64,
    pub rz: f64,
}

impl Projected {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.scale > 0.0
    }
}

/// Camera parameters plus the viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    pub width: f64,
    pub height: f64,
    pub focal: f64,
    pub offset: f64,
    pub pixels_per_unit: f64,
}

impl Projector {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            focal: CAMERA_FOCAL,
            offset: CAMERA_OFFSET,
            pixels_per_unit: PIXELS_PER_UNIT,
        }
    }

    pub fn project(&self, p: Point3, rotation: f64) -> Projected {
        let (s, c) = rotation.sin_cos();
        let rx = p.x * c - p.z * s;
        let rz = p.x * s + p.z * c;

        let scale = self.focal / (self.focal + rz + self.offset);
        let sx = self.width / 2.0 + rx * scale * self.pixels_per_unit;
        let sy = self.height / 2.0 - (p.y - TREE_HEIGHT / 2.0) * scale * self.pixels_per_unit;
        Projected { sx, sy, scale, rz }
    }

    /// Projects and filters out points behind the camera.
    #[inline]
    pub fn project_visible(&self, p: Point3, rotation: f64) -> Option<Projected> {
        Some(self.project(p, rotation)).filter(Projected::is_visible)
    }
}

/// Indices of `points` ordered farthest first for the given rotation.
///
/// `order` is reused between frames to avoid reallocating.
pub fn depth_sort<'a, I>(points: I, rotation: f64, order: &mut Vec<usize>)
where
    I: IntoIterator<Item = &'a Point3>,
{
    let keys: Vec<f64> = points.into_iter().map(|p| p.depth_key(rotation)).collect();
    order.clear();
    order.extend(0..keys.len());
    order.sort_by(|&a, &b| keys[b].total_cmp(&keys[a]));
}
