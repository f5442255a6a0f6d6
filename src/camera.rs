//! Drag-to-rotate camera with eased auto-rotation

use crate::constants::{
    DEFAULT_AUTO_ROTATE_SPEED, DRAG_SENSITIVITY, SMOOTHING_MAX_BLEND, SMOOTHING_RATE,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraController {
    pub current: f64,
    pub target: f64,
    pub auto_rotate_speed: f64,
    pub drag_sensitivity: f64,
    dragging: bool,
    last_pointer_x: f64,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_ROTATE_SPEED)
    }
}

impl CameraController {
    pub fn new(auto_rotate_speed: f64) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            auto_rotate_speed,
            drag_sensitivity: DRAG_SENSITIVITY,
            dragging: false,
            last_pointer_x: 0.0,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pointer_down(&mut self, x: f64) {
        self.dragging = true;
        self.last_pointer_x = x;
    }

    pub fn pointer_move(&mut self, x: f64) {
        if !self.dragging {
            return;
        }
        let dx = x - self.last_pointer_x;
        self.last_pointer_x = x;
        self.drag_by(dx);
    }

    /// Applies an already decoded horizontal drag delta in pixels.
    pub fn drag_by(&mut self, dx: f64) {
        self.target += dx * self.drag_sensitivity;
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Advances auto-rotation and eases `current` toward `target`. Returns `current`.
    pub fn advance(&mut self, dt: f64) -> f64 {
        let dt = dt.max(0.0);
        if !self.dragging {
            self.target += self.auto_rotate_speed * dt;
        }
        let blend = (SMOOTHING_RATE * dt).min(SMOOTHING_MAX_BLEND);
        self.current += (self.target - self.current) * blend;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_camera(current: f64, target: f64) -> CameraController {
        let mut cam = CameraController::new(0.0);
        cam.current = current;
        cam.target = target;
        cam
    }

    #[test]
    fn large_dt_is_clamped_to_quarter_step() {
        let mut cam = still_camera(0.0, 2.0);
        cam.advance(0.5);
        assert_eq!(cam.current, 0.5);

        let mut cam = still_camera(1.0, 3.0);
        cam.advance(0.1);
        assert_eq!(cam.current, 1.5);
    }

    #[test]
    fn small_dt_blends_proportionally() {
        let mut cam = still_camera(0.0, 1.0);
        cam.advance(0.01);
        assert!((cam.current - 0.05).abs() < 1e-12);
    }

    #[test]
    fn never_overshoots() {
        let mut cam = still_camera(0.0, 1.0);
        for _ in 0..200 {
            cam.advance(10.0);
            assert!(cam.current <= 1.0);
        }
        assert!((cam.current - 1.0).abs() < 1e-9);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut cam = CameraController::default();
        cam.target = 1.0;
        cam.advance(-3.0);
        assert_eq!((cam.current, cam.target), (0.0, 1.0));
    }

    #[test]
    fn auto_rotation_pauses_while_dragging() {
        let mut cam = CameraController::new(0.5);
        cam.advance(1.0);
        assert_eq!(cam.target, 0.5);

        cam.pointer_down(100.0);
        cam.advance(1.0);
        assert_eq!(cam.target, 0.5);

        cam.pointer_move(150.0);
        assert!((cam.target - (0.5 + 50.0 * DRAG_SENSITIVITY)).abs() < 1e-12);
        cam.pointer_move(140.0);
        assert!((cam.target - (0.5 + 40.0 * DRAG_SENSITIVITY)).abs() < 1e-12);

        cam.pointer_up();
        let before = cam.target;
        cam.pointer_move(500.0);
        assert_eq!(cam.target, before);
        cam.advance(1.0);
        assert!((cam.target - (before + 0.5)).abs() < 1e-12);
    }
}
