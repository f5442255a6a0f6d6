//! Falling snow overlay
//!
//! Flakes live forever: once one drops below the bottom edge it is moved back above
//! the top with fresh size, speed and alpha.

use crate::constants::*;
use crate::draw::{Blend, Color, DrawCommand};
use crate::random::RandomSource;

#[derive(Clone, Debug, PartialEq)]
pub struct SnowParticle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Pixels per second.
    pub speed: f64,
    pub drift: f64,
    pub sway: f64,
    pub phase: f64,
    pub alpha: f64,
}

impl SnowParticle {
    pub fn spawn<R: RandomSource>(rng: &mut R, width: f64, height: f64) -> Self {
        let mut flake = Self {
            x: 0.0,
            y: 0.0,
            radius: 0.0,
            speed: 0.0,
            drift: rng.centered(SNOW_DRIFT_RANGE),
            sway: rng.range(0.2, 0.8),
            phase: rng.range(0.0, std::f64::consts::TAU),
            alpha: 0.0,
        };
        flake.respawn(rng, width, SNOW_SPAWN_BAND.min(height));
        flake
    }

    /// Moves the flake above the top edge, somewhere within `band` pixels of it.
    fn respawn<R: RandomSource>(&mut self, rng: &mut R, width: f64, band: f64) {
        self.x = rng.next_f64() * width;
        self.y = -(rng.next_f64() * band + SNOW_SPAWN_MARGIN);
        self.radius = rng.range(SNOW_MIN_RADIUS, SNOW_MIN_RADIUS + SNOW_RADIUS_RANGE);
        self.speed = rng.range(SNOW_MIN_SPEED, SNOW_MIN_SPEED + SNOW_SPEED_RANGE);
        self.alpha = rng.range(SNOW_MIN_ALPHA, SNOW_MIN_ALPHA + SNOW_ALPHA_RANGE);
    }
}

#[derive(Clone, Debug)]
pub struct SnowSystem {
    pub particles: Vec<SnowParticle>,
    pub count: usize,
    enabled: bool,
}

impl SnowSystem {
    pub fn new(count: usize, enabled: bool) -> Self {
        Self {
            particles: Vec::new(),
            count,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Fills the collection if snow is on and nothing has been spawned yet.
    pub fn ensure_populated<R: RandomSource>(&mut self, rng: &mut R, width: f64, height: f64) {
        if self.enabled && self.particles.is_empty() {
            self.particles = (0..self.count)
                .map(|_| SnowParticle::spawn(rng, width, height))
                .collect();
        }
    }

    /// `dt` in seconds, `time` is the wall clock in seconds driving the sway.
    pub fn update<R: RandomSource>(
        &mut self,
        rng: &mut R,
        dt: f64,
        time: f64,
        width: f64,
        height: f64,
    ) {
        if !self.enabled || self.particles.is_empty() {
            return;
        }
        let dt = dt.max(0.0);

        for p in &mut self.particles {
            p.y += p.speed * dt;
            let sway = (time * p.sway + p.phase).sin() * (p.drift * SNOW_SWAY_FACTOR * dt);
            p.x += p.drift * dt + sway;

            if p.y - p.radius > height {
                p.respawn(rng, width, SNOW_RECYCLE_BAND);
            }
        }
    }

    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        if !self.enabled {
            return;
        }
        out.extend(self.particles.iter().map(|p| DrawCommand::FillCircle {
            x: p.x,
            y: p.y,
            radius: p.radius,
            color: Color::WHITE.with_alpha(p.alpha),
            blend: Blend::Normal,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 800.0;
    const H: f64 = 600.0;

    #[test]
    fn lazily_populates_only_when_enabled() {
        let mut rng = fastrand::Rng::with_seed(9);
        let mut snow = SnowSystem::new(140, false);
        snow.ensure_populated(&mut rng, W, H);
        assert!(snow.particles.is_empty());

        snow.set_enabled(true);
        snow.ensure_populated(&mut rng, W, H);
        assert_eq!(snow.particles.len(), 140);
        assert!(snow.particles.iter().all(|p| p.y < 0.0 && p.y >= -(SNOW_SPAWN_BAND + SNOW_SPAWN_MARGIN)));
    }

    #[test]
    fn disabled_snow_does_no_work() {
        let mut rng = fastrand::Rng::with_seed(10);
        let mut snow = SnowSystem::new(10, true);
        snow.ensure_populated(&mut rng, W, H);
        let before = snow.particles.clone();

        snow.set_enabled(false);
        snow.update(&mut rng, 1.0, 1.0, W, H);
        assert_eq!(snow.particles, before);

        let mut out = Vec::new();
        snow.draw(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn falls_with_speed_and_drift() {
        let mut rng = fastrand::Rng::with_seed(11);
        let mut snow = SnowSystem::new(1, true);
        snow.ensure_populated(&mut rng, W, H);
        let p0 = snow.particles[0].clone();

        snow.update(&mut rng, 0.5, 0.0, W, H);
        let p1 = &snow.particles[0];
        assert!((p1.y - (p0.y + p0.speed * 0.5)).abs() < 1e-9);
        let expected_x = p0.x
            + p0.drift * 0.5
            + p0.phase.sin() * (p0.drift * SNOW_SWAY_FACTOR * 0.5);
        assert!((p1.x - expected_x).abs() < 1e-9);
    }

    #[test]
    fn recycles_past_bottom_edge() {
        let mut rng = fastrand::Rng::with_seed(12);
        let mut snow = SnowSystem::new(1, true);
        snow.ensure_populated(&mut rng, W, H);
        {
            let p = &mut snow.particles[0];
            p.y = H + p.radius - 0.5;
            p.radius = 100.0; // outside the spawn range, so a reset is visible
            p.speed = 1000.0;
        }
        snow.update(&mut rng, 1.0, 0.0, W, H);

        let p = &snow.particles[0];
        assert!(p.y < 0.0);
        assert!(p.y >= -(SNOW_RECYCLE_BAND + SNOW_SPAWN_MARGIN));
        assert!((SNOW_MIN_RADIUS..SNOW_MIN_RADIUS + SNOW_RADIUS_RANGE).contains(&p.radius));
        assert!((SNOW_MIN_SPEED..SNOW_MIN_SPEED + SNOW_SPEED_RANGE).contains(&p.speed));
        assert!((0.0..W).contains(&p.x));
    }

    #[test]
    fn draws_one_circle_per_flake() {
        let mut rng = fastrand::Rng::with_seed(13);
        let mut snow = SnowSystem::new(25, true);
        snow.ensure_populated(&mut rng, W, H);
        let mut out = Vec::new();
        snow.draw(&mut out);
        assert_eq!(out.len(), 25);
    }
}
