//! Confetti bursts
//!
//! Physics advance once per tick (velocities are pixels per tick), while lifetime is
//! measured in milliseconds.

use std::f64::consts::TAU;

use crate::constants::*;
use crate::draw::{Color, DrawCommand};
use crate::random::RandomSource;

#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub color: Color,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub age: f64,
    pub ttl: f64,
}

impl ConfettiParticle {
    /// Fades linearly to transparent over the lifetime.
    #[inline]
    pub fn alpha(&self) -> f64 {
        (1.0 - self.age / self.ttl).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfettiSystem {
    pub particles: Vec<ConfettiParticle>,
}

impl ConfettiSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Appends `amount` particles around `origin`. Without an origin each particle picks
    /// its own spot in the upper middle band of the surface.
    pub fn spawn<R: RandomSource>(
        &mut self,
        rng: &mut R,
        amount: usize,
        origin: Option<(f64, f64)>,
        width: f64,
        height: f64,
    ) {
        self.particles.reserve(amount);
        for _ in 0..amount {
            let (base_x, base_y) = origin.unwrap_or_else(|| {
                (width * rng.range(0.25, 0.75), height * rng.range(0.08, 0.2))
            });
            let x = base_x + rng.centered(CONFETTI_SCATTER_X);
            let y = base_y + rng.centered(CONFETTI_SCATTER_Y);

            let angle = rng.next_f64() * TAU;
            let speed = rng.range(CONFETTI_MIN_SPEED, CONFETTI_MIN_SPEED + CONFETTI_SPEED_RANGE);
            let vx = angle.cos() * speed * 0.5 + rng.centered(1.2);
            // upward kick on top of the random direction
            let vy = angle.sin() * speed * 0.7 - 1.8 - rng.next_f64() * 1.2;

            self.particles.push(ConfettiParticle {
                x,
                y,
                vx,
                vy,
                size: rng.range(CONFETTI_MIN_SIZE, CONFETTI_MIN_SIZE + CONFETTI_SIZE_RANGE),
                color: *rng.pick(&CONFETTI_PALETTE),
                rotation: rng.next_f64() * TAU,
                rotation_speed: rng.centered(0.4),
                age: 0.0,
                ttl: rng.range(CONFETTI_MIN_TTL_MS, CONFETTI_MIN_TTL_MS + CONFETTI_TTL_RANGE_MS),
            });
        }
    }

    /// Ages every particle by `dt_ms`, drops the expired ones and integrates the rest.
    pub fn update(&mut self, dt_ms: f64) {
        let dt_ms = dt_ms.max(0.0);
        self.particles.retain_mut(|c| {
            c.age += dt_ms;
            if c.age >= c.ttl {
                return false;
            }
            c.vy += CONFETTI_GRAVITY;
            c.vx *= CONFETTI_DAMPING;
            c.x += c.vx;
            c.y += c.vy;
            c.rotation += c.rotation_speed;
            true
        });
    }

    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.extend(self.particles.iter().map(|c| DrawCommand::FillRotatedRect {
            x: c.x,
            y: c.y,
            width: c.size,
            height: c.size * 0.6,
            rotation: c.rotation,
            color: c.color.with_alpha(c.alpha()),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(ttl: f64) -> ConfettiSystem {
        let mut rng = fastrand::Rng::with_seed(21);
        let mut sys = ConfettiSystem::new();
        sys.spawn(&mut rng, 1, Some((100.0, 100.0)), 800.0, 600.0);
        sys.particles[0].ttl = ttl;
        sys
    }

    #[test]
    fn spawn_ranges() {
        let mut rng = fastrand::Rng::with_seed(20);
        let mut sys = ConfettiSystem::new();
        sys.spawn(&mut rng, 300, Some((400.0, 300.0)), 800.0, 600.0);
        assert_eq!(sys.len(), 300);
        let mean_vy = sys.particles.iter().map(|c| c.vy).sum::<f64>() / 300.0;
        assert!(mean_vy < -1.0, "burst should lean upward, got {mean_vy}");
        for c in &sys.particles {
            assert!((c.x - 400.0).abs() <= CONFETTI_SCATTER_X / 2.0);
            assert!((c.y - 300.0).abs() <= CONFETTI_SCATTER_Y / 2.0);
            assert!((CONFETTI_MIN_TTL_MS..CONFETTI_MIN_TTL_MS + CONFETTI_TTL_RANGE_MS).contains(&c.ttl));
            assert!((6.0..14.0).contains(&c.size));
            assert!(CONFETTI_PALETTE.contains(&c.color));
            assert_eq!(c.age, 0.0);
        }
    }

    #[test]
    fn default_region_is_upper_middle() {
        let mut rng = fastrand::Rng::with_seed(22);
        let mut sys = ConfettiSystem::new();
        sys.spawn(&mut rng, 200, None, 1000.0, 1000.0);
        for c in &sys.particles {
            assert!((230.0..=770.0).contains(&c.x));
            assert!((68.0..=212.0).contains(&c.y));
        }
    }

    #[test]
    fn present_until_ttl_then_removed() {
        let mut sys = single(100.0);
        for _ in 0..9 {
            sys.update(10.0);
            assert_eq!(sys.len(), 1);
        }
        // age reaches exactly the ttl on this pass
        sys.update(10.0);
        assert!(sys.is_empty());
    }

    #[test]
    fn gravity_damping_and_fade() {
        let mut sys = single(1000.0);
        let c0 = sys.particles[0].clone();
        sys.update(250.0);
        let c1 = &sys.particles[0];
        assert!((c1.vy - (c0.vy + CONFETTI_GRAVITY)).abs() < 1e-12);
        assert!((c1.vx - c0.vx * CONFETTI_DAMPING).abs() < 1e-12);
        assert!((c1.x - (c0.x + c1.vx)).abs() < 1e-12);
        assert!((c1.rotation - (c0.rotation + c0.rotation_speed)).abs() < 1e-12);
        assert!((c1.alpha() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn expired_entries_never_drawn() {
        let mut rng = fastrand::Rng::with_seed(23);
        let mut sys = ConfettiSystem::new();
        sys.spawn(&mut rng, 50, None, 800.0, 600.0);
        sys.update(CONFETTI_MIN_TTL_MS + CONFETTI_TTL_RANGE_MS);
        let mut out = Vec::new();
        sys.draw(&mut out);
        assert!(out.is_empty());
    }
}
