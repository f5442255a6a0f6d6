//! Procedural tree generation
//!
//! Foliage and light points are sampled once on a cone and never move afterwards.
//! Only their depth order and brightness change per frame.

use std::f64::consts::TAU;

use crate::constants::*;
use crate::draw::Color;
use crate::projection::Point3;
use crate::random::RandomSource;

#[derive(Clone, Debug, PartialEq)]
pub struct FoliageParticle {
    pub pos: Point3,
    pub base_color: Color,
    pub base_brightness: f64,
    pub phase: f64,
    pub size: f64,
}

impl FoliageParticle {
    /// Twinkle oscillation, bounded by `[0.45, 0.95] * base_brightness`.
    #[inline]
    pub fn brightness_at(&self, time: f64) -> f64 {
        self.base_brightness * (0.45 + 0.5 * (time * 3.0 + self.phase).sin().abs())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightParticle {
    pub pos: Point3,
    pub color: Color,
    pub brightness: f64,
    pub phase: f64,
    pub size: f64,
}

/// Radius of the cone at height `y`, before jitter.
#[inline]
pub fn cone_radius(y: f64) -> f64 {
    (1.0 - y / TREE_HEIGHT) * MAX_RADIUS
}

fn on_cone<R: RandomSource>(rng: &mut R, t: f64, spread: (f64, f64), jitter: f64) -> Point3 {
    let y = t * TREE_HEIGHT;
    let r = cone_radius(y) * rng.range(spread.0, spread.0 + spread.1);
    let theta = rng.next_f64() * TAU;
    let offset = r + rng.centered(jitter);
    Point3::new(theta.cos() * offset, y, theta.sin() * offset)
}

pub fn generate_foliage<R: RandomSource>(rng: &mut R, count: usize) -> Vec<FoliageParticle> {
    (0..count)
        .map(|_| {
            // power-law height keeps the base dense
            let t = rng.next_f64().powf(FOLIAGE_HEIGHT_EXPONENT);
            let jitter = FOLIAGE_JITTER * (1.0 - t);
            let pos = on_cone(rng, t, (0.6, 0.8), jitter);

            let base_color = Color::rgb(
                rng.range(10.0, 50.0),
                rng.range(140.0, 260.0),
                rng.range(40.0, 80.0),
            );
            FoliageParticle {
                pos,
                base_color,
                base_brightness: rng.range(0.15, 0.75),
                size: rng.range(2.0, 5.0),
                phase: rng.next_f64() * TAU,
            }
        })
        .collect()
}

pub fn generate_lights<R: RandomSource>(rng: &mut R, count: usize) -> Vec<LightParticle> {
    (0..count)
        .map(|_| {
            let t = rng.next_f64();
            let pos = on_cone(rng, t, (0.5, 0.8), LIGHT_JITTER);
            LightParticle {
                pos,
                color: *rng.pick(&LIGHT_PALETTE),
                brightness: rng.range(0.9, 1.5),
                phase: rng.next_f64() * TAU,
                size: rng.range(2.0, 3.2),
            }
        })
        .collect()
}

/// The static particle sets making up the tree.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    pub foliage: Vec<FoliageParticle>,
    pub lights: Vec<LightParticle>,
}

impl Tree {
    pub fn generate<R: RandomSource>(rng: &mut R, foliage: usize, lights: usize) -> Self {
        Self {
            foliage: generate_foliage(rng, foliage),
            lights: generate_lights(rng, lights),
        }
    }

    /// Replaces both particle sets. Not used by the frame loop itself.
    pub fn regenerate<R: RandomSource>(&mut self, rng: &mut R, foliage: usize, lights: usize) {
        *self = Self::generate(rng, foliage, lights);
    }

    /// Outline of the cone as seen from the camera: apex, down the right side to the
    /// base, back up the left side.
    pub fn silhouette_outline() -> impl Iterator<Item = Point3> {
        let edge = |s: usize| {
            let y = s as f64 / SILHOUETTE_STEPS as f64 * TREE_HEIGHT;
            (y, cone_radius(y) * SILHOUETTE_RADIUS_SCALE)
        };
        let apex = std::iter::once(Point3::new(0.0, TREE_HEIGHT, 0.0));
        let right = (0..=SILHOUETTE_STEPS).rev().map(move |s| {
            let (y, r) = edge(s);
            Point3::new(r, y, 0.0)
        });
        let left = (0..=SILHOUETTE_STEPS).map(move |s| {
            let (y, r) = edge(s);
            Point3::new(-r, y, 0.0)
        });
        apex.chain(right).chain(left)
    }

    pub fn star_position() -> Point3 {
        Point3::new(0.0, TREE_HEIGHT + STAR_LIFT, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_radius(p: &Point3) -> f64 {
        p.x.hypot(p.z)
    }

    #[test]
    fn counts_are_exact() {
        let mut rng = fastrand::Rng::with_seed(1);
        let tree = Tree::generate(&mut rng, 1300, 20);
        assert_eq!(tree.foliage.len(), 1300);
        assert_eq!(tree.lights.len(), 20);
    }

    #[test]
    fn foliage_stays_inside_tapered_cone() {
        let mut rng = fastrand::Rng::with_seed(2);
        for p in generate_foliage(&mut rng, 2000) {
            assert!((0.0..=TREE_HEIGHT).contains(&p.pos.y));
            let limit = cone_radius(p.pos.y) * 1.4 + FOLIAGE_JITTER / 2.0;
            assert!(horizontal_radius(&p.pos) <= limit + 1e-9);
            assert!((0.15..0.75).contains(&p.base_brightness));
            assert!((2.0..5.0).contains(&p.size));
        }
    }

    #[test]
    fn foliage_is_denser_near_the_base() {
        let mut rng = fastrand::Rng::with_seed(3);
        let foliage = generate_foliage(&mut rng, 4000);
        let lower = foliage.iter().filter(|p| p.pos.y < TREE_HEIGHT / 2.0).count();
        // P(t < 0.5) = 0.5^(1/0.6), roughly 31%; uniform would be 50%
        assert!(lower < 1600, "lower half held {lower}");
    }

    #[test]
    fn lights_use_palette_and_cone() {
        let mut rng = fastrand::Rng::with_seed(4);
        for l in generate_lights(&mut rng, 200) {
            assert!(LIGHT_PALETTE.contains(&l.color));
            assert!((0.0..=TREE_HEIGHT).contains(&l.pos.y));
            let limit = cone_radius(l.pos.y) * 1.3 + LIGHT_JITTER / 2.0;
            assert!(horizontal_radius(&l.pos) <= limit + 1e-9);
        }
    }

    #[test]
    fn cone_radius_never_grows_with_height() {
        let mut prev = f64::INFINITY;
        for i in 0..=60 {
            let r = cone_radius(i as f64 / 10.0);
            assert!(r <= prev);
            prev = r;
        }
        assert_eq!(cone_radius(TREE_HEIGHT), 0.0);
    }

    #[test]
    fn brightness_oscillation_is_bounded() {
        let p = FoliageParticle {
            pos: Point3::default(),
            base_color: Color::WHITE,
            base_brightness: 0.5,
            phase: 0.3,
            size: 2.0,
        };
        for i in 0..500 {
            let b = p.brightness_at(i as f64 * 0.013);
            assert!(b >= 0.225 - 1e-12 && b <= 0.475 + 1e-12);
        }
    }

    #[test]
    fn silhouette_is_closed_cone_outline() {
        let outline: Vec<Point3> = Tree::silhouette_outline().collect();
        assert_eq!(outline.len(), 1 + 2 * (SILHOUETTE_STEPS + 1));
        assert_eq!(outline[0], Point3::new(0.0, TREE_HEIGHT, 0.0));
        let base_right = outline[1 + SILHOUETTE_STEPS];
        let base_left = outline[2 + SILHOUETTE_STEPS];
        assert!(base_right.x > 0.0 && base_right.y == 0.0);
        assert_eq!(base_left.x, -base_right.x);
        assert!(outline.last().is_some_and(|p| p.y == TREE_HEIGHT && p.x == 0.0));
    }

    #[test]
    fn regenerate_replaces_sets() {
        let mut rng = fastrand::Rng::with_seed(5);
        let mut tree = Tree::generate(&mut rng, 10, 2);
        tree.regenerate(&mut rng, 30, 4);
        assert_eq!((tree.foliage.len(), tree.lights.len()), (30, 4));
    }
}
