//! Random sources
//!
//! Generation and particle spawning take any `RandomSource`, so the browser build can
//! use `Math.random()` while tests feed a seeded generator.

use js_sys::Math;

pub trait RandomSource {
    /// Next float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform float in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform float in `[-half, half)`.
    fn centered(&mut self, width: f64) -> f64 {
        (self.next_f64() - 0.5) * width
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = (self.next_f64() * items.len() as f64) as usize;
        &items[idx.min(items.len() - 1)]
    }
}

/// `Math.random()`; only callable on wasm.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsRandom;

impl RandomSource for JsRandom {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        Math::random()
    }
}

impl RandomSource for fastrand::Rng {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed sequence, wrapping around.
    struct Sequence(Vec<f64>, usize);

    impl RandomSource for Sequence {
        fn next_f64(&mut self) -> f64 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v
        }
    }

    #[test]
    fn range_and_centered_map_unit_interval() {
        let mut rng = Sequence(vec![0.0, 0.5, 0.25], 0);
        assert_eq!(rng.range(2.0, 4.0), 2.0);
        assert_eq!(rng.range(2.0, 4.0), 3.0);
        assert_eq!(rng.centered(8.0), -2.0);
    }

    #[test]
    fn pick_never_goes_out_of_bounds() {
        let items = [1, 2, 3];
        let mut rng = Sequence(vec![0.0, 0.999_999, 0.5], 0);
        assert_eq!(*rng.pick(&items), 1);
        assert_eq!(*rng.pick(&items), 3);
        assert_eq!(*rng.pick(&items), 2);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = fastrand::Rng::with_seed(7);
        let mut b = fastrand::Rng::with_seed(7);
        for _ in 0..16 {
            let x = a.next_f64();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x, b.next_f64());
        }
    }
}
