use rand::RngExt;
use rand::rngs::StdRng;

use super::{EffectBehavior, Lifetime};
use crate::render::Surface;
use crate::scene::Layout;
use crate::scene::palette::WHITE;

const TRAIL: usize = 5;

pub struct ShootingStar {
    life: Lifetime,
    start: (f64, f64),
    end: (f64, f64),
}

impl ShootingStar {
    pub fn new(duration_ms: f64, rng: &mut StdRng) -> Self {
        let start = (rng.random_range(0.0..0.5), rng.random_range(0.0..0.3));
        let end = (start.0 + rng.random_range(0.3..0.6), start.1 + rng.random_range(0.1..0.3));
        ShootingStar { life: Lifetime::new(duration_ms), start, end }
    }

    /// Normalized position at `progress` along the streak.
    fn point(&self, progress: f64) -> (f64, f64) {
        (
            self.start.0 + (self.end.0 - self.start.0) * progress,
            self.start.1 + (self.end.1 - self.start.1) * progress,
        )
    }

    /// Afterimages behind the head, nearest first, with their alpha.
    pub fn trail(&self) -> impl Iterator<Item = ((f64, f64), f64)> + '_ {
        let p = self.life.fraction();
        (1..=TRAIL).map(move |i| {
            let behind = (p - i as f64 * 0.02).max(0.0);
            (self.point(behind), 1.0 - i as f64 * 0.2)
        })
    }
}

impl EffectBehavior for ShootingStar {
    fn lifetime(&self) -> &Lifetime {
        &self.life
    }

    fn update(&mut self, dt: f64) {
        self.life.advance(dt);
    }

    fn render<S: Surface>(&self, s: &mut S, layout: &Layout) {
        let u = layout.unit;
        let (x, y) = self.point(self.life.fraction());
        s.fill_circle(x * layout.width, y * layout.height, 4.0 * u, WHITE);

        let base = s.alpha();
        for ((tx, ty), a) in self.trail() {
            s.set_alpha(base * a);
            s.fill_circle(tx * layout.width, ty * layout.height, 3.0 * u, WHITE);
        }
        s.set_alpha(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_trail_fades_and_lags() {
        let mut star = ShootingStar::new(1500.0, &mut StdRng::seed_from_u64(8));
        star.update(0.75);
        let trail: Vec<_> = star.trail().collect();
        assert_eq!(trail.len(), 5);
        let alphas: Vec<f64> = trail.iter().map(|(_, a)| *a).collect();
        for w in alphas.windows(2) {
            assert!(w[0] > w[1]);
        }
        let head = star.point(0.5);
        assert!(trail[0].0.0 < head.0);
    }

    #[test]
    fn test_streak_heads_down_and_right() {
        let star = ShootingStar::new(1500.0, &mut StdRng::seed_from_u64(9));
        assert!(star.end.0 > star.start.0);
        assert!(star.end.1 > star.start.1);
    }
}
