use rand::RngExt;
use rand::rngs::StdRng;
use std::f64::consts::{PI, TAU};

use super::{SILHOUETTE, VignetteBehavior};
use crate::render::{Rect, Rgba, Surface};

const PARTNER: Rgba = Rgba::hex(0x2a2a2a);

/// Slow dance; now and then one partner twirls a full turn.
pub struct DancingCouple {
    rotation: f64,
    /// Which partner is twirling and how far round they are.
    spin: Option<(usize, f64)>,
}

impl DancingCouple {
    pub fn new() -> Self {
        DancingCouple { rotation: 0.0, spin: None }
    }

    pub fn spinning(&self) -> Option<usize> {
        self.spin.map(|(who, _)| who)
    }
}

impl VignetteBehavior for DancingCouple {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.rotation += dt * PI / 4.0;

        if let Some((_, turned)) = &mut self.spin {
            *turned += dt * TAU;
            if *turned >= TAU {
                self.spin = None;
            }
        } else if rng.random_bool(0.005) {
            self.spin = Some((rng.random_range(0..2), 0.0));
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let (cx, cy) = r.center();
        s.save();
        s.translate(cx, cy);
        for (who, offset, color) in [(0, -0.08, SILHOUETTE), (1, 0.08, PARTNER)] {
            s.save();
            s.rotate(self.rotation);
            s.translate(r.w * offset, 0.0);
            if let Some((spinner, turned)) = self.spin {
                if spinner == who {
                    s.rotate(turned);
                }
            }
            s.fill_circle(0.0, -r.h * 0.12, r.h * 0.08, color);
            s.fill_rect(Rect::new(-r.w * 0.05, -r.h * 0.05, r.w * 0.1, r.h * 0.2), color);
            s.restore();
        }
        s.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_twirl_lasts_one_second() {
        let mut rng = StdRng::seed_from_u64(30);
        let mut couple = DancingCouple::new();
        let mut steps = 0;
        while couple.spinning().is_none() {
            couple.update(0.01, &mut rng);
            steps += 1;
            assert!(steps < 100_000);
        }
        let mut spin_steps = 0;
        while couple.spinning().is_some() {
            couple.update(0.01, &mut rng);
            spin_steps += 1;
        }
        assert!((99..=101).contains(&spin_steps), "twirl took {spin_steps} steps");
    }
}
