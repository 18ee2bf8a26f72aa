use rand::RngExt;
use rand::rngs::StdRng;
use std::f64::consts::PI;

use super::VignetteBehavior;
use crate::render::{Rect, Rgba, Surface};

const BARS: Rgba = Rgba::hex(0x666666);
const FEATHERS: Rgba = Rgba::hex(0xffff00);
const BEAK: Rgba = Rgba::hex(0xff8800);
const UPPER: f64 = 0.4;
const LOWER: f64 = 0.6;

/// Canary hopping between two perches.
pub struct BirdCage {
    y: f64,
    target: f64,
    hopping: bool,
    timer: f64,
    next_hop: f64,
    bob: f64,
}

impl BirdCage {
    pub fn new(rng: &mut StdRng) -> Self {
        BirdCage { y: UPPER, target: UPPER, hopping: false, timer: 0.0, next_hop: rng.random_range(4.0..6.0), bob: 0.0 }
    }

    pub fn perch(&self) -> Option<f64> {
        (!self.hopping).then_some(self.y)
    }
}

impl VignetteBehavior for BirdCage {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.timer += dt;
        self.bob += dt * 3.0;

        if !self.hopping && self.timer > self.next_hop {
            self.hopping = true;
            self.target = if self.y == UPPER { LOWER } else { UPPER };
            self.timer = 0.0;
            self.next_hop = rng.random_range(4.0..6.0);
        }

        if self.hopping {
            self.y += (self.target - self.y) * (dt * 4.0).min(1.0);
            if (self.y - self.target).abs() < 0.01 {
                self.y = self.target;
                self.hopping = false;
            }
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        let w = 2.0 * u;
        let (cx, top) = r.at(0.5, 0.25);

        for i in 0..7 {
            let (bx, _) = r.at(0.2 + i as f64 * 0.1, 0.0);
            s.line(bx, top, bx, r.y + r.h * 0.8, BARS, w);
        }
        s.stroke_arc(cx, top, r.w * 0.3, PI, 2.0 * PI, BARS, w);
        for perch in [UPPER, LOWER] {
            let (x0, py) = r.at(0.2, perch);
            s.line(x0, py, r.x + r.w * 0.8, py, BARS, w);
        }

        let by = r.y + r.h * self.y + self.bob.sin() * 3.0 * u;
        s.fill_ellipse(cx, by, r.w * 0.06, r.h * 0.04, 0.0, FEATHERS);
        s.fill_polygon(&[(cx + r.w * 0.06, by), (cx + r.w * 0.09, by), (cx + r.w * 0.06, by + 3.0 * u)], BEAK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_hops_alternate_between_perches() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut bird = BirdCage::new(&mut rng);
        let mut perches = vec![UPPER];
        for _ in 0..(30 * 20) {
            bird.update(1.0 / 30.0, &mut rng);
            if let Some(p) = bird.perch() {
                if perches.last() != Some(&p) {
                    perches.push(p);
                }
            }
        }
        assert!(perches.len() >= 4, "expected several hops in 20 s, got {perches:?}");
        assert!(perches.windows(2).all(|w| w[0] != w[1]));
        assert!(perches.iter().all(|p| *p == UPPER || *p == LOWER));
    }
}
