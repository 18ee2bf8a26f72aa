use rand::RngExt;
use rand::rngs::StdRng;
use std::f64::consts::PI;

use super::VignetteBehavior;
use crate::render::{Rect, Rgba, Surface};

const COAT: Rgba = Rgba::hex(0x8b4513);

/// Dog waiting by the door. Every 20 to 30 seconds the ears prick up.
pub struct DogWaiting {
    tail: f64,
    /// 1.0 fully perked, relaxing to 0 over a second.
    perk: f64,
    timer: f64,
    next_perk: f64,
}

impl DogWaiting {
    pub fn new(rng: &mut StdRng) -> Self {
        DogWaiting { tail: 0.0, perk: 0.0, timer: 0.0, next_perk: rng.random_range(20.0..30.0) }
    }

    pub fn ear_perk(&self) -> f64 {
        self.perk
    }
}

impl VignetteBehavior for DogWaiting {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.tail += dt * 6.0;
        self.perk = (self.perk - dt).max(0.0);
        self.timer += dt;
        if self.timer > self.next_perk {
            self.timer = 0.0;
            self.next_perk = rng.random_range(20.0..30.0);
            self.perk = 1.0;
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        let (cx, cy) = r.at(0.5, 0.6);

        s.fill_ellipse(cx, cy, r.w * 0.15, r.h * 0.2, 0.0, COAT);
        s.fill_circle(cx, cy - r.h * 0.15, r.h * 0.12, COAT);

        let lift = self.perk * 10.0 * u;
        s.fill_ellipse(cx - r.w * 0.08, cy - r.h * 0.2 - lift, r.w * 0.05, r.h * 0.1, -0.3, COAT);
        s.fill_ellipse(cx + r.w * 0.08, cy - r.h * 0.2 - lift, r.w * 0.05, r.h * 0.1, 0.3, COAT);

        let wag = self.tail.sin() * 0.8;
        s.stroke_arc(cx - r.w * 0.1, cy + r.h * 0.1, r.w * 0.1, PI, PI + wag, COAT, 5.0 * u);
    }
}
