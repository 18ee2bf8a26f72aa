use rand::RngExt;
use rand::rngs::StdRng;

use super::particles::Particles;
use super::{SKIN, VignetteBehavior};
use crate::render::{Rect, Rgba, Surface};
use crate::scene::palette::WHITE;

const WATER: Rgba = Rgba::hex(0xadd8e6);

/// Bubble bath; an arm appears over the rim every 5 to 10 seconds.
pub struct Bathtub {
    ripple: f64,
    arm_timer: f64,
    next_arm: f64,
    arm_visible: bool,
    bubbles: Particles,
}

impl Bathtub {
    pub fn new(rng: &mut StdRng) -> Self {
        Bathtub {
            ripple: 0.0,
            arm_timer: 0.0,
            next_arm: rng.random_range(5.0..10.0),
            arm_visible: false,
            bubbles: Particles::new(64, 0.0),
        }
    }

    pub fn arm_visible(&self) -> bool {
        self.arm_visible
    }
}

impl VignetteBehavior for Bathtub {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.ripple += dt * 2.0;
        self.arm_timer += dt;
        if self.arm_timer > self.next_arm {
            self.arm_timer = 0.0;
            self.next_arm = rng.random_range(5.0..10.0);
            self.arm_visible = !self.arm_visible;
        }

        if rng.random_bool(0.2) {
            let speed = rng.random_range(0.05..0.1);
            let size = rng.random_range(3.0..8.0);
            self.bubbles.emit_at(rng.random_range(0.2..0.8), 0.55, 0.0, -speed, 0.3 / speed, size);
        }
        self.bubbles.update(dt);
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        s.fill_rect(Rect::new(r.x + r.w * 0.15, r.y + r.h * 0.5, r.w * 0.7, r.h * 0.35), WHITE);
        let ripple = self.ripple.sin() * 3.0 * u;
        s.fill_rect(Rect::new(r.x + r.w * 0.15, r.y + r.h * 0.55 + ripple, r.w * 0.7, r.h * 0.25), WATER);

        let foam = Rgba::rgba(255, 255, 255, 0.7);
        for b in self.bubbles.iter() {
            let (bx, by) = r.at(b.x, b.y);
            s.fill_circle(bx, by, b.tag * u * 0.6, foam);
        }

        if self.arm_visible {
            s.fill_rect(Rect::new(r.x + r.w * 0.7, r.y + r.h * 0.5, r.w * 0.08, r.h * 0.15), SKIN);
        }
    }
}
