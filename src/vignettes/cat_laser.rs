use rand::RngExt;
use rand::rngs::StdRng;

use super::VignetteBehavior;
use crate::render::surface::quad_curve;
use crate::render::{Rect, Rgba, Surface};

const FUR: Rgba = Rgba::hex(0xffa500);
const LASER: Rgba = Rgba::hex(0xff0000);
const JUMP_EVERY: f64 = 2.0;

/// A cat easing toward a laser dot that jumps every two seconds.
pub struct CatLaser {
    laser: (f64, f64),
    cat: (f64, f64),
    timer: f64,
    tail: f64,
}

impl CatLaser {
    pub fn new(_rng: &mut StdRng) -> Self {
        CatLaser { laser: (0.5, 0.5), cat: (0.3, 0.3), timer: 0.0, tail: 0.0 }
    }

    pub fn distance_to_dot(&self) -> f64 {
        (self.laser.0 - self.cat.0).hypot(self.laser.1 - self.cat.1)
    }
}

impl VignetteBehavior for CatLaser {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.timer += dt;
        if self.timer > JUMP_EVERY {
            self.timer = 0.0;
            self.laser = (rng.random_range(0.2..0.8), rng.random_range(0.2..0.8));
        }
        let k = (dt * 2.0).min(1.0);
        self.cat.0 += (self.laser.0 - self.cat.0) * k;
        self.cat.1 += (self.laser.1 - self.cat.1) * k;
        self.tail += dt * 4.0;
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        let (lx, ly) = r.at(self.laser.0, self.laser.1);
        s.fill_circle(lx, ly, 4.0 * u, LASER);

        let (cx, cy) = r.at(self.cat.0, self.cat.1);
        s.fill_ellipse(cx, cy, r.w * 0.08, r.h * 0.06, 0.0, FUR);
        s.fill_circle(cx + r.w * 0.06, cy, r.h * 0.05, FUR);
        s.fill_polygon(
            &[
                (cx + r.w * 0.05, cy - r.h * 0.04),
                (cx + r.w * 0.03, cy - r.h * 0.08),
                (cx + r.w * 0.07, cy - r.h * 0.04),
            ],
            FUR,
        );

        let tail = quad_curve(
            (cx - r.w * 0.08, cy),
            (cx - r.w * 0.12, cy + self.tail.sin() * r.h * 0.1),
            (cx - r.w * 0.15, cy),
            8,
        );
        s.stroke_polyline(&tail, FUR, 3.0 * u);
    }
}
