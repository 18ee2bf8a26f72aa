use rand::rngs::StdRng;
use std::f64::consts::PI;

use super::particles::Particles;
use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Rect, Rgba, Surface};
use crate::scene::palette::WHITE;

const HAT: Rgba = Rgba::hex(0x000000);
const POOF: Rgba = Rgba::hex(0xffff99);
const CYCLE: f64 = 120.0;
const APPEAR: f64 = 45.0;
const VANISH: f64 = 90.0;

/// Hat trick on a 120-frame loop at 30 frames per second.
pub struct Magician {
    frame: f64,
    rabbit: bool,
    poof: Particles,
}

impl Magician {
    pub fn new() -> Self {
        Magician { frame: 0.0, rabbit: false, poof: Particles::new(40, 0.0) }
    }

    pub fn rabbit_visible(&self) -> bool {
        self.rabbit
    }

    pub fn poof_particles(&self) -> usize {
        self.poof.len()
    }
}

impl VignetteBehavior for Magician {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.frame += dt * 30.0;
        if self.frame >= CYCLE {
            self.frame = 0.0;
        }

        let visible = (APPEAR..VANISH).contains(&self.frame);
        if visible != self.rabbit {
            self.poof.burst(0.5, 0.45, 10, 0.3, 0.5, rng);
            self.rabbit = visible;
        }
        self.poof.update(dt);
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        let (cx, cy) = r.at(0.5, 0.6);
        s.fill_circle(cx, cy - r.h * 0.2, r.h * 0.08, SILHOUETTE);
        s.fill_rect(Rect::new(cx - r.w * 0.06, cy - r.h * 0.13, r.w * 0.12, r.h * 0.25), SILHOUETTE);

        let hat_y = cy - r.h * 0.05;
        s.save();
        s.translate(cx, hat_y);
        if self.frame < 30.0 {
            s.rotate(PI / 6.0);
        }
        s.fill_ellipse(0.0, 0.0, r.w * 0.12, r.h * 0.04, 0.0, HAT);
        s.fill_rect(Rect::new(-r.w * 0.08, -r.h * 0.15, r.w * 0.16, r.h * 0.15), HAT);
        s.restore();

        if self.rabbit {
            s.fill_circle(cx, hat_y - r.h * 0.08, r.w * 0.05, WHITE);
            s.fill_ellipse(cx - r.w * 0.03, hat_y - r.h * 0.12, r.w * 0.02, r.h * 0.06, -0.3, WHITE);
            s.fill_ellipse(cx + r.w * 0.03, hat_y - r.h * 0.12, r.w * 0.02, r.h * 0.06, 0.3, WHITE);
        }

        let base = s.alpha();
        for p in self.poof.iter() {
            let (px, py) = r.at(p.x, p.y);
            s.set_alpha(base * p.life_frac());
            s.fill_circle(px, py, 4.0 * u, POOF);
        }
        s.set_alpha(base);

        if (15.0..45.0).contains(&self.frame) {
            let wave = ((self.frame - 15.0) / 30.0 * PI * 4.0).sin() * 0.5;
            limb(
                s,
                r,
                (cx + r.w * 0.06, cy - r.h * 0.05),
                (cx + r.w * 0.15, cy - r.h * 0.05 + wave.sin() * r.h * 0.1),
                SILHOUETTE,
                3.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_rabbit_appears_and_vanishes_with_a_poof() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut m = Magician::new();
        // 1.5 s is frame 45.
        for _ in 0..14 {
            m.update(0.1, &mut rng);
        }
        assert!(!m.rabbit_visible());
        m.update(0.11, &mut rng);
        assert!(m.rabbit_visible());
        assert_eq!(m.poof_particles(), 10);
        m.update(0.6, &mut rng);
        assert_eq!(m.poof_particles(), 0, "poof fades in half a second");
        // Frame 90 at 3 s.
        for _ in 0..10 {
            m.update(0.1, &mut rng);
        }
        assert!(!m.rabbit_visible());
        assert_eq!(m.poof_particles(), 10);
    }
}
