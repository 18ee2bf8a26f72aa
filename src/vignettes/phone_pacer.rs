use rand::rngs::StdRng;

use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Rect, Rgba, Surface};

const PHONE: Rgba = Rgba::hex(0x333333);

pub struct PhonePacer {
    x: f64,
    direction: f64,
    gesture: f64,
}

impl PhonePacer {
    pub fn new() -> Self {
        PhonePacer { x: 0.2, direction: 1.0, gesture: 0.0 }
    }

    pub fn position(&self) -> f64 {
        self.x
    }
}

impl VignetteBehavior for PhonePacer {
    fn update(&mut self, dt: f64, _rng: &mut StdRng) {
        self.x += self.direction * dt * 0.2;
        self.gesture += dt * 2.0;
        if self.x > 0.8 {
            self.x = 0.8;
            self.direction = -1.0;
        } else if self.x < 0.2 {
            self.x = 0.2;
            self.direction = 1.0;
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let (px, py) = r.at(self.x, 0.5);
        s.save();
        s.translate(px, py);
        s.scale(self.direction, 1.0);

        s.fill_circle(0.0, -r.h * 0.15, r.h * 0.08, SILHOUETTE);
        s.fill_rect(Rect::new(-r.w * 0.05, -r.h * 0.08, r.w * 0.1, r.h * 0.25), SILHOUETTE);
        s.fill_rect(Rect::new(r.w * 0.05, -r.h * 0.18, r.w * 0.04, r.h * 0.08), PHONE);

        let wave = self.gesture.sin() * 0.3;
        limb(
            s,
            r,
            (-r.w * 0.05, -r.h * 0.05),
            (-r.w * 0.12, -r.h * 0.05 + wave * r.h * 0.1),
            SILHOUETTE,
            3.0,
        );
        s.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_turns_at_both_walls() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut p = PhonePacer::new();
        p.update(3.5, &mut rng);
        assert_eq!(p.position(), 0.8);
        assert_eq!(p.direction, -1.0);
        p.update(1.0, &mut rng);
        assert!((p.position() - 0.6).abs() < 1e-9);
        p.update(3.0, &mut rng);
        assert_eq!(p.position(), 0.2);
        assert_eq!(p.direction, 1.0);
    }
}
