use rand::rngs::StdRng;
use std::f64::consts::PI;

use super::{SILHOUETTE, VignetteBehavior};
use crate::render::{Gradient, Rect, Surface};
use crate::scene::palette::{TV_GLOW, WHITE};

const TILT_PERIOD: f64 = 3.0;

pub struct TvWatcher {
    flicker: f64,
    tilt_timer: f64,
    tilt_direction: f64,
}

impl TvWatcher {
    pub fn new() -> Self {
        TvWatcher { flicker: 0.0, tilt_timer: 0.0, tilt_direction: 1.0 }
    }

    /// Head roll in radians.
    pub fn head_tilt(&self) -> f64 {
        (self.tilt_timer / TILT_PERIOD * PI).sin() * self.tilt_direction * 0.2
    }
}

impl VignetteBehavior for TvWatcher {
    fn update(&mut self, dt: f64, _rng: &mut StdRng) {
        self.flicker += dt * 10.0;
        self.tilt_timer += dt;
        if self.tilt_timer > TILT_PERIOD {
            self.tilt_timer = 0.0;
            self.tilt_direction = -self.tilt_direction;
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let tv = Rect::new(r.x + r.w * 0.15, r.y + r.h * 0.3, r.w * 0.3, r.h * 0.4);
        let (tx, ty) = tv.center();

        let glow = Gradient::radial(tx, ty, 0.0, tv.w)
            .stop(0.0, TV_GLOW.with_alpha(0.4))
            .stop(1.0, TV_GLOW.with_alpha(0.0));
        s.fill_rect(r, glow);

        // Screen brightness wobbles with the programme.
        let shade = 0.85 + 0.15 * (self.flicker.sin() * 0.5 + (self.flicker * 2.3).sin() * 0.5);
        s.fill_rect(tv, TV_GLOW.lerp(WHITE, 1.0 - shade));

        let (px, py) = r.at(0.65, 0.4);
        s.save();
        s.translate(px, py);
        s.rotate(self.head_tilt());
        s.fill_circle(0.0, 0.0, r.h * 0.1, SILHOUETTE);
        s.restore();

        s.fill_rect(Rect::new(px - r.w * 0.06, py + r.h * 0.08, r.w * 0.12, r.h * 0.25), SILHOUETTE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_tilt_direction_flips_every_three_seconds() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut tv = TvWatcher::new();
        tv.update(1.5, &mut rng);
        assert!(tv.head_tilt() > 0.19);
        tv.update(1.6, &mut rng);
        assert_eq!(tv.tilt_direction, -1.0);
        tv.update(1.5, &mut rng);
        assert!(tv.head_tilt() < -0.19);
    }
}
