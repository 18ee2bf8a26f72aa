use rand::rngs::StdRng;

use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Gradient, Rect, Rgba, Surface};
use crate::scene::palette::TV_GLOW;

const PAD: Rgba = Rgba::hex(0x333333);
const BUTTON_ON: Rgba = Rgba::hex(0xff0000);
const BUTTON_OFF: Rgba = Rgba::hex(0x660000);
const MATCH_LENGTH: f64 = 20.0;
const CELEBRATION: f64 = 2.0;

pub struct Gamer {
    lean: f64,
    button: f64,
    timer: f64,
    victory: bool,
}

impl Gamer {
    pub fn new() -> Self {
        Gamer { lean: 0.0, button: 0.0, timer: 0.0, victory: false }
    }

    pub fn is_celebrating(&self) -> bool {
        self.victory
    }
}

impl VignetteBehavior for Gamer {
    fn update(&mut self, dt: f64, _rng: &mut StdRng) {
        self.lean += dt * 1.5;
        self.button += dt * 10.0;
        self.timer += dt;

        let limit = if self.victory { CELEBRATION } else { MATCH_LENGTH };
        if self.timer > limit {
            self.victory = !self.victory;
            self.timer = 0.0;
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        let (cx, cy) = r.at(0.5, 0.55);
        let (_, sy) = r.at(0.5, 0.3);

        let glow = Gradient::radial(cx, sy, 0.0, r.w * 0.5)
            .stop(0.0, TV_GLOW.with_alpha(0.3))
            .stop(1.0, TV_GLOW.with_alpha(0.0));
        s.fill_rect(r, glow);

        s.save();
        s.translate(cx, cy);
        if self.victory {
            s.fill_circle(0.0, -r.h * 0.2, r.h * 0.08, SILHOUETTE);
            s.fill_rect(Rect::new(-r.w * 0.06, -r.h * 0.13, r.w * 0.12, r.h * 0.25), SILHOUETTE);
            limb(s, r, (-r.w * 0.06, -r.h * 0.1), (-r.w * 0.12, -r.h * 0.25), SILHOUETTE, 3.0);
            limb(s, r, (r.w * 0.06, -r.h * 0.1), (r.w * 0.12, -r.h * 0.25), SILHOUETTE, 3.0);
        } else {
            s.rotate(self.lean.sin() * 0.05);
            s.fill_circle(0.0, -r.h * 0.15, r.h * 0.08, SILHOUETTE);
            s.fill_rect(Rect::new(-r.w * 0.06, -r.h * 0.08, r.w * 0.12, r.h * 0.25), SILHOUETTE);
            s.fill_rect(Rect::new(-r.w * 0.1, r.h * 0.05, r.w * 0.2, r.h * 0.08), PAD);
            let button = if self.button.sin() > 0.0 { BUTTON_ON } else { BUTTON_OFF };
            s.fill_circle(r.w * 0.06, r.h * 0.09, 3.0 * u, button);
        }
        s.restore();
    }
}
