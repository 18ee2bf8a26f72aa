use rand::rngs::StdRng;
use std::f64::consts::FRAC_PI_4;

use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Rect, Surface};
use crate::scene::palette::GREY;
use crate::timing::EventType;

/// How long a sighting keeps the stargazer's arms up.
const EXCITEMENT: f64 = 3.0;

pub struct Telescope {
    excited: Option<f64>,
}

impl Telescope {
    pub fn new() -> Self {
        Telescope { excited: None }
    }

    pub fn is_excited(&self) -> bool {
        self.excited.is_some()
    }

    pub fn react_to_ufo(&mut self) {
        self.excited = Some(0.0);
    }
}

impl VignetteBehavior for Telescope {
    fn update(&mut self, dt: f64, _rng: &mut StdRng) {
        if let Some(t) = self.excited {
            let t = t + dt;
            self.excited = (t <= EXCITEMENT).then_some(t);
        }
    }

    fn notify(&mut self, event: EventType) {
        if event == EventType::Ufo {
            self.react_to_ufo();
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let (bx, by) = r.at(0.4, 0.8);
        let top = (bx, by - r.h * 0.3);
        limb(s, r, (bx - r.w * 0.1, by), top, GREY, 3.0);
        limb(s, r, (bx + r.w * 0.1, by), top, GREY, 3.0);

        s.save();
        s.translate(top.0, top.1);
        s.rotate(-FRAC_PI_4);
        s.fill_rect(Rect::new(0.0, -r.h * 0.03, r.w * 0.25, r.h * 0.06), GREY);
        s.restore();

        let (px, py) = r.at(0.65, 0.65);
        if self.is_excited() {
            s.fill_circle(px, py - r.h * 0.15, r.h * 0.08, SILHOUETTE);
            s.fill_rect(Rect::new(px - r.w * 0.06, py - r.h * 0.08, r.w * 0.12, r.h * 0.25), SILHOUETTE);
            limb(s, r, (px - r.w * 0.06, py), (px - r.w * 0.12, py - r.h * 0.15), SILHOUETTE, 3.0);
            limb(s, r, (px + r.w * 0.06, py), (px + r.w * 0.12, py - r.h * 0.15), SILHOUETTE, 3.0);
        } else {
            s.fill_circle(px - r.w * 0.1, py - r.h * 0.1, r.h * 0.08, SILHOUETTE);
            s.fill_rect(Rect::new(px - r.w * 0.16, py - r.h * 0.03, r.w * 0.12, r.h * 0.25), SILHOUETTE);
        }
    }
}
