use rand::rngs::StdRng;
use std::f64::consts::PI;

use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Rect, Rgba, Surface};

const MAT: Rgba = Rgba::hex(0x9c27b0);
const REST: f64 = 15.0;
/// Progress units per second; a stretch runs 2 units.
const STRETCH_RATE: f64 = 0.2;

pub struct Yoga {
    breath: f64,
    rest_timer: f64,
    /// Progress through the current stretch, if any.
    stretch: Option<f64>,
}

impl Yoga {
    pub fn new() -> Self {
        Yoga { breath: 0.0, rest_timer: 0.0, stretch: None }
    }

    /// Stretch intensity, 0 at rest, 1 at the peak.
    pub fn reach(&self) -> f64 {
        self.stretch.map_or(0.0, |p| (p.min(1.0) * PI).sin())
    }

    pub fn is_stretching(&self) -> bool {
        self.stretch.is_some()
    }
}

impl VignetteBehavior for Yoga {
    fn update(&mut self, dt: f64, _rng: &mut StdRng) {
        self.breath += dt * 0.3;
        self.rest_timer += dt;

        if self.stretch.is_none() && self.rest_timer > REST {
            self.stretch = Some(0.0);
            self.rest_timer = 0.0;
        }
        if let Some(p) = self.stretch {
            let p = p + dt * STRETCH_RATE;
            self.stretch = (p < 2.0).then_some(p);
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let (cx, cy) = r.at(0.5, 0.6);
        s.fill_rect(Rect::new(r.x + r.w * 0.2, r.y + r.h * 0.7, r.w * 0.6, r.h * 0.05), MAT);

        let breathe = self.breath.sin() * 0.01;
        let reach = self.reach();
        s.fill_circle(cx, cy - r.h * 0.2 - reach * r.h * 0.1, r.h * 0.08, SILHOUETTE);
        s.fill_rect(
            Rect::new(cx - r.w * 0.06, cy - r.h * 0.15 + breathe * r.h, r.w * 0.12, r.h * (0.2 + breathe)),
            SILHOUETTE,
        );

        if reach > 0.5 {
            limb(s, r, (cx, cy - r.h * 0.1), (cx, cy - r.h * 0.3), SILHOUETTE, 3.0);
        } else {
            limb(s, r, (cx - r.w * 0.06, cy), (cx - r.w * 0.15, cy + r.h * 0.05), SILHOUETTE, 3.0);
            limb(s, r, (cx + r.w * 0.06, cy), (cx + r.w * 0.15, cy + r.h * 0.05), SILHOUETTE, 3.0);
        }

        s.fill_rect(Rect::new(cx - r.w * 0.12, cy + r.h * 0.05, r.w * 0.24, r.h * 0.08), SILHOUETTE);
    }
}
