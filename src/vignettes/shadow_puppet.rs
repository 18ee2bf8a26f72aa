use rand::rngs::StdRng;

use super::{SILHOUETTE, VignetteBehavior};
use crate::render::{Rect, Rgba, Surface};

const LAMP: Rgba = Rgba::hex(0xffff99);
const SHADOW: Rgba = Rgba::rgba(0, 0, 0, 0.7);
const HOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Bird,
    Dog,
    Rabbit,
}

impl Shape {
    fn next(self) -> Shape {
        match self {
            Shape::Bird => Shape::Dog,
            Shape::Dog => Shape::Rabbit,
            Shape::Rabbit => Shape::Bird,
        }
    }
}

pub struct ShadowPuppet {
    shape: Shape,
    hold: f64,
    /// 0..1 through the change to the next shape.
    transition: f64,
}

impl ShadowPuppet {
    pub fn new() -> Self {
        ShadowPuppet { shape: Shape::Bird, hold: 0.0, transition: 0.0 }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }
}

impl VignetteBehavior for ShadowPuppet {
    fn update(&mut self, dt: f64, _rng: &mut StdRng) {
        self.hold += dt;
        if self.hold > HOLD {
            self.transition = (self.transition + dt * 2.0).min(1.0);
            if self.transition >= 1.0 {
                self.shape = self.shape.next();
                self.hold = 0.0;
                self.transition = 0.0;
            }
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let (lx, ly) = r.at(0.2, 0.7);
        s.fill_circle(lx, ly, r.w * 0.08, LAMP);
        let (hx, hy) = r.at(0.35, 0.5);
        s.fill_rect(Rect::new(hx, hy, r.w * 0.1, r.h * 0.15), SILHOUETTE);

        let (w, h) = (r.w, r.h);
        s.save();
        let (sx, sy) = r.at(0.65, 0.4);
        s.translate(sx, sy);
        match self.shape {
            Shape::Bird => s.fill_polygon(
                &[
                    (0.0, 0.0),
                    (-w * 0.1, -h * 0.08),
                    (-w * 0.15, 0.0),
                    (-w * 0.1, h * 0.08),
                    (0.0, 0.0),
                    (w * 0.1, -h * 0.08),
                    (w * 0.15, 0.0),
                    (w * 0.1, h * 0.08),
                ],
                SHADOW,
            ),
            Shape::Dog => {
                s.fill_rect(Rect::new(-w * 0.1, -h * 0.05, w * 0.2, h * 0.1), SHADOW);
                s.fill_rect(Rect::new(-w * 0.12, -h * 0.08, w * 0.08, h * 0.08), SHADOW);
                s.fill_rect(Rect::new(-w * 0.15, -h * 0.12, w * 0.05, h * 0.06), SHADOW);
            }
            Shape::Rabbit => {
                s.fill_circle(0.0, 0.0, w * 0.08, SHADOW);
                s.fill_rect(Rect::new(-w * 0.02, -h * 0.15, w * 0.02, h * 0.12), SHADOW);
                s.fill_rect(Rect::new(w * 0.01, -h * 0.15, w * 0.02, h * 0.12), SHADOW);
            }
        }
        s.restore();
    }
}
