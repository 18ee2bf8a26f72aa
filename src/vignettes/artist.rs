use rand::rngs::StdRng;
use std::f64::consts::TAU;

use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Rect, Rgba, Surface};

const WOOD: Rgba = Rgba::hex(0x8b4513);
/// Seconds for the canvas colour to go all the way round.
const COLOR_CYCLE: f64 = 30.0;

pub struct Artist {
    color_phase: f64,
    brush_timer: f64,
}

impl Artist {
    pub fn new() -> Self {
        Artist { color_phase: 0.0, brush_timer: 0.0 }
    }

    pub fn canvas_color(&self) -> Rgba {
        let phase = self.color_phase * TAU;
        let channel = |offset: f64| (127.0 + 127.0 * (phase + offset).sin()).floor() as u8;
        Rgba::rgb(channel(0.0), channel(TAU / 3.0), channel(2.0 * TAU / 3.0))
    }

    /// Brush tip as fractions of the cell.
    pub fn brush(&self) -> (f64, f64) {
        (0.5 + self.brush_timer.sin() * 0.15, 0.4 + (self.brush_timer * 1.3).cos() * 0.1)
    }
}

impl VignetteBehavior for Artist {
    fn update(&mut self, dt: f64, _rng: &mut StdRng) {
        self.color_phase = (self.color_phase + dt / COLOR_CYCLE) % 1.0;
        self.brush_timer += dt * 2.0;
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let apex = r.at(0.5, 0.2);
        limb(s, r, r.at(0.3, 0.9), apex, WOOD, 3.0);
        limb(s, r, r.at(0.7, 0.9), apex, WOOD, 3.0);

        let canvas = Rect::new(r.x + r.w * 0.35, r.y + r.h * 0.25, r.w * 0.3, r.h * 0.4);
        s.fill_rect(canvas, self.canvas_color());
        s.stroke_rect(canvas, WOOD, 2.0 * r.unit());

        let (hx, hy) = r.at(0.75, 0.4);
        s.fill_circle(hx, hy, r.h * 0.08, SILHOUETTE);
        s.fill_rect(Rect::new(r.x + r.w * 0.7, r.y + r.h * 0.47, r.w * 0.1, r.h * 0.25), SILHOUETTE);

        let (bx, by) = self.brush();
        limb(s, r, r.at(0.7, 0.5), r.at(bx, by), SILHOUETTE, 3.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_canvas_colour_cycles_in_thirty_seconds() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut a = Artist::new();
        let start = a.canvas_color();
        a.update(10.0, &mut rng);
        assert_ne!(a.canvas_color(), start);
        a.update(20.0, &mut rng);
        let end = a.canvas_color();
        for (x, y) in [(start.r, end.r), (start.g, end.g), (start.b, end.b)] {
            assert!((x as i32 - y as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_brush_stays_on_canvas() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut a = Artist::new();
        for _ in 0..500 {
            a.update(0.03, &mut rng);
            let (x, y) = a.brush();
            assert!((0.35..=0.65).contains(&x));
            assert!((0.3..=0.5).contains(&y));
        }
    }
}
