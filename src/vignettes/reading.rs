use rand::RngExt;
use rand::rngs::StdRng;

use super::{SILHOUETTE, VignetteBehavior};
use crate::render::{Rect, Rgba, Surface};

const CHAIR: Rgba = Rgba::hex(0x654321);
const PAGE: Rgba = Rgba::hex(0xf5f5f5);
const PAGE_TURNING: Rgba = Rgba::hex(0xffffff);
const COVER: Rgba = Rgba::hex(0x8b4513);
/// How long the turning page stays highlighted.
const FLIP_HOLD: f64 = 0.2;

/// Armchair reader turning a page every 8 to 12 seconds.
pub struct Reading {
    page_timer: f64,
    next_flip: f64,
    /// Seconds the current flip highlight has left.
    flip_left: f64,
}

impl Reading {
    pub fn new(rng: &mut StdRng) -> Self {
        Reading { page_timer: 0.0, next_flip: rng.random_range(8.0..12.0), flip_left: 0.0 }
    }

    pub fn is_flipping(&self) -> bool {
        self.flip_left > 0.0
    }
}

impl VignetteBehavior for Reading {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.flip_left = (self.flip_left - dt).max(0.0);
        self.page_timer += dt;
        if self.page_timer > self.next_flip {
            self.page_timer = 0.0;
            self.next_flip = rng.random_range(8.0..12.0);
            self.flip_left = FLIP_HOLD;
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        s.fill_rect(Rect::new(r.x + r.w * 0.25, r.y + r.h * 0.45, r.w * 0.5, r.h * 0.35), CHAIR);
        s.fill_rect(Rect::new(r.x + r.w * 0.25, r.y + r.h * 0.3, r.w * 0.5, r.h * 0.05), CHAIR);

        let (hx, hy) = r.at(0.5, 0.35);
        s.fill_circle(hx, hy, r.h * 0.08, SILHOUETTE);
        s.fill_rect(Rect::new(r.x + r.w * 0.44, r.y + r.h * 0.42, r.w * 0.12, r.h * 0.2), SILHOUETTE);

        let book = Rect::new(r.x + r.w * 0.42, r.y + r.h * 0.6, r.w * 0.16, r.h * 0.12);
        s.fill_rect(book, if self.is_flipping() { PAGE_TURNING } else { PAGE });
        s.stroke_rect(book, COVER, 2.0 * r.unit());
        if self.is_flipping() {
            let (sx, sy) = book.center();
            s.line(sx, book.y, sx + book.w * 0.3, sy, COVER, r.unit());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_flip_highlight_lasts_200ms() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut reader = Reading::new(&mut rng);
        let mut t = 0.0;
        while !reader.is_flipping() {
            reader.update(0.05, &mut rng);
            t += 0.05;
            assert!(t < 12.2, "no page turned within 12 s");
        }
        assert!(t > 8.0);
        reader.update(0.15, &mut rng);
        assert!(reader.is_flipping());
        reader.update(0.1, &mut rng);
        assert!(!reader.is_flipping());
    }
}
