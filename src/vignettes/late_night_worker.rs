use rand::RngExt;
use rand::rngs::StdRng;

use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Gradient, Rect, Rgba, Surface};
use crate::scene::palette::TV_GLOW;

const DESK: Rgba = Rgba::hex(0x654321);
const TEXT: Rgba = Rgba::hex(0x003366);
const PAUSE: f64 = 2.0;
const STRETCH_AFTER: f64 = 25.0;
const STRETCH_END: f64 = 28.0;

pub struct LateNightWorker {
    typing: f64,
    pause_timer: f64,
    /// Length of the current typing spell, drawn when it starts.
    typing_spell: f64,
    paused: bool,
    stretch_timer: f64,
    lines: [f64; 5],
}

impl LateNightWorker {
    pub fn new(rng: &mut StdRng) -> Self {
        LateNightWorker {
            typing: 0.0,
            pause_timer: 0.0,
            typing_spell: rng.random_range(5.0..10.0),
            paused: false,
            stretch_timer: 0.0,
            lines: std::array::from_fn(|_| rng.random_range(0.0..1.0)),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_stretching(&self) -> bool {
        self.stretch_timer > STRETCH_AFTER
    }
}

impl VignetteBehavior for LateNightWorker {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        if !self.paused {
            self.typing += dt * 8.0;
        }

        self.pause_timer += dt;
        let limit = if self.paused { PAUSE } else { self.typing_spell };
        if self.pause_timer > limit {
            self.pause_timer = 0.0;
            self.paused = !self.paused;
            if !self.paused {
                self.typing_spell = rng.random_range(5.0..10.0);
            }
        }

        self.stretch_timer += dt;
        if self.stretch_timer > STRETCH_END {
            self.stretch_timer = 0.0;
        }

        if rng.random_bool(0.05) {
            let i = rng.random_range(0..self.lines.len());
            self.lines[i] = rng.random_range(0.0..1.0);
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        s.fill_rect(Rect::new(r.x + r.w * 0.1, r.y + r.h * 0.6, r.w * 0.8, r.h * 0.05), DESK);
        s.fill_rect(Rect::new(r.x + r.w * 0.25, r.y + r.h * 0.3, r.w * 0.5, r.h * 0.35), SILHOUETTE);

        let (gx, gy) = r.at(0.5, 0.47);
        let glow = Gradient::radial(gx, gy, 0.0, r.w * 0.4)
            .stop(0.0, TV_GLOW.with_alpha(0.5))
            .stop(1.0, TV_GLOW.with_alpha(0.0));
        s.fill_rect(r, glow);

        s.fill_rect(Rect::new(r.x + r.w * 0.27, r.y + r.h * 0.32, r.w * 0.46, r.h * 0.3), TV_GLOW);
        for (i, len) in self.lines.iter().enumerate() {
            let (x0, y) = r.at(0.28, 0.34 + i as f64 * 0.05);
            let (x1, _) = r.at(0.28 + len * 0.4, 0.0);
            s.line(x0, y, x1, y, TEXT, 2.0 * u);
        }

        let (px, py) = r.at(0.5, 0.7);
        if self.is_stretching() {
            s.fill_circle(px, py - r.h * 0.15, r.h * 0.08, SILHOUETTE);
            s.fill_rect(Rect::new(px - r.w * 0.06, py - r.h * 0.08, r.w * 0.12, r.h * 0.2), SILHOUETTE);
            limb(s, r, (px - r.w * 0.06, py - r.h * 0.05), (px - r.w * 0.15, py - r.h * 0.1), SILHOUETTE, 3.0);
            limb(s, r, (px + r.w * 0.06, py - r.h * 0.05), (px + r.w * 0.15, py - r.h * 0.1), SILHOUETTE, 3.0);
        } else {
            s.fill_circle(px, py - r.h * 0.12, r.h * 0.08, SILHOUETTE);
            s.fill_rect(Rect::new(px - r.w * 0.06, py - r.h * 0.05, r.w * 0.12, r.h * 0.2), SILHOUETTE);
            let bob = if self.paused { 0.0 } else { self.typing.sin() * 3.0 * u };
            s.fill_rect(Rect::new(px - r.w * 0.08, py + r.h * 0.12 + bob, r.w * 0.16, r.h * 0.03), SILHOUETTE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_pauses_last_two_seconds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut w = LateNightWorker::new(&mut rng);
        let mut t = 0.0;
        while !w.is_paused() {
            w.update(0.1, &mut rng);
            t += 0.1;
            assert!(t < 10.2, "typing spell too long");
        }
        assert!(t > 4.9);
        let mut paused_for = 0.0;
        while w.is_paused() {
            w.update(0.1, &mut rng);
            paused_for += 0.1;
        }
        assert!((paused_for - 2.1_f64).abs() < 0.15, "paused for {paused_for}");
    }

    #[test]
    fn test_stretches_between_twenty_five_and_twenty_eight_seconds() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut w = LateNightWorker::new(&mut rng);
        for _ in 0..249 {
            w.update(0.1, &mut rng);
        }
        assert!(!w.is_stretching());
        for _ in 0..5 {
            w.update(0.1, &mut rng);
        }
        assert!(w.is_stretching());
        for _ in 0..30 {
            w.update(0.1, &mut rng);
        }
        assert!(!w.is_stretching());
    }
}
