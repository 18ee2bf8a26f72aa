use rand::RngExt;
use rand::rngs::StdRng;
use std::f64::consts::{PI, TAU};

use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Rect, Rgba, Surface};

const BALLS: [Rgba; 3] = [Rgba::hex(0xff0000), Rgba::hex(0x00ff00), Rgba::hex(0x0000ff)];
const WARM_UP: f64 = 30.0;
const RECOVER: f64 = 2.0;

pub struct Juggler {
    phases: [f64; 3],
    timer: f64,
    dropped: bool,
}

impl Juggler {
    pub fn new() -> Self {
        Juggler { phases: [0.0, TAU / 3.0, 2.0 * TAU / 3.0], timer: 0.0, dropped: false }
    }

    pub fn has_dropped(&self) -> bool {
        self.dropped
    }

    /// Ball position relative to the juggler's centre, as fractions of the
    /// cell.
    fn ball_offset(phase: f64) -> (f64, f64) {
        let t = phase / TAU;
        if t < 0.33 {
            let k = t / 0.33;
            (-0.15 + k * 0.15, 0.1 - (k * PI).sin() * 0.3)
        } else if t < 0.66 {
            let k = (t - 0.33) / 0.33;
            (k * 0.15, -0.2 + (k * PI).sin() * 0.3)
        } else {
            let k = (t - 0.66) / 0.34;
            (0.15 - k * 0.3, 0.1 - (k * PI).sin() * 0.05)
        }
    }
}

impl VignetteBehavior for Juggler {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        for phase in &mut self.phases {
            *phase = (*phase + dt * PI) % TAU;
        }

        self.timer += dt;
        if self.dropped {
            if self.timer > RECOVER {
                self.dropped = false;
                self.timer = 0.0;
            }
        } else if self.timer > WARM_UP && rng.random_bool(0.01) {
            self.dropped = true;
            self.timer = 0.0;
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let (cx, cy) = r.at(0.5, 0.6);
        s.fill_circle(cx, cy - r.h * 0.15, r.h * 0.08, SILHOUETTE);
        s.fill_rect(Rect::new(cx - r.w * 0.06, cy - r.h * 0.08, r.w * 0.12, r.h * 0.25), SILHOUETTE);

        if self.dropped {
            limb(s, r, (cx - r.w * 0.06, cy), (cx - r.w * 0.12, cy - r.h * 0.15), SILHOUETTE, 3.0);
            limb(s, r, (cx + r.w * 0.06, cy), (cx + r.w * 0.12, cy - r.h * 0.15), SILHOUETTE, 3.0);
            return;
        }
        for (phase, color) in self.phases.iter().zip(BALLS) {
            let (dx, dy) = Self::ball_offset(*phase);
            s.fill_circle(cx + dx * r.w, cy + dy * r.h, r.w * 0.04, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_never_drops_during_warm_up() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut j = Juggler::new();
        for _ in 0..290 {
            j.update(0.1, &mut rng);
            assert!(!j.has_dropped());
        }
    }

    #[test]
    fn test_recovers_two_seconds_after_a_drop() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut j = Juggler::new();
        let mut steps = 0;
        while !j.has_dropped() {
            j.update(0.1, &mut rng);
            steps += 1;
            assert!(steps < 100_000);
        }
        for _ in 0..19 {
            j.update(0.1, &mut rng);
        }
        assert!(j.has_dropped());
        j.update(0.1, &mut rng);
        j.update(0.1, &mut rng);
        assert!(!j.has_dropped());
    }

    #[test]
    fn test_cascade_path_is_continuous_at_the_top() {
        let before = Juggler::ball_offset(0.33 * TAU - 1e-9);
        let after = Juggler::ball_offset(0.33 * TAU);
        assert!((before.0 - after.0).abs() < 1e-6);
        assert!((before.1 - after.1).abs() < 1e-6);
    }
}
