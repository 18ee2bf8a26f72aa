use rand::RngExt;
use rand::rngs::StdRng;

use super::{EffectBehavior, Lifetime};
use crate::audio::{AudioCue, Sound};
use crate::render::{Rect, Surface};
use crate::scene::Layout;
use crate::scene::palette::LIGHTNING;

const FLASH_MS: f64 = 100.0;
const THUNDER_DELAY_MS: f64 = 500.0;
const SEGMENTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Thunder {
    Waiting,
    Due,
    Sent,
}

/// Sky flash with a forked bolt; thunder rolls in half a second later.
pub struct LightningFlash {
    life: Lifetime,
    /// Bolt origin as a fraction of the width.
    origin: f64,
    /// Horizontal jitter per segment, in reference pixels.
    jitter: [f64; SEGMENTS],
    thunder: Thunder,
}

impl LightningFlash {
    pub fn new(duration_ms: f64, rng: &mut StdRng) -> Self {
        LightningFlash {
            life: Lifetime::new(duration_ms),
            origin: rng.random_range(0.3..0.7),
            jitter: std::array::from_fn(|_| rng.random_range(-50.0..50.0)),
            thunder: Thunder::Waiting,
        }
    }

    /// Flash alpha, 1.0 at the strike decaying to 0 over 100 ms.
    pub fn flash_alpha(&self) -> f64 {
        (1.0 - self.life.elapsed_ms() / FLASH_MS).max(0.0)
    }

    pub fn bolt_visible(&self) -> bool {
        self.flash_alpha() > 0.5
    }

    pub fn bolt(&self, layout: &Layout) -> Vec<(f64, f64)> {
        let mut x = layout.width * self.origin;
        let mut y = 0.0;
        let mut points = vec![(x, y)];
        for dx in self.jitter {
            x += dx * layout.unit;
            y += layout.height * 0.12;
            points.push((x, y));
        }
        points
    }

    /// Hands out the thunder cue once it is due.
    pub fn take_thunder(&mut self) -> Option<AudioCue> {
        if self.thunder == Thunder::Due {
            self.thunder = Thunder::Sent;
            Some(AudioCue::play(Sound::Thunder, 0.3))
        } else {
            None
        }
    }
}

impl EffectBehavior for LightningFlash {
    fn lifetime(&self) -> &Lifetime {
        &self.life
    }

    fn update(&mut self, dt: f64) {
        self.life.advance(dt);
        if self.thunder == Thunder::Waiting && self.life.elapsed_ms() >= THUNDER_DELAY_MS {
            self.thunder = Thunder::Due;
        }
    }

    fn render<S: Surface>(&self, s: &mut S, layout: &Layout) {
        let alpha = self.flash_alpha();
        if alpha <= 0.0 {
            return;
        }
        s.fill_rect(
            Rect::new(0.0, 0.0, layout.width, layout.height * 0.6),
            LIGHTNING.with_alpha(alpha * 0.5),
        );
        if self.bolt_visible() {
            s.stroke_polyline(&self.bolt(layout), LIGHTNING, 3.0 * layout.unit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{Op, RecordingSurface};
    use rand::SeedableRng;

    fn strike() -> LightningFlash {
        LightningFlash::new(2500.0, &mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_flash_decays_over_100ms() {
        let mut l = strike();
        assert_eq!(l.flash_alpha(), 1.0);
        l.update(0.04);
        assert!(l.bolt_visible());
        l.update(0.02);
        assert!(!l.bolt_visible());
        assert!(l.flash_alpha() > 0.0);
        l.update(0.05);
        assert_eq!(l.flash_alpha(), 0.0);
    }

    #[test]
    fn test_thunder_fires_once_after_half_a_second() {
        let mut l = strike();
        l.update(0.49);
        assert!(l.take_thunder().is_none());
        l.update(0.02);
        assert!(l.take_thunder().is_some());
        assert!(l.take_thunder().is_none());
        l.update(1.0);
        assert!(l.take_thunder().is_none());
    }

    #[test]
    fn test_bolt_geometry_is_fixed_at_spawn() {
        let l = strike();
        let layout = Layout::compute(1280.0, 720.0);
        let a = l.bolt(&layout);
        assert_eq!(a.len(), SEGMENTS + 1);
        assert_eq!(a, l.bolt(&layout));
        assert!((a[SEGMENTS].1 - 720.0 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_render_after_flash_is_empty() {
        let mut l = strike();
        let layout = Layout::compute(1280.0, 720.0);
        let mut s = RecordingSurface::new(1280.0, 720.0);
        l.render(&mut s, &layout);
        assert_eq!(s.count(|c| matches!(c.op, Op::Polyline(6))), 1);
        l.update(0.2);
        let mut s = RecordingSurface::new(1280.0, 720.0);
        l.render(&mut s, &layout);
        assert!(s.calls.is_empty());
    }
}
