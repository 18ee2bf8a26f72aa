use rand::RngExt;
use rand::rngs::StdRng;

use super::particles::Particles;
use super::{SKIN, VignetteBehavior};
use crate::render::{Rect, Rgba, Surface};
use crate::scene::palette::WHITE;

const BED: Rgba = Rgba::hex(0x654321);
const BLANKET: Rgba = Rgba::hex(0x4169e1);
const Z_EVERY: f64 = 2.0;
/// Z glyph heights in reference pixels.
const Z_SIZES: [f64; 3] = [16.0, 20.0, 24.0];

pub struct Sleeping {
    breath: f64,
    z_timer: f64,
    zs: Particles,
}

impl Sleeping {
    pub fn new() -> Self {
        Sleeping { breath: 0.0, z_timer: 0.0, zs: Particles::new(8, 0.0) }
    }

    pub fn floating_zs(&self) -> usize {
        self.zs.len()
    }
}

impl VignetteBehavior for Sleeping {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.breath += dt * 0.5;
        self.z_timer += dt;
        if self.z_timer > Z_EVERY {
            self.z_timer = 0.0;
            // Drifts up 0.1 cell heights per second, fades out in 2.5 s.
            self.zs.emit_at(0.55, 0.35, 0.0, -0.1, 2.5, rng.random_range(0..Z_SIZES.len()) as f64);
        }
        self.zs.update(dt);
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        s.fill_rect(Rect::new(r.x + r.w * 0.2, r.y + r.h * 0.5, r.w * 0.6, r.h * 0.15), BED);
        s.fill_rect(Rect::new(r.x + r.w * 0.25, r.y + r.h * 0.5, r.w * 0.5, r.h * 0.1), BLANKET);

        let breathe = self.breath.sin() * 0.02;
        let (hx, hy) = r.at(0.55, 0.45);
        s.fill_ellipse(hx, hy, r.w * 0.08, r.h * (0.06 + breathe), 0.0, SKIN);
        s.fill_rect(Rect::new(r.x + r.w * 0.45, r.y + r.h * 0.48, r.w * 0.15, r.h * 0.05), WHITE);

        let base = s.alpha();
        for z in self.zs.iter() {
            let size = Z_SIZES[(z.tag as usize).min(Z_SIZES.len() - 1)] * u * 0.6;
            let (zx, zy) = r.at(z.x, z.y);
            s.set_alpha(base * z.life_frac());
            s.stroke_polyline(
                &[(zx, zy - size), (zx + size, zy - size), (zx, zy), (zx + size, zy)],
                WHITE,
                2.0 * u,
            );
        }
        s.set_alpha(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_a_z_every_two_seconds_fading_after_two_and_a_half() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut sleeper = Sleeping::new();
        sleeper.update(2.1, &mut rng);
        assert_eq!(sleeper.floating_zs(), 1);
        sleeper.update(2.1, &mut rng);
        assert_eq!(sleeper.floating_zs(), 1, "the first Z has faded");
        for _ in 0..40 {
            sleeper.update(0.1, &mut rng);
            assert!(sleeper.floating_zs() <= 2);
        }
    }
}
