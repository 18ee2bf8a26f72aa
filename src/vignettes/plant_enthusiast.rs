use rand::RngExt;
use rand::rngs::StdRng;

use super::particles::Particles;
use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Rect, Rgba, Surface};

const PLANTS: [f64; 3] = [0.2, 0.45, 0.7];
const POT: Rgba = Rgba::hex(0x8b4513);
const LEAF: Rgba = Rgba::hex(0x4caf50);
const CAN: Rgba = Rgba::hex(0x666666);
const WATER: Rgba = Rgba::hex(0x4da6ff);

/// Walks the row of plants with a watering can.
pub struct PlantEnthusiast {
    position: f64,
    drops: Particles,
}

impl PlantEnthusiast {
    pub fn new() -> Self {
        PlantEnthusiast { position: 0.0, drops: Particles::new(64, 0.0) }
    }

    pub fn current_plant(&self) -> usize {
        ((self.position * 3.0) as usize).min(PLANTS.len() - 1)
    }

    pub fn drop_count(&self) -> usize {
        self.drops.len()
    }
}

impl VignetteBehavior for PlantEnthusiast {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.position += dt * 0.15;
        if self.position >= 1.0 {
            self.position = 0.0;
            self.drops.clear();
        }
        if rng.random_bool(0.3) {
            // Falls 0.5 cell heights per second, fades out in half a second.
            self.drops.emit_at(PLANTS[self.current_plant()], 0.3, 0.0, 0.5, 0.5, 0.0);
        }
        self.drops.update(dt);
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        for pos in PLANTS {
            let (px, py) = r.at(pos, 0.7);
            s.fill_rect(Rect::new(px - r.w * 0.08, py, r.w * 0.16, r.h * 0.2), POT);
            limb(s, r, (px, py), (px, py - r.h * 0.25), LEAF, 2.0);
            s.fill_ellipse(px - r.w * 0.05, py - r.h * 0.15, r.w * 0.06, r.h * 0.08, 0.0, LEAF);
            s.fill_ellipse(px + r.w * 0.05, py - r.h * 0.2, r.w * 0.06, r.h * 0.08, 0.0, LEAF);
        }

        let (px, py) = r.at(PLANTS[self.current_plant()], 0.5);
        s.fill_circle(px, py - r.h * 0.15, r.h * 0.08, SILHOUETTE);
        s.fill_rect(Rect::new(px - r.w * 0.06, py - r.h * 0.08, r.w * 0.12, r.h * 0.2), SILHOUETTE);
        s.fill_rect(Rect::new(px + r.w * 0.08, py, r.w * 0.1, r.h * 0.08), CAN);

        let base = s.alpha();
        for d in self.drops.iter() {
            s.set_alpha(base * d.life_frac());
            let (dx, dy) = r.at(d.x, d.y);
            s.fill_circle(dx, dy, 2.0 * u, WATER);
        }
        s.set_alpha(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_visits_each_plant_then_starts_over() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut p = PlantEnthusiast::new();
        let mut seen = Vec::new();
        for _ in 0..200 {
            p.update(0.05, &mut rng);
            if seen.last() != Some(&p.current_plant()) {
                seen.push(p.current_plant());
            }
        }
        // 10 s of walking covers the row once and starts again.
        assert_eq!(&seen[..4], &[0, 1, 2, 0]);
    }

    #[test]
    fn test_drops_expire_within_half_a_second() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = PlantEnthusiast::new();
        for _ in 0..30 {
            p.update(0.02, &mut rng);
        }
        assert!(p.drop_count() <= 25);
        assert!(p.drops.iter().all(|d| d.y >= 0.3 && d.y < 0.56));
    }
}
