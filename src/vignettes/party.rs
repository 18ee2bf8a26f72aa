use rand::RngExt;
use rand::rngs::StdRng;
use std::f64::consts::TAU;

use super::particles::Particles;
use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Rect, Rgba, Surface};

const BALLOONS: [Rgba; 3] = [Rgba::hex(0xff69b4), Rgba::hex(0x00ffff), Rgba::hex(0xffaa00)];
const STRING: Rgba = Rgba::hex(0x666666);

struct Guest {
    x: f64,
    y: f64,
    phase: f64,
    speed: f64,
    arm_up: bool,
    arm_timer: f64,
}

pub struct Party {
    guests: Vec<Guest>,
    balloons: Particles,
}

impl Party {
    pub fn new(rng: &mut StdRng) -> Self {
        let guests = (0..5)
            .map(|_| Guest {
                x: rng.random_range(0.2..0.8),
                y: rng.random_range(0.4..0.7),
                phase: rng.random_range(0.0..TAU),
                speed: rng.random_range(1.0..2.0),
                arm_up: false,
                arm_timer: rng.random_range(0.0..5.0),
            })
            .collect();
        Party { guests, balloons: Particles::new(24, 0.0) }
    }

    pub fn arms_up(&self) -> usize {
        self.guests.iter().filter(|g| g.arm_up).count()
    }
}

impl VignetteBehavior for Party {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        for g in &mut self.guests {
            g.phase += dt * g.speed;
            g.arm_timer += dt;
            if g.arm_timer > 5.0 {
                g.arm_up = rng.random_bool(0.3);
                g.arm_timer = 0.0;
            }
        }

        if rng.random_bool(0.05) {
            let speed = rng.random_range(0.02..0.05);
            let color = rng.random_range(0..BALLOONS.len()) as f64;
            self.balloons.emit_at(rng.random_range(0.2..0.8), 0.9, 0.0, -speed, 0.8 / speed, color);
        }
        self.balloons.update(dt);
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        for b in self.balloons.iter() {
            let (bx, by) = r.at(b.x, b.y);
            let color = BALLOONS[(b.tag as usize).min(BALLOONS.len() - 1)];
            s.fill_circle(bx, by, r.w * 0.04, color);
            s.line(bx, by, bx, by + r.h * 0.08, STRING, r.unit());
        }

        for g in &self.guests {
            let (px, py) = r.at(g.x, g.y);
            let px = px + g.phase.sin() * r.w * 0.02;
            s.fill_circle(px, py - r.h * 0.08, r.h * 0.06, SILHOUETTE);
            s.fill_rect(Rect::new(px - r.w * 0.03, py - r.h * 0.03, r.w * 0.06, r.h * 0.15), SILHOUETTE);
            if g.arm_up {
                limb(s, r, (px, py), (px, py - r.h * 0.15), SILHOUETTE, 2.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_balloons_drift_up_and_away() {
        let mut rng = StdRng::seed_from_u64(40);
        let mut party = Party::new(&mut rng);
        for _ in 0..3000 {
            party.update(1.0 / 30.0, &mut rng);
            assert!(party.balloons.iter().all(|b| b.y <= 0.9 && b.y > 0.09));
        }
        assert!(!party.balloons.is_empty());
        assert!(party.arms_up() <= 5);
    }
}
