use rand::RngExt;
use rand::rngs::StdRng;
use std::f64::consts::TAU;

use super::VignetteBehavior;
use super::particles::Particles;
use crate::render::{Rect, Rgba, Surface};

const WATER: Rgba = Rgba::hex(0xa8dadc);
const GRAVEL: Rgba = Rgba::hex(0x8b7355);
const GLASS: Rgba = Rgba::hex(0x666666);
const SCALES: [Rgba; 4] = [Rgba::hex(0xff6b35), Rgba::hex(0xffaa00), Rgba::hex(0x00ffaa), Rgba::hex(0xff1493)];

struct Fish {
    x: f64,
    y: f64,
    speed: f64,
    direction: f64,
    phase: f64,
}

pub struct FishTank {
    fish: Vec<Fish>,
    bubbles: Particles,
}

impl FishTank {
    pub fn new(rng: &mut StdRng) -> Self {
        let fish = (0..SCALES.len())
            .map(|_| Fish {
                x: rng.random_range(0.1..0.9),
                y: rng.random_range(0.2..0.7),
                speed: rng.random_range(0.05..0.15),
                direction: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
                phase: rng.random_range(0.0..TAU),
            })
            .collect();
        FishTank { fish, bubbles: Particles::new(48, 0.0) }
    }

    /// Swimming positions, bob included.
    pub fn fish_positions(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.fish.iter().map(|f| (f.x, (f.y + f.phase.sin() * 0.03).clamp(0.2, 0.75)))
    }
}

impl VignetteBehavior for FishTank {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        for f in &mut self.fish {
            f.x += f.direction * f.speed * dt;
            f.phase += dt * 2.0;
            if f.x > 0.95 {
                f.x = 0.95;
                f.direction = -1.0;
            } else if f.x < 0.05 {
                f.x = 0.05;
                f.direction = 1.0;
            }
        }

        if rng.random_bool(0.1) {
            let speed = rng.random_range(0.1..0.2);
            // Lives exactly long enough to rise from the gravel to the lid.
            self.bubbles.emit_at(rng.random_range(0.1..0.9), 0.8, 0.0, -speed, 0.7 / speed, 0.0);
        }
        self.bubbles.update(dt);
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        let tank = Rect::new(r.x + r.w * 0.1, r.y + r.h * 0.15, r.w * 0.8, r.h * 0.7);
        s.fill_rect(tank, WATER);
        s.fill_rect(Rect::new(tank.x, r.y + r.h * 0.8, tank.w, r.h * 0.05), GRAVEL);

        for ((fx, fy), (fish, color)) in self.fish_positions().zip(self.fish.iter().zip(SCALES)) {
            let (px, py) = r.at(fx, fy);
            s.save();
            s.translate(px, py);
            if fish.direction < 0.0 {
                s.scale(-1.0, 1.0);
            }
            s.fill_ellipse(0.0, 0.0, r.w * 0.06, r.h * 0.03, 0.0, color);
            s.fill_polygon(
                &[(-r.w * 0.06, 0.0), (-r.w * 0.1, -r.h * 0.02), (-r.w * 0.1, r.h * 0.02)],
                color,
            );
            s.restore();
        }

        let bubble = Rgba::rgba(255, 255, 255, 0.6);
        for b in self.bubbles.iter() {
            let (bx, by) = r.at(b.x, b.y);
            s.fill_circle(bx, by, 3.0 * u, bubble);
        }

        s.stroke_rect(tank, GLASS, 2.0 * u);
    }
}
