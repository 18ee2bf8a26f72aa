use rand::RngExt;
use rand::rngs::StdRng;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::VignetteBehavior;
use crate::render::{Rect, Rgba, Surface};
use crate::scene::palette::{SILVER, WHITE};

const SPOT_COLORS: [Rgba; 5] = [
    Rgba::hex(0xff0000),
    Rgba::hex(0x00ff00),
    Rgba::hex(0x0000ff),
    Rgba::hex(0xffff00),
    Rgba::hex(0xff00ff),
];
const FACETS: usize = 20;

struct Spot {
    x: f64,
    y: f64,
    color: usize,
    timer: f64,
}

pub struct Disco {
    rotation: f64,
    spots: Vec<Spot>,
}

impl Disco {
    pub fn new(rng: &mut StdRng) -> Self {
        let spots = (0..15)
            .map(|_| Spot {
                x: rng.random_range(0.1..0.9),
                y: rng.random_range(0.1..0.9),
                color: rng.random_range(0..SPOT_COLORS.len()),
                timer: 0.0,
            })
            .collect();
        Disco { rotation: 0.0, spots }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }
}

impl VignetteBehavior for Disco {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.rotation += dt * FRAC_PI_2;
        let pull = (dt * 2.0).min(1.0);
        for spot in &mut self.spots {
            spot.timer += dt;
            if spot.timer > 1.0 {
                spot.color = rng.random_range(0..SPOT_COLORS.len());
                spot.timer = 0.0;
            }
            let angle = self.rotation + spot.x * TAU;
            let tx = 0.5 + angle.cos() * 0.3;
            let ty = 0.3 + (spot.y * PI).sin() * 0.4;
            spot.x += (tx - spot.x) * pull;
            spot.y += (ty - spot.y) * pull;
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        let (bx, by) = r.at(0.5, 0.3);
        let radius = r.w * 0.12;
        s.fill_circle(bx, by, radius, SILVER);
        for i in 0..FACETS {
            let angle = i as f64 / FACETS as f64 * TAU + self.rotation;
            let fx = bx + angle.cos() * radius * 0.7;
            let fy = by + angle.sin() * radius * 0.7;
            s.fill_rect(Rect::new(fx - 3.0 * u, fy - 3.0 * u, 6.0 * u, 6.0 * u), WHITE);
        }

        let base = s.alpha();
        s.set_alpha(base * 0.6);
        for spot in &self.spots {
            let (sx, sy) = r.at(spot.x, spot.y);
            s.fill_circle(sx, sy, r.w * 0.04, SPOT_COLORS[spot.color]);
        }
        s.set_alpha(base);
    }
}
