use rand::RngExt;
use rand::rngs::StdRng;

use super::{CROSSING, EffectBehavior, Lifetime};
use crate::render::{Rect, Rgba, Surface};
use crate::scene::Layout;
use crate::scene::palette::{GREY, WHITE};

const NAV_RED: Rgba = Rgba::hex(0xff0000);

/// Airliner at cruising altitude with alternating navigation lights.
pub struct Airplane {
    life: Lifetime,
    y: f64,
    blink: f64,
}

impl Airplane {
    pub fn new(duration_ms: f64, rng: &mut StdRng) -> Self {
        Airplane { life: Lifetime::new(duration_ms), y: rng.random_range(0.15..0.25), blink: 0.0 }
    }

    pub fn x(&self) -> f64 {
        -0.1 + CROSSING * self.life.fraction()
    }

    /// True while the red wing light is on; white otherwise.
    pub fn red_on(&self) -> bool {
        (self.blink * 2.0).floor() as u64 % 2 == 0
    }
}

impl EffectBehavior for Airplane {
    fn lifetime(&self) -> &Lifetime {
        &self.life
    }

    fn update(&mut self, dt: f64) {
        self.life.advance(dt);
        self.blink += dt;
    }

    fn render<S: Surface>(&self, s: &mut S, layout: &Layout) {
        let u = layout.unit;
        let x = self.x() * layout.width;
        let y = self.y * layout.height;

        s.fill_rect(Rect::new(x - 20.0 * u, y - 3.0 * u, 40.0 * u, 6.0 * u), GREY);
        s.fill_rect(Rect::new(x - 5.0 * u, y - 12.0 * u, 10.0 * u, 24.0 * u), GREY);
        s.fill_polygon(&[(x - 20.0 * u, y), (x - 28.0 * u, y - 8.0 * u), (x - 20.0 * u, y - 3.0 * u)], GREY);

        if self.red_on() {
            s.fill_circle(x - 5.0 * u, y - 12.0 * u, 3.0 * u, NAV_RED);
        } else {
            s.fill_circle(x + 5.0 * u, y + 12.0 * u, 3.0 * u, WHITE);
        }
    }
}
