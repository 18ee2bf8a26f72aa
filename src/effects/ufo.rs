use rand::RngExt;
use rand::rngs::StdRng;

use super::{CROSSING, EffectBehavior, Lifetime};
use crate::render::{Rgba, Surface};
use crate::scene::Layout;
use crate::scene::palette::{GREY, SILVER, UFO_BEAM};

const LIGHTS: [Rgba; 2] = [Rgba::hex(0xff00ff), Rgba::hex(0x00ffff)];

/// Flying saucer drifting across the upper sky with a pulsing tractor beam.
pub struct Ufo {
    life: Lifetime,
    y: f64,
    wobble: f64,
    beam: f64,
}

impl Ufo {
    pub fn new(duration_ms: f64, rng: &mut StdRng) -> Self {
        Ufo {
            life: Lifetime::new(duration_ms),
            y: rng.random_range(0.1..0.2),
            wobble: 0.0,
            beam: 0.0,
        }
    }

    /// Horizontal position as a fraction of the width.
    pub fn x(&self) -> f64 {
        -0.1 + CROSSING * self.life.fraction()
    }

    pub fn beam_alpha(&self) -> f64 {
        0.25 + self.beam.sin() * 0.15
    }
}

impl EffectBehavior for Ufo {
    fn lifetime(&self) -> &Lifetime {
        &self.life
    }

    fn update(&mut self, dt: f64) {
        self.life.advance(dt);
        self.wobble += dt * 4.0;
        self.beam += dt * 3.0;
    }

    fn render<S: Surface>(&self, s: &mut S, layout: &Layout) {
        let u = layout.unit;
        let x = layout.width * self.x();
        let y = layout.height * self.y + self.wobble.sin() * 20.0 * u;

        let beam_bottom = layout.height * 0.4;
        s.fill_polygon(
            &[
                (x - 15.0 * u, y + 15.0 * u),
                (x - 40.0 * u, beam_bottom),
                (x + 40.0 * u, beam_bottom),
                (x + 15.0 * u, y + 15.0 * u),
            ],
            UFO_BEAM.with_alpha(self.beam_alpha()),
        );

        s.fill_ellipse(x, y, 40.0 * u, 15.0 * u, 0.0, GREY);
        s.fill_ellipse(x, y - 10.0 * u, 25.0 * u, 15.0 * u, 0.0, SILVER);

        for i in 0..4 {
            let lx = x - 30.0 * u + i as f64 * 20.0 * u;
            s.fill_circle(lx, y + 10.0 * u, 4.0 * u, LIGHTS[i % 2]);
        }
    }
}
