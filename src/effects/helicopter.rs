use rand::RngExt;
use rand::rngs::StdRng;

use super::{EffectBehavior, Lifetime};
use crate::render::{Gradient, Rect, Rgba, Surface};
use crate::scene::Layout;
use crate::scene::palette::{POLICE_RED, SPOTLIGHT};

/// Width fractions covered per duration, edge (-0.1) to edge (1.1).
const RATE: f64 = 1.2;
const SPOT_RADIUS: f64 = 150.0;

/// Helicopter sweeping a searchlight across the facade.
pub struct Helicopter {
    life: Lifetime,
    edge: f64,
    direction: f64,
    y: f64,
    rotor: f64,
}

impl Helicopter {
    pub fn new(duration_ms: f64, rng: &mut StdRng) -> Self {
        let edge = if rng.random_bool(0.5) { -0.1 } else { 1.1 };
        Helicopter {
            life: Lifetime::new(duration_ms),
            edge,
            direction: if edge < 0.5 { 1.0 } else { -1.0 },
            y: rng.random_range(0.3..0.5),
            rotor: 0.0,
        }
    }

    pub fn x(&self) -> f64 {
        self.edge + self.direction * RATE * self.life.fraction()
    }

    /// Spotlight centre: normalized x across the surface, y relative to the
    /// building height.
    pub fn spotlight_position(&self) -> (f64, f64) {
        (self.x(), self.y)
    }

    /// Paint the searchlight over the facade. Called after the windows.
    pub fn render_spotlight<S: Surface>(&self, s: &mut S, layout: &Layout) {
        let (sx, sy) = self.spotlight_position();
        let cx = sx * layout.width;
        let cy = layout.building.y + sy * layout.building.h;
        let r = SPOT_RADIUS * layout.unit;
        let glow = Gradient::radial(cx, cy, 0.0, r)
            .stop(0.0, SPOTLIGHT.with_alpha(0.6))
            .stop(1.0, SPOTLIGHT.with_alpha(0.0));
        s.fill_circle(cx, cy, r, glow);
    }
}

impl EffectBehavior for Helicopter {
    fn lifetime(&self) -> &Lifetime {
        &self.life
    }

    fn update(&mut self, dt: f64) {
        self.life.advance(dt);
        self.rotor += dt * 20.0;
    }

    /// The airframe hangs above the roofline; the light itself is painted
    /// onto the facade by [`Helicopter::render_spotlight`].
    fn render<S: Surface>(&self, s: &mut S, layout: &Layout) {
        let u = layout.unit;
        let x = self.x() * layout.width;
        let y = layout.building.y - 70.0 * u;
        let body = Rgba::hex(0x202028);

        s.fill_ellipse(x, y, 22.0 * u, 9.0 * u, 0.0, body);
        let tail = if self.direction > 0.0 { x - 50.0 * u } else { x + 14.0 * u };
        s.fill_rect(Rect::new(tail, y - 2.0 * u, 36.0 * u, 4.0 * u), body);
        let blade = 36.0 * u * self.rotor.cos().abs().max(0.2);
        s.line(x - blade, y - 12.0 * u, x + blade, y - 12.0 * u, body, 2.0 * u);
        if (self.rotor / 4.0).floor() as i64 % 2 == 0 {
            s.fill_circle(x, y + 9.0 * u, 2.5 * u, POLICE_RED);
        }

        // Beam cone from the airframe down to where the light lands.
        let (_, sy) = self.spotlight_position();
        let ly = layout.building.y + sy * layout.building.h;
        s.fill_polygon(
            &[
                (x - 4.0 * u, y + 8.0 * u),
                (x + 4.0 * u, y + 8.0 * u),
                (x + 60.0 * u, ly),
                (x - 60.0 * u, ly),
            ],
            SPOTLIGHT.with_alpha(0.08),
        );
    }
}
