use rand::RngExt;
use rand::rngs::StdRng;

use super::{CROSSING, EffectBehavior, Lifetime};
use crate::render::{Rect, Rgba, Surface};
use crate::scene::Layout;
use crate::scene::palette::{POLICE_BLUE, POLICE_RED};

/// Which flasher is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Red,
    Dark,
    Blue,
}

/// Patrol car passing along the street with red/blue flashers.
pub struct PoliceCar {
    life: Lifetime,
    direction: f64,
    flash_phase: f64,
}

impl PoliceCar {
    pub fn new(duration_ms: f64, rng: &mut StdRng) -> Self {
        PoliceCar {
            life: Lifetime::new(duration_ms),
            direction: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
            flash_phase: 0.0,
        }
    }

    pub fn x(&self) -> f64 {
        let travelled = CROSSING * self.life.fraction();
        if self.direction > 0.0 { -0.1 + travelled } else { 1.1 - travelled }
    }

    pub fn flash(&self) -> Flash {
        match (self.flash_phase * 3.0).floor() as u64 % 3 {
            0 => Flash::Red,
            1 => Flash::Dark,
            _ => Flash::Blue,
        }
    }
}

impl EffectBehavior for PoliceCar {
    fn lifetime(&self) -> &Lifetime {
        &self.life
    }

    fn update(&mut self, dt: f64) {
        self.life.advance(dt);
        self.flash_phase += dt * 10.0;
    }

    fn render<S: Surface>(&self, s: &mut S, layout: &Layout) {
        let u = layout.unit;
        let x = layout.width * self.x();
        let y = layout.height - 20.0 * u;

        // Car body, just enough to anchor the flashers.
        s.fill_rect(Rect::new(x - 45.0 * u, y - 6.0 * u, 90.0 * u, 16.0 * u), Rgba::hex(0x151520));
        s.fill_rect(Rect::new(x - 22.0 * u, y - 16.0 * u, 44.0 * u, 10.0 * u), Rgba::hex(0x151520));

        let (dx, color) = match self.flash() {
            Flash::Red => (-50.0, POLICE_RED),
            Flash::Blue => (50.0, POLICE_BLUE),
            Flash::Dark => return,
        };
        s.save();
        s.set_alpha(s.alpha() * 0.6);
        s.fill_circle(x + dx * u, y, 30.0 * u, color);
        s.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_flash_cycles_red_dark_blue() {
        let mut car = PoliceCar::new(5000.0, &mut StdRng::seed_from_u64(1));
        let mut seen = Vec::new();
        // flash_phase * 3 steps by 1 every 1/30 s.
        for _ in 0..3 {
            seen.push(car.flash());
            car.update(1.0 / 30.0 + 1e-6);
        }
        assert_eq!(seen, vec![Flash::Red, Flash::Dark, Flash::Blue]);
    }

    #[test]
    fn test_travels_from_starting_edge_to_the_other() {
        for seed in 0..8 {
            let mut car = PoliceCar::new(5000.0, &mut StdRng::seed_from_u64(seed));
            let start = car.x();
            car.update(5.0);
            let end = car.x();
            assert!((start - end).abs() > 1.19);
            assert!(start == -0.1 || (start - 1.1).abs() < 1e-9);
        }
    }
}
