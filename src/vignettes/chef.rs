use rand::RngExt;
use rand::rngs::StdRng;
use std::f64::consts::PI;

use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Rect, Rgba, Surface};

const PAN: Rgba = Rgba::hex(0x888888);
const FOOD: Rgba = Rgba::hex(0xffaa00);
const CYCLE: f64 = 90.0;

/// Where the pancake is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Food {
    InPan,
    /// Airborne; height above the pan as a fraction of the cell.
    Flying(f64),
    Floor,
}

/// Flips food in a pan; one time in a while it lands on the floor.
pub struct Chef {
    frame: f64,
    dropped: bool,
}

impl Chef {
    pub fn new() -> Self {
        Chef { frame: 0.0, dropped: false }
    }

    pub fn pan_tilt(&self) -> f64 {
        match self.frame {
            f if (30.0..45.0).contains(&f) => -((f - 30.0) / 15.0) * 0.3,
            f if (45.0..75.0).contains(&f) => -0.3,
            _ => 0.0,
        }
    }

    pub fn food(&self) -> Food {
        if self.frame < 30.0 {
            Food::InPan
        } else if self.frame < 75.0 {
            let t = (self.frame - 30.0) / 45.0;
            Food::Flying((t * PI).sin() * 0.3)
        } else if self.dropped {
            Food::Floor
        } else {
            Food::InPan
        }
    }

    pub fn is_dropped(&self) -> bool {
        self.dropped
    }
}

impl VignetteBehavior for Chef {
    fn update(&mut self, dt: f64, rng: &mut StdRng) {
        self.frame += dt * 30.0;
        if self.frame >= CYCLE {
            self.frame = 0.0;
            self.dropped = false;
        }
        if (75.0..89.0).contains(&self.frame) && !self.dropped && rng.random_bool(0.1) {
            self.dropped = true;
        }
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        let (cx, cy) = r.center();

        s.fill_circle(cx, cy - r.h * 0.15, r.h * 0.12, SILHOUETTE);
        s.fill_rect(Rect::new(cx - r.w * 0.1, cy - r.h * 0.05, r.w * 0.2, r.h * 0.3), SILHOUETTE);

        let pan_y = cy + r.h * 0.1;
        s.save();
        s.translate(cx, pan_y);
        s.rotate(self.pan_tilt());
        s.fill_rect(Rect::new(-r.w * 0.15, -5.0 * u, r.w * 0.3, 10.0 * u), PAN);
        s.restore();

        let food_r = r.w * 0.05;
        match self.food() {
            Food::InPan => s.fill_circle(cx, pan_y, food_r, FOOD),
            Food::Flying(h) => s.fill_circle(cx, pan_y - h * r.h, food_r, FOOD),
            Food::Floor => s.fill_ellipse(cx + r.w * 0.2, r.bottom() - food_r * 0.5, food_r * 1.3, food_r * 0.5, 0.0, FOOD),
        }

        if self.dropped {
            limb(s, r, (cx - r.w * 0.08, cy), (cx - r.w * 0.15, cy - r.h * 0.2), SILHOUETTE, 3.0);
            limb(s, r, (cx + r.w * 0.08, cy), (cx + r.w * 0.15, cy - r.h * 0.2), SILHOUETTE, 3.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_flip_arc_peaks_mid_flight() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut chef = Chef::new();
        assert_eq!(chef.food(), Food::InPan);
        chef.update(1.75, &mut rng); // frame 52.5
        match chef.food() {
            Food::Flying(h) => assert!((h - 0.3).abs() < 1e-9),
            other => panic!("expected airborne food, got {other:?}"),
        }
        assert_eq!(chef.pan_tilt(), -0.3);
    }

    #[test]
    fn test_drop_only_happens_late_and_resets() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut chef = Chef::new();
        let mut drops = 0;
        for _ in 0..3000 {
            chef.update(1.0 / 30.0, &mut rng);
            if chef.is_dropped() {
                assert!(chef.frame >= 75.0);
                if chef.food() == Food::Floor {
                    drops += 1;
                }
            }
        }
        assert!(drops > 0);
    }
}
