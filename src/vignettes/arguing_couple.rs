use rand::rngs::StdRng;

use super::{SILHOUETTE, VignetteBehavior, limb};
use crate::render::{Rect, Rgba, Surface};

const OTHER: Rgba = Rgba::hex(0x2a2a2a);

/// Gesture of one arguer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Still,
    /// Arms thrown up (left), arms crossed (right).
    Exasperated,
    Pointing,
    Pause,
}

impl Gesture {
    fn from_phase(frame: f64) -> Self {
        match (frame / 15.0).floor() as u64 % 4 {
            0 => Gesture::Still,
            1 => Gesture::Exasperated,
            2 => Gesture::Pointing,
            _ => Gesture::Pause,
        }
    }
}

/// Two people taking turns, half a beat out of step.
pub struct ArguingCouple {
    frame: f64,
}

impl ArguingCouple {
    pub fn new() -> Self {
        ArguingCouple { frame: 0.0 }
    }

    pub fn gestures(&self) -> (Gesture, Gesture) {
        (Gesture::from_phase(self.frame), Gesture::from_phase(self.frame + 7.5))
    }
}

impl VignetteBehavior for ArguingCouple {
    fn update(&mut self, dt: f64, _rng: &mut StdRng) {
        self.frame = (self.frame + dt * 30.0) % 60.0;
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let (x1, py) = r.at(0.35, 0.5);
        let (x2, _) = r.at(0.65, 0.5);
        let (left, right) = self.gestures();

        for (x, color) in [(x1, SILHOUETTE), (x2, OTHER)] {
            s.fill_circle(x, py - r.h * 0.15, r.h * 0.08, color);
            s.fill_rect(Rect::new(x - r.w * 0.05, py - r.h * 0.08, r.w * 0.1, r.h * 0.25), color);
        }

        match left {
            Gesture::Exasperated => {
                limb(s, r, (x1, py), (x1 - r.w * 0.1, py - r.h * 0.15), SILHOUETTE, 3.0);
                limb(s, r, (x1, py), (x1 + r.w * 0.1, py - r.h * 0.15), SILHOUETTE, 3.0);
            }
            Gesture::Pointing => limb(s, r, (x1, py), (x2 - r.w * 0.1, py), SILHOUETTE, 3.0),
            Gesture::Still | Gesture::Pause => {}
        }

        match right {
            Gesture::Exasperated => {
                limb(s, r, (x2 - r.w * 0.05, py), (x2 + r.w * 0.08, py + r.h * 0.05), OTHER, 3.0);
                limb(s, r, (x2 + r.w * 0.05, py), (x2 - r.w * 0.08, py + r.h * 0.05), OTHER, 3.0);
            }
            Gesture::Pointing => limb(s, r, (x2, py), (x1 + r.w * 0.1, py), OTHER, 3.0),
            Gesture::Still | Gesture::Pause => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_right_speaker_is_half_a_beat_ahead() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut c = ArguingCouple::new();
        c.update(0.3, &mut rng); // frame 9
        assert_eq!(c.gestures(), (Gesture::Still, Gesture::Exasperated));
        c.update(0.5, &mut rng); // frame 24
        assert_eq!(c.gestures(), (Gesture::Exasperated, Gesture::Pointing));
        c.update(1.0, &mut rng); // frame 54
        assert_eq!(c.gestures(), (Gesture::Pause, Gesture::Still));
    }
}
