use rand::rngs::StdRng;
use std::f64::consts::PI;

use super::{SKIN, VignetteBehavior, limb};
use crate::render::{Rect, Rgba, Surface};

const LEOTARD: Rgba = Rgba::hex(0xff69b4);
const LIMBS: Rgba = Rgba::hex(0xff1493);
const CYCLE: f64 = 60.0;
const FPS: f64 = 30.0;

/// Pose for one point of the routine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Arm elevation, 0 horizontal-down to PI overhead.
    pub arm_angle: f64,
    /// Foot offset from centre, in reference pixels.
    pub leg_spread: f64,
    /// Hop height, negative is up, in reference pixels.
    pub lift: f64,
}

/// Jumping jacks: rest, jack, rest, arms out, on a 60-frame loop.
pub struct Aerobics {
    frame: f64,
}

impl Aerobics {
    pub fn new() -> Self {
        Aerobics { frame: 0.0 }
    }

    pub fn pose(&self) -> Pose {
        let f = self.frame;
        if (15.0..30.0).contains(&f) {
            let t = (f - 15.0) / 15.0;
            Pose { arm_angle: t * PI, leg_spread: t * 15.0, lift: -(t * PI).sin() * 5.0 }
        } else if f >= 45.0 {
            Pose { arm_angle: PI / 2.0, leg_spread: 0.0, lift: 0.0 }
        } else {
            Pose { arm_angle: 0.0, leg_spread: 0.0, lift: 0.0 }
        }
    }
}

impl VignetteBehavior for Aerobics {
    fn update(&mut self, dt: f64, _rng: &mut StdRng) {
        self.frame = (self.frame + dt * FPS) % CYCLE;
    }

    fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        let u = r.unit();
        let pose = self.pose();
        let (cx, cy) = r.center();
        let cy = cy + pose.lift * u;
        let body_h = r.h * 0.25;
        let arm = r.w * 0.15;

        s.fill_circle(cx, cy - body_h, r.h * 0.1, SKIN);
        s.fill_rect(Rect::new(cx - r.w * 0.08, cy - body_h / 2.0, r.w * 0.16, body_h), LEOTARD);

        let shoulder = (cx, cy - body_h / 2.0);
        let (ax, ay) = (pose.arm_angle.cos() * arm, pose.arm_angle.sin() * arm);
        limb(s, r, shoulder, (cx - ax, shoulder.1 - ay), LIMBS, 3.0);
        limb(s, r, shoulder, (cx + ax, shoulder.1 - ay), LIMBS, 3.0);

        let hip = (cx, cy + body_h / 2.0);
        let spread = pose.leg_spread * u;
        limb(s, r, hip, (cx - spread, cy + body_h), LIMBS, 3.0);
        limb(s, r, hip, (cx + spread, cy + body_h), LIMBS, 3.0);
    }
}
