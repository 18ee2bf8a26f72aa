pub mod airplane;
pub mod helicopter;
pub mod lightning;
pub mod police;
pub mod shooting_star;
pub mod ufo;

use rand::rngs::StdRng;

use crate::audio::{AudioCue, Sound};
use crate::render::Surface;
use crate::scene::Layout;
use crate::timing::EventType;

/// Horizontal travel of a full crossing, from just off one edge (-0.1) to just
/// off the other (1.1), in fractions of the surface width.
pub const CROSSING: f64 = 1.2;

/// Shared Spawned → Active → Expired clock of every effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    elapsed_ms: f64,
    duration_ms: f64,
}

impl Lifetime {
    pub fn new(duration_ms: f64) -> Self {
        Lifetime { elapsed_ms: 0.0, duration_ms: duration_ms.max(1.0) }
    }

    pub fn advance(&mut self, dt: f64) {
        self.elapsed_ms += dt * 1000.0;
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Progress through the run, 0.0..=1.0.
    pub fn fraction(&self) -> f64 {
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// Behaviour shared by the screen-wide effects.
pub trait EffectBehavior {
    fn lifetime(&self) -> &Lifetime;

    /// Advance by `dt` seconds.
    fn update(&mut self, dt: f64);

    /// Paint into the sky layer, behind the building.
    fn render<S: Surface>(&self, s: &mut S, layout: &Layout);
}

/// The one effect the scheduler may be running.
pub enum Effect {
    Ufo(ufo::Ufo),
    Police(police::PoliceCar),
    ShootingStar(shooting_star::ShootingStar),
    Helicopter(helicopter::Helicopter),
    Lightning(lightning::LightningFlash),
    Airplane(airplane::Airplane),
}

macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            Effect::Ufo($e) => $body,
            Effect::Police($e) => $body,
            Effect::ShootingStar($e) => $body,
            Effect::Helicopter($e) => $body,
            Effect::Lightning($e) => $body,
            Effect::Airplane($e) => $body,
        }
    };
}

impl Effect {
    pub fn spawn(kind: EventType, duration_ms: f64, rng: &mut StdRng) -> Self {
        match kind {
            EventType::Ufo => Effect::Ufo(ufo::Ufo::new(duration_ms, rng)),
            EventType::Police => Effect::Police(police::PoliceCar::new(duration_ms, rng)),
            EventType::ShootingStar => {
                Effect::ShootingStar(shooting_star::ShootingStar::new(duration_ms, rng))
            }
            EventType::Helicopter => Effect::Helicopter(helicopter::Helicopter::new(duration_ms, rng)),
            EventType::Lightning => Effect::Lightning(lightning::LightningFlash::new(duration_ms, rng)),
            EventType::Airplane => Effect::Airplane(airplane::Airplane::new(duration_ms, rng)),
        }
    }

    pub fn kind(&self) -> EventType {
        match self {
            Effect::Ufo(_) => EventType::Ufo,
            Effect::Police(_) => EventType::Police,
            Effect::ShootingStar(_) => EventType::ShootingStar,
            Effect::Helicopter(_) => EventType::Helicopter,
            Effect::Lightning(_) => EventType::Lightning,
            Effect::Airplane(_) => EventType::Airplane,
        }
    }

    pub fn update(&mut self, dt: f64) {
        dispatch!(self, e => e.update(dt))
    }

    pub fn render<S: Surface>(&self, s: &mut S, layout: &Layout) {
        dispatch!(self, e => e.render(s, layout))
    }

    pub fn lifetime(&self) -> &Lifetime {
        dispatch!(self, e => e.lifetime())
    }

    pub fn is_active(&self) -> bool {
        !self.lifetime().is_expired()
    }

    /// Sound requested when the effect appears.
    pub fn spawn_cue(&self) -> Option<AudioCue> {
        match self.kind() {
            EventType::Ufo => Some(AudioCue::play(Sound::UfoWhoosh, 0.3)),
            EventType::Police => Some(AudioCue::play(Sound::PoliceSiren, 0.3)),
            EventType::Helicopter => Some(AudioCue::looped(Sound::Helicopter, 0.25)),
            EventType::ShootingStar | EventType::Lightning | EventType::Airplane => None,
        }
    }

    /// Sound that became due during the last update.
    pub fn take_cue(&mut self) -> Option<AudioCue> {
        match self {
            Effect::Lightning(l) => l.take_thunder(),
            _ => None,
        }
    }

    /// Sound to silence once the effect has been discarded.
    pub fn retire_cue(&self) -> Option<AudioCue> {
        matches!(self, Effect::Helicopter(_)).then_some(AudioCue::Stop(Sound::Helicopter))
    }

    /// Paint what lands on the facade itself, after the windows.
    pub fn render_overlay<S: Surface>(&self, s: &mut S, layout: &Layout) {
        if let Effect::Helicopter(h) = self {
            h.render_spotlight(s, layout);
        }
    }

    /// Where the helicopter's spotlight falls, if this is a helicopter.
    pub fn spotlight_position(&self) -> Option<(f64, f64)> {
        match self {
            Effect::Helicopter(h) => Some(h.spotlight_position()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_lifetime_expires_at_duration() {
        let mut l = Lifetime::new(100.0);
        l.advance(0.099);
        assert!(!l.is_expired());
        l.advance(0.001);
        assert!(l.is_expired());
        assert_eq!(l.fraction(), 1.0);
    }

    #[test]
    fn test_police_active_until_duration() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut effect = Effect::spawn(EventType::Police, 5000.0, &mut rng);
        // 49 steps of 100 ms: 4900 ms elapsed.
        for _ in 0..49 {
            effect.update(0.1);
            assert!(effect.is_active());
        }
        effect.update(0.05);
        assert!(effect.is_active(), "4950 ms is still inside the run");
        effect.update(0.05);
        assert!(!effect.is_active(), "5000 ms ends the run");
    }

    #[test]
    fn test_spawn_matches_kind() {
        let mut rng = StdRng::seed_from_u64(1);
        for kind in EventType::ALL {
            let effect = Effect::spawn(kind, kind.default_timing().duration_ms, &mut rng);
            assert_eq!(effect.kind(), kind);
            assert!(effect.is_active());
        }
    }

    #[test]
    fn test_only_helicopter_needs_a_stop_cue() {
        let mut rng = StdRng::seed_from_u64(2);
        for kind in EventType::ALL {
            let effect = Effect::spawn(kind, 1000.0, &mut rng);
            assert_eq!(effect.retire_cue().is_some(), kind == EventType::Helicopter);
            assert_eq!(effect.spotlight_position().is_some(), kind == EventType::Helicopter);
        }
    }
}
