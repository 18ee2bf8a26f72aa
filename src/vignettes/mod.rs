pub mod aerobics;
pub mod arguing_couple;
pub mod artist;
pub mod bathtub;
pub mod bird_cage;
pub mod cat_laser;
pub mod chef;
pub mod dancing_couple;
pub mod disco;
pub mod dog_waiting;
pub mod fish_tank;
pub mod gamer;
pub mod juggler;
pub mod late_night_worker;
pub mod magician;
pub mod particles;
pub mod party;
pub mod phone_pacer;
pub mod plant_enthusiast;
pub mod reading;
pub mod shadow_puppet;
pub mod sleeping;
pub mod telescope;
pub mod tv_watcher;
pub mod yoga;

use rand::rngs::StdRng;

use crate::render::{Rect, Rgba, Surface};
use crate::timing::EventType;

/// Silhouette fill used by most of the occupants.
pub const SILHOUETTE: Rgba = Rgba::hex(0x1a1a1a);
pub const SKIN: Rgba = Rgba::hex(0xf4c2a8);

/// Every window scene implements this.
pub trait VignetteBehavior {
    /// Advance private timers by `dt` seconds. Random branch points draw
    /// from `rng`.
    fn update(&mut self, dt: f64, rng: &mut StdRng);

    /// Paint the current state into `r`. The caller has already clipped to
    /// `r` and set the window's opacity.
    fn render<S: Surface>(&self, s: &mut S, r: Rect);

    /// A rare event just started. Most scenes ignore it.
    fn notify(&mut self, _event: EventType) {}
}

/// The 24 window scenes, in facade order (row-major, top-left first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VignetteKind {
    Aerobics,
    TvWatcher,
    Chef,
    PlantEnthusiast,
    Artist,
    Reading,
    CatLaser,
    DogWaiting,
    FishTank,
    BirdCage,
    DancingCouple,
    ArguingCouple,
    Party,
    PhonePacer,
    Sleeping,
    Yoga,
    Bathtub,
    Gamer,
    LateNightWorker,
    Magician,
    Juggler,
    Telescope,
    ShadowPuppet,
    Disco,
}

impl VignetteKind {
    pub const ALL: [VignetteKind; 24] = [
        VignetteKind::Aerobics,
        VignetteKind::TvWatcher,
        VignetteKind::Chef,
        VignetteKind::PlantEnthusiast,
        VignetteKind::Artist,
        VignetteKind::Reading,
        VignetteKind::CatLaser,
        VignetteKind::DogWaiting,
        VignetteKind::FishTank,
        VignetteKind::BirdCage,
        VignetteKind::DancingCouple,
        VignetteKind::ArguingCouple,
        VignetteKind::Party,
        VignetteKind::PhonePacer,
        VignetteKind::Sleeping,
        VignetteKind::Yoga,
        VignetteKind::Bathtub,
        VignetteKind::Gamer,
        VignetteKind::LateNightWorker,
        VignetteKind::Magician,
        VignetteKind::Juggler,
        VignetteKind::Telescope,
        VignetteKind::ShadowPuppet,
        VignetteKind::Disco,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VignetteKind::Aerobics => "aerobics",
            VignetteKind::TvWatcher => "tv-watcher",
            VignetteKind::Chef => "chef",
            VignetteKind::PlantEnthusiast => "plant-enthusiast",
            VignetteKind::Artist => "artist",
            VignetteKind::Reading => "reading",
            VignetteKind::CatLaser => "cat-laser",
            VignetteKind::DogWaiting => "dog-waiting",
            VignetteKind::FishTank => "fish-tank",
            VignetteKind::BirdCage => "bird-cage",
            VignetteKind::DancingCouple => "dancing-couple",
            VignetteKind::ArguingCouple => "arguing-couple",
            VignetteKind::Party => "party",
            VignetteKind::PhonePacer => "phone-pacer",
            VignetteKind::Sleeping => "sleeping",
            VignetteKind::Yoga => "yoga",
            VignetteKind::Bathtub => "bathtub",
            VignetteKind::Gamer => "gamer",
            VignetteKind::LateNightWorker => "late-night-worker",
            VignetteKind::Magician => "magician",
            VignetteKind::Juggler => "juggler",
            VignetteKind::Telescope => "telescope",
            VignetteKind::ShadowPuppet => "shadow-puppet",
            VignetteKind::Disco => "disco",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            VignetteKind::Aerobics => "Jumping jacks in a pink leotard",
            VignetteKind::TvWatcher => "Couch viewer nodding in the TV glow",
            VignetteKind::Chef => "Pan-flipping cook who sometimes misses",
            VignetteKind::PlantEnthusiast => "Watering a row of potted plants",
            VignetteKind::Artist => "Painter at an easel of shifting colour",
            VignetteKind::Reading => "Reader in an armchair turning pages",
            VignetteKind::CatLaser => "Cat chasing a laser dot",
            VignetteKind::DogWaiting => "Dog by the door, ears perking",
            VignetteKind::FishTank => "Aquarium with fish and bubbles",
            VignetteKind::BirdCage => "Bird hopping between perches",
            VignetteKind::DancingCouple => "Slow-dancing pair with the odd twirl",
            VignetteKind::ArguingCouple => "Two people gesturing at each other",
            VignetteKind::Party => "House party with balloons",
            VignetteKind::PhonePacer => "Pacing back and forth on the phone",
            VignetteKind::Sleeping => "Sleeper breathing under a blanket",
            VignetteKind::Yoga => "Yoga breathing and stretches",
            VignetteKind::Bathtub => "Bubble bath with a waving arm",
            VignetteKind::Gamer => "Gamer leaning into a match",
            VignetteKind::LateNightWorker => "Typing late at a glowing monitor",
            VignetteKind::Magician => "Pulling a rabbit out of a hat",
            VignetteKind::Juggler => "Three-ball cascade, occasionally dropped",
            VignetteKind::Telescope => "Stargazer who notices flying saucers",
            VignetteKind::ShadowPuppet => "Hand shadows on the wall",
            VignetteKind::Disco => "Mirror ball and coloured spots",
        }
    }
}

/// One window's scene, dispatched statically.
pub enum Vignette {
    Aerobics(aerobics::Aerobics),
    TvWatcher(tv_watcher::TvWatcher),
    Chef(chef::Chef),
    PlantEnthusiast(plant_enthusiast::PlantEnthusiast),
    Artist(artist::Artist),
    Reading(reading::Reading),
    CatLaser(cat_laser::CatLaser),
    DogWaiting(dog_waiting::DogWaiting),
    FishTank(fish_tank::FishTank),
    BirdCage(bird_cage::BirdCage),
    DancingCouple(dancing_couple::DancingCouple),
    ArguingCouple(arguing_couple::ArguingCouple),
    Party(party::Party),
    PhonePacer(phone_pacer::PhonePacer),
    Sleeping(sleeping::Sleeping),
    Yoga(yoga::Yoga),
    Bathtub(bathtub::Bathtub),
    Gamer(gamer::Gamer),
    LateNightWorker(late_night_worker::LateNightWorker),
    Magician(magician::Magician),
    Juggler(juggler::Juggler),
    Telescope(telescope::Telescope),
    ShadowPuppet(shadow_puppet::ShadowPuppet),
    Disco(disco::Disco),
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            Vignette::Aerobics($v) => $body,
            Vignette::TvWatcher($v) => $body,
            Vignette::Chef($v) => $body,
            Vignette::PlantEnthusiast($v) => $body,
            Vignette::Artist($v) => $body,
            Vignette::Reading($v) => $body,
            Vignette::CatLaser($v) => $body,
            Vignette::DogWaiting($v) => $body,
            Vignette::FishTank($v) => $body,
            Vignette::BirdCage($v) => $body,
            Vignette::DancingCouple($v) => $body,
            Vignette::ArguingCouple($v) => $body,
            Vignette::Party($v) => $body,
            Vignette::PhonePacer($v) => $body,
            Vignette::Sleeping($v) => $body,
            Vignette::Yoga($v) => $body,
            Vignette::Bathtub($v) => $body,
            Vignette::Gamer($v) => $body,
            Vignette::LateNightWorker($v) => $body,
            Vignette::Magician($v) => $body,
            Vignette::Juggler($v) => $body,
            Vignette::Telescope($v) => $body,
            Vignette::ShadowPuppet($v) => $body,
            Vignette::Disco($v) => $body,
        }
    };
}

impl Vignette {
    pub fn new(kind: VignetteKind, rng: &mut StdRng) -> Self {
        match kind {
            VignetteKind::Aerobics => Vignette::Aerobics(aerobics::Aerobics::new()),
            VignetteKind::TvWatcher => Vignette::TvWatcher(tv_watcher::TvWatcher::new()),
            VignetteKind::Chef => Vignette::Chef(chef::Chef::new()),
            VignetteKind::PlantEnthusiast => Vignette::PlantEnthusiast(plant_enthusiast::PlantEnthusiast::new()),
            VignetteKind::Artist => Vignette::Artist(artist::Artist::new()),
            VignetteKind::Reading => Vignette::Reading(reading::Reading::new(rng)),
            VignetteKind::CatLaser => Vignette::CatLaser(cat_laser::CatLaser::new(rng)),
            VignetteKind::DogWaiting => Vignette::DogWaiting(dog_waiting::DogWaiting::new(rng)),
            VignetteKind::FishTank => Vignette::FishTank(fish_tank::FishTank::new(rng)),
            VignetteKind::BirdCage => Vignette::BirdCage(bird_cage::BirdCage::new(rng)),
            VignetteKind::DancingCouple => Vignette::DancingCouple(dancing_couple::DancingCouple::new()),
            VignetteKind::ArguingCouple => Vignette::ArguingCouple(arguing_couple::ArguingCouple::new()),
            VignetteKind::Party => Vignette::Party(party::Party::new(rng)),
            VignetteKind::PhonePacer => Vignette::PhonePacer(phone_pacer::PhonePacer::new()),
            VignetteKind::Sleeping => Vignette::Sleeping(sleeping::Sleeping::new()),
            VignetteKind::Yoga => Vignette::Yoga(yoga::Yoga::new()),
            VignetteKind::Bathtub => Vignette::Bathtub(bathtub::Bathtub::new(rng)),
            VignetteKind::Gamer => Vignette::Gamer(gamer::Gamer::new()),
            VignetteKind::LateNightWorker => Vignette::LateNightWorker(late_night_worker::LateNightWorker::new(rng)),
            VignetteKind::Magician => Vignette::Magician(magician::Magician::new()),
            VignetteKind::Juggler => Vignette::Juggler(juggler::Juggler::new()),
            VignetteKind::Telescope => Vignette::Telescope(telescope::Telescope::new()),
            VignetteKind::ShadowPuppet => Vignette::ShadowPuppet(shadow_puppet::ShadowPuppet::new()),
            VignetteKind::Disco => Vignette::Disco(disco::Disco::new(rng)),
        }
    }

    pub fn kind(&self) -> VignetteKind {
        match self {
            Vignette::Aerobics(_) => VignetteKind::Aerobics,
            Vignette::TvWatcher(_) => VignetteKind::TvWatcher,
            Vignette::Chef(_) => VignetteKind::Chef,
            Vignette::PlantEnthusiast(_) => VignetteKind::PlantEnthusiast,
            Vignette::Artist(_) => VignetteKind::Artist,
            Vignette::Reading(_) => VignetteKind::Reading,
            Vignette::CatLaser(_) => VignetteKind::CatLaser,
            Vignette::DogWaiting(_) => VignetteKind::DogWaiting,
            Vignette::FishTank(_) => VignetteKind::FishTank,
            Vignette::BirdCage(_) => VignetteKind::BirdCage,
            Vignette::DancingCouple(_) => VignetteKind::DancingCouple,
            Vignette::ArguingCouple(_) => VignetteKind::ArguingCouple,
            Vignette::Party(_) => VignetteKind::Party,
            Vignette::PhonePacer(_) => VignetteKind::PhonePacer,
            Vignette::Sleeping(_) => VignetteKind::Sleeping,
            Vignette::Yoga(_) => VignetteKind::Yoga,
            Vignette::Bathtub(_) => VignetteKind::Bathtub,
            Vignette::Gamer(_) => VignetteKind::Gamer,
            Vignette::LateNightWorker(_) => VignetteKind::LateNightWorker,
            Vignette::Magician(_) => VignetteKind::Magician,
            Vignette::Juggler(_) => VignetteKind::Juggler,
            Vignette::Telescope(_) => VignetteKind::Telescope,
            Vignette::ShadowPuppet(_) => VignetteKind::ShadowPuppet,
            Vignette::Disco(_) => VignetteKind::Disco,
        }
    }

    pub fn update(&mut self, dt: f64, rng: &mut StdRng) {
        dispatch!(self, v => v.update(dt, rng))
    }

    pub fn render<S: Surface>(&self, s: &mut S, r: Rect) {
        dispatch!(self, v => v.render(s, r))
    }

    pub fn notify(&mut self, event: EventType) {
        dispatch!(self, v => v.notify(event))
    }
}

/// Straight limb from `a` to `b`, width in cell units.
pub fn limb<S: Surface>(s: &mut S, r: Rect, a: (f64, f64), b: (f64, f64), color: Rgba, width: f64) {
    s.line(a.0, a.1, b.0, b.1, color, width * r.unit());
}
