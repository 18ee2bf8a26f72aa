//! The facade context: everything one frame needs, owned in one place and
//! rebuilt when the surface size changes.

pub mod layout;
pub mod palette;
pub mod sky;

pub use layout::Layout;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{AMBIENT_VOLUME, AudioCue, Mixer, Sound};
use crate::lighting::{LightingParams, WindowLightingController};
use crate::render::{Rect, Surface};
use crate::scheduler::{EventScheduler, Tick};
use crate::timing::{EventType, FrameStep, TimingTable};
use palette::{BUILDING_MAIN, BUILDING_SHADOW};
use sky::Sky;

/// Everything needed to build a facade, independent of its size.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneOptions {
    pub seed: u64,
    pub timings: TimingTable,
    pub lighting: LightingParams,
}

impl Default for SceneOptions {
    fn default() -> Self {
        SceneOptions { seed: 0, timings: TimingTable::default(), lighting: LightingParams::default() }
    }
}

pub struct Facade {
    layout: Layout,
    scheduler: EventScheduler,
    lighting: WindowLightingController,
    sky: Sky,
    rng: StdRng,
    mixer: Mixer,
    params: LightingParams,
}

impl Facade {
    pub fn new(width: f64, height: f64, options: &SceneOptions, mixer: Mixer) -> Self {
        let mut rng = StdRng::seed_from_u64(options.seed.wrapping_add(1));
        let scheduler = EventScheduler::new(options.timings.clone(), StdRng::seed_from_u64(options.seed));
        let layout = Layout::compute(width, height);
        let lighting = WindowLightingController::new(&layout.cells, layout.unit, options.lighting, &mut rng);
        let sky = Sky::generate(&layout, &mut rng);
        log::info!(
            "facade {:.0}x{:.0}, building {:.0}x{:.0}, seed {}",
            layout.width,
            layout.height,
            layout.building.w,
            layout.building.h,
            options.seed
        );
        Facade { layout, scheduler, lighting, sky, rng, mixer, params: options.lighting }
    }

    /// Lay the scene out again for a new surface size. Window occupants and
    /// the sky are rebuilt; the event schedule and any running effect carry
    /// over.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.layout = Layout::compute(width, height);
        self.lighting =
            WindowLightingController::new(&self.layout.cells, self.layout.unit, self.params, &mut self.rng);
        self.sky = Sky::generate(&self.layout, &mut self.rng);
        log::info!("relayout to {:.0}x{:.0}", self.layout.width, self.layout.height);
    }

    pub fn start_ambient(&mut self) {
        self.mixer.apply(AudioCue::looped(Sound::Ambient, AMBIENT_VOLUME));
    }

    /// One fixed step of simulation.
    pub fn update(&mut self, dt: f64) -> Tick {
        self.update_step(FrameStep::fixed(dt))
    }

    /// One frame of simulation: scheduler, then lighting, then occupants.
    /// Only the scheduler sees the uncapped elapsed time.
    pub fn update_step(&mut self, step: FrameStep) -> Tick {
        let tick = self.scheduler.advance_step(step);
        self.route(&tick);
        self.sky.update(step.dt);
        self.lighting.advance(step.dt, &mut self.rng);
        tick
    }

    /// Start an effect right away, replacing the running one.
    pub fn trigger(&mut self, kind: EventType) -> Tick {
        let tick = self.scheduler.trigger(kind);
        self.route(&tick);
        tick
    }

    fn route(&mut self, tick: &Tick) {
        if tick.toggle_due {
            self.lighting.toggle(&mut self.rng);
        }
        if let Some(kind) = tick.spawned {
            self.lighting.notify(kind);
        }
        for cue in &tick.cues {
            self.mixer.apply(*cue);
        }
    }

    /// Paint back to front: sky, skyline, effect, building, windows, then
    /// whatever the effect casts onto the facade.
    pub fn render<S: Surface>(&self, s: &mut S) {
        self.sky.render_sky(s, &self.layout);
        self.sky.render_skyline(s, &self.layout);
        self.scheduler.render_active_effect(s, &self.layout);
        render_building(s, &self.layout);
        self.lighting.render(s);
        if let Some(effect) = self.scheduler.active_effect() {
            effect.render_overlay(s, &self.layout);
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.mixer.toggle_mute()
    }

    pub fn is_muted(&self) -> bool {
        self.mixer.is_muted()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn scheduler(&self) -> &EventScheduler {
        &self.scheduler
    }

    pub fn lighting(&self) -> &WindowLightingController {
        &self.lighting
    }

    /// Name of the running effect, for the status line.
    pub fn active_name(&self) -> &'static str {
        self.scheduler.active_effect().map_or("-", |e| e.kind().name())
    }
}

fn render_building<S: Surface>(s: &mut S, layout: &Layout) {
    let b = layout.building;
    let u = layout.unit;
    s.fill_rect(Rect::new(b.x - 2.0 * u, b.y - 2.0 * u, b.w + 4.0 * u, b.h + 4.0 * u), BUILDING_SHADOW);
    s.fill_rect(b, BUILDING_MAIN);
    s.fill_rect(Rect::new(b.x, b.y - 20.0 * u, b.w, 20.0 * u), BUILDING_SHADOW);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioSink, SoundHandle};
    use crate::render::recording::{Op, RecordingSurface};
    use crate::timing::EventTiming;
    use crate::vignettes::Vignette;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        played: Rc<RefCell<Vec<(Sound, bool)>>>,
        stopped: Rc<RefCell<usize>>,
    }

    impl AudioSink for Log {
        fn play_sound(&mut self, sound: Sound, _volume: f32, looped: bool) -> Option<SoundHandle> {
            let mut played = self.played.borrow_mut();
            played.push((sound, looped));
            Some(SoundHandle(played.len() as u64))
        }

        fn stop(&mut self, _handle: SoundHandle) {
            *self.stopped.borrow_mut() += 1;
        }

        fn toggle_mute(&mut self) -> bool {
            false
        }

        fn is_muted(&self) -> bool {
            false
        }
    }

    fn facade(options: &SceneOptions) -> Facade {
        Facade::new(1280.0, 720.0, options, Mixer::silent())
    }

    fn telescope_excited(f: &Facade) -> bool {
        f.lighting()
            .cells()
            .iter()
            .any(|c| matches!(c.vignette(), Vignette::Telescope(t) if t.is_excited()))
    }

    #[test]
    fn test_ufo_spawn_reaches_the_telescope_same_frame() {
        let options = SceneOptions {
            timings: TimingTable::only(EventType::Ufo, EventTiming::new(1000.0, 1000.0, 10_000.0)),
            ..SceneOptions::default()
        };
        let mut f = facade(&options);
        assert!(!telescope_excited(&f));
        let tick = f.update(1.0);
        assert_eq!(tick.spawned, Some(EventType::Ufo));
        assert!(telescope_excited(&f));
        assert_eq!(f.active_name(), "ufo");
    }

    #[test]
    fn test_stalled_frame_still_fires_due_event() {
        let options = SceneOptions {
            timings: TimingTable::only(EventType::Ufo, EventTiming::new(1000.0, 1000.0, 10_000.0)),
            ..SceneOptions::default()
        };
        let mut f = facade(&options);
        let tick = f.update_step(FrameStep::from_elapsed(2.0));
        assert_eq!(tick.spawned, Some(EventType::Ufo));
        assert_eq!(f.scheduler().now_ms(), 2000.0);
        assert!(telescope_excited(&f));
    }

    #[test]
    fn test_infinite_config_timings_start_and_cycle() {
        let config = crate::config::Config::parse(
            "[events.ufo]\nmax_ms = inf\n\n[events.police]\nduration_ms = inf\n",
            std::path::Path::new("test.toml"),
        )
        .unwrap();
        let options = SceneOptions { timings: config.timing_table(), ..SceneOptions::default() };
        let mut f = facade(&options);
        f.trigger(EventType::Police);
        let retired = (0..40).any(|_| f.update(0.25).retired == Some(EventType::Police));
        assert!(retired, "police keeps its shipped 5 s run");
    }

    #[test]
    fn test_toggle_tick_reaches_the_lighting() {
        let options = SceneOptions {
            lighting: LightingParams::new(23, 0.0, 2.0),
            ..SceneOptions::default()
        };
        let mut f = facade(&options);
        assert_eq!(f.lighting().lit_count(), 20);
        for _ in 0..151 {
            f.update(0.1);
        }
        assert_eq!(f.lighting().lit_count(), 21, "one toggle at 15 s lights a window");
    }

    #[test]
    fn test_helicopter_sound_starts_and_stops() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let stopped = Rc::new(RefCell::new(0));
        let sink = Log { played: played.clone(), stopped: stopped.clone() };
        let options = SceneOptions {
            timings: TimingTable::only(EventType::Helicopter, EventTiming::new(600_000.0, 600_000.0, 2_000.0)),
            ..SceneOptions::default()
        };
        let mut f = Facade::new(1280.0, 720.0, &options, Mixer::new(Box::new(sink)));
        f.start_ambient();
        f.trigger(EventType::Helicopter);
        assert_eq!(*played.borrow(), vec![(Sound::Ambient, true), (Sound::Helicopter, true)]);
        for _ in 0..21 {
            f.update(0.1);
        }
        assert_eq!(f.active_name(), "-");
        assert_eq!(*stopped.borrow(), 1);
    }

    #[test]
    fn test_effect_is_painted_behind_the_building() {
        let mut f = facade(&SceneOptions::default());
        f.trigger(EventType::Police);
        let mut s = RecordingSurface::new(1280.0, 720.0);
        f.render(&mut s);
        assert_eq!(s.depth(), 0);
        let building = f.layout().building;
        let body = s
            .calls
            .iter()
            .position(|c| c.op == Op::FillRect(building))
            .expect("building body drawn");
        let police = s
            .calls
            .iter()
            .position(|c| c.color == Some(palette::POLICE_RED))
            .expect("flasher starts red");
        assert!(police < body);
        let first_clip = s.calls.iter().position(|c| matches!(c.op, Op::Clip(_))).unwrap();
        assert!(first_clip > body);
    }

    #[test]
    fn test_same_seed_same_evening() {
        let options = SceneOptions { seed: 99, ..SceneOptions::default() };
        let mut a = facade(&options);
        let mut b = facade(&options);
        let mut spawns_a = Vec::new();
        let mut spawns_b = Vec::new();
        for _ in 0..(300 * 4) {
            if let Some(k) = a.update(0.25).spawned {
                spawns_a.push((k, a.scheduler().now_ms()));
            }
            if let Some(k) = b.update(0.25).spawned {
                spawns_b.push((k, b.scheduler().now_ms()));
            }
            assert_eq!(a.lighting().lit_count(), b.lighting().lit_count());
        }
        assert!(!spawns_a.is_empty());
        assert_eq!(spawns_a, spawns_b);
    }

    #[test]
    fn test_resize_keeps_the_schedule() {
        let mut f = facade(&SceneOptions::default());
        f.trigger(EventType::Airplane);
        let pending = f.scheduler().pending().to_vec();
        f.resize(800.0, 600.0);
        assert_eq!(f.layout().width, 800.0);
        assert_eq!(f.lighting().cells().len(), 24);
        assert_eq!(f.scheduler().pending(), pending.as_slice());
        assert_eq!(f.active_name(), "airplane");
    }
}
