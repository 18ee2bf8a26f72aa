//! Rare-event scheduling: one pending event per type, at most one effect on
//! screen, and the window-toggle cadence.

use rand::RngExt;
use rand::rngs::StdRng;

use crate::audio::AudioCue;
use crate::effects::Effect;
use crate::render::Surface;
use crate::scene::Layout;
use crate::timing::{EventType, FrameStep, TimingTable};

/// A pending firing of one event type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    pub kind: EventType,
    pub fire_at_ms: f64,
    seq: u64,
}

/// What happened during one [`EventScheduler::advance`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tick {
    /// The 15 s window-toggle period elapsed.
    pub toggle_due: bool,
    pub spawned: Option<EventType>,
    /// Events that came due while another effect was running.
    pub skipped: Vec<EventType>,
    pub retired: Option<EventType>,
    pub cues: Vec<AudioCue>,
}

pub struct EventScheduler {
    timings: TimingTable,
    rng: StdRng,
    now_ms: f64,
    toggle_elapsed_ms: f64,
    /// Sorted by (fire time, insertion order).
    queue: Vec<ScheduledEvent>,
    next_seq: u64,
    active: Option<Effect>,
}

impl EventScheduler {
    /// Schedule the first firing of every enabled event type.
    pub fn new(timings: TimingTable, rng: StdRng) -> Self {
        let mut scheduler = EventScheduler {
            timings,
            rng,
            now_ms: 0.0,
            toggle_elapsed_ms: 0.0,
            queue: Vec::with_capacity(EventType::ALL.len()),
            next_seq: 0,
            active: None,
        };
        let enabled: Vec<EventType> = scheduler.timings.enabled().map(|(k, _)| k).collect();
        for kind in enabled {
            let delay = scheduler.draw_delay(kind);
            scheduler.schedule(kind, delay);
        }
        scheduler
    }

    fn draw_delay(&mut self, kind: EventType) -> f64 {
        let t = self.timings.timing(kind);
        self.rng.random_range(t.min_ms..=t.max_ms)
    }

    fn schedule(&mut self, kind: EventType, fire_at_ms: f64) {
        let event = ScheduledEvent { kind, fire_at_ms, seq: self.next_seq };
        self.next_seq += 1;
        let at = self
            .queue
            .partition_point(|e| (e.fire_at_ms, e.seq) <= (event.fire_at_ms, event.seq));
        self.queue.insert(at, event);
    }

    /// Advance the scheduler clock and the running effect by `dt` seconds.
    pub fn advance(&mut self, dt: f64) -> Tick {
        self.advance_step(FrameStep::fixed(dt))
    }

    /// Advance the event clock and toggle counter by the real elapsed time
    /// and the running effect by the capped animation step.
    pub fn advance_step(&mut self, step: FrameStep) -> Tick {
        let mut tick = Tick::default();
        let elapsed_ms = step.elapsed.max(0.0) * 1000.0;
        self.now_ms += elapsed_ms;

        self.toggle_elapsed_ms += elapsed_ms;
        if self.toggle_elapsed_ms >= self.timings.toggle_ms {
            self.toggle_elapsed_ms = 0.0;
            tick.toggle_due = true;
        }

        if let Some(effect) = self.active.as_mut() {
            effect.update(step.dt.max(0.0));
            tick.cues.extend(effect.take_cue());
            if !effect.is_active() {
                self.retire(&mut tick);
            }
        }

        while self.queue.first().is_some_and(|e| e.fire_at_ms <= self.now_ms) {
            let event = self.queue.remove(0);
            if self.active.is_none() {
                self.spawn(event.kind, &mut tick);
            } else {
                log::debug!(
                    "{} due at {:.0}ms skipped, {} still running",
                    event.kind,
                    event.fire_at_ms,
                    self.active.as_ref().map_or("nothing", |e| e.kind().name())
                );
                tick.skipped.push(event.kind);
            }
            let delay = self.draw_delay(event.kind);
            self.schedule(event.kind, self.now_ms + delay);
        }

        tick
    }

    fn spawn(&mut self, kind: EventType, tick: &mut Tick) {
        let duration = self.timings.timing(kind).duration_ms;
        let effect = Effect::spawn(kind, duration, &mut self.rng);
        log::info!("{kind} at {:.1}s for {:.1}s", self.now_ms / 1000.0, duration / 1000.0);
        tick.cues.extend(effect.spawn_cue());
        tick.spawned = Some(kind);
        self.active = Some(effect);
    }

    fn retire(&mut self, tick: &mut Tick) {
        if let Some(effect) = self.active.take() {
            log::debug!("{} finished after {:.0}ms", effect.kind(), effect.lifetime().elapsed_ms());
            tick.cues.extend(effect.retire_cue());
            tick.retired = Some(effect.kind());
        }
    }

    /// Start `kind` right away, replacing whatever is running. Used for
    /// demos; the pending queue is left alone.
    pub fn trigger(&mut self, kind: EventType) -> Tick {
        let mut tick = Tick::default();
        self.retire(&mut tick);
        self.spawn(kind, &mut tick);
        tick
    }

    pub fn render_active_effect<S: Surface>(&self, s: &mut S, layout: &Layout) {
        if let Some(effect) = &self.active {
            effect.render(s, layout);
        }
    }

    pub fn active_effect(&self) -> Option<&Effect> {
        self.active.as_ref()
    }

    /// Pending events, soonest first.
    pub fn pending(&self) -> &[ScheduledEvent] {
        &self.queue
    }

    /// Simulated milliseconds since construction.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}
