//! Rare-event timing table and the frame clock.

use std::fmt;
use std::time::Instant;

/// Period of the window-toggle decision, independent of the rare events.
pub const WINDOW_TOGGLE_MS: f64 = 15_000.0;

/// Longest frame step fed to effects, fades and vignettes. A suspended
/// terminal should not fast-forward a whole effect in one frame. The event
/// clock still sees the full elapsed time.
pub const MAX_FRAME_DT: f64 = 0.25;

/// Upper bound for any interval or duration, one day in ms.
pub const MAX_TIMING_MS: f64 = 86_400_000.0;

/// The rare, screen-wide atmospheric events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum EventType {
    Ufo,
    Police,
    ShootingStar,
    Helicopter,
    Lightning,
    Airplane,
}

impl EventType {
    /// Every event type, in scheduling order.
    pub const ALL: [EventType; 6] = [
        EventType::Ufo,
        EventType::Police,
        EventType::ShootingStar,
        EventType::Helicopter,
        EventType::Lightning,
        EventType::Airplane,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            EventType::Ufo => "ufo",
            EventType::Police => "police",
            EventType::ShootingStar => "shooting-star",
            EventType::Helicopter => "helicopter",
            EventType::Lightning => "lightning",
            EventType::Airplane => "airplane",
        }
    }

    pub fn from_name(name: &str) -> Option<EventType> {
        EventType::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            EventType::Ufo => "Flying saucer crossing the upper sky with a pulsing beam",
            EventType::Police => "Police car passing below with red/blue flashers",
            EventType::ShootingStar => "Shooting star with a fading trail",
            EventType::Helicopter => "Helicopter sweeping a spotlight over the facade",
            EventType::Lightning => "Lightning flash and bolt, thunder follows",
            EventType::Airplane => "Airliner crossing with blinking navigation lights",
        }
    }

    /// Shipped interval and duration for this event type.
    pub fn default_timing(self) -> EventTiming {
        match self {
            EventType::Ufo => EventTiming::new(45_000.0, 90_000.0, 10_000.0),
            EventType::Police => EventTiming::new(60_000.0, 120_000.0, 5_000.0),
            EventType::ShootingStar => EventTiming::new(90_000.0, 180_000.0, 1_500.0),
            EventType::Helicopter => EventTiming::new(120_000.0, 240_000.0, 12_000.0),
            EventType::Lightning => EventTiming::new(90_000.0, 180_000.0, 2_500.0),
            EventType::Airplane => EventTiming::new(60_000.0, 120_000.0, 18_000.0),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recurrence interval bounds and run length of one event type, in ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventTiming {
    pub min_ms: f64,
    pub max_ms: f64,
    pub duration_ms: f64,
}

impl EventTiming {
    /// Bounds are reordered if given backwards and kept within
    /// 1..=[`MAX_TIMING_MS`], so rescheduling always moves strictly into the
    /// future and every effect expires. NaN lands on the lower bound.
    pub fn new(min_ms: f64, max_ms: f64, duration_ms: f64) -> Self {
        let (lo, hi) = (bounded_ms(min_ms), bounded_ms(max_ms));
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        EventTiming { min_ms: lo, max_ms: hi, duration_ms: bounded_ms(duration_ms) }
    }

    /// Build from optional overrides. A missing or non-finite value keeps the
    /// one from `base`.
    pub fn overriding(
        base: EventTiming,
        min_ms: Option<f64>,
        max_ms: Option<f64>,
        duration_ms: Option<f64>,
    ) -> Self {
        let pick = |value: Option<f64>, fallback: f64| value.filter(|v| v.is_finite()).unwrap_or(fallback);
        EventTiming::new(
            pick(min_ms, base.min_ms),
            pick(max_ms, base.max_ms),
            pick(duration_ms, base.duration_ms),
        )
    }
}

fn bounded_ms(ms: f64) -> f64 {
    ms.max(1.0).min(MAX_TIMING_MS)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot {
    timing: EventTiming,
    enabled: bool,
}

/// Per-event timing, with the ability to disable event types.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingTable {
    slots: [Slot; 6],
    pub toggle_ms: f64,
}

impl Default for TimingTable {
    fn default() -> Self {
        TimingTable {
            slots: EventType::ALL.map(|kind| Slot { timing: kind.default_timing(), enabled: true }),
            toggle_ms: WINDOW_TOGGLE_MS,
        }
    }
}

impl TimingTable {
    /// A table where only `kind` recurs, with the given timing.
    pub fn only(kind: EventType, timing: EventTiming) -> Self {
        let mut table = TimingTable::default();
        for other in EventType::ALL {
            table.set_enabled(other, other == kind);
        }
        table.set(kind, timing);
        table
    }

    pub fn timing(&self, kind: EventType) -> EventTiming {
        self.slots[kind.index()].timing
    }

    pub fn is_enabled(&self, kind: EventType) -> bool {
        self.slots[kind.index()].enabled
    }

    pub fn set(&mut self, kind: EventType, timing: EventTiming) {
        self.slots[kind.index()].timing = timing;
    }

    pub fn set_enabled(&mut self, kind: EventType, enabled: bool) {
        self.slots[kind.index()].enabled = enabled;
    }

    /// Enabled event types in scheduling order.
    pub fn enabled(&self) -> impl Iterator<Item = (EventType, EventTiming)> + '_ {
        EventType::ALL
            .into_iter()
            .filter(|k| self.is_enabled(*k))
            .map(|k| (k, self.timing(k)))
    }
}

/// Time covered by one frame, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Real time since the previous frame. Drives the event clock.
    pub elapsed: f64,
    /// The same, capped at [`MAX_FRAME_DT`]. Drives animation.
    pub dt: f64,
}

impl FrameStep {
    /// A step whose animation and event clock agree (headless runs, tests).
    pub fn fixed(dt: f64) -> Self {
        let dt = dt.max(0.0);
        FrameStep { elapsed: dt, dt }
    }

    pub fn from_elapsed(elapsed: f64) -> Self {
        let elapsed = elapsed.max(0.0);
        FrameStep { elapsed, dt: elapsed.min(MAX_FRAME_DT) }
    }
}

/// Real monotonic frame clock driving the simulation.
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        FrameClock { start: now, last: now }
    }

    /// Time since the previous tick.
    pub fn tick(&mut self) -> FrameStep {
        let now = Instant::now();
        let step = FrameStep::from_elapsed(now.duration_since(self.last).as_secs_f64());
        self.last = now;
        if step.elapsed > step.dt {
            log::debug!(
                "frame took {:.0}ms, capping animation step to {:.0}ms",
                step.elapsed * 1000.0,
                step.dt * 1000.0
            );
        }
        step
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_reorders_and_floors_bounds() {
        let t = EventTiming::new(500.0, 0.0, 0.0);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, 500.0);
        assert_eq!(t.duration_ms, 1.0);
    }

    #[test]
    fn test_timing_bounds_infinite_and_nan() {
        let t = EventTiming::new(f64::NAN, f64::INFINITY, f64::INFINITY);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, MAX_TIMING_MS);
        assert_eq!(t.duration_ms, MAX_TIMING_MS);
        assert!((t.max_ms - t.min_ms).is_finite());
    }

    #[test]
    fn test_overriding_keeps_base_for_non_finite() {
        let base = EventType::Ufo.default_timing();
        let t = EventTiming::overriding(base, Some(f64::NAN), Some(f64::INFINITY), Some(2_000.0));
        assert_eq!(t.min_ms, base.min_ms);
        assert_eq!(t.max_ms, base.max_ms);
        assert_eq!(t.duration_ms, 2_000.0);
    }

    #[test]
    fn test_frame_step_caps_animation_only() {
        let step = FrameStep::from_elapsed(2.0);
        assert_eq!(step.elapsed, 2.0);
        assert_eq!(step.dt, MAX_FRAME_DT);
        assert_eq!(FrameStep::from_elapsed(0.1), FrameStep::fixed(0.1));
    }

    #[test]
    fn test_only_disables_other_events() {
        let table = TimingTable::only(EventType::Ufo, EventTiming::new(1000.0, 1000.0, 10_000.0));
        let enabled: Vec<_> = table.enabled().map(|(k, _)| k).collect();
        assert_eq!(enabled, vec![EventType::Ufo]);
        assert_eq!(table.timing(EventType::Ufo).min_ms, 1000.0);
    }

    #[test]
    fn test_default_table_matches_shipped_timings() {
        let table = TimingTable::default();
        assert_eq!(table.enabled().count(), 6);
        assert_eq!(table.timing(EventType::Police).duration_ms, 5_000.0);
        assert_eq!(table.timing(EventType::Helicopter).max_ms, 240_000.0);
        assert_eq!(table.toggle_ms, WINDOW_TOGGLE_MS);
    }

    #[test]
    fn test_names_round_trip() {
        for k in EventType::ALL {
            assert_eq!(EventType::from_name(k.name()), Some(k));
        }
        assert_eq!(EventType::from_name("zeppelin"), None);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, k) in EventType::ALL.iter().enumerate() {
            assert_eq!(k.index(), i);
        }
    }
}
