//! Window grid: lit/dark toggling under a floor, cross-fades, and the
//! per-cell vignette.

use rand::RngExt;
use rand::rngs::StdRng;

use crate::render::{Gradient, Rect, Rgba, Surface};
use crate::scene::palette::{BUILDING_FRAME, BUILDING_SHADOW, LIGHT_COOL, LIGHT_PRIMARY, LIGHT_WARM, TV_GLOW};
use crate::timing::EventType;
use crate::vignettes::{Vignette, VignetteKind};

/// Opacity of a fully dark window.
pub const DARK_LEVEL: f64 = 0.1;
/// Dark windows above this opacity still show their occupant.
pub const VISIBLE_OPACITY: f64 = 0.3;
/// Windows lit when the facade is built.
pub const INITIALLY_LIT: usize = 20;

/// Tunables of the toggle decision and the fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingParams {
    pub min_lit: usize,
    pub flip_probability: f64,
    /// Fade progress per second.
    pub fade_rate: f64,
}

impl Default for LightingParams {
    fn default() -> Self {
        LightingParams { min_lit: 15, flip_probability: 0.2, fade_rate: 2.0 }
    }
}

impl LightingParams {
    pub fn new(min_lit: usize, flip_probability: f64, fade_rate: f64) -> Self {
        LightingParams {
            min_lit,
            flip_probability: if flip_probability.is_finite() { flip_probability.clamp(0.0, 1.0) } else { 0.2 },
            fade_rate: if fade_rate > 0.0 { fade_rate } else { 2.0 },
        }
    }
}

/// Quadratic ease-in-out on 0..=1.
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 { 2.0 * t * t } else { 1.0 - (-2.0 * t + 2.0).powi(2) / 2.0 }
}

/// Opacity for a window that is (or is becoming) `lit`, `fade` through its
/// transition.
pub fn opacity(lit: bool, fade: f64) -> f64 {
    let (from, to) = if lit { (DARK_LEVEL, 1.0) } else { (1.0, DARK_LEVEL) };
    from + (to - from) * ease_in_out_quad(fade)
}

pub struct WindowCell {
    pub rect: Rect,
    lit: bool,
    fade: f64,
    light: Rgba,
    vignette: Vignette,
}

impl WindowCell {
    pub fn new(rect: Rect, lit: bool, light: Rgba, vignette: Vignette) -> Self {
        WindowCell { rect, lit, fade: 1.0, light, vignette }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn fade_progress(&self) -> f64 {
        self.fade
    }

    pub fn opacity(&self) -> f64 {
        opacity(self.lit, self.fade)
    }

    /// Whether the occupant is updated and painted this frame.
    pub fn is_visible(&self) -> bool {
        self.lit || self.opacity() > VISIBLE_OPACITY
    }

    pub fn light_color(&self) -> Rgba {
        self.light
    }

    pub fn vignette(&self) -> &Vignette {
        &self.vignette
    }

    fn set_lit(&mut self, lit: bool) {
        self.lit = lit;
        self.fade = 0.0;
    }

    fn advance_fade(&mut self, step: f64) {
        if self.fade < 1.0 {
            self.fade += step;
            // Steps that sum to exactly one transition land on 1.0.
            if self.fade >= 1.0 - 1e-9 {
                self.fade = 1.0;
            }
        }
    }

    fn render<S: Surface>(&self, s: &mut S, unit: f64) {
        let r = self.rect;
        let a = self.opacity();
        let (cx, cy) = r.center();

        s.stroke_rect(r, BUILDING_FRAME, 3.0 * unit);

        if self.lit && a > 0.5 {
            let glow = Gradient::radial(cx, cy, 0.0, r.w * 0.8)
                .stop(0.0, LIGHT_PRIMARY.with_alpha(a * 0.3))
                .stop(1.0, LIGHT_PRIMARY.with_alpha(0.0));
            s.fill_rect(Rect::new(r.x - r.w * 0.3, r.y - r.h * 0.3, r.w * 1.6, r.h * 1.6), glow);
        }

        let base = s.alpha();
        if self.lit {
            let light = Gradient::radial(cx, cy, 0.0, r.w * 0.7).stop(0.0, self.light).stop(1.0, LIGHT_WARM);
            s.set_alpha(base * a);
            s.fill_rect(r, light);
        } else {
            s.set_alpha(base * (a * 0.5 + 0.5));
            s.fill_rect(r, BUILDING_SHADOW);
        }
        s.set_alpha(base);

        if self.is_visible() {
            let inner = r.inset(5.0 * unit);
            s.save();
            s.clip_rect(inner);
            s.set_alpha(base * a);
            self.vignette.render(s, inner);
            s.restore();
        }
    }
}

/// Owns the window cells. Nothing else mutates them.
pub struct WindowLightingController {
    cells: Vec<WindowCell>,
    params: LightingParams,
    unit: f64,
}

impl WindowLightingController {
    /// One cell per rectangle, scenes assigned in facade order. The first
    /// [`INITIALLY_LIT`] start lit.
    pub fn new(rects: &[Rect], unit: f64, params: LightingParams, rng: &mut StdRng) -> Self {
        let cells = rects
            .iter()
            .zip(VignetteKind::ALL.iter().cycle())
            .enumerate()
            .map(|(i, (&rect, &kind))| {
                let light = match i {
                    1 | 18 => TV_GLOW,
                    _ => [LIGHT_PRIMARY, LIGHT_WARM, LIGHT_COOL][rng.random_range(0..3)],
                };
                WindowCell::new(rect, i < INITIALLY_LIT, light, Vignette::new(kind, rng))
            })
            .collect();
        WindowLightingController { cells, params, unit }
    }

    pub fn cells(&self) -> &[WindowCell] {
        &self.cells
    }

    pub fn params(&self) -> LightingParams {
        self.params
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|c| c.lit).count()
    }

    /// One toggle decision. Returns the index of the cell that changed.
    pub fn toggle(&mut self, rng: &mut StdRng) -> Option<usize> {
        if self.cells.is_empty() {
            return None;
        }
        let lit = self.lit_count();
        let index = if lit <= self.params.min_lit {
            let dark: Vec<usize> = (0..self.cells.len()).filter(|&i| !self.cells[i].lit).collect();
            if dark.is_empty() {
                return None;
            }
            let i = dark[rng.random_range(0..dark.len())];
            self.cells[i].set_lit(true);
            i
        } else if rng.random_bool(self.params.flip_probability) {
            let i = rng.random_range(0..self.cells.len());
            let now_lit = !self.cells[i].lit;
            self.cells[i].set_lit(now_lit);
            i
        } else {
            return None;
        };
        log::debug!(
            "window {index} ({}) turned {}, {} lit",
            self.cells[index].vignette.kind().name(),
            if self.cells[index].lit { "on" } else { "off" },
            self.lit_count()
        );
        Some(index)
    }

    /// Advance fades, then the occupants of visible windows.
    pub fn advance(&mut self, dt: f64, rng: &mut StdRng) {
        let step = dt.max(0.0) * self.params.fade_rate;
        for cell in &mut self.cells {
            cell.advance_fade(step);
            if cell.is_visible() {
                cell.vignette.update(dt, rng);
            }
        }
    }

    /// Forward a spawned event to every occupant.
    pub fn notify(&mut self, event: EventType) {
        for cell in &mut self.cells {
            cell.vignette.notify(event);
        }
    }

    pub fn render<S: Surface>(&self, s: &mut S) {
        for cell in &self.cells {
            cell.render(s, self.unit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{Op, RecordingSurface};
    use crate::scene::Layout;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn facade_cells(seed: u64) -> (WindowLightingController, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let layout = Layout::compute(1280.0, 720.0);
        let c = WindowLightingController::new(&layout.cells, layout.unit, LightingParams::default(), &mut rng);
        (c, rng)
    }

    #[test]
    fn test_initial_state() {
        let (c, _) = facade_cells(0);
        assert_eq!(c.cells().len(), 24);
        assert_eq!(c.lit_count(), 20);
        assert!(c.cells().iter().all(|cell| cell.fade_progress() == 1.0));
        assert_eq!(c.cells()[1].light_color(), TV_GLOW);
        assert_eq!(c.cells()[18].light_color(), TV_GLOW);
        assert_eq!(c.cells()[21].vignette().kind(), VignetteKind::Telescope);
    }

    #[test]
    fn test_one_flip_moves_lit_count_by_at_most_one() {
        let params = LightingParams::new(15, 1.0, 2.0);
        let mut rng = StdRng::seed_from_u64(3);
        let layout = Layout::compute(1280.0, 720.0);
        let mut c = WindowLightingController::new(&layout.cells, layout.unit, params, &mut rng);
        let changed = c.toggle(&mut rng).expect("flip probability 1 always flips");
        assert!((19..=21).contains(&c.lit_count()));
        assert_eq!(c.cells()[changed].fade_progress(), 0.0);
    }

    #[test]
    fn test_at_floor_a_dark_window_lights() {
        let (mut c, mut rng) = facade_cells(4);
        for cell in c.cells.iter_mut().skip(15) {
            cell.lit = false;
        }
        assert_eq!(c.lit_count(), 15);
        let i = c.toggle(&mut rng).unwrap();
        assert!(i >= 15);
        assert_eq!(c.lit_count(), 16);
    }

    #[test]
    fn test_all_lit_at_floor_is_a_no_op() {
        let params = LightingParams::new(30, 0.2, 2.0);
        let mut rng = StdRng::seed_from_u64(5);
        let layout = Layout::compute(1280.0, 720.0);
        let mut c = WindowLightingController::new(&layout.cells, layout.unit, params, &mut rng);
        for cell in &mut c.cells {
            cell.lit = true;
        }
        assert_eq!(c.toggle(&mut rng), None);
    }

    #[test]
    fn test_fade_completes_in_half_a_second() {
        let (mut c, mut rng) = facade_cells(6);
        c.cells[0].set_lit(false);
        for _ in 0..5 {
            c.advance(0.1, &mut rng);
        }
        assert_eq!(c.cells()[0].fade_progress(), 1.0);
        assert!((c.cells()[0].opacity() - DARK_LEVEL).abs() < 1e-12);
        assert!(!c.cells()[0].is_visible());
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert_eq!(opacity(true, 0.0), DARK_LEVEL);
        assert_eq!(opacity(false, 0.0), 1.0);
    }

    #[test]
    fn test_ufo_excites_the_telescope() {
        let (mut c, _) = facade_cells(7);
        c.notify(EventType::Ufo);
        assert!(matches!(c.cells()[21].vignette(), Vignette::Telescope(t) if t.is_excited()));
    }

    #[test]
    fn test_render_clips_each_visible_occupant() {
        let (c, _) = facade_cells(8);
        let mut s = RecordingSurface::new(1280.0, 720.0);
        c.render(&mut s);
        assert_eq!(s.depth(), 0);
        let clips = s.count(|call| matches!(call.op, Op::Clip(_)));
        assert_eq!(clips, c.cells().iter().filter(|cell| cell.is_visible()).count());
        assert_eq!(clips, 20);
        assert_eq!(s.count(|call| call.depth == 0 && matches!(call.op, Op::StrokeRect(_))), 24);
    }

    proptest! {
        #[test]
        fn prop_lit_floor_holds(seed in any::<u64>(), ticks in 1usize..300) {
            let (mut c, mut rng) = facade_cells(seed);
            for _ in 0..ticks {
                c.toggle(&mut rng);
                prop_assert!(c.lit_count() >= 15);
            }
        }

        #[test]
        fn prop_fade_ends_after_half_a_second(steps in proptest::collection::vec(1u32..50, 1..40)) {
            let (mut c, mut rng) = facade_cells(9);
            c.cells[2].set_lit(false);
            let total: u32 = steps.iter().sum();
            let mut last = c.cells()[2].opacity();
            for n in &steps {
                // Each step is n/total of half a second.
                c.advance(0.5 * *n as f64 / total as f64, &mut rng);
                let now = c.cells()[2].opacity();
                prop_assert!(now <= last + 1e-12);
                last = now;
            }
            prop_assert_eq!(c.cells()[2].fade_progress(), 1.0);
        }
    }
}
