//! Night sky gradient, twinkling stars and the distant skyline.

use noise::{NoiseFn, Perlin};
use rand::RngExt;
use rand::rngs::StdRng;

use super::layout::Layout;
use super::palette::{CITYSCAPE, LIGHT_WARM, SKY_HORIZON, SKY_MID, SKY_TOP, TV_GLOW, WHITE};
use crate::render::{Gradient, Rect, Rgba, Surface};

/// One star every this many reference pixels of width.
const STAR_SPACING: f64 = 20.0;
const MAX_STARS: usize = 400;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub opacity: f64,
    /// Twinkle speed; steady stars have none.
    pub twinkle: Option<f64>,
}

struct Tower {
    x: f64,
    w: f64,
    h: f64,
    /// Lit specks, relative to the tower's top-left.
    windows: Vec<(f64, f64, Rgba)>,
}

pub struct Sky {
    stars: Vec<Star>,
    towers: Vec<Tower>,
    noise: Perlin,
    time: f64,
}

impl Sky {
    pub fn generate(layout: &Layout, rng: &mut StdRng) -> Self {
        let u = layout.unit;
        let count = ((layout.width / (STAR_SPACING * u)) as usize).min(MAX_STARS);
        let stars = (0..count)
            .map(|_| Star {
                x: rng.random_range(0.0..layout.width),
                y: rng.random_range(0.0..layout.height * 0.6),
                size: rng.random_range(1.0..3.0) * u,
                opacity: rng.random_range(0.3..1.0),
                twinkle: rng.random_bool(0.2).then(|| rng.random_range(0.5..2.0)),
            })
            .collect();

        let mut towers = Vec::new();
        let mut x = 0.0;
        while x < layout.width {
            let w = rng.random_range(50.0..200.0) * u;
            let h = rng.random_range(100.0..300.0) * u;
            let specks = ((w / (20.0 * u)).floor() * (h / (30.0 * u)).floor()) as usize;
            let windows = (0..specks)
                .map(|_| {
                    let color = if rng.random_bool(0.7) { LIGHT_WARM } else { TV_GLOW };
                    (rng.random_range(5.0 * u..w - 7.0 * u), rng.random_range(10.0 * u..h - 12.0 * u), color)
                })
                .collect();
            towers.push(Tower { x, w, h, windows });
            // Neighbours overlap slightly.
            x += w - rng.random_range(0.0..30.0) * u;
        }

        Sky { stars, towers, noise: Perlin::new(rng.random_range(0..u32::MAX)), time: 0.0 }
    }

    pub fn update(&mut self, dt: f64) {
        self.time += dt;
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn tower_count(&self) -> usize {
        self.towers.len()
    }

    /// Current brightness of star `i`.
    pub fn star_alpha(&self, i: usize) -> f64 {
        let star = &self.stars[i];
        match star.twinkle {
            Some(speed) => {
                let n = self.noise.get([i as f64 * 1.37, self.time * speed]);
                (0.65 + 0.35 * n * 2.0).clamp(0.3, 1.0)
            }
            None => star.opacity,
        }
    }

    pub fn render_sky<S: Surface>(&self, s: &mut S, layout: &Layout) {
        let gradient = Gradient::linear(0.0, 0.0, 0.0, layout.height)
            .stop(0.0, SKY_TOP)
            .stop(0.5, SKY_MID)
            .stop(1.0, SKY_HORIZON);
        s.fill_rect(Rect::new(0.0, 0.0, layout.width, layout.height), gradient);

        for (i, star) in self.stars.iter().enumerate() {
            s.fill_circle(star.x, star.y, star.size, WHITE.with_alpha(self.star_alpha(i)));
        }
    }

    pub fn render_skyline<S: Surface>(&self, s: &mut S, layout: &Layout) {
        let speck = 2.0 * layout.unit;
        for t in &self.towers {
            let top = layout.height - t.h;
            s.fill_rect(Rect::new(t.x, top, t.w, t.h), CITYSCAPE);
            for &(wx, wy, color) in &t.windows {
                s.fill_rect(Rect::new(t.x + wx, top + wy, speck, speck), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_star_count_follows_width() {
        let mut rng = StdRng::seed_from_u64(0);
        let sky = Sky::generate(&Layout::compute(1600.0, 900.0), &mut rng);
        assert_eq!(sky.stars().len(), 80);
        assert!(sky.stars().iter().all(|s| s.y < 900.0 * 0.6));
    }

    #[test]
    fn test_skyline_spans_the_width() {
        let mut rng = StdRng::seed_from_u64(1);
        let layout = Layout::compute(1280.0, 720.0);
        let sky = Sky::generate(&layout, &mut rng);
        let last = sky.towers.last().unwrap();
        assert!(last.x + last.w >= layout.width);
        assert!(sky.tower_count() >= 1280 / 160);
    }

    #[test]
    fn test_twinkle_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sky = Sky::generate(&Layout::compute(1920.0, 1080.0), &mut rng);
        for _ in 0..100 {
            sky.update(0.1);
            for i in 0..sky.stars().len() {
                let a = sky.star_alpha(i);
                assert!((0.3..=1.0).contains(&a));
            }
        }
    }
}
