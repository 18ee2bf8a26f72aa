//! Immediate-mode 2D drawing surface.
//!
//! Everything in the scene paints through [`Surface`]: the terminal [`Canvas`]
//! rasterizes the calls, tests record them. Coordinates are surface pixels
//! with y pointing down, angles are radians measured clockwise from +x.
//!
//! [`Canvas`]: super::Canvas

use std::f64::consts::TAU;

/// An sRGB colour with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    /// `0xRRGGBB`, fully opaque.
    pub const fn hex(v: u32) -> Self {
        Rgba {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
            a: 1.0,
        }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Rgba { a: a.clamp(0.0, 1.0), ..self }
    }

    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Shrink by `d` on every side. Never produces a negative size.
    pub fn inset(&self, d: f64) -> Rect {
        let d = d.min(self.w / 2.0).min(self.h / 2.0);
        Rect::new(self.x + d, self.y + d, self.w - 2.0 * d, self.h - 2.0 * d)
    }

    /// Point at fractional position (`fx`, `fy`) inside the rectangle.
    #[inline]
    pub fn at(&self, fx: f64, fy: f64) -> (f64, f64) {
        (self.x + self.w * fx, self.y + self.h * fy)
    }

    /// Size of one reference pixel. Window scenes were tuned for cells about
    /// 80 pixels tall; absolute sizes inside a vignette scale through this.
    #[inline]
    pub fn unit(&self) -> f64 {
        self.h / 80.0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// A colour stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GradientShape {
    Linear { x0: f64, y0: f64, x1: f64, y1: f64 },
    Radial { cx: f64, cy: f64, r0: f64, r1: f64 },
}

/// Linear or radial gradient, defined in the coordinates of the shape it fills.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    shape: GradientShape,
    stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Gradient {
            shape: GradientShape::Linear { x0, y0, x1, y1 },
            stops: Vec::with_capacity(3),
        }
    }

    pub fn radial(cx: f64, cy: f64, r0: f64, r1: f64) -> Self {
        Gradient {
            shape: GradientShape::Radial { cx, cy, r0, r1 },
            stops: Vec::with_capacity(2),
        }
    }

    /// Add a stop. Stops must be added in increasing `t`.
    pub fn stop(mut self, t: f64, color: Rgba) -> Self {
        self.stops.push(ColorStop { t, color });
        self
    }

    /// Sample the stop ramp at parameter `t` (clamped to 0.0..=1.0).
    pub fn sample(&self, t: f64) -> Rgba {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba::rgba(0, 0, 0, 0.0);
        };
        let t = t.clamp(0.0, 1.0);
        if t <= first.t {
            return first.color;
        }
        if t >= last.t {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.t && t <= b.t {
                let span = b.t - a.t;
                let frac = if span > 0.0 { (t - a.t) / span } else { 0.0 };
                return a.color.lerp(b.color, frac);
            }
        }
        last.color
    }

    /// Colour at a point in the gradient's coordinate space.
    pub fn color_at(&self, x: f64, y: f64) -> Rgba {
        let t = match self.shape {
            GradientShape::Linear { x0, y0, x1, y1 } => {
                let (dx, dy) = (x1 - x0, y1 - y0);
                let len2 = dx * dx + dy * dy;
                if len2 <= f64::EPSILON {
                    0.0
                } else {
                    ((x - x0) * dx + (y - y0) * dy) / len2
                }
            }
            GradientShape::Radial { cx, cy, r0, r1 } => {
                let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                if (r1 - r0).abs() <= f64::EPSILON {
                    if dist <= r0 { 0.0 } else { 1.0 }
                } else {
                    (dist - r0) / (r1 - r0)
                }
            }
        };
        self.sample(t)
    }
}

/// What a filled shape is painted with.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Gradient(Gradient),
}

impl Paint {
    #[inline]
    pub fn color_at(&self, x: f64, y: f64) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Gradient(g) => g.color_at(x, y),
        }
    }
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

impl From<Gradient> for Paint {
    fn from(g: Gradient) -> Self {
        Paint::Gradient(g)
    }
}

/// 2D affine transform: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub fn translation(dx: f64, dy: f64) -> Self {
        Affine { e: dx, f: dy, ..Self::IDENTITY }
    }

    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Affine { a: c, b: s, c: -s, d: c, e: 0.0, f: 0.0 }
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Affine { a: sx, d: sy, ..Self::IDENTITY }
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn then(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    pub fn inverse(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < 1e-12 {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    /// Average linear scale, used to keep hairlines at least one pixel wide.
    pub fn scale_factor(&self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

/// Immediate-mode drawing target.
///
/// Save/restore covers the transform, the global alpha and the clip region.
pub trait Surface {
    /// Surface size in pixels.
    fn size(&self) -> (f64, f64);

    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    fn alpha(&self) -> f64;
    /// Global alpha applied to every following draw call.
    fn set_alpha(&mut self, alpha: f64);

    /// Intersect the clip region with `rect` (in current coordinates).
    fn clip_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, paint: impl Into<Paint>);
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f64);
    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, rotation: f64, paint: impl Into<Paint>);
    fn fill_polygon(&mut self, points: &[(f64, f64)], paint: impl Into<Paint>);
    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: Rgba, width: f64);
    /// Circular arc from `start` to `end`, swept the short way round when
    /// `end < start`.
    fn stroke_arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, color: Rgba, width: f64);

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, paint: impl Into<Paint>) {
        self.fill_ellipse(cx, cy, r, r, 0.0, paint);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Rgba, width: f64) {
        self.stroke_polyline(&[(x1, y1), (x2, y2)], color, width);
    }
}

/// Flatten a quadratic Bézier into `steps` segments.
pub fn quad_curve(p0: (f64, f64), ctrl: (f64, f64), p1: (f64, f64), steps: usize) -> Vec<(f64, f64)> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let u = 1.0 - t;
            (
                u * u * p0.0 + 2.0 * u * t * ctrl.0 + t * t * p1.0,
                u * u * p0.1 + 2.0 * u * t * ctrl.1 + t * t * p1.1,
            )
        })
        .collect()
}

/// Normalise an arc sweep so that `end >= start`.
pub fn arc_sweep(start: f64, end: f64) -> (f64, f64) {
    if end >= start { (start, end) } else { (end, start) }
}

/// Whether `angle` lies on the arc from `start` to `end` (with `end >= start`).
pub fn angle_on_arc(angle: f64, start: f64, end: f64) -> bool {
    if end - start >= TAU {
        return true;
    }
    (angle - start).rem_euclid(TAU) <= end - start
}
