//! Surface test double that records draw calls instead of rasterizing.

use super::surface::{Paint, Rect, Rgba, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    FillRect(Rect),
    StrokeRect(Rect),
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    Polygon(usize),
    Polyline(usize),
    Arc { cx: f64, cy: f64, r: f64 },
    Clip(Rect),
}

/// One recorded draw call with the state it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub op: Op,
    pub alpha: f64,
    /// Solid colour; `None` for gradients and clips.
    pub color: Option<Rgba>,
    pub depth: usize,
}

pub struct RecordingSurface {
    width: f64,
    height: f64,
    alpha: f64,
    alphas: Vec<f64>,
    pub calls: Vec<Call>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        RecordingSurface { width, height, alpha: 1.0, alphas: Vec::new(), calls: Vec::new() }
    }

    /// Save/restore nesting currently open.
    pub fn depth(&self) -> usize {
        self.alphas.len()
    }

    fn push(&mut self, op: Op, color: Option<Rgba>) {
        self.calls.push(Call { op, alpha: self.alpha, color, depth: self.alphas.len() });
    }

    fn solid(paint: &Paint) -> Option<Rgba> {
        match paint {
            Paint::Solid(c) => Some(*c),
            Paint::Gradient(_) => None,
        }
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Whether any call used exactly `color`.
    pub fn used_color(&self, color: Rgba) -> bool {
        self.calls.iter().any(|c| c.color == Some(color))
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn save(&mut self) {
        self.alphas.push(self.alpha);
    }

    fn restore(&mut self) {
        if let Some(a) = self.alphas.pop() {
            self.alpha = a;
        }
    }

    fn translate(&mut self, _dx: f64, _dy: f64) {}

    fn rotate(&mut self, _angle: f64) {}

    fn scale(&mut self, _sx: f64, _sy: f64) {}

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.push(Op::Clip(rect), None);
    }

    fn fill_rect(&mut self, rect: Rect, paint: impl Into<Paint>) {
        let paint = paint.into();
        self.push(Op::FillRect(rect), Self::solid(&paint));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, _width: f64) {
        self.push(Op::StrokeRect(rect), Some(color));
    }

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, _rotation: f64, paint: impl Into<Paint>) {
        let paint = paint.into();
        self.push(Op::Ellipse { cx, cy, rx, ry }, Self::solid(&paint));
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], paint: impl Into<Paint>) {
        let paint = paint.into();
        self.push(Op::Polygon(points.len()), Self::solid(&paint));
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: Rgba, _width: f64) {
        self.push(Op::Polyline(points.len()), Some(color));
    }

    fn stroke_arc(&mut self, cx: f64, cy: f64, r: f64, _start: f64, _end: f64, color: Rgba, _width: f64) {
        self.push(Op::Arc { cx, cy, r }, Some(color));
    }
}
