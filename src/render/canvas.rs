use super::surface::{Affine, Paint, Rect, Rgba, Surface, angle_on_arc, arc_sweep};
use crossterm::style::Color;

/// How canvas pixels become terminal characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderMode {
    /// Half-block characters ▀ (1x2 pixels per cell, full colour)
    HalfBlock,
    /// Plain ASCII characters with luminance mapping
    Ascii,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// No color, monochrome
    Mono,
    /// ANSI 16 colors
    Ansi16,
    /// 256-color palette
    Ansi256,
    /// 24-bit true color (RGB)
    TrueColor,
}

/// Device-space box used for clipping and shape bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Bounds {
    fn of_rect(r: Rect) -> Self {
        Bounds { x0: r.x, y0: r.y, x1: r.right(), y1: r.bottom() }
    }

    fn around(points: &[(f64, f64)], pad: f64) -> Self {
        let mut b = Bounds {
            x0: f64::INFINITY,
            y0: f64::INFINITY,
            x1: f64::NEG_INFINITY,
            y1: f64::NEG_INFINITY,
        };
        for &(x, y) in points {
            b.x0 = b.x0.min(x - pad);
            b.y0 = b.y0.min(y - pad);
            b.x1 = b.x1.max(x + pad);
            b.y1 = b.y1.max(y + pad);
        }
        b
    }

    fn transformed(&self, t: &Affine) -> Self {
        let corners = [
            t.apply(self.x0, self.y0),
            t.apply(self.x1, self.y0),
            t.apply(self.x0, self.y1),
            t.apply(self.x1, self.y1),
        ];
        Bounds::around(&corners, 0.0)
    }

    fn intersect(&self, other: &Bounds) -> Bounds {
        Bounds {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }
}

/// Save/restore-able drawing state.
#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Affine,
    alpha: f64,
    clip: Bounds,
}

/// An RGB pixel canvas that rasterizes [`Surface`] calls and gets rendered
/// to terminal characters.
pub struct Canvas {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Pixel colours, row-major
    pub colors: Vec<(u8, u8, u8)>,
    pub render_mode: RenderMode,
    pub color_mode: ColorMode,
    /// Color quantization step (0 = off, 4/8/16 = round RGB to nearest N).
    /// Higher values = fewer unique colors = less output.
    pub color_quant: u8,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Canvas {
    pub fn new(
        term_cols: usize,
        term_rows: usize,
        render_mode: RenderMode,
        color_mode: ColorMode,
    ) -> Self {
        let (px_w, px_h) = match render_mode {
            RenderMode::HalfBlock => (term_cols, term_rows * 2),
            RenderMode::Ascii => (term_cols, term_rows),
        };
        Self::with_pixels(px_w, px_h, render_mode, color_mode)
    }

    /// Canvas of an exact pixel size (headless snapshots).
    pub fn with_pixels(
        width: usize,
        height: usize,
        render_mode: RenderMode,
        color_mode: ColorMode,
    ) -> Self {
        let full = Bounds { x0: 0.0, y0: 0.0, x1: width as f64, y1: height as f64 };
        Canvas {
            width,
            height,
            colors: vec![(0, 0, 0); width * height],
            render_mode,
            color_mode,
            color_quant: 0,
            state: DrawState { transform: Affine::IDENTITY, alpha: 1.0, clip: full },
            stack: Vec::new(),
        }
    }

    /// Reset pixels to black and drop any leftover drawing state.
    pub fn clear(&mut self) {
        self.colors.fill((0, 0, 0));
        self.stack.clear();
        self.state = DrawState {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            clip: self.full_bounds(),
        };
    }

    fn full_bounds(&self) -> Bounds {
        Bounds { x0: 0.0, y0: 0.0, x1: self.width as f64, y1: self.height as f64 }
    }

    /// Colour of a pixel, or `None` out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<(u8, u8, u8)> {
        (x < self.width && y < self.height).then(|| self.colors[y * self.width + x])
    }

    /// Relative luminance (0.0..=1.0) of the pixel at `idx`.
    #[inline]
    pub fn luminance(&self, idx: usize) -> f64 {
        let (r, g, b) = self.colors[idx];
        (0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64) / 255.0
    }

    #[inline]
    fn blend(&mut self, idx: usize, c: Rgba, a: f64) {
        let (dr, dg, db) = self.colors[idx];
        let mix = |d: u8, s: u8| (d as f64 * (1.0 - a) + s as f64 * a).round().clamp(0.0, 255.0) as u8;
        self.colors[idx] = (mix(dr, c.r), mix(dg, c.g), mix(db, c.b));
    }

    /// Paint every pixel whose centre maps (through the inverse transform)
    /// into the shape described by `inside`. `local` bounds the shape in
    /// current coordinates.
    fn cover(&mut self, local: Bounds, paint: &Paint, inside: impl Fn(f64, f64) -> bool) {
        let t = self.state.transform;
        let Some(inv) = t.inverse() else {
            return;
        };
        let dev = local
            .transformed(&t)
            .intersect(&self.state.clip)
            .intersect(&self.full_bounds());
        if dev.x1 <= dev.x0 || dev.y1 <= dev.y0 {
            return;
        }
        let x0 = (dev.x0 - 0.5).ceil().max(0.0) as usize;
        let y0 = (dev.y0 - 0.5).ceil().max(0.0) as usize;
        let x1 = ((dev.x1 - 0.5).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((dev.y1 - 0.5).ceil().max(0.0) as usize).min(self.height);
        let global = self.state.alpha;

        for py in y0..y1 {
            for px in x0..x1 {
                let (lx, ly) = inv.apply(px as f64 + 0.5, py as f64 + 0.5);
                if !inside(lx, ly) {
                    continue;
                }
                let c = paint.color_at(lx, ly);
                let a = (c.a * global).clamp(0.0, 1.0);
                if a <= 0.0 {
                    continue;
                }
                self.blend(py * self.width + px, c, a);
            }
        }
    }

    /// Half stroke width, never thinner than about one device pixel.
    fn half_width(&self, width: f64) -> f64 {
        let scale = self.state.transform.scale_factor().max(1e-9);
        (width / 2.0).max(0.6 / scale)
    }

    /// Render the canvas to a string buffer for output
    pub fn render(&self) -> String {
        match self.render_mode {
            RenderMode::HalfBlock => super::halfblock::render(self),
            RenderMode::Ascii => self.render_ascii(),
        }
    }

    fn render_ascii(&self) -> String {
        const CHARS: &[u8] = b" .:-=+*#%@";
        let mut out = String::with_capacity(self.width * self.height * 10);
        let use_color = self.color_mode != ColorMode::Mono;
        let mut last_fg = String::new();

        for row in 0..self.height {
            for col in 0..self.width {
                let idx = row * self.width + col;
                // Stretch the ramp: the night scene is mostly dark.
                let v = (self.luminance(idx) * 1.6).clamp(0.0, 1.0);
                let ch = CHARS[(v * (CHARS.len() - 1) as f64) as usize] as char;

                if use_color {
                    let (r, g, b) = self.colors[idx];
                    let fg = color_to_fg(self.map_color(r, g, b));
                    if fg != last_fg {
                        out.push_str("\x1b[");
                        out.push_str(&fg);
                        out.push('m');
                        last_fg = fg;
                    }
                }
                out.push(ch);
            }
            out.push_str("\x1b[0m\x1b[");
            out.push_str(&(row + 2).to_string());
            out.push_str(";1H");
            last_fg.clear();
        }
        out
    }

    pub fn map_color(&self, r: u8, g: u8, b: u8) -> Color {
        // Apply color quantization if enabled (reduces unique colors for better dedup)
        let (r, g, b) = if self.color_quant > 1 {
            let q = self.color_quant as u16;
            (
                ((r as u16 + q / 2) / q * q).min(255) as u8,
                ((g as u16 + q / 2) / q * q).min(255) as u8,
                ((b as u16 + q / 2) / q * q).min(255) as u8,
            )
        } else {
            (r, g, b)
        };
        match self.color_mode {
            ColorMode::Mono => Color::White,
            ColorMode::TrueColor => Color::Rgb { r, g, b },
            ColorMode::Ansi256 => {
                let idx = 16 + (36 * (r as u16 / 51)) + (6 * (g as u16 / 51)) + (b as u16 / 51);
                Color::AnsiValue(idx as u8)
            }
            ColorMode::Ansi16 => {
                let brightness = (r as u16 + g as u16 + b as u16) / 3;
                if brightness < 40 {
                    Color::Black
                } else if r > g && r > b {
                    if brightness > 160 { Color::Red } else { Color::DarkRed }
                } else if b > r && b > g {
                    if brightness > 160 { Color::Blue } else { Color::DarkBlue }
                } else if g > r && g > b {
                    if brightness > 160 { Color::Green } else { Color::DarkGreen }
                } else if r > 180 && g > 150 && b < 140 {
                    Color::Yellow
                } else if brightness > 180 {
                    Color::White
                } else {
                    Color::Grey
                }
            }
        }
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(s) = self.stack.pop() {
            self.state = s;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform.then(&Affine::translation(dx, dy));
    }

    fn rotate(&mut self, angle: f64) {
        self.state.transform = self.state.transform.then(&Affine::rotation(angle));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform.then(&Affine::scaling(sx, sy));
    }

    fn alpha(&self) -> f64 {
        self.state.alpha
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn clip_rect(&mut self, rect: Rect) {
        let dev = Bounds::of_rect(rect).transformed(&self.state.transform);
        self.state.clip = self.state.clip.intersect(&dev);
    }

    fn fill_rect(&mut self, rect: Rect, paint: impl Into<Paint>) {
        let paint = paint.into();
        self.cover(Bounds::of_rect(rect), &paint, |x, y| rect.contains(x, y));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f64) {
        let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
        self.stroke_polyline(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)], color, width);
    }

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, rotation: f64, paint: impl Into<Paint>) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let paint = paint.into();
        let reach = rx.max(ry);
        let local = Bounds { x0: cx - reach, y0: cy - reach, x1: cx + reach, y1: cy + reach };
        let (s, c) = rotation.sin_cos();
        self.cover(local, &paint, |x, y| {
            let (dx, dy) = (x - cx, y - cy);
            let u = dx * c + dy * s;
            let v = -dx * s + dy * c;
            (u / rx).powi(2) + (v / ry).powi(2) <= 1.0
        });
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], paint: impl Into<Paint>) {
        if points.len() < 3 {
            return;
        }
        let paint = paint.into();
        self.cover(Bounds::around(points, 0.0), &paint, |x, y| point_in_polygon(points, x, y));
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: Rgba, width: f64) {
        if points.len() < 2 {
            return;
        }
        let hw = self.half_width(width);
        let paint = Paint::Solid(color);
        self.cover(Bounds::around(points, hw), &paint, |x, y| {
            points
                .windows(2)
                .any(|seg| dist_to_segment(x, y, seg[0], seg[1]) <= hw)
        });
    }

    fn stroke_arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, color: Rgba, width: f64) {
        let hw = self.half_width(width);
        let (start, end) = arc_sweep(start, end);
        let reach = r + hw;
        let local = Bounds { x0: cx - reach, y0: cy - reach, x1: cx + reach, y1: cy + reach };
        let paint = Paint::Solid(color);
        self.cover(local, &paint, |x, y| {
            let (dx, dy) = (x - cx, y - cy);
            ((dx * dx + dy * dy).sqrt() - r).abs() <= hw && angle_on_arc(dy.atan2(dx), start, end)
        });
    }
}

fn dist_to_segment(x: f64, y: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
    let (vx, vy) = (b.0 - a.0, b.1 - a.1);
    let len2 = vx * vx + vy * vy;
    let t = if len2 <= f64::EPSILON {
        0.0
    } else {
        (((x - a.0) * vx + (y - a.1) * vy) / len2).clamp(0.0, 1.0)
    };
    let (px, py) = (a.0 + vx * t, a.1 + vy * t);
    ((x - px).powi(2) + (y - py).powi(2)).sqrt()
}

/// Even-odd rule.
fn point_in_polygon(points: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

pub fn color_to_fg(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("38;2;{};{};{}", r, g, b),
        Color::AnsiValue(v) => format!("38;5;{}", v),
        Color::Black => "30".into(),
        Color::DarkRed => "31".into(),
        Color::DarkGreen => "32".into(),
        Color::DarkYellow => "33".into(),
        Color::DarkBlue => "34".into(),
        Color::DarkMagenta => "35".into(),
        Color::DarkCyan => "36".into(),
        Color::Grey => "37".into(),
        Color::DarkGrey => "90".into(),
        Color::Red => "91".into(),
        Color::Green => "92".into(),
        Color::Yellow => "93".into(),
        Color::Blue => "94".into(),
        Color::Magenta => "95".into(),
        Color::Cyan => "96".into(),
        Color::White => "97".into(),
        _ => "37".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: usize, h: usize) -> Canvas {
        Canvas::with_pixels(w, h, RenderMode::HalfBlock, ColorMode::TrueColor)
    }

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    #[test]
    fn test_fill_rect_covers_pixel_centres() {
        let mut c = canvas(10, 10);
        c.fill_rect(Rect::new(2.0, 2.0, 3.0, 3.0), RED);
        assert_eq!(c.pixel(2, 2), Some((255, 0, 0)));
        assert_eq!(c.pixel(4, 4), Some((255, 0, 0)));
        assert_eq!(c.pixel(5, 5), Some((0, 0, 0)));
        assert_eq!(c.pixel(1, 2), Some((0, 0, 0)));
    }

    #[test]
    fn test_global_alpha_blends() {
        let mut c = canvas(4, 4);
        c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Rgba::rgb(200, 200, 200));
        c.set_alpha(0.5);
        c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Rgba::rgb(0, 0, 0));
        assert_eq!(c.pixel(1, 1), Some((100, 100, 100)));
    }

    #[test]
    fn test_clip_is_restored() {
        let mut c = canvas(10, 10);
        c.save();
        c.clip_rect(Rect::new(0.0, 0.0, 5.0, 10.0));
        c.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), RED);
        c.restore();
        assert_eq!(c.pixel(4, 0), Some((255, 0, 0)));
        assert_eq!(c.pixel(6, 0), Some((0, 0, 0)));
        c.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), RED);
        assert_eq!(c.pixel(9, 9), Some((255, 0, 0)));
    }

    #[test]
    fn test_translate_and_scale_move_shapes() {
        let mut c = canvas(20, 20);
        c.save();
        c.translate(10.0, 10.0);
        c.scale(-1.0, 1.0);
        c.fill_rect(Rect::new(2.0, 0.0, 2.0, 2.0), RED);
        c.restore();
        // Mirrored to the left of x = 10.
        assert_eq!(c.pixel(7, 10), Some((255, 0, 0)));
        assert_eq!(c.pixel(12, 10), Some((0, 0, 0)));
    }

    #[test]
    fn test_hairline_is_visible() {
        let mut c = canvas(10, 10);
        c.line(0.0, 5.0, 10.0, 5.0, RED, 0.1);
        assert!((0..10).all(|x| c.pixel(x, 4) == Some((255, 0, 0)) || c.pixel(x, 5) == Some((255, 0, 0))));
    }

    #[test]
    fn test_polygon_even_odd() {
        let mut c = canvas(10, 10);
        c.fill_polygon(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], RED);
        assert_eq!(c.pixel(1, 1), Some((255, 0, 0)));
        assert_eq!(c.pixel(8, 8), Some((0, 0, 0)));
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut c = canvas(2, 2);
        c.restore();
        c.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), RED);
        assert_eq!(c.pixel(0, 0), Some((255, 0, 0)));
    }
}
