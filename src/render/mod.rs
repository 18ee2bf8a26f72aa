pub mod canvas;
pub mod halfblock;
pub mod ppm;
#[cfg(test)]
pub mod recording;
pub mod surface;

pub use canvas::{Canvas, ColorMode, RenderMode};
pub use surface::{Gradient, Paint, Rect, Rgba, Surface};
