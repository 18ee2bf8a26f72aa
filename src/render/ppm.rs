use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::Canvas;

/// Write the canvas as a binary PPM (P6) image.
///
/// Format:
/// ```text
/// P6
/// <width> <height>
/// 255
/// <width * height RGB triples>
/// ```
pub fn save<P: AsRef<Path>>(canvas: &Canvas, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_to(canvas, &mut writer)?;
    writer.flush()
}

pub fn write_to<W: Write>(canvas: &Canvas, out: &mut W) -> io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", canvas.width, canvas.height)?;
    let mut row = Vec::with_capacity(canvas.width * 3);
    for y in 0..canvas.height {
        row.clear();
        for &(r, g, b) in &canvas.colors[y * canvas.width..(y + 1) * canvas.width] {
            row.extend_from_slice(&[r, g, b]);
        }
        out.write_all(&row)?;
    }
    Ok(())
}
