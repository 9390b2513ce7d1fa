//! Binary PPM (`P6`) emission. The format is fixed by the render contract:
//! one header line, then raw RGB rows ordered bottom-up.

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::bvh::Hit;

/// RGB value for one pixel: a wrapping hash of the primitive index for hits
/// (so neighboring primitives get visually distinct colors), black for
/// misses.
pub fn shade(hit: Option<Hit>) -> [u8; 3] {
    match hit {
        Some(hit) => [
            hit.prim_index.wrapping_mul(37) as u8,
            hit.prim_index.wrapping_mul(91) as u8,
            hit.prim_index.wrapping_mul(51) as u8,
        ],
        None => [0, 0, 0],
    }
}

/// Writes `pixels` (tightly packed RGB, row 0 at the bottom of the screen)
/// as a binary PPM. Rows are emitted last-first so the image comes out the
/// right way up.
pub fn write(mut writer: impl Write, width: usize, height: usize, pixels: &[u8]) -> io::Result<()> {
    assert2::assert!(pixels.len() == width * height * 3);

    writeln!(writer, "P6 {} {} 255", width, height)?;
    for row in pixels.chunks_exact(width * 3).rev() {
        writer.write_all(row)?;
    }
    Ok(())
}

pub fn save(
    path: impl AsRef<Path>,
    width: usize,
    height: usize,
    pixels: &[u8],
) -> io::Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    write(&mut writer, width, height, pixels)?;
    writer.flush()
}
