//! Deterministic gradient frames for the demo player and tests.

use crate::{error::Result, image::Image};

/// Fills `image` with a horizontal red ramp, a vertical green ramp and a
/// diagonal blue ripple. `phase` scrolls the red ramp sideways.
pub fn gradient(image: &mut Image, phase: usize) -> Result<()> {
    let (w, h) = (image.width().max(1), image.height().max(1));
    match image.depth() {
        16 => {
            let mut view = image.view_mut::<u16>()?;
            for y in 0..view.height() {
                for x in 0..view.width() {
                    let r = ((x + phase) * 32 / w) % 32;
                    let g = (y * 64 / h) % 64;
                    let b = (x + y) % 32;
                    view.set(x, y, ((r << 11) | (g << 5) | b) as u16);
                }
            }
        }
        _ => {
            let mut view = image.view_mut::<u32>()?;
            for y in 0..view.height() {
                for x in 0..view.width() {
                    let r = ((x + phase) * 256 / w) % 256;
                    let g = (y * 256 / h) % 256;
                    let b = (x + y) % 256;
                    view.set(x, y, ((r << 16) | (g << 8) | b) as u32);
                }
            }
        }
    }
    Ok(())
}
