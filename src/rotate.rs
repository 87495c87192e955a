//! Quarter-turn rotation used to match the handheld's physical screen
//! orientation.

use crate::{
    error::{Result, VoutError},
    image::Image,
    plane::{Pixel, PlaneView, PlaneViewMut},
    toolkit::Toolkit,
};

/// Rotates `src` a quarter turn clockwise into `dst`.
///
/// `dst` must be `src.height()` wide and `src.width()` high. Pixel `(x, y)`
/// of the source lands at `(src.height() - 1 - y, x)`.
pub fn rotate<P: Pixel>(src: &PlaneView<'_, P>, dst: &mut PlaneViewMut<'_, P>) -> Result<()> {
    if dst.width() != src.height() || dst.height() != src.width() {
        return Err(VoutError::RotationShape {
            src_width: src.width(),
            src_height: src.height(),
            dst_width: dst.width(),
            dst_height: dst.height(),
        });
    }

    let h = src.height();
    for y in 0..h {
        for (x, pixel) in src.row(y).enumerate() {
            dst.set(h - 1 - y, x, pixel);
        }
    }
    Ok(())
}

/// Allocates a rotated copy of `src` with the same depth from `toolkit`.
pub fn rotate_image(toolkit: &dyn Toolkit, src: &Image) -> Result<Image> {
    let mut dst = toolkit.new_image(src.height(), src.width(), src.depth())?;
    match src.depth() {
        16 => rotate::<u16>(&src.view()?, &mut dst.view_mut()?)?,
        32 => rotate::<u32>(&src.view()?, &mut dst.view_mut()?)?,
        depth => return Err(VoutError::UnsupportedDepth(depth)),
    }
    Ok(dst)
}
