//! Ways of getting a picture onto a surface.
//!
//! The two painters do not produce the same screen: [`RotatingPainter`]
//! turns the picture a quarter turn for the handheld's portrait panel,
//! [`DirectPainter`] copies it into the framebuffer as it is.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    error::{Result, VoutError},
    image::Image,
    placement::Placement,
    rotate::rotate_image,
    toolkit::{Surface, Toolkit},
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaintMode {
    #[default]
    Rotate,
    Direct,
}

impl PaintMode {
    pub fn painter(self) -> Box<dyn SurfacePainter> {
        match self {
            PaintMode::Rotate => Box::new(RotatingPainter),
            PaintMode::Direct => Box::new(DirectPainter),
        }
    }
}

pub trait SurfacePainter: Send {
    fn mode(&self) -> PaintMode;

    /// Puts `image` on `surface`. Scratch images come from `toolkit`.
    fn paint(
        &self,
        toolkit: &dyn Toolkit,
        surface: &dyn Surface,
        placement: Placement,
        image: &Image,
    ) -> Result<()>;
}

/// Rotates each picture into a fresh image and hands it to the toolkit at
/// the placement's origin.
#[derive(Debug, Default)]
pub struct RotatingPainter;

impl SurfacePainter for RotatingPainter {
    fn mode(&self) -> PaintMode {
        PaintMode::Rotate
    }

    fn paint(
        &self,
        toolkit: &dyn Toolkit,
        surface: &dyn Surface,
        placement: Placement,
        image: &Image,
    ) -> Result<()> {
        let rotated = rotate_image(toolkit, image)?;
        surface.draw_image(placement.x, placement.y, rotated)
    }
}

/// Copies the picture line by line to the top of the framebuffer, up to
/// the placement's height. No rotation.
#[derive(Debug, Default)]
pub struct DirectPainter;

impl SurfacePainter for DirectPainter {
    fn mode(&self) -> PaintMode {
        PaintMode::Direct
    }

    fn paint(
        &self,
        _toolkit: &dyn Toolkit,
        surface: &dyn Surface,
        placement: Placement,
        image: &Image,
    ) -> Result<()> {
        let frame_buffer = surface.frame_buffer().ok_or(VoutError::NoFrameBuffer)?;
        {
            let mut frame_buffer = frame_buffer.lock();
            if frame_buffer.depth() != image.depth() {
                return Err(VoutError::DepthMismatch {
                    expected: frame_buffer.depth(),
                    actual: image.depth(),
                });
            }

            let span = frame_buffer.bytes_per_line().min(image.bytes_per_line());
            let lines = (placement.height as usize)
                .min(image.height())
                .min(frame_buffer.height());
            for line in 0..lines {
                frame_buffer.line_mut(line)[..span].copy_from_slice(&image.line(line)[..span]);
            }
        }
        surface.flush()
    }
}
