use std::ops::{Index, IndexMut};

use log::trace;
use strum_macros::Display;

use crate::{
    error::{Result, VoutError},
    host::OutputFormat,
    image::Image,
    toolkit::Toolkit,
};

/// Number of picture slots the host keeps per video output.
pub const VOUT_MAX_PICTURES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum PictureStatus {
    #[default]
    Free,
    Reserved,
    Ready,
    Displayed,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum PictureType {
    #[default]
    Empty,
    Memory,
    Direct,
}

/// Layout of the single pixel plane of a picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Plane {
    pub pitch: usize,
    pub lines: usize,
    pub pixel_bytes: usize,
    pub margin: bool,
}

#[derive(Debug, Default)]
pub struct Picture {
    pub status: PictureStatus,
    pub kind: PictureType,
    plane: Plane,
    planes: usize,
    image: Option<Image>,
}

impl Picture {
    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn planes(&self) -> usize {
        self.planes
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Direct access to the pixels, for the decoder writing into the picture.
    pub fn image_mut(&mut self) -> Option<&mut Image> {
        self.image.as_mut()
    }

    pub fn is_allocated(&self) -> bool {
        self.image.is_some()
    }
}

/// Allocates a direct buffer for `picture` in the negotiated output format.
///
/// The output chroma has to match the display depth exactly; otherwise
/// nothing is allocated and the slot is left untouched.
pub fn new_picture(
    toolkit: &dyn Toolkit,
    depth: u32,
    output: &OutputFormat,
    picture: &mut Picture,
) -> Result<()> {
    let chroma = output.chroma.ok_or(VoutError::NoChroma)?;
    if chroma.depth() != depth {
        return Err(VoutError::FormatMismatch { chroma, depth });
    }

    let image = toolkit.new_image(output.width as usize, output.height as usize, depth)?;

    picture.plane = Plane {
        pitch: image.bytes_per_line(),
        lines: output.height as usize,
        pixel_bytes: chroma.bytes_per_pixel(),
        margin: false,
    };
    picture.planes = 1;
    picture.image = Some(image);

    trace!("new picture {}x{} {}", output.width, output.height, chroma);
    Ok(())
}

/// Hands the image of a picture built by [`new_picture`] back to the
/// toolkit. Returns false when the slot held nothing.
pub fn free_picture(toolkit: &dyn Toolkit, picture: &mut Picture) -> bool {
    picture.plane = Plane::default();
    picture.planes = 0;
    match picture.image.take() {
        Some(image) => {
            toolkit.free_image(image);
            true
        }
        None => false,
    }
}

/// The host's picture slots, and the pictures this output allocated in them.
#[derive(Debug)]
pub struct PictureHeap {
    slots: Vec<Picture>,
    output: Vec<usize>,
}

impl Default for PictureHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl PictureHeap {
    pub fn new() -> Self {
        Self {
            slots: (0..VOUT_MAX_PICTURES).map(|_| Picture::default()).collect(),
            output: Vec::with_capacity(VOUT_MAX_PICTURES),
        }
    }

    pub fn free_slot(&self) -> Option<usize> {
        self.slots
            .iter()
            .position(|picture| picture.status == PictureStatus::Free)
    }

    pub fn output_count(&self) -> usize {
        self.output.len()
    }

    /// Slot indices of the output pictures, in allocation order.
    pub fn output_indices(&self) -> &[usize] {
        &self.output
    }

    pub fn output(&self, n: usize) -> Option<&Picture> {
        self.output.get(n).map(|&index| &self.slots[index])
    }

    pub fn output_mut(&mut self, n: usize) -> Option<&mut Picture> {
        let index = *self.output.get(n)?;
        Some(&mut self.slots[index])
    }

    pub(crate) fn push_output(&mut self, index: usize) {
        self.output.push(index);
    }

    pub(crate) fn pop_output(&mut self) -> Option<usize> {
        self.output.pop()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Picture> {
        self.slots.iter()
    }
}

impl Index<usize> for PictureHeap {
    type Output = Picture;

    fn index(&self, index: usize) -> &Picture {
        &self.slots[index]
    }
}

impl IndexMut<usize> for PictureHeap {
    fn index_mut(&mut self, index: usize) -> &mut Picture {
        &mut self.slots[index]
    }
}
