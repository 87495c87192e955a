use crate::{
    error::{Result, VoutError},
    plane::{Pixel, PlaneView, PlaneViewMut},
};

/// A toolkit-native image: packed 16- or 32-bit RGB pixels with lines
/// padded to a 32-bit boundary.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    depth: u32,
    bytes_per_line: usize,
    bits: Vec<u8>,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .field("bytes_per_line", &self.bytes_per_line)
            .finish_non_exhaustive()
    }
}

impl Image {
    pub fn new(width: usize, height: usize, depth: u32) -> Result<Self> {
        if depth != 16 && depth != 32 {
            return Err(VoutError::UnsupportedDepth(depth));
        }

        let bytes_per_line = width
            .checked_mul(depth as usize)
            .map(|bits| bits.div_ceil(32) * 4)
            .ok_or(VoutError::Allocation(usize::MAX))?;
        let len = bytes_per_line
            .checked_mul(height)
            .ok_or(VoutError::Allocation(usize::MAX))?;

        let mut bits = Vec::new();
        bits.try_reserve_exact(len)
            .map_err(|_| VoutError::Allocation(len))?;
        bits.resize(len, 0);

        Ok(Self {
            width,
            height,
            depth,
            bytes_per_line,
            bits,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.depth as usize / 8
    }

    pub fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn bits_mut(&mut self) -> &mut [u8] {
        &mut self.bits
    }

    /// Bytes of line `y`, padding included.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not below [`Image::height`].
    pub fn line(&self, y: usize) -> &[u8] {
        &self.bits[y * self.bytes_per_line..(y + 1) * self.bytes_per_line]
    }

    /// # Panics
    ///
    /// Panics if `y` is not below [`Image::height`].
    pub fn line_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.bits[y * self.bytes_per_line..(y + 1) * self.bytes_per_line]
    }

    pub fn view<P: Pixel>(&self) -> Result<PlaneView<'_, P>> {
        self.check_pixel::<P>()?;
        PlaneView::new(&self.bits, self.width, self.height, self.bytes_per_line)
    }

    pub fn view_mut<P: Pixel>(&mut self) -> Result<PlaneViewMut<'_, P>> {
        self.check_pixel::<P>()?;
        PlaneViewMut::new(&mut self.bits, self.width, self.height, self.bytes_per_line)
    }

    fn check_pixel<P: Pixel>(&self) -> Result<()> {
        if P::SIZE != self.bytes_per_pixel() {
            return Err(VoutError::DepthMismatch {
                expected: self.depth,
                actual: P::SIZE as u32 * 8,
            });
        }
        Ok(())
    }

    /// Expands the pixels to tightly packed 8-bit RGB triplets.
    pub fn to_rgb24(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width * self.height * 3);
        for y in 0..self.height {
            let line = &self.line(y)[..self.width * self.bytes_per_pixel()];
            match self.depth {
                16 => {
                    for px in line.chunks_exact(2).map(u16::load) {
                        let r = ((px >> 11) & 0x1f) as u8;
                        let g = ((px >> 5) & 0x3f) as u8;
                        let b = (px & 0x1f) as u8;
                        rgb.extend_from_slice(&[(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]);
                    }
                }
                _ => {
                    for px in line.chunks_exact(4).map(u32::load) {
                        rgb.extend_from_slice(&[(px >> 16) as u8, (px >> 8) as u8, px as u8]);
                    }
                }
            }
        }
        rgb
    }
}
