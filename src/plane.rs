//! Typed views over packed pixel rows.
//!
//! A view is checked once against its backing slice when it is built, so
//! every later row or pixel access stays inside the buffer.

use std::marker::PhantomData;

use crate::error::{Result, VoutError};

/// A packed pixel stored in native byte order.
pub trait Pixel: Copy + Default {
    const SIZE: usize;

    fn load(bytes: &[u8]) -> Self;
    fn store(self, bytes: &mut [u8]);
}

impl Pixel for u16 {
    const SIZE: usize = 2;

    fn load(bytes: &[u8]) -> Self {
        u16::from_ne_bytes([bytes[0], bytes[1]])
    }

    fn store(self, bytes: &mut [u8]) {
        bytes[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
    }
}

impl Pixel for u32 {
    const SIZE: usize = 4;

    fn load(bytes: &[u8]) -> Self {
        u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn store(self, bytes: &mut [u8]) {
        bytes[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
    }
}

fn check_bounds<P: Pixel>(len: usize, width: usize, height: usize, stride: usize) -> Result<()> {
    let out_of_bounds = || VoutError::PlaneBounds {
        len,
        width,
        height,
        stride,
    };
    let row = width.checked_mul(P::SIZE).ok_or_else(out_of_bounds)?;
    let needed = match height {
        0 => 0,
        h => (h - 1)
            .checked_mul(stride)
            .and_then(|start| start.checked_add(row))
            .ok_or_else(out_of_bounds)?,
    };
    if stride < row || needed > len {
        return Err(out_of_bounds());
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a, P> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
    _pixel: PhantomData<P>,
}

impl<'a, P: Pixel> PlaneView<'a, P> {
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> Result<Self> {
        check_bounds::<P>(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            _pixel: PhantomData,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixels of row `y`, without the padding.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not below the plane height.
    pub fn row(&self, y: usize) -> impl Iterator<Item = P> + 'a
    where
        P: 'a,
    {
        let start = y * self.stride;
        self.data[start..start + self.width * P::SIZE]
            .chunks_exact(P::SIZE)
            .map(P::load)
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the pixel lies outside the plane.
    pub fn get(&self, x: usize, y: usize) -> P {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) outside plane");
        let at = y * self.stride + x * P::SIZE;
        P::load(&self.data[at..at + P::SIZE])
    }
}

#[derive(Debug)]
pub struct PlaneViewMut<'a, P> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
    _pixel: PhantomData<P>,
}

impl<'a, P: Pixel> PlaneViewMut<'a, P> {
    pub fn new(data: &'a mut [u8], width: usize, height: usize, stride: usize) -> Result<Self> {
        check_bounds::<P>(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            _pixel: PhantomData,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the pixel lies outside the plane.
    pub fn get(&self, x: usize, y: usize) -> P {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) outside plane");
        let at = y * self.stride + x * P::SIZE;
        P::load(&self.data[at..at + P::SIZE])
    }

    /// Overwrites the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the pixel lies outside the plane.
    pub fn set(&mut self, x: usize, y: usize, pixel: P) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) outside plane");
        let at = y * self.stride + x * P::SIZE;
        pixel.store(&mut self.data[at..at + P::SIZE]);
    }

    pub fn as_view(&self) -> PlaneView<'_, P> {
        PlaneView {
            data: self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            _pixel: PhantomData,
        }
    }
}
