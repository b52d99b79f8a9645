//! Monochrome frames
//!
//! A [`Canvas`] is the drawing surface used while a frame is composed. It
//! implements [`DrawTarget`] so fonts and any other embedded-graphics drawable
//! can paint into it. [`Canvas::finish`] seals it into an immutable [`Frame`]
//! that the scheduler hands to the panel.
//!
//! ## Example
//!
//! ```
//! use embedded_graphics_core::{pixelcolor::BinaryColor, prelude::*, Pixel};
//! use inkclock::{Canvas, Dimensions};
//!
//! let dims = match Dimensions::new(16, 4) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let mut canvas = Canvas::new(dims, BinaryColor::Off);
//! let _ = Pixel(Point::new(3, 1), BinaryColor::On).draw(&mut canvas);
//!
//! let frame = canvas.finish(false);
//! assert_eq!(frame.pixel(3, 1), Some(BinaryColor::On));
//! assert_eq!(frame.pixel(4, 1), Some(BinaryColor::Off));
//! assert_eq!(frame.as_bytes().len(), dims.buffer_size());
//! ```

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

use crate::color::fill_byte;
use crate::config::{Dimensions, Rotation};
use crate::rotation::{apply_rotation, rotate_buffer};

/// Frame under construction
#[derive(Clone, Debug)]
pub struct Canvas {
    dims: Dimensions,
    buffer: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with `background`
    pub fn new(dims: Dimensions, background: BinaryColor) -> Self {
        Self {
            dims,
            buffer: vec![fill_byte(background); dims.buffer_size()],
        }
    }

    /// Canvas dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Flip every pixel
    pub fn invert(&mut self) {
        for byte in &mut self.buffer {
            *byte = !*byte;
        }
    }

    /// Rotate the composed image
    pub fn rotate(&mut self, rotation: Rotation) {
        rotate_buffer(&mut self.buffer, rotation);
    }

    /// Seal the canvas into a frame
    ///
    /// `requires_full` marks frames that must reach the panel through a full
    /// refresh.
    pub fn finish(self, requires_full: bool) -> Frame {
        Frame {
            dims: self.dims,
            buffer: self.buffer,
            requires_full,
        }
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        let width = self.dims.width as u32;
        let height = self.dims.height as u32;
        if x >= width || y >= height {
            return;
        }
        let (index, bit) = apply_rotation(x, y, width, height, Rotation::Rotate0);
        let Some(byte) = self.buffer.get_mut(index) else {
            return;
        };
        match color {
            BinaryColor::On => *byte &= !bit,
            BinaryColor::Off => *byte |= bit,
        }
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.set_pixel(x as u32, y as u32, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buffer.fill(fill_byte(color));
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.dims.width as u32, self.dims.height as u32)
    }
}

/// Finished monochrome bitmap
///
/// Bytes are packed rows, MSB first, a set bit is light. Frames are never
/// modified after [`Canvas::finish`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    dims: Dimensions,
    buffer: Vec<u8>,
    requires_full: bool,
}

impl Frame {
    /// Frame dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Packed pixel data
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Whether this frame must be shown with a full refresh
    pub fn requires_full(&self) -> bool {
        self.requires_full
    }

    /// Color of the stored pixel at `(x, y)`, or `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        let width = self.dims.width as u32;
        let height = self.dims.height as u32;
        if x >= width || y >= height {
            return None;
        }
        let (index, bit) = apply_rotation(x, y, width, height, Rotation::Rotate0);
        let byte = self.buffer.get(index)?;
        Some(if byte & bit != 0 {
            BinaryColor::Off
        } else {
            BinaryColor::On
        })
    }

    /// Number of dark pixels
    pub fn dark_pixels(&self) -> u32 {
        self.buffer.iter().map(|b| b.count_zeros()).sum()
    }
}
