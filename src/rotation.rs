//! Pixel addressing and frame rotation
//!
//! Frames store pixels in a bit-packed format where each byte holds 8
//! horizontal pixels, most significant bit first. A 180° rotation maps pixel
//! `(x, y)` to `(width - 1 - x, height - 1 - y)`; on the packed buffer that is
//! "reverse the byte order, then reverse the bits of every byte", which
//! [`rotate_buffer`] does in place.
//!
//! ## Example
//!
//! ```
//! use inkclock::{rotation::apply_rotation, Rotation};
//!
//! // For an 8x1 frame at native orientation, pixel (0,0) is at byte 0, bit 7 (MSB)
//! let (idx, bit) = apply_rotation(0, 0, 8, 1, Rotation::Rotate0);
//! assert_eq!(idx, 0);
//! assert_eq!(bit, 0x80);
//!
//! // Turned around, the same pixel lands in the last bit of the buffer
//! let (idx, bit) = apply_rotation(0, 0, 8, 1, Rotation::Rotate180);
//! assert_eq!(idx, 0);
//! assert_eq!(bit, 0x01);
//! ```

use crate::config::Rotation;

/// Buffer index and bit mask of pixel `(x, y)`
///
/// `width` must be a multiple of 8 and the coordinates must be in range.
pub fn apply_rotation(x: u32, y: u32, width: u32, height: u32, rotation: Rotation) -> (usize, u8) {
    match rotation {
        Rotation::Rotate0 => {
            let index = (x / 8 + (width / 8) * y) as usize;
            let bit = 0x80 >> (x % 8);
            (index, bit)
        }
        Rotation::Rotate180 => {
            let index = (((width / 8) * height - 1) - (x / 8 + (width / 8) * y)) as usize;
            let bit = 0x01 << (x % 8);
            (index, bit)
        }
    }
}

/// Rotate a packed buffer that was drawn at [`Rotation::Rotate0`]
pub fn rotate_buffer(buffer: &mut [u8], rotation: Rotation) {
    match rotation {
        Rotation::Rotate0 => {}
        Rotation::Rotate180 => {
            buffer.reverse();
            for byte in buffer.iter_mut() {
                *byte = byte.reverse_bits();
            }
        }
    }
}
