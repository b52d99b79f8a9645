//! Frame polarity
//!
//! Frames are monochrome and use [`BinaryColor`] from embedded-graphics:
//! `On` is dark ink and `Off` is bare (light) paper. In the packed frame
//! buffer a set bit is light:
//!
//! | Color | Ink   | Buffer bit | Fill byte |
//! |-------|-------|------------|-----------|
//! | `On`  | dark  | 0          | 0x00      |
//! | `Off` | light | 1          | 0xFF      |
//!
//! ## Example
//!
//! ```
//! use embedded_graphics_core::pixelcolor::BinaryColor;
//! use inkclock::{Polarity, RenderMode};
//!
//! let polarity = Polarity::for_mode(RenderMode::Classic);
//! assert_eq!(polarity.background(), BinaryColor::Off);
//! assert_eq!(polarity.foreground(), BinaryColor::On);
//! ```

use embedded_graphics_core::pixelcolor::BinaryColor;

use crate::profile::RenderMode;

/// Background and glyph colors of a frame
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Polarity {
    /// Dark glyphs on light paper
    Light,
    /// Light glyphs on a dark background
    Dark,
}

impl Polarity {
    /// Polarity used to composite a frame in `mode`
    ///
    /// [`RenderMode::InvertNumbers`] composites dark and is flipped afterwards.
    pub fn for_mode(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Classic => Self::Light,
            RenderMode::Inverted | RenderMode::InvertNumbers => Self::Dark,
        }
    }

    /// Background color
    pub fn background(self) -> BinaryColor {
        match self {
            Self::Light => BinaryColor::Off,
            Self::Dark => BinaryColor::On,
        }
    }

    /// Glyph color
    pub fn foreground(self) -> BinaryColor {
        self.background().invert()
    }
}

/// Byte filling eight pixels of `color` in the packed buffer
///
/// ```
/// use embedded_graphics_core::pixelcolor::BinaryColor;
/// use inkclock::color::fill_byte;
///
/// assert_eq!(fill_byte(BinaryColor::On), 0x00);
/// assert_eq!(fill_byte(BinaryColor::Off), 0xFF);
/// ```
pub fn fill_byte(color: BinaryColor) -> u8 {
    match color {
        BinaryColor::On => 0x00,
        BinaryColor::Off => 0xFF,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_polarity() {
        assert_eq!(Polarity::for_mode(RenderMode::Classic), Polarity::Light);
        assert_eq!(Polarity::for_mode(RenderMode::Inverted), Polarity::Dark);
        assert_eq!(Polarity::for_mode(RenderMode::InvertNumbers), Polarity::Dark);
    }

    #[test]
    fn test_dark_polarity_colors() {
        assert_eq!(Polarity::Dark.background(), BinaryColor::On);
        assert_eq!(Polarity::Dark.foreground(), BinaryColor::Off);
    }
}
