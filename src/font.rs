//! Font collaborators
//!
//! The renderer only needs two things from a font: draw a string at an origin,
//! and report which pixels that draw would touch. [`Font::bounding_box`] has a
//! default that measures a real draw into a [`MeasureTarget`], so most fonts
//! implement [`Font::draw`] only.
//!
//! Fonts are obtained once at startup from a [`FontProvider`].

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
    primitives::Rectangle,
};

use crate::error::ConfigError;

/// Tight box around the pixels of a drawn string
///
/// Coordinates are relative to the draw origin; `right` and `bottom` are
/// exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphBox {
    /// Leftmost inked column
    pub left: i32,
    /// Topmost inked row
    pub top: i32,
    /// One past the rightmost inked column
    pub right: i32,
    /// One past the bottom inked row
    pub bottom: i32,
}

impl GlyphBox {
    /// Width in pixels
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    fn include(this: Option<Self>, p: Point) -> Self {
        match this {
            None => Self {
                left: p.x,
                top: p.y,
                right: p.x + 1,
                bottom: p.y + 1,
            },
            Some(b) => Self {
                left: b.left.min(p.x),
                top: b.top.min(p.y),
                right: b.right.max(p.x + 1),
                bottom: b.bottom.max(p.y + 1),
            },
        }
    }
}

/// A loaded font face at a fixed size
pub trait Font {
    /// Draw `text` with its top-left reference at `origin`
    fn draw<D>(
        &self,
        text: &str,
        origin: Point,
        color: BinaryColor,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>;

    /// Box around the pixels `draw` would ink at the origin, `None` if it inks nothing
    fn bounding_box(&self, text: &str) -> Option<GlyphBox> {
        let mut target = MeasureTarget::new();
        let Ok(()) = self.draw(text, Point::zero(), BinaryColor::On, &mut target);
        target.bounds()
    }
}

/// Resolves font identifiers to loaded fonts
pub trait FontProvider {
    /// Loaded font type
    type Font: Font;

    /// Load `name` at point size `size`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownFont`] if the font does not exist or cannot
    /// be rendered at that size.
    fn load(&self, name: &str, size: u32) -> Result<Self::Font, ConfigError>;
}

/// Unbounded draw target that records the extent of `On` pixels
#[derive(Clone, Copy, Debug, Default)]
pub struct MeasureTarget {
    bounds: Option<GlyphBox>,
}

impl MeasureTarget {
    /// Empty measurement
    pub fn new() -> Self {
        Self::default()
    }

    /// Extent of everything drawn so far
    pub fn bounds(&self) -> Option<GlyphBox> {
        self.bounds
    }
}

impl DrawTarget for MeasureTarget {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color == BinaryColor::On {
                self.bounds = Some(GlyphBox::include(self.bounds, point));
            }
        }
        Ok(())
    }
}

impl Dimensions for MeasureTarget {
    fn bounding_box(&self) -> Rectangle {
        unbounded()
    }
}

/// Area reported by targets that accept any coordinate
pub(crate) fn unbounded() -> Rectangle {
    const HALF: i32 = 1 << 20;
    Rectangle::new(
        Point::new(-HALF, -HALF),
        Size::new(2 * HALF as u32, 2 * HALF as u32),
    )
}
