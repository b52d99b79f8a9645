//! Font provider built on embedded-graphics mono fonts
//!
//! Mono fonts come in fixed pixel sizes. [`MonoFontProvider`] reaches the
//! requested point size by scaling every font pixel up to a square block, using
//! the largest whole factor that keeps the glyph height within `size`.
//!
//! ## Example
//!
//! ```
//! use inkclock::{Font, FontProvider, MonoFontProvider};
//!
//! let provider = MonoFontProvider::with_builtin();
//! // FONT_10X20 glyphs are 20 pixels high; size 200 scales them by 10
//! let font = match provider.load("10x20", 200) {
//!     Ok(font) => font,
//!     Err(_) => return,
//! };
//! assert_eq!(font.scale(), 10);
//! assert!(font.bounding_box("12:00").is_some());
//!
//! // Too small for any whole scale
//! assert!(provider.load("10x20", 19).is_err());
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use embedded_graphics::{
    Drawable,
    mono_font::{MonoFont, MonoTextStyle, ascii},
    text::{Baseline, Text},
};
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
    primitives::Rectangle,
};

use crate::error::ConfigError;
use crate::font::{Font, FontProvider, unbounded};

/// Registry of named mono fonts
#[derive(Clone, Default)]
pub struct MonoFontProvider {
    fonts: Vec<(String, &'static MonoFont<'static>)>,
}

impl MonoFontProvider {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with a selection of the embedded-graphics ASCII fonts
    ///
    /// Names are the font's cell size, e.g. `"10x20"`.
    pub fn with_builtin() -> Self {
        let mut provider = Self::new();
        provider
            .register("6x10", &ascii::FONT_6X10)
            .register("6x13", &ascii::FONT_6X13)
            .register("7x14", &ascii::FONT_7X14)
            .register("8x13", &ascii::FONT_8X13)
            .register("9x15", &ascii::FONT_9X15)
            .register("9x18", &ascii::FONT_9X18)
            .register("10x20", &ascii::FONT_10X20);
        provider
    }

    /// Register a font under `name`, replacing an earlier registration
    pub fn register(&mut self, name: &str, font: &'static MonoFont<'static>) -> &mut Self {
        self.fonts.retain(|(n, _)| n != name);
        self.fonts.push((name.to_string(), font));
        self
    }

    /// Registered names
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fonts.iter().map(|(n, _)| n.as_str())
    }
}

impl FontProvider for MonoFontProvider {
    type Font = ScaledMonoFont;

    fn load(&self, name: &str, size: u32) -> Result<Self::Font, ConfigError> {
        let unknown = || ConfigError::UnknownFont {
            name: name.to_string(),
            size,
        };
        let font = self
            .fonts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, font)| *font)
            .ok_or_else(unknown)?;
        let height = font.character_size.height;
        let scale = if height == 0 { 0 } else { size / height };
        if scale == 0 {
            return Err(unknown());
        }
        Ok(ScaledMonoFont { font, scale })
    }
}

/// Mono font drawn with every pixel scaled to a `scale` x `scale` block
#[derive(Clone, Copy)]
pub struct ScaledMonoFont {
    font: &'static MonoFont<'static>,
    scale: u32,
}

impl ScaledMonoFont {
    /// Scale factor
    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl Font for ScaledMonoFont {
    fn draw<D>(
        &self,
        text: &str,
        origin: Point,
        color: BinaryColor,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = MonoTextStyle::new(self.font, color);
        let mut scaled = ScaledTarget {
            inner: target,
            origin,
            scale: self.scale,
        };
        Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut scaled)?;
        Ok(())
    }
}

/// Forwards each pixel to `inner` as a filled block
struct ScaledTarget<'a, D> {
    inner: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<D> DrawTarget for ScaledTarget<'_, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    type Color = BinaryColor;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let step = self.scale as i32;
        for Pixel(point, color) in pixels {
            let block = Rectangle::new(self.origin + point * step, Size::new_equal(self.scale));
            self.inner.fill_solid(&block, color)?;
        }
        Ok(())
    }
}

impl<D> Dimensions for ScaledTarget<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        unbounded()
    }
}
