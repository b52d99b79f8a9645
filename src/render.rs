//! Time formatting and frame composition
//!
//! The [`Renderer`] turns a [`RenderProfile`] and a [`WallTime`] into a finished
//! [`Frame`]:
//!
//! 1. format the time as `HH:MM` or `I:MM`/`II:MM`
//! 2. fill the canvas with the profile's background
//! 3. center the string's tight bounding box and draw it in the glyph color
//! 4. flip every pixel for [`RenderMode::InvertNumbers`]
//! 5. apply the configured rotation
//!
//! Every font face a running clock can ask for is loaded in [`Renderer::new`],
//! so a missing font stops the clock at startup rather than on a later frame.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use embedded_graphics_core::geometry::Point;
use log::info;

use crate::clock::WallTime;
use crate::color::Polarity;
use crate::config::{ClockConfig, Dimensions, Rotation};
use crate::error::ConfigError;
use crate::font::{Font, FontProvider};
use crate::frame::{Canvas, Frame};
use crate::profile::{RenderMode, RenderProfile, TimeFormat};

/// Formatted time, at most `HH:MM`
pub type TimeText = heapless::String<5>;

/// Format a wall time for display
///
/// In 12-hour mode the hour runs 1-12 and a leading zero is dropped.
///
/// ```
/// use inkclock::{format_time, TimeFormat, WallTime};
///
/// let morning = WallTime::new(9, 7).unwrap();
/// assert_eq!(format_time(morning, TimeFormat::H12).as_str(), "9:07");
/// assert_eq!(format_time(morning, TimeFormat::H24).as_str(), "09:07");
///
/// let noon = WallTime::new(12, 0).unwrap();
/// assert_eq!(format_time(noon, TimeFormat::H12).as_str(), "12:00");
/// ```
pub fn format_time(time: WallTime, format: TimeFormat) -> TimeText {
    let hour = match format {
        TimeFormat::H24 => time.hour(),
        TimeFormat::H12 => match time.hour() % 12 {
            0 => 12,
            h => h,
        },
    };
    let mut text = TimeText::new();
    // "HH:MM" always fits
    let _ = write!(text, "{:02}:{:02}", hour, time.minute());
    if format == TimeFormat::H12 && text.starts_with('0') {
        let mut stripped = TimeText::new();
        let _ = stripped.push_str(&text[1..]);
        return stripped;
    }
    text
}

struct Face<F> {
    font_index: usize,
    size: u32,
    font: F,
}

/// Composes frames for a fixed panel size
pub struct Renderer<F> {
    dims: Dimensions,
    rotation: Rotation,
    font_names: Vec<String>,
    faces: Vec<Face<F>>,
}

impl<F: Font> Renderer<F> {
    /// Load every font of `config.font_list` at every configured size
    ///
    /// # Errors
    ///
    /// Returns the provider's [`ConfigError`] for the first face that cannot
    /// be loaded, or [`ConfigError::EmptyFontList`].
    pub fn new<P>(
        dims: Dimensions,
        rotation: Rotation,
        provider: &P,
        config: &ClockConfig,
    ) -> Result<Self, ConfigError>
    where
        P: FontProvider<Font = F>,
    {
        if config.font_list.is_empty() {
            return Err(ConfigError::EmptyFontList);
        }
        let sizes = config.profile_sizes();
        let mut faces = Vec::with_capacity(config.font_list.len() * sizes.len());
        for (font_index, name) in config.font_list.iter().enumerate() {
            for &size in &sizes {
                let font = provider.load(name, size)?;
                faces.push(Face {
                    font_index,
                    size,
                    font,
                });
            }
        }
        info!(
            "Loaded {} font faces for a {}x{} panel",
            faces.len(),
            dims.width,
            dims.height
        );
        Ok(Self {
            dims,
            rotation,
            font_names: config.font_list.clone(),
            faces,
        })
    }

    /// Frame dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Name of the font at `index` in the font list
    pub fn font_name(&self, index: usize) -> Option<&str> {
        self.font_names.get(index).map(String::as_str)
    }

    /// Compose the frame for `profile` at `time`
    ///
    /// # Errors
    ///
    /// Fails only for a profile whose face was not loaded at startup.
    pub fn render(
        &self,
        profile: &RenderProfile,
        time: WallTime,
        requires_full: bool,
    ) -> Result<Frame, ConfigError> {
        let font = self.face(profile)?;
        let text = format_time(time, profile.time_format);
        let polarity = Polarity::for_mode(profile.mode);

        let mut canvas = Canvas::new(self.dims, polarity.background());
        if let Some(bbox) = font.bounding_box(&text) {
            let x = (i32::from(self.dims.width) - bbox.width()).div_euclid(2);
            let y = (i32::from(self.dims.height) - bbox.height()).div_euclid(2) - bbox.top;
            let Ok(()) = font.draw(&text, Point::new(x, y), polarity.foreground(), &mut canvas);
        }
        if profile.mode == RenderMode::InvertNumbers {
            canvas.invert();
        }
        canvas.rotate(self.rotation);
        Ok(canvas.finish(requires_full))
    }

    fn face(&self, profile: &RenderProfile) -> Result<&F, ConfigError> {
        let name = self
            .font_names
            .get(profile.font)
            .ok_or(ConfigError::FontIndexOutOfRange {
                index: profile.font,
                len: self.font_names.len(),
            })?;
        self.faces
            .iter()
            .find(|face| face.font_index == profile.font && face.size == profile.size)
            .map(|face| &face.font)
            .ok_or_else(|| ConfigError::UnknownFont {
                name: name.clone(),
                size: profile.size,
            })
    }
}
