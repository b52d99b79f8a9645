//! Render profiles and the pure selector that switches between them
//!
//! A [`RenderProfile`] is a small `Copy` value. It is never edited in place:
//! [`ProfileSelector::select`] looks at the current profile and an
//! [`InputEvent`] and either reports [`Selection::Unchanged`] or hands back a
//! complete replacement.
//!
//! ## Example
//!
//! ```
//! use inkclock::{InputEvent, ProfileSelector, RenderProfile, Selection, TimeFormat};
//!
//! let selector = ProfileSelector::new(3, RenderProfile::default(), Vec::new()).unwrap();
//! let current = RenderProfile::default();
//!
//! // Rotating backwards from the first font wraps to the last one
//! match selector.select(&current, InputEvent::Direction(-1)) {
//!     Selection::Changed(next) => assert_eq!(next.font, 2),
//!     Selection::Unchanged => unreachable!(),
//! }
//!
//! // Toggle only flips the time format
//! if let Selection::Changed(next) = selector.select(&current, InputEvent::Toggle) {
//!     assert_eq!(next.time_format, TimeFormat::H24);
//!     assert_eq!(next.font, current.font);
//! }
//! ```

use alloc::vec::Vec;

use crate::error::ConfigError;
use crate::input::{InputEvent, InputState, SwitchPosition};

/// Polarity treatment of a frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Dark glyphs on a light background
    Classic,
    /// Light glyphs on a dark background
    #[default]
    Inverted,
    /// Composited like [`Inverted`](Self::Inverted), then every pixel flipped
    InvertNumbers,
}

/// Hour display convention
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeFormat {
    /// `I:MM` / `II:MM`, hours 1-12
    #[default]
    H12,
    /// `HH:MM`, hours 00-23
    H24,
}

impl TimeFormat {
    /// The other format
    pub fn toggled(self) -> Self {
        match self {
            Self::H12 => Self::H24,
            Self::H24 => Self::H12,
        }
    }
}

/// Everything that decides how the time is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderProfile {
    /// Polarity treatment
    pub mode: RenderMode,
    /// Index into the configured font list
    pub font: usize,
    /// Point size
    pub size: u32,
    /// Hour convention
    pub time_format: TimeFormat,
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self {
            mode: RenderMode::Inverted,
            font: 0,
            size: 200,
            time_format: TimeFormat::H12,
        }
    }
}

impl RenderProfile {
    /// Copy with another mode
    pub const fn with_mode(self, mode: RenderMode) -> Self {
        Self { mode, ..self }
    }

    /// Copy with another font index
    pub const fn with_font(self, font: usize) -> Self {
        Self { font, ..self }
    }

    /// Copy with another point size
    pub const fn with_size(self, size: u32) -> Self {
        Self { size, ..self }
    }

    /// Copy with another time format
    pub const fn with_time_format(self, time_format: TimeFormat) -> Self {
        Self {
            time_format,
            ..self
        }
    }
}

/// Result of feeding an event to the [`ProfileSelector`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// The event does not alter what is drawn
    Unchanged,
    /// Replacement profile
    Changed(RenderProfile),
}

/// Maps input events onto render profiles
#[derive(Clone, Debug)]
pub struct ProfileSelector {
    font_count: usize,
    default_profile: RenderProfile,
    positions: Vec<(SwitchPosition, RenderProfile)>,
}

impl ProfileSelector {
    /// Create a selector
    ///
    /// `positions` maps slide switch positions to profiles; unmapped positions
    /// fall back to `default_profile`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyFontList`] if `font_count` is zero and
    /// [`ConfigError::FontIndexOutOfRange`] if a profile names a missing font.
    pub fn new(
        font_count: usize,
        default_profile: RenderProfile,
        positions: Vec<(SwitchPosition, RenderProfile)>,
    ) -> Result<Self, ConfigError> {
        if font_count == 0 {
            return Err(ConfigError::EmptyFontList);
        }
        let in_range = |profile: &RenderProfile| {
            if profile.font < font_count {
                Ok(())
            } else {
                Err(ConfigError::FontIndexOutOfRange {
                    index: profile.font,
                    len: font_count,
                })
            }
        };
        in_range(&default_profile)?;
        for (_, profile) in &positions {
            in_range(profile)?;
        }
        Ok(Self {
            font_count,
            default_profile,
            positions,
        })
    }

    /// Number of fonts the encoder cycles through
    pub fn font_count(&self) -> usize {
        self.font_count
    }

    /// Profile used at startup and for unmapped switch positions
    pub fn default_profile(&self) -> RenderProfile {
        self.default_profile
    }

    /// Profile for a switch state
    pub fn profile_for(&self, state: InputState) -> RenderProfile {
        let position = state.position();
        self.positions
            .iter()
            .find(|(p, _)| *p == position)
            .map_or(self.default_profile, |(_, profile)| *profile)
    }

    /// Decide the profile that follows `current` after `event`
    pub fn select(&self, current: &RenderProfile, event: InputEvent) -> Selection {
        let next = match event {
            InputEvent::Direction(step) => {
                let count = self.font_count as i64;
                let font = (current.font as i64 + i64::from(step)).rem_euclid(count) as usize;
                current.with_font(font)
            }
            InputEvent::Toggle => current.with_time_format(current.time_format.toggled()),
            InputEvent::PositionChanged(state) => self.profile_for(state),
        };
        if next == *current {
            Selection::Unchanged
        } else {
            Selection::Changed(next)
        }
    }
}
