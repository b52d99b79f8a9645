//! Clock configuration types and builder

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use crate::error::ConfigError;
use crate::input::SwitchPosition;
use crate::poller::{Controls, DebounceConfig};
use crate::profile::RenderProfile;

/// Panel dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDimensions` if:
    /// - width or height is zero
    /// - width % 8 != 0 (rows are packed into whole bytes)
    pub fn new(width: u16, height: u16) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 || width % 8 != 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Bytes per row of packed pixels
    pub fn row_bytes(&self) -> usize {
        self.width as usize / 8
    }

    /// Calculate required buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        self.row_bytes() * self.height as usize
    }
}

/// Fixed orientation of the rendered frame relative to the panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 180 degrees (panel mounted upside down)
    Rotate180,
}

/// Clock configuration
///
/// Use [`ClockConfig::builder`] to create one; `build` checks the values
/// against each other.
#[derive(Clone, Debug)]
pub struct ClockConfig {
    /// Frame rotation
    pub rotation: Rotation,
    /// Minimum spacing between two displayed frames
    pub partial_interval: Duration,
    /// Maximum spacing between two full refreshes
    pub full_interval: Duration,
    /// Main loop cadence
    pub poll_interval: Duration,
    /// Debounce windows
    pub debounce: DebounceConfig,
    /// Font identifiers, cycled by the encoder
    pub font_list: Vec<String>,
    /// Profile at startup and for unmapped switch positions
    pub default_profile: RenderProfile,
    /// Slide switch position table
    pub positions: Vec<(SwitchPosition, RenderProfile)>,
    /// Fitted controls
    pub controls: Controls,
}

impl ClockConfig {
    /// Start building a configuration
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Every profile the clock can be switched to without the encoder
    pub fn configured_profiles(&self) -> impl Iterator<Item = &RenderProfile> + '_ {
        core::iter::once(&self.default_profile).chain(self.positions.iter().map(|(_, p)| p))
    }

    /// Distinct point sizes used by the configured profiles
    ///
    /// The encoder only changes the font, so these are all the sizes a running
    /// clock can ask for.
    pub fn profile_sizes(&self) -> Vec<u32> {
        let mut sizes: Vec<u32> = Vec::new();
        for profile in self.configured_profiles() {
            if !sizes.contains(&profile.size) {
                sizes.push(profile.size);
            }
        }
        sizes
    }
}

/// Builder for constructing clock configuration
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use inkclock::{ClockConfig, Controls, RenderMode, RenderProfile, Rotation, SwitchPosition};
///
/// let config = match ClockConfig::builder()
///     .fonts(["10x20", "9x15"])
///     .partial_interval(Duration::from_secs(1))
///     .full_interval(Duration::from_secs(300))
///     .rotation(Rotation::Rotate180)
///     .controls(Controls::reference_switch())
///     .position(SwitchPosition::A, RenderProfile::default().with_mode(RenderMode::Classic))
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.font_list.len(), 2);
/// ```
#[must_use]
pub struct Builder {
    rotation: Rotation,
    partial_interval: Duration,
    full_interval: Duration,
    poll_interval: Duration,
    debounce: DebounceConfig,
    font_list: Vec<String>,
    default_profile: RenderProfile,
    positions: Vec<(SwitchPosition, RenderProfile)>,
    controls: Controls,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            rotation: Rotation::Rotate0,
            // One update per second, a full refresh every minute
            partial_interval: Duration::from_secs(1),
            full_interval: Duration::from_secs(60),
            poll_interval: Duration::from_millis(50),
            debounce: DebounceConfig::default(),
            font_list: Vec::new(),
            default_profile: RenderProfile::default(),
            positions: Vec::new(),
            controls: Controls::None,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set frame rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the minimum spacing between displayed frames
    pub fn partial_interval(mut self, interval: Duration) -> Self {
        self.partial_interval = interval;
        self
    }

    /// Set the maximum spacing between full refreshes
    pub fn full_interval(mut self, interval: Duration) -> Self {
        self.full_interval = interval;
        self
    }

    /// Set the main loop cadence
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set all debounce windows
    pub fn debounce(mut self, debounce: DebounceConfig) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the encoder edge debounce window
    pub fn debounce_rotation(mut self, window: Duration) -> Self {
        self.debounce.rotation = window;
        self
    }

    /// Set the button debounce window
    pub fn debounce_button(mut self, window: Duration) -> Self {
        self.debounce.button = window;
        self
    }

    /// Set the slide switch debounce window
    pub fn debounce_switch(mut self, window: Duration) -> Self {
        self.debounce.switch = window;
        self
    }

    /// Replace the font list
    pub fn fonts<I, S>(mut self, fonts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.font_list = fonts.into_iter().map(Into::into).collect();
        self
    }

    /// Append one font to the font list
    pub fn font(mut self, name: impl Into<String>) -> Self {
        self.font_list.push(name.into());
        self
    }

    /// Set the startup profile
    pub fn default_profile(mut self, profile: RenderProfile) -> Self {
        self.default_profile = profile;
        self
    }

    /// Map a slide switch position to a profile, replacing an earlier mapping
    pub fn position(mut self, position: SwitchPosition, profile: RenderProfile) -> Self {
        self.positions.retain(|(p, _)| *p != position);
        self.positions.push((position, profile));
        self
    }

    /// Set the fitted controls
    pub fn controls(mut self, controls: Controls) -> Self {
        self.controls = controls;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// - `ConfigError::EmptyFontList` if no font was given
    /// - `ConfigError::FontIndexOutOfRange` if a profile names a missing font
    /// - `ConfigError::InvalidInterval` if the full interval is shorter than the partial one
    /// - `ConfigError::ZeroPollInterval` if the poll interval is zero
    pub fn build(self) -> Result<ClockConfig, ConfigError> {
        if self.font_list.is_empty() {
            return Err(ConfigError::EmptyFontList);
        }
        if self.full_interval < self.partial_interval {
            return Err(ConfigError::InvalidInterval {
                partial: self.partial_interval,
                full: self.full_interval,
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        let config = ClockConfig {
            rotation: self.rotation,
            partial_interval: self.partial_interval,
            full_interval: self.full_interval,
            poll_interval: self.poll_interval,
            debounce: self.debounce,
            font_list: self.font_list,
            default_profile: self.default_profile,
            positions: self.positions,
            controls: self.controls,
        };
        let len = config.font_list.len();
        if let Some(profile) = config.configured_profiles().find(|p| p.font >= len) {
            return Err(ConfigError::FontIndexOutOfRange {
                index: profile.font,
                len,
            });
        }
        Ok(config)
    }
}
