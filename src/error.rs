//! Error types for the clock core
//!
//! This module defines error types for startup configuration ([`ConfigError`]),
//! panel driver calls ([`PanelError`]) and the running clock ([`Error`]).
//!
//! ## Error Types
//!
//! - [`ConfigError`] - Fatal problems detected before the main loop starts
//! - [`PanelError`] - Failures reported by a [`PanelDriver`](crate::panel::PanelDriver),
//!   split into retryable I/O errors and non-recoverable faults
//! - [`Error`] - Errors that stop the main loop
//!
//! ## Example
//!
//! ```
//! use inkclock::{ClockConfig, ConfigError};
//!
//! // A font list is required
//! let result = ClockConfig::builder().build();
//! assert!(matches!(result, Err(ConfigError::EmptyFontList)));
//! ```

use alloc::string::String;
use core::fmt::Debug;
use core::time::Duration;

use crate::input::LineId;

/// Errors detected while validating configuration or preparing collaborators
///
/// All of these are fatal: the clock refuses to start.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The font list is empty
    EmptyFontList,
    /// A profile refers to a font index outside the font list
    FontIndexOutOfRange {
        /// Index requested by the profile
        index: usize,
        /// Length of the configured font list
        len: usize,
    },
    /// The font provider does not know this font or cannot render it at this size
    UnknownFont {
        /// Font identifier from the font list
        name: String,
        /// Requested point size
        size: u32,
    },
    /// Invalid panel dimensions
    ///
    /// Dimensions must satisfy:
    /// - width and height are non-zero
    /// - width is a multiple of 8
    InvalidDimensions {
        /// Requested width in pixels
        width: u16,
        /// Requested height in pixels
        height: u16,
    },
    /// Renderer and panel disagree on the frame size
    DimensionMismatch {
        /// Size the panel reports as (width, height)
        panel: (u16, u16),
        /// Size the renderer produces as (width, height)
        frame: (u16, u16),
    },
    /// Refresh intervals are inconsistent
    ///
    /// `full_interval` must not be shorter than `partial_interval`.
    InvalidInterval {
        /// Minimum spacing between two displayed frames
        partial: Duration,
        /// Maximum spacing between two full refreshes
        full: Duration,
    },
    /// The poll interval is zero
    ZeroPollInterval,
    /// An input line could not be read at startup
    UnreadableLine(LineId),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyFontList => write!(f, "Font list must not be empty"),
            Self::FontIndexOutOfRange { index, len } => {
                write!(f, "Font index {index} out of range for {len} fonts")
            }
            Self::UnknownFont { name, size } => {
                write!(f, "Font {name} cannot be loaded at size {size}")
            }
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (must be non-zero, width multiple of 8)"
            ),
            Self::DimensionMismatch { panel, frame } => write!(
                f,
                "Frame size {}x{} does not match panel size {}x{}",
                frame.0, frame.1, panel.0, panel.1
            ),
            Self::InvalidInterval { partial, full } => write!(
                f,
                "Full interval {full:?} is shorter than partial interval {partial:?}"
            ),
            Self::ZeroPollInterval => write!(f, "Poll interval must be non-zero"),
            Self::UnreadableLine(line) => write!(f, "Input line {} cannot be read", line.0),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Errors reported by a panel driver
///
/// Generic over the driver's own error type so callers can still match on it.
#[derive(Debug)]
pub enum PanelError<E> {
    /// Transient I/O failure
    ///
    /// The scheduler logs it and retries on the next tick.
    Io(E),
    /// The driver reports a hardware fault it cannot recover from
    ///
    /// The main loop stops and runs the shutdown sequence.
    Fault(E),
}

impl<E> PanelError<E> {
    /// Whether the scheduler may retry after this error
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Unwrap the driver error
    pub fn into_inner(self) -> E {
        match self {
            Self::Io(e) | Self::Fault(e) => e,
        }
    }
}

impl<E: Debug> core::fmt::Display for PanelError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Panel I/O error: {e:?}"),
            Self::Fault(e) => write!(f, "Panel fault: {e:?}"),
        }
    }
}

impl<E: Debug> core::error::Error for PanelError<E> {}

/// Errors that stop the clock
#[derive(Debug)]
pub enum Error<E> {
    /// Configuration problem
    Config(ConfigError),
    /// Non-recoverable panel fault
    Panel(E),
}

impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl<E: Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Panel(e) => write!(f, "Panel fault: {e:?}"),
        }
    }
}

impl<E: Debug> core::error::Error for Error<E> {}
