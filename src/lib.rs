//! E-Paper Clock Core
//!
//! Refresh scheduling and rendering for a desk clock that shows the time in
//! large glyphs on a bistable (e-paper) panel.
//!
//! ## Features
//!
//! - `no_std` compatible (needs `alloc`)
//! - `embedded-hal` v1.0 input pins and delays
//! - Debounced rotary encoder, push button and slide switch input
//! - Full/partial refresh scheduling with rate limiting and periodic ghost clearing
//! - Classic, inverted and invert-numbers render modes, 12/24-hour time, 180° rotation
//! - Ready-made font provider over `embedded-graphics` mono fonts (with `graphics` feature)
//! - `std::time` backed clock (with `std` feature)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use core::sync::atomic::AtomicBool;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{ErrorType, InputPin};
//! use inkclock::{
//!     Clock, ClockConfig, Controls, Dimensions, Frame, MainLoop, MonoFontProvider, PanelDriver,
//!     PanelError, PinBank, Timestamp, WallTime,
//! };
//!
//! # struct MockPin;
//! # impl ErrorType for MockPin { type Error = Infallible; }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # struct MockPanel;
//! # impl PanelDriver for MockPanel {
//! #     type Error = Infallible;
//! #     fn dimensions(&self) -> Dimensions { Dimensions { width: 800, height: 480 } }
//! #     fn initialize(&mut self) -> Result<(), PanelError<Infallible>> { Ok(()) }
//! #     fn clear(&mut self) -> Result<(), PanelError<Infallible>> { Ok(()) }
//! #     fn display_full(&mut self, _: &Frame) -> Result<(), PanelError<Infallible>> { Ok(()) }
//! #     fn display_partial(&mut self, _: &Frame) -> Result<(), PanelError<Infallible>> { Ok(()) }
//! #     fn sleep(&mut self) -> Result<(), PanelError<Infallible>> { Ok(()) }
//! # }
//! # struct MockClock;
//! # impl Clock for MockClock {
//! #     fn now(&self) -> Timestamp { Timestamp::ZERO }
//! #     fn local_time(&self) -> WallTime { WallTime::from_seconds_of_day(0) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let (clk, dt, sw) = (MockPin, MockPin, MockPin);
//! # let panel = MockPanel;
//! # let clock = MockClock;
//! # let mut delay = MockDelay;
//! let config = match ClockConfig::builder()
//!     .fonts(["10x20", "9x18", "8x13"])
//!     .controls(Controls::reference_encoder())
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut pins = PinBank::new();
//! pins.add(inkclock::LineId(5), clk)
//!     .add(inkclock::LineId(6), dt)
//!     .add(inkclock::LineId(13), sw);
//!
//! let fonts = MonoFontProvider::with_builtin();
//! let mut clock = match MainLoop::new(&config, pins, panel, clock, &fonts) {
//!     Ok(clock) => clock,
//!     Err(_) => return,
//! };
//!
//! static STOP: AtomicBool = AtomicBool::new(false);
//! let _ = clock.run(&mut delay, &STOP);
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// Time sources
pub mod clock;
/// Frame polarity
pub mod color;
/// Clock configuration types and builder
pub mod config;
/// Time-window debouncing
pub mod debounce;
/// Error types for the clock core
pub mod error;
/// Font collaborators
pub mod font;
/// Monochrome frames
pub mod frame;
/// Raw input lines and input events
pub mod input;
/// Panel driver abstraction
pub mod panel;
/// Input polling and debouncing
pub mod poller;
/// Render profiles and profile selection
pub mod profile;
/// Time formatting and frame composition
pub mod render;
/// Pixel addressing and frame rotation
pub mod rotation;
/// Main loop
pub mod runtime;
/// Refresh scheduling
pub mod scheduler;

/// Font provider over embedded-graphics mono fonts (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod mono;

pub use clock::{Clock, Timestamp, WallTime};
pub use color::Polarity;
pub use config::{Builder, ClockConfig, Dimensions, Rotation};
pub use debounce::{DebounceState, Debouncer};
pub use error::{ConfigError, Error, PanelError};
pub use font::{Font, FontProvider, GlyphBox, MeasureTarget};
pub use frame::{Canvas, Frame};
pub use input::{
    EventInbox, EventSink, InputEvent, InputSource, InputState, LineId, NoInbox, PinBank,
    SwitchPosition,
};
pub use panel::PanelDriver;
pub use poller::{Controls, DebounceConfig, InputPoller};
pub use profile::{ProfileSelector, RenderMode, RenderProfile, Selection, TimeFormat};
pub use render::{Renderer, format_time};
pub use runtime::MainLoop;
pub use scheduler::{RefreshClass, RefreshPolicy, RefreshScheduler, SchedulerState, TickOutcome};

#[cfg(feature = "std")]
pub use clock::SystemClock;

#[cfg(feature = "graphics")]
pub use mono::{MonoFontProvider, ScaledMonoFont};
