//! Panel driver abstraction
//!
//! The clock never talks to the display controller directly. Everything it
//! needs is the [`PanelDriver`] trait: a fixed size, the two refresh paths, and
//! the power-state calls used at startup and shutdown. Drivers built on a
//! controller crate implement it on their own type.
//!
//! ## Example
//!
//! ```
//! use core::convert::Infallible;
//! use inkclock::{Dimensions, Frame, PanelDriver, PanelError};
//!
//! struct Headless {
//!     dims: Dimensions,
//!     shown: usize,
//! }
//!
//! impl PanelDriver for Headless {
//!     type Error = Infallible;
//!
//!     fn dimensions(&self) -> Dimensions { self.dims }
//!     fn initialize(&mut self) -> Result<(), PanelError<Self::Error>> { Ok(()) }
//!     fn clear(&mut self) -> Result<(), PanelError<Self::Error>> { Ok(()) }
//!     fn display_full(&mut self, _frame: &Frame) -> Result<(), PanelError<Self::Error>> {
//!         self.shown += 1;
//!         Ok(())
//!     }
//!     fn display_partial(&mut self, _frame: &Frame) -> Result<(), PanelError<Self::Error>> {
//!         self.shown += 1;
//!         Ok(())
//!     }
//!     fn sleep(&mut self) -> Result<(), PanelError<Self::Error>> { Ok(()) }
//! }
//! ```

use core::fmt::Debug;

use crate::config::Dimensions;
use crate::error::PanelError;
use crate::frame::Frame;

type PanelResult<E> = core::result::Result<(), PanelError<E>>;

/// Bistable panel with full and partial refresh
///
/// Calls may block until the panel has finished; there are no timeouts.
pub trait PanelDriver {
    /// Error type for driver operations
    ///
    /// Must implement `Debug` for error reporting.
    type Error: Debug;

    /// Fixed panel size
    ///
    /// Queried once at startup.
    fn dimensions(&self) -> Dimensions;

    /// Wake the panel and load its full-refresh settings
    fn initialize(&mut self) -> PanelResult<Self::Error>;

    /// Clear the panel to white
    fn clear(&mut self) -> PanelResult<Self::Error>;

    /// Show `frame` with a full (flashing, ghost-clearing) refresh
    fn display_full(&mut self, frame: &Frame) -> PanelResult<Self::Error>;

    /// Show `frame` with a partial refresh
    fn display_partial(&mut self, frame: &Frame) -> PanelResult<Self::Error>;

    /// Put the panel into deep sleep
    fn sleep(&mut self) -> PanelResult<Self::Error>;
}

impl<T: PanelDriver + ?Sized> PanelDriver for &mut T {
    type Error = T::Error;

    fn dimensions(&self) -> Dimensions {
        (**self).dimensions()
    }

    fn initialize(&mut self) -> PanelResult<Self::Error> {
        (**self).initialize()
    }

    fn clear(&mut self) -> PanelResult<Self::Error> {
        (**self).clear()
    }

    fn display_full(&mut self, frame: &Frame) -> PanelResult<Self::Error> {
        (**self).display_full(frame)
    }

    fn display_partial(&mut self, frame: &Frame) -> PanelResult<Self::Error> {
        (**self).display_partial(frame)
    }

    fn sleep(&mut self) -> PanelResult<Self::Error> {
        (**self).sleep()
    }
}
