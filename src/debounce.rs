//! Time-window debouncing
//!
//! [`Debouncer`] filters a noisy sampled value into committed transitions. It is
//! generic over the sampled value so the same state machine serves a single
//! line (`bool`) and a two-line switch ([`InputState`](crate::input::InputState)).
//!
//! A sample that differs from the stable value starts a transition. The new
//! value is committed only once it has been observed continuously for the full
//! window; reverting to the stable value earlier discards the transition.
//!
//! ## Example
//!
//! ```
//! use core::time::Duration;
//! use inkclock::{Debouncer, Timestamp};
//!
//! let mut line = Debouncer::new(true, Duration::from_millis(50));
//! let ms = Timestamp::from_millis;
//!
//! // 20 ms glitch: discarded
//! assert_eq!(line.update(Some(false), ms(0)), None);
//! assert_eq!(line.update(Some(true), ms(20)), None);
//!
//! // Held low for the whole window: committed
//! assert_eq!(line.update(Some(false), ms(100)), None);
//! assert_eq!(line.update(Some(false), ms(150)), Some(false));
//! assert_eq!(line.stable(), false);
//! ```

use core::time::Duration;

use crate::clock::Timestamp;

/// State of a [`Debouncer`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DebounceState<T> {
    /// The committed value is being observed
    Stable(T),
    /// A different value was observed and is waiting out the window
    Transitioning {
        /// Last committed value
        stable: T,
        /// Value waiting to be committed
        candidate: T,
        /// When the candidate was first observed
        since: Timestamp,
    },
}

/// Debounce state machine for one sampled value
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    state: DebounceState<T>,
    window: Duration,
}

impl<T: Copy + PartialEq> Debouncer<T> {
    /// Create a debouncer that starts stable at `initial`
    pub fn new(initial: T, window: Duration) -> Self {
        Self {
            state: DebounceState::Stable(initial),
            window,
        }
    }

    /// The last committed value
    pub fn stable(&self) -> T {
        match self.state {
            DebounceState::Stable(value) | DebounceState::Transitioning { stable: value, .. } => {
                value
            }
        }
    }

    /// Current state
    pub fn state(&self) -> DebounceState<T> {
        self.state
    }

    /// Debounce window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Feed one sample taken at `now`
    ///
    /// `None` means the value could not be read; the state is left untouched.
    /// Returns the newly committed value when a transition completes.
    pub fn update(&mut self, sample: Option<T>, now: Timestamp) -> Option<T> {
        let sample = sample?;
        match self.state {
            DebounceState::Stable(stable) => {
                if sample == stable {
                    return None;
                }
                self.state = DebounceState::Transitioning {
                    stable,
                    candidate: sample,
                    since: now,
                };
            }
            DebounceState::Transitioning {
                stable, candidate, ..
            } => {
                if sample == stable {
                    // bounce
                    self.state = DebounceState::Stable(stable);
                    return None;
                }
                if sample != candidate {
                    self.state = DebounceState::Transitioning {
                        stable,
                        candidate: sample,
                        since: now,
                    };
                }
            }
        }
        self.try_commit(now)
    }

    fn try_commit(&mut self, now: Timestamp) -> Option<T> {
        if let DebounceState::Transitioning {
            candidate, since, ..
        } = self.state
        {
            if now.saturating_duration_since(since) >= self.window {
                self.state = DebounceState::Stable(candidate);
                return Some(candidate);
            }
        }
        None
    }
}
