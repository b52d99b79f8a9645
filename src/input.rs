//! Raw input lines and the events derived from them
//!
//! An [`InputSource`] samples digital line levels on demand. The
//! [`InputPoller`](crate::poller::InputPoller) turns those samples into
//! [`InputEvent`]s, which travel to the main loop through a bounded queue:
//! an [`EventSink`] on the producing side and an [`EventInbox`] on the
//! consuming side. `heapless::spsc` producers and consumers implement both
//! traits, so the producing side can live in an interrupt handler.
//!
//! Levels are electrical levels (`true` = high). Controls are wired active-low
//! with pull-ups, so a button press or an encoder detent is a falling edge.
//!
//! ## Example
//!
//! ```
//! use heapless::spsc::Queue;
//! use inkclock::{EventInbox, EventSink, InputEvent};
//!
//! let mut queue: Queue<InputEvent, 4> = Queue::new();
//! let (mut producer, mut consumer) = queue.split();
//!
//! assert!(producer.push(InputEvent::Toggle));
//! assert_eq!(consumer.pop(), Some(InputEvent::Toggle));
//! assert_eq!(consumer.pop(), None);
//! ```

use alloc::vec::Vec;
use embedded_hal::digital::InputPin;

/// Identifier of a physical input line (BCM GPIO number on the reference board)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineId(pub u8);

/// Samples raw line levels
pub trait InputSource {
    /// Read the current level of a line
    ///
    /// Returns `None` when the level cannot be read this time. Callers treat that
    /// as "no change"; it is never an error once the clock is running.
    fn read(&mut self, line: LineId) -> Option<bool>;

    /// Release the lines (pull-ups, edge detection) on shutdown
    fn release(&mut self) {}
}

/// [`InputSource`] over a set of embedded-hal input pins
///
/// ## Example
///
/// ```
/// use core::convert::Infallible;
/// use embedded_hal::digital::{ErrorType, InputPin};
/// use inkclock::{InputSource, LineId, PinBank};
///
/// struct Pin(bool);
/// impl ErrorType for Pin { type Error = Infallible; }
/// impl InputPin for Pin {
///     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(self.0) }
///     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(!self.0) }
/// }
///
/// let mut bank = PinBank::new();
/// bank.add(LineId(5), Pin(true));
/// assert_eq!(bank.read(LineId(5)), Some(true));
/// assert_eq!(bank.read(LineId(6)), None);
/// ```
pub struct PinBank<P> {
    pins: Vec<(LineId, P)>,
}

impl<P: InputPin> PinBank<P> {
    /// Create an empty bank
    pub fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Attach a pin to a line id, replacing any pin already bound to it
    pub fn add(&mut self, line: LineId, pin: P) -> &mut Self {
        self.pins.retain(|(id, _)| *id != line);
        self.pins.push((line, pin));
        self
    }

    /// Number of bound lines
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Whether no lines are bound
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Give the pins back
    pub fn into_pins(self) -> Vec<(LineId, P)> {
        self.pins
    }
}

impl<P: InputPin> Default for PinBank<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: InputPin> InputSource for PinBank<P> {
    fn read(&mut self, line: LineId) -> Option<bool> {
        let (_, pin) = self.pins.iter_mut().find(|(id, _)| *id == line)?;
        pin.is_high().ok()
    }
}

/// Position of a two-line, four-position slide switch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwitchPosition {
    /// Both lines low
    A,
    /// First line low, second high
    B,
    /// First line high, second low
    C,
    /// Both lines high
    D,
}

/// Snapshot of the levels of a two-line control
///
/// Compared by value to detect change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputState(pub [bool; 2]);

impl InputState {
    /// Build a state from the two line levels
    pub fn new(first: bool, second: bool) -> Self {
        Self([first, second])
    }

    /// Decode the slide switch position this state represents
    pub fn position(self) -> SwitchPosition {
        match self.0 {
            [false, false] => SwitchPosition::A,
            [false, true] => SwitchPosition::B,
            [true, false] => SwitchPosition::C,
            [true, true] => SwitchPosition::D,
        }
    }
}

/// Discrete, debounced input event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// One encoder detent; `+1` or `-1`
    Direction(i8),
    /// Button pressed
    Toggle,
    /// Slide switch moved to a new committed state
    PositionChanged(InputState),
}

/// Producing end of the event queue
pub trait EventSink {
    /// Queue an event; returns `false` if the queue is full and the event was dropped
    fn push(&mut self, event: InputEvent) -> bool;
}

/// Consuming end of the event queue
pub trait EventInbox {
    /// Take the oldest queued event
    fn pop(&mut self) -> Option<InputEvent>;
}

/// Inbox for deployments where every event comes from the in-loop poller
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInbox;

impl EventInbox for NoInbox {
    fn pop(&mut self) -> Option<InputEvent> {
        None
    }
}

impl<const N: usize> EventSink for heapless::spsc::Producer<'_, InputEvent, N> {
    fn push(&mut self, event: InputEvent) -> bool {
        self.enqueue(event).is_ok()
    }
}

impl<const N: usize> EventInbox for heapless::spsc::Consumer<'_, InputEvent, N> {
    fn pop(&mut self) -> Option<InputEvent> {
        self.dequeue()
    }
}

impl<const N: usize> EventSink for heapless::spsc::Queue<InputEvent, N> {
    fn push(&mut self, event: InputEvent) -> bool {
        self.enqueue(event).is_ok()
    }
}

impl<const N: usize> EventInbox for heapless::spsc::Queue<InputEvent, N> {
    fn pop(&mut self) -> Option<InputEvent> {
        self.dequeue()
    }
}

impl EventSink for Vec<InputEvent> {
    fn push(&mut self, event: InputEvent) -> bool {
        Vec::push(self, event);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Debug)]
    struct MockError;

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    struct FlakyPin {
        level: Option<bool>,
    }

    impl ErrorType for FlakyPin {
        type Error = MockError;
    }

    impl InputPin for FlakyPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            self.level.ok_or(MockError)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.level.map(|l| !l).ok_or(MockError)
        }
    }

    struct FixedPin(bool);

    impl ErrorType for FixedPin {
        type Error = Infallible;
    }

    impl InputPin for FixedPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0)
        }
    }

    #[test]
    fn test_pin_bank_unreadable_pin_reads_none() {
        let mut bank = PinBank::new();
        bank.add(LineId(13), FlakyPin { level: None });
        bank.add(LineId(5), FlakyPin { level: Some(false) });
        assert_eq!(bank.read(LineId(13)), None);
        assert_eq!(bank.read(LineId(5)), Some(false));
    }

    #[test]
    fn test_pin_bank_add_replaces_binding() {
        let mut bank = PinBank::new();
        bank.add(LineId(6), FixedPin(false));
        bank.add(LineId(6), FixedPin(true));
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.read(LineId(6)), Some(true));
    }

    #[test]
    fn test_switch_position_decoding() {
        assert_eq!(InputState::new(false, false).position(), SwitchPosition::A);
        assert_eq!(InputState::new(false, true).position(), SwitchPosition::B);
        assert_eq!(InputState::new(true, false).position(), SwitchPosition::C);
        assert_eq!(InputState::new(true, true).position(), SwitchPosition::D);
    }

    #[test]
    fn test_queue_reports_overflow() {
        // heapless spsc queues hold N - 1 items
        let mut queue: heapless::spsc::Queue<InputEvent, 3> = heapless::spsc::Queue::new();
        assert!(EventSink::push(&mut queue, InputEvent::Toggle));
        assert!(EventSink::push(&mut queue, InputEvent::Direction(1)));
        assert!(!EventSink::push(&mut queue, InputEvent::Direction(-1)));
        assert_eq!(EventInbox::pop(&mut queue), Some(InputEvent::Toggle));
        assert_eq!(EventInbox::pop(&mut queue), Some(InputEvent::Direction(1)));
        assert_eq!(EventInbox::pop(&mut queue), None);
    }

    #[test]
    fn test_no_inbox_is_always_empty() {
        assert_eq!(NoInbox.pop(), None);
    }
}
