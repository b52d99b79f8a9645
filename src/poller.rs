//! Input polling and debouncing
//!
//! [`InputPoller`] samples the lines of the configured [`Controls`] and turns
//! committed transitions into [`InputEvent`]s:
//!
//! | Control        | Committed transition          | Event                          |
//! |----------------|-------------------------------|--------------------------------|
//! | Encoder CLK    | falling edge, DT high         | `Direction(+1)`                |
//! | Encoder CLK    | falling edge, DT low          | `Direction(-1)`                |
//! | Button         | falling edge (press)          | `Toggle`                       |
//! | Slide switch   | any change of the line pair   | `PositionChanged(new_state)`   |
//!
//! Rising edges of CLK and button releases are committed silently.

use core::time::Duration;

use log::{debug, warn};

use crate::clock::Timestamp;
use crate::debounce::Debouncer;
use crate::error::ConfigError;
use crate::input::{EventSink, InputEvent, InputSource, InputState, LineId};

/// Most events a single poll can produce (encoder step plus button press)
pub const MAX_EVENTS_PER_POLL: usize = 2;

/// Events produced by one poll
pub type PollEvents = heapless::Vec<InputEvent, MAX_EVENTS_PER_POLL>;

/// Debounce windows per kind of line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebounceConfig {
    /// Encoder CLK edges
    pub rotation: Duration,
    /// Push button
    pub button: Duration,
    /// Slide switch lines
    pub switch: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            rotation: Duration::from_millis(50),
            button: Duration::from_millis(300),
            switch: Duration::from_millis(200),
        }
    }
}

/// Physical controls fitted to the clock
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Controls {
    /// No controls; the profile never changes
    #[default]
    None,
    /// Rotary encoder with optional push button
    Encoder {
        /// Phase A line
        clk: LineId,
        /// Phase B line
        dt: LineId,
        /// Push button line
        button: Option<LineId>,
    },
    /// Four-position slide switch on two static lines
    SlideSwitch {
        /// First line
        first: LineId,
        /// Second line
        second: LineId,
    },
}

impl Controls {
    /// Encoder wiring of the reference board: CLK 5, DT 6, button 13
    pub const fn reference_encoder() -> Self {
        Self::Encoder {
            clk: LineId(5),
            dt: LineId(6),
            button: Some(LineId(13)),
        }
    }

    /// Slide switch wiring of the reference board: lines 27 and 22
    pub const fn reference_switch() -> Self {
        Self::SlideSwitch {
            first: LineId(27),
            second: LineId(22),
        }
    }
}

enum Channels {
    None,
    Encoder {
        clk: LineId,
        dt: LineId,
        phase_a: Debouncer<bool>,
        last_dt: bool,
        button: Option<(LineId, Debouncer<bool>)>,
    },
    Switch {
        lines: [LineId; 2],
        pair: Debouncer<InputState>,
    },
}

/// Debounces raw line levels into [`InputEvent`]s
pub struct InputPoller<S> {
    source: S,
    controls: Controls,
    channels: Channels,
}

impl<S: InputSource> InputPoller<S> {
    /// Create a poller, sampling every line once to seed the stable levels
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnreadableLine`] if a configured line cannot be read.
    pub fn new(
        mut source: S,
        controls: Controls,
        debounce: &DebounceConfig,
    ) -> Result<Self, ConfigError> {
        let channels = match controls {
            Controls::None => Channels::None,
            Controls::Encoder { clk, dt, button } => {
                let clk_level = read_required(&mut source, clk)?;
                let dt_level = read_required(&mut source, dt)?;
                let button = match button {
                    Some(line) => {
                        let level = read_required(&mut source, line)?;
                        Some((line, Debouncer::new(level, debounce.button)))
                    }
                    None => None,
                };
                Channels::Encoder {
                    clk,
                    dt,
                    phase_a: Debouncer::new(clk_level, debounce.rotation),
                    last_dt: dt_level,
                    button,
                }
            }
            Controls::SlideSwitch { first, second } => {
                let state = InputState::new(
                    read_required(&mut source, first)?,
                    read_required(&mut source, second)?,
                );
                Channels::Switch {
                    lines: [first, second],
                    pair: Debouncer::new(state, debounce.switch),
                }
            }
        };
        Ok(Self {
            source,
            controls,
            channels,
        })
    }

    /// The controls this poller watches
    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Last committed state of the slide switch, if one is fitted
    pub fn switch_state(&self) -> Option<InputState> {
        match &self.channels {
            Channels::Switch { pair, .. } => Some(pair.stable()),
            _ => None,
        }
    }

    /// Sample every line once and return the events committed at `now`
    pub fn poll(&mut self, now: Timestamp) -> PollEvents {
        let mut events = PollEvents::new();
        match &mut self.channels {
            Channels::None => {}
            Channels::Encoder {
                clk,
                dt,
                phase_a,
                last_dt,
                button,
            } => {
                let a = self.source.read(*clk);
                if let Some(level) = self.source.read(*dt) {
                    *last_dt = level;
                }
                if phase_a.update(a, now) == Some(false) {
                    let step = if *last_dt { 1 } else { -1 };
                    debug!("encoder step {}", step);
                    let _ = events.push(InputEvent::Direction(step));
                }
                if let Some((line, debouncer)) = button {
                    let level = self.source.read(*line);
                    if debouncer.update(level, now) == Some(false) {
                        debug!("button pressed");
                        let _ = events.push(InputEvent::Toggle);
                    }
                }
            }
            Channels::Switch { lines, pair } => {
                let sample = match (self.source.read(lines[0]), self.source.read(lines[1])) {
                    (Some(first), Some(second)) => Some(InputState::new(first, second)),
                    _ => None,
                };
                if let Some(state) = pair.update(sample, now) {
                    debug!("switch moved to {:?}", state.position());
                    let _ = events.push(InputEvent::PositionChanged(state));
                }
            }
        }
        events
    }

    /// Poll and forward the events to a queue
    ///
    /// Used when polling runs in a different context than the main loop. Events
    /// that do not fit are dropped and logged. Returns the number delivered.
    pub fn poll_into<K: EventSink>(&mut self, now: Timestamp, sink: &mut K) -> usize {
        let mut delivered = 0;
        for event in self.poll(now) {
            if sink.push(event) {
                delivered += 1;
            } else {
                warn!("event queue full, dropping {:?}", event);
            }
        }
        delivered
    }

    /// Release the input lines
    pub fn release(&mut self) {
        self.source.release();
    }

    /// Access the underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Access the underlying source mutably
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

fn read_required<S: InputSource>(source: &mut S, line: LineId) -> Result<bool, ConfigError> {
    source.read(line).ok_or(ConfigError::UnreadableLine(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Line levels set by the test; unlisted lines are unreadable
    #[derive(Default)]
    struct MockSource {
        levels: Vec<(LineId, Option<bool>)>,
        released: bool,
    }

    impl MockSource {
        fn with(lines: &[(u8, bool)]) -> Self {
            Self {
                levels: lines.iter().map(|(id, l)| (LineId(*id), Some(*l))).collect(),
                released: false,
            }
        }

        fn set(&mut self, line: u8, level: Option<bool>) {
            if let Some(entry) = self.levels.iter_mut().find(|(id, _)| id.0 == line) {
                entry.1 = level;
            }
        }
    }

    impl InputSource for MockSource {
        fn read(&mut self, line: LineId) -> Option<bool> {
            self.levels.iter().find(|(id, _)| *id == line)?.1
        }

        fn release(&mut self) {
            self.released = true;
        }
    }

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    fn encoder_poller() -> InputPoller<MockSource> {
        let source = MockSource::with(&[(5, true), (6, true), (13, true)]);
        InputPoller::new(source, Controls::reference_encoder(), &DebounceConfig::default())
            .unwrap()
    }

    #[test]
    fn test_unreadable_line_at_startup_is_config_error() {
        let source = MockSource::with(&[(5, true)]);
        let result = InputPoller::new(
            source,
            Controls::reference_encoder(),
            &DebounceConfig::default(),
        );
        assert!(matches!(result, Err(ConfigError::UnreadableLine(LineId(6)))));
    }

    #[test]
    fn test_falling_clk_with_dt_high_steps_forward() {
        let mut poller = encoder_poller();
        poller.source_mut().set(5, Some(false));
        assert!(poller.poll(ms(0)).is_empty());
        assert_eq!(poller.poll(ms(50)).as_slice(), &[InputEvent::Direction(1)]);
    }

    #[test]
    fn test_falling_clk_with_dt_low_steps_backward() {
        let mut poller = encoder_poller();
        poller.source_mut().set(6, Some(false));
        poller.source_mut().set(5, Some(false));
        assert!(poller.poll(ms(0)).is_empty());
        assert_eq!(poller.poll(ms(60)).as_slice(), &[InputEvent::Direction(-1)]);
    }

    #[test]
    fn test_rising_clk_emits_nothing() {
        let source = MockSource::with(&[(5, false), (6, true), (13, true)]);
        let mut poller = InputPoller::new(
            source,
            Controls::reference_encoder(),
            &DebounceConfig::default(),
        )
        .unwrap();
        poller.source_mut().set(5, Some(true));
        assert!(poller.poll(ms(0)).is_empty());
        assert!(poller.poll(ms(100)).is_empty());
    }

    #[test]
    fn test_dt_unreadable_uses_last_level() {
        let mut poller = encoder_poller();
        poller.source_mut().set(5, Some(false));
        poller.poll(ms(0));
        poller.source_mut().set(6, None);
        assert_eq!(poller.poll(ms(50)).as_slice(), &[InputEvent::Direction(1)]);
    }

    #[test]
    fn test_button_press_toggles_and_release_is_ignored() {
        let mut poller = encoder_poller();
        poller.source_mut().set(13, Some(false));
        assert!(poller.poll(ms(0)).is_empty());
        assert!(poller.poll(ms(200)).is_empty());
        assert_eq!(poller.poll(ms(300)).as_slice(), &[InputEvent::Toggle]);

        poller.source_mut().set(13, Some(true));
        assert!(poller.poll(ms(400)).is_empty());
        assert!(poller.poll(ms(800)).is_empty());
    }

    #[test]
    fn test_button_bounce_shorter_than_window_is_ignored() {
        let mut poller = encoder_poller();
        for (t, level) in [(0, false), (40, true), (80, false), (120, true)] {
            poller.source_mut().set(13, Some(level));
            assert!(poller.poll(ms(t)).is_empty());
        }
        assert!(poller.poll(ms(1_000)).is_empty());
    }

    #[test]
    fn test_switch_change_emits_position() {
        let source = MockSource::with(&[(27, true), (22, true)]);
        let mut poller = InputPoller::new(
            source,
            Controls::reference_switch(),
            &DebounceConfig::default(),
        )
        .unwrap();
        assert_eq!(poller.switch_state(), Some(InputState::new(true, true)));

        poller.source_mut().set(27, Some(false));
        assert!(poller.poll(ms(0)).is_empty());
        assert_eq!(
            poller.poll(ms(200)).as_slice(),
            &[InputEvent::PositionChanged(InputState::new(false, true))]
        );
        // Same committed state: no repeat
        assert!(poller.poll(ms(400)).is_empty());
    }

    #[test]
    fn test_switch_unreadable_line_is_silence() {
        let source = MockSource::with(&[(27, true), (22, true)]);
        let mut poller = InputPoller::new(
            source,
            Controls::reference_switch(),
            &DebounceConfig::default(),
        )
        .unwrap();
        poller.source_mut().set(22, None);
        assert!(poller.poll(ms(0)).is_empty());
        assert!(poller.poll(ms(1_000)).is_empty());
    }

    #[test]
    fn test_poll_into_forwards_and_counts() {
        let mut poller = encoder_poller();
        poller.source_mut().set(5, Some(false));
        poller.source_mut().set(13, Some(false));
        let mut sink: Vec<InputEvent> = Vec::new();
        assert_eq!(poller.poll_into(ms(0), &mut sink), 0);
        assert_eq!(poller.poll_into(ms(300), &mut sink), 2);
        assert_eq!(sink, [InputEvent::Direction(1), InputEvent::Toggle]);
    }

    #[test]
    fn test_release_reaches_source() {
        let mut poller = encoder_poller();
        poller.release();
        assert!(poller.source().released);
    }

    #[test]
    fn test_no_controls_never_reads() {
        let mut poller =
            InputPoller::new(MockSource::default(), Controls::None, &DebounceConfig::default())
                .unwrap();
        assert!(poller.poll(ms(0)).is_empty());
    }
}
