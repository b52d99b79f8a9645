//! Refresh scheduling
//!
//! The [`RefreshScheduler`] decides on every tick whether the panel is left
//! alone, gets a partial refresh, or gets a full refresh.
//!
//! ## Refresh rules
//!
//! - Nothing is displayed within `partial_interval` of the previous display.
//! - A display is Full when a full refresh is pending (startup, profile
//!   change), when the frame asks for one, or when `full_interval` has passed
//!   since the last full refresh. Otherwise it is Partial.
//! - A profile change never skips the rate limit; it only turns the next
//!   display into a Full one.
//! - A transient panel error leaves every timestamp untouched, so the next
//!   tick tries again. A panel fault is returned to the caller.
//!
//! ## Example
//!
//! ```
//! use core::time::Duration;
//! use inkclock::{RefreshClass, RefreshPolicy, Timestamp};
//!
//! let policy = RefreshPolicy::new(Duration::from_secs(1), Duration::from_secs(300));
//! // Nothing shown yet: due, and the first display is Full
//! assert!(policy.is_due(Timestamp::ZERO));
//! assert_eq!(policy.classify(Timestamp::ZERO, false), RefreshClass::Full);
//! ```

use core::time::Duration;

use log::{debug, error, warn};

use crate::clock::Timestamp;
use crate::config::ClockConfig;
use crate::error::{ConfigError, Error, PanelError};
use crate::frame::Frame;
use crate::panel::PanelDriver;

/// Kind of panel refresh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshClass {
    /// Fast update without clearing ghosts
    Partial,
    /// Initialize, clear and redraw
    Full,
}

/// Scheduler state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the rate limit to pass
    #[default]
    Idle,
    /// A frame is being built
    Due,
    /// A panel call is in flight
    Displaying,
}

/// What a tick did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Too soon after the previous display
    Skipped,
    /// A frame reached the panel
    Displayed(RefreshClass),
    /// The panel reported a transient error; retried on the next tick
    Retrying(RefreshClass),
}

/// Refresh timing state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshPolicy {
    partial_interval: Duration,
    full_interval: Duration,
    last_display: Option<Timestamp>,
    last_full: Option<Timestamp>,
    pending_full: bool,
}

impl RefreshPolicy {
    /// Policy with nothing displayed yet and a full refresh pending
    pub fn new(partial_interval: Duration, full_interval: Duration) -> Self {
        Self {
            partial_interval,
            full_interval,
            last_display: None,
            last_full: None,
            pending_full: true,
        }
    }

    /// Minimum spacing between two displays
    pub fn partial_interval(&self) -> Duration {
        self.partial_interval
    }

    /// Maximum spacing between two full refreshes
    pub fn full_interval(&self) -> Duration {
        self.full_interval
    }

    /// Time of the last successful display
    pub fn last_display_time(&self) -> Option<Timestamp> {
        self.last_display
    }

    /// Time of the last successful full refresh
    pub fn last_full_time(&self) -> Option<Timestamp> {
        self.last_full
    }

    /// Whether the next display must be Full
    pub fn pending_full(&self) -> bool {
        self.pending_full
    }

    /// Make the next display Full
    pub fn request_full(&mut self) {
        self.pending_full = true;
    }

    /// Whether the rate limit allows a display at `now`
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.last_display
            .is_none_or(|last| now.saturating_duration_since(last) >= self.partial_interval)
    }

    /// Refresh class for a display at `now`
    pub fn classify(&self, now: Timestamp, frame_requires_full: bool) -> RefreshClass {
        let periodic = self
            .last_full
            .is_none_or(|last| now.saturating_duration_since(last) >= self.full_interval);
        if frame_requires_full || self.pending_full || periodic {
            RefreshClass::Full
        } else {
            RefreshClass::Partial
        }
    }

    /// Record a successful display
    pub fn record(&mut self, now: Timestamp, class: RefreshClass) {
        self.last_display = Some(now);
        if class == RefreshClass::Full {
            self.last_full = Some(now);
            self.pending_full = false;
        }
    }
}

/// Drives the panel according to a [`RefreshPolicy`]
#[derive(Clone, Debug)]
pub struct RefreshScheduler {
    policy: RefreshPolicy,
    state: SchedulerState,
}

impl RefreshScheduler {
    /// Scheduler with the given intervals
    pub fn new(partial_interval: Duration, full_interval: Duration) -> Self {
        Self {
            policy: RefreshPolicy::new(partial_interval, full_interval),
            state: SchedulerState::Idle,
        }
    }

    /// Scheduler with the intervals of `config`
    pub fn from_config(config: &ClockConfig) -> Self {
        Self::new(config.partial_interval, config.full_interval)
    }

    /// Timing state
    pub fn policy(&self) -> &RefreshPolicy {
        &self.policy
    }

    /// Current state; [`SchedulerState::Idle`] between ticks
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The active profile changed; the next display is Full
    pub fn note_profile_change(&mut self) {
        self.policy.request_full();
    }

    /// Request a Full display and run a tick
    ///
    /// Used once before the main loop. If the panel reports a transient error
    /// the request stays pending for the following ticks.
    pub fn start<P, R>(
        &mut self,
        now: Timestamp,
        panel: &mut P,
        render: R,
    ) -> Result<TickOutcome, Error<P::Error>>
    where
        P: PanelDriver,
        R: FnOnce(bool) -> Result<Frame, ConfigError>,
    {
        self.policy.request_full();
        self.tick(now, panel, render)
    }

    /// Run one scheduling step at `now`
    ///
    /// `render` builds the frame; its argument is the full-refresh hint to store
    /// in the frame.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the frame cannot be built or does not match the panel
    /// - [`Error::Panel`] if the panel reports a fault
    pub fn tick<P, R>(
        &mut self,
        now: Timestamp,
        panel: &mut P,
        render: R,
    ) -> Result<TickOutcome, Error<P::Error>>
    where
        P: PanelDriver,
        R: FnOnce(bool) -> Result<Frame, ConfigError>,
    {
        if !self.policy.is_due(now) {
            return Ok(TickOutcome::Skipped);
        }

        self.state = SchedulerState::Due;
        let frame = match render(self.policy.pending_full) {
            Ok(frame) => frame,
            Err(e) => {
                self.state = SchedulerState::Idle;
                return Err(Error::Config(e));
            }
        };
        let panel_dims = panel.dimensions();
        if frame.dimensions() != panel_dims {
            self.state = SchedulerState::Idle;
            let frame_dims = frame.dimensions();
            return Err(Error::Config(ConfigError::DimensionMismatch {
                panel: (panel_dims.width, panel_dims.height),
                frame: (frame_dims.width, frame_dims.height),
            }));
        }
        let class = self.policy.classify(now, frame.requires_full());

        self.state = SchedulerState::Displaying;
        debug!("{:?} refresh at {} ms", class, now.as_millis());
        let result = display(panel, &frame, class);
        self.state = SchedulerState::Idle;

        match result {
            Ok(()) => {
                self.policy.record(now, class);
                Ok(TickOutcome::Displayed(class))
            }
            Err(PanelError::Io(e)) => {
                warn!("{:?} refresh failed, retrying next tick: {:?}", class, e);
                Ok(TickOutcome::Retrying(class))
            }
            Err(PanelError::Fault(e)) => {
                error!("Panel fault during {:?} refresh: {:?}", class, e);
                Err(Error::Panel(e))
            }
        }
    }
}

fn display<P: PanelDriver>(
    panel: &mut P,
    frame: &Frame,
    class: RefreshClass,
) -> Result<(), PanelError<P::Error>> {
    match class {
        RefreshClass::Full => {
            panel.initialize()?;
            panel.clear()?;
            panel.display_full(frame)
        }
        RefreshClass::Partial => panel.display_partial(frame),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimensions;
    use crate::frame::Canvas;
    use alloc::vec::Vec;
    use embedded_graphics_core::pixelcolor::BinaryColor;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Call {
        Initialize,
        Clear,
        Full,
        Partial,
    }

    #[derive(Default)]
    struct MockPanel {
        calls: Vec<Call>,
        fail_next: Option<PanelError<&'static str>>,
    }

    impl MockPanel {
        fn fail(&mut self) -> Result<(), PanelError<&'static str>> {
            self.fail_next.take().map_or(Ok(()), Err)
        }
    }

    impl PanelDriver for MockPanel {
        type Error = &'static str;

        fn dimensions(&self) -> Dimensions {
            Dimensions::new(8, 2).unwrap()
        }

        fn initialize(&mut self) -> Result<(), PanelError<Self::Error>> {
            self.calls.push(Call::Initialize);
            Ok(())
        }

        fn clear(&mut self) -> Result<(), PanelError<Self::Error>> {
            self.calls.push(Call::Clear);
            Ok(())
        }

        fn display_full(&mut self, _frame: &Frame) -> Result<(), PanelError<Self::Error>> {
            self.fail()?;
            self.calls.push(Call::Full);
            Ok(())
        }

        fn display_partial(&mut self, _frame: &Frame) -> Result<(), PanelError<Self::Error>> {
            self.fail()?;
            self.calls.push(Call::Partial);
            Ok(())
        }

        fn sleep(&mut self) -> Result<(), PanelError<Self::Error>> {
            Ok(())
        }
    }

    fn frame(requires_full: bool) -> Result<Frame, ConfigError> {
        Ok(Canvas::new(Dimensions::new(8, 2).unwrap(), BinaryColor::Off).finish(requires_full))
    }

    fn secs(s: u64) -> Timestamp {
        Timestamp::from_secs(s)
    }

    fn scheduler() -> RefreshScheduler {
        RefreshScheduler::new(Duration::from_secs(1), Duration::from_secs(10))
    }

    #[test]
    fn test_full_path_initializes_and_clears() {
        let mut s = scheduler();
        let mut panel = MockPanel::default();
        let outcome = s.start(secs(0), &mut panel, frame).unwrap();
        assert_eq!(outcome, TickOutcome::Displayed(RefreshClass::Full));
        assert_eq!(panel.calls, [Call::Initialize, Call::Clear, Call::Full]);
        assert!(!s.policy().pending_full());
        assert_eq!(s.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_render_hint_follows_pending_full() {
        let mut s = scheduler();
        let mut panel = MockPanel::default();
        let mut hints = Vec::new();
        s.start(secs(0), &mut panel, |full| {
            hints.push(full);
            frame(full)
        })
        .unwrap();
        s.tick(secs(1), &mut panel, |full| {
            hints.push(full);
            frame(full)
        })
        .unwrap();
        assert_eq!(hints, [true, false]);
    }

    #[test]
    fn test_rate_limit_skips_without_rendering() {
        let mut s = scheduler();
        let mut panel = MockPanel::default();
        s.start(secs(0), &mut panel, frame).unwrap();
        let outcome = s
            .tick(Timestamp::from_millis(999), &mut panel, |_| {
                panic!("must not render while rate limited")
            })
            .unwrap();
        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(
            s.tick(secs(1), &mut panel, frame).unwrap(),
            TickOutcome::Displayed(RefreshClass::Partial)
        );
    }

    #[test]
    fn test_frame_hint_forces_full() {
        let mut s = scheduler();
        let mut panel = MockPanel::default();
        s.start(secs(0), &mut panel, frame).unwrap();
        assert_eq!(
            s.tick(secs(1), &mut panel, |_| frame(true)).unwrap(),
            TickOutcome::Displayed(RefreshClass::Full)
        );
    }

    #[test]
    fn test_transient_error_keeps_timestamps() {
        let mut s = scheduler();
        let mut panel = MockPanel::default();
        s.start(secs(0), &mut panel, frame).unwrap();
        let before = *s.policy();

        panel.fail_next = Some(PanelError::Io("spi"));
        assert_eq!(
            s.tick(secs(1), &mut panel, frame).unwrap(),
            TickOutcome::Retrying(RefreshClass::Partial)
        );
        assert_eq!(*s.policy(), before);
        assert_eq!(s.state(), SchedulerState::Idle);

        // Still due on the very next tick
        assert_eq!(
            s.tick(Timestamp::from_millis(1_050), &mut panel, frame).unwrap(),
            TickOutcome::Displayed(RefreshClass::Partial)
        );
    }

    #[test]
    fn test_failed_startup_keeps_full_pending() {
        let mut s = scheduler();
        let mut panel = MockPanel {
            fail_next: Some(PanelError::Io("busy")),
            ..MockPanel::default()
        };
        assert_eq!(
            s.start(secs(0), &mut panel, frame).unwrap(),
            TickOutcome::Retrying(RefreshClass::Full)
        );
        assert!(s.policy().pending_full());
        assert_eq!(
            s.tick(secs(0), &mut panel, frame).unwrap(),
            TickOutcome::Displayed(RefreshClass::Full)
        );
    }

    #[test]
    fn test_fault_propagates() {
        let mut s = scheduler();
        let mut panel = MockPanel {
            fail_next: Some(PanelError::Fault("dead")),
            ..MockPanel::default()
        };
        let result = s.start(secs(0), &mut panel, frame);
        assert!(matches!(result, Err(Error::Panel("dead"))));
        assert_eq!(s.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_dimension_mismatch_is_config_error() {
        let mut s = scheduler();
        let mut panel = MockPanel::default();
        let result = s.start(secs(0), &mut panel, |full| {
            Ok(Canvas::new(Dimensions::new(16, 2).unwrap(), BinaryColor::Off).finish(full))
        });
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::DimensionMismatch {
                panel: (8, 2),
                frame: (16, 2)
            }))
        ));
        assert!(panel.calls.is_empty());
    }

    #[test]
    fn test_profile_change_waits_for_rate_limit() {
        let mut s = scheduler();
        let mut panel = MockPanel::default();
        s.start(secs(0), &mut panel, frame).unwrap();
        s.note_profile_change();
        assert_eq!(
            s.tick(Timestamp::from_millis(500), &mut panel, frame).unwrap(),
            TickOutcome::Skipped
        );
        assert_eq!(
            s.tick(secs(1), &mut panel, frame).unwrap(),
            TickOutcome::Displayed(RefreshClass::Full)
        );
    }
}
