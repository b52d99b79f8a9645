//! Main loop
//!
//! [`MainLoop`] owns every collaborator and the single active
//! [`RenderProfile`]. Each tick it:
//!
//! 1. polls the input lines and applies the resulting events
//! 2. drains the event inbox (events queued from an interrupt handler)
//! 3. lets the [`RefreshScheduler`] decide whether to display a frame
//!
//! The profile is only ever replaced by the loop itself, between ticks, so a
//! frame is always rendered from one complete profile.
//!
//! [`MainLoop::run`] adds the cadence and the shutdown sequence: the panel is
//! re-initialized, cleared and put to sleep, then the input lines are released.
//! The shutdown sequence runs however the loop ends.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{error, info};

use crate::clock::Clock;
use crate::config::ClockConfig;
use crate::error::{ConfigError, Error, PanelError};
use crate::font::{Font, FontProvider};
use crate::input::{EventInbox, InputEvent, InputSource, NoInbox};
use crate::panel::PanelDriver;
use crate::poller::InputPoller;
use crate::profile::{ProfileSelector, RenderProfile, Selection};
use crate::render::Renderer;
use crate::scheduler::{RefreshScheduler, TickOutcome};

type RunResult<T, E> = core::result::Result<T, Error<E>>;

/// The clock
///
/// ## Type Parameters
///
/// * `S` - [`InputSource`] for the fitted controls
/// * `P` - [`PanelDriver`]
/// * `C` - [`Clock`]
/// * `F` - [`Font`] type produced by the font provider
/// * `Q` - [`EventInbox`] for events produced outside the loop
pub struct MainLoop<S, P, C, F, Q = NoInbox> {
    poller: InputPoller<S>,
    panel: P,
    clock: C,
    renderer: Renderer<F>,
    inbox: Q,
    selector: ProfileSelector,
    scheduler: RefreshScheduler,
    profile: RenderProfile,
    poll_interval: Duration,
}

impl<S, P, C, F> MainLoop<S, P, C, F, NoInbox>
where
    S: InputSource,
    P: PanelDriver,
    C: Clock,
    F: Font,
{
    /// Validate `config` against the collaborators and assemble the clock
    ///
    /// Reads every configured input line once and loads every font face.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found; the clock must not start.
    pub fn new<FP>(
        config: &ClockConfig,
        source: S,
        panel: P,
        clock: C,
        fonts: &FP,
    ) -> Result<Self, ConfigError>
    where
        FP: FontProvider<Font = F>,
    {
        let selector = ProfileSelector::new(
            config.font_list.len(),
            config.default_profile,
            config.positions.clone(),
        )?;
        let renderer = Renderer::new(panel.dimensions(), config.rotation, fonts, config)?;
        let poller = InputPoller::new(source, config.controls, &config.debounce)?;

        // A slide switch selects the profile from its current position
        let profile = poller
            .switch_state()
            .map_or(selector.default_profile(), |state| selector.profile_for(state));

        Ok(Self {
            poller,
            panel,
            clock,
            renderer,
            inbox: NoInbox,
            selector,
            scheduler: RefreshScheduler::from_config(config),
            profile,
            poll_interval: config.poll_interval,
        })
    }
}

impl<S, P, C, F, Q> MainLoop<S, P, C, F, Q>
where
    S: InputSource,
    P: PanelDriver,
    C: Clock,
    F: Font,
    Q: EventInbox,
{
    /// Also take events from `inbox` every tick
    pub fn with_inbox<Q2: EventInbox>(self, inbox: Q2) -> MainLoop<S, P, C, F, Q2> {
        MainLoop {
            poller: self.poller,
            panel: self.panel,
            clock: self.clock,
            renderer: self.renderer,
            inbox,
            selector: self.selector,
            scheduler: self.scheduler,
            profile: self.profile,
            poll_interval: self.poll_interval,
        }
    }

    /// Active profile
    pub fn profile(&self) -> RenderProfile {
        self.profile
    }

    /// Refresh scheduler
    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Panel driver
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Panel driver, mutably
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Input poller
    pub fn poller_mut(&mut self) -> &mut InputPoller<S> {
        &mut self.poller
    }

    /// Clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Apply one input event; returns whether the profile changed
    pub fn apply(&mut self, event: InputEvent) -> bool {
        let Selection::Changed(next) = self.selector.select(&self.profile, event) else {
            return false;
        };
        match event {
            InputEvent::Direction(_) => info!(
                "Font changed to {}",
                self.renderer.font_name(next.font).unwrap_or("?")
            ),
            InputEvent::Toggle => info!("Time format changed to {:?}", next.time_format),
            InputEvent::PositionChanged(state) => {
                info!("Switch moved to {:?}: {:?}", state.position(), next);
            }
        }
        self.profile = next;
        self.scheduler.note_profile_change();
        true
    }

    /// Display the first frame with a full refresh
    ///
    /// # Errors
    ///
    /// Returns [`Error::Panel`] on a panel fault.
    pub fn start(&mut self) -> RunResult<TickOutcome, P::Error> {
        info!("Clock starting with {:?}", self.profile);
        let now = self.clock.now();
        let time = self.clock.local_time();
        let profile = self.profile;
        let renderer = &self.renderer;
        self.scheduler.start(now, &mut self.panel, |full| {
            renderer.render(&profile, time, full)
        })
    }

    /// One pass: inputs, inbox, scheduler
    ///
    /// # Errors
    ///
    /// Returns [`Error::Panel`] on a panel fault.
    pub fn tick(&mut self) -> RunResult<TickOutcome, P::Error> {
        let now = self.clock.now();
        for event in self.poller.poll(now) {
            self.apply(event);
        }
        while let Some(event) = self.inbox.pop() {
            self.apply(event);
        }

        let time = self.clock.local_time();
        let profile = self.profile;
        let renderer = &self.renderer;
        self.scheduler.tick(now, &mut self.panel, |full| {
            renderer.render(&profile, time, full)
        })
    }

    /// Blank the panel, put it to sleep and release the input lines
    ///
    /// Every step is attempted even if an earlier one fails.
    ///
    /// # Errors
    ///
    /// Returns the first panel error.
    pub fn shutdown(&mut self) -> RunResult<(), P::Error> {
        info!("Clock shutting down");
        let steps = [
            self.panel.initialize(),
            self.panel.clear(),
            self.panel.sleep(),
        ];
        self.poller.release();

        let mut first = None;
        for result in steps {
            if let Err(e) = result {
                error!("Shutdown step failed: {}", e);
                if first.is_none() {
                    first = Some(e);
                }
            }
        }
        match first {
            Some(PanelError::Io(e) | PanelError::Fault(e)) => Err(Error::Panel(e)),
            None => Ok(()),
        }
    }

    /// Run until `stop` is set, then shut down
    ///
    /// `stop` is checked between ticks; the loop waits the configured poll
    /// interval after each tick.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the loop, otherwise the first shutdown error.
    pub fn run<D: DelayNs>(&mut self, delay: &mut D, stop: &AtomicBool) -> RunResult<(), P::Error> {
        let result = self.run_until(delay, stop);
        if let Err(e) = &result {
            error!("Clock stopped: {}", e);
        }
        let shutdown = self.shutdown();
        result.and(shutdown)
    }

    fn run_until<D: DelayNs>(&mut self, delay: &mut D, stop: &AtomicBool) -> RunResult<(), P::Error> {
        let poll_ms = u32::try_from(self.poll_interval.as_millis()).unwrap_or(u32::MAX);
        self.start()?;
        while !stop.load(Ordering::Acquire) {
            delay.delay_ms(poll_ms);
            self.tick()?;
        }
        Ok(())
    }
}
