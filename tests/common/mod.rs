#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;

use embedded_hal::delay::DelayNs;
use inkclock::{
    Clock, Dimensions, Frame, InputSource, LineId, PanelDriver, PanelError, Timestamp, WallTime,
};

/// Clock advanced by hand
#[derive(Default)]
pub struct ManualClock {
    ms: Cell<u64>,
    seconds_of_day: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ms(&self, ms: u64) {
        self.ms.set(ms);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.ms.set(self.ms.get() + ms);
    }

    pub fn set_time(&self, hour: u64, minute: u64) {
        self.seconds_of_day.set(hour * 3600 + minute * 60);
    }
}

impl Clock for &ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.ms.get())
    }

    fn local_time(&self) -> WallTime {
        WallTime::from_seconds_of_day(self.seconds_of_day.get())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelCall {
    Initialize,
    Clear,
    Full,
    Partial,
    Sleep,
}

/// Panel that records calls and can be told to fail
pub struct RecordingPanel {
    pub dims: Dimensions,
    pub calls: Vec<PanelCall>,
    pub frames: Vec<Frame>,
    pub fail_next_display: Option<PanelError<&'static str>>,
    pub fail_sleep: bool,
}

impl RecordingPanel {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            dims: Dimensions::new(width, height).unwrap(),
            calls: Vec::new(),
            frames: Vec::new(),
            fail_next_display: None,
            fail_sleep: false,
        }
    }

    /// Display calls only
    pub fn refreshes(&self) -> Vec<PanelCall> {
        self.calls
            .iter()
            .copied()
            .filter(|c| matches!(c, PanelCall::Full | PanelCall::Partial))
            .collect()
    }

    fn record(&mut self, call: PanelCall) {
        self.calls.push(call);
    }

    fn display(&mut self, frame: &Frame, call: PanelCall) -> Result<(), PanelError<&'static str>> {
        if let Some(err) = self.fail_next_display.take() {
            return Err(err);
        }
        self.record(call);
        self.frames.push(frame.clone());
        Ok(())
    }
}

impl PanelDriver for RecordingPanel {
    type Error = &'static str;

    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn initialize(&mut self) -> Result<(), PanelError<Self::Error>> {
        self.record(PanelCall::Initialize);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PanelError<Self::Error>> {
        self.record(PanelCall::Clear);
        Ok(())
    }

    fn display_full(&mut self, frame: &Frame) -> Result<(), PanelError<Self::Error>> {
        self.display(frame, PanelCall::Full)
    }

    fn display_partial(&mut self, frame: &Frame) -> Result<(), PanelError<Self::Error>> {
        self.display(frame, PanelCall::Partial)
    }

    fn sleep(&mut self) -> Result<(), PanelError<Self::Error>> {
        if self.fail_sleep {
            return Err(PanelError::Io("sleep"));
        }
        self.record(PanelCall::Sleep);
        Ok(())
    }
}

/// Input lines set by the test
#[derive(Default)]
pub struct Lines {
    levels: HashMap<u8, Option<bool>>,
    pub released: bool,
}

impl Lines {
    pub fn with(lines: &[(u8, bool)]) -> Self {
        Self {
            levels: lines.iter().map(|(id, l)| (*id, Some(*l))).collect(),
            released: false,
        }
    }

    pub fn set(&mut self, line: u8, level: bool) {
        self.levels.insert(line, Some(level));
    }

    pub fn unplug(&mut self, line: u8) {
        self.levels.insert(line, None);
    }
}

impl InputSource for Lines {
    fn read(&mut self, line: LineId) -> Option<bool> {
        self.levels.get(&line.0).copied().flatten()
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Delay that moves a [`ManualClock`] forward instead of sleeping
pub struct ClockDelay<'a> {
    pub clock: &'a ManualClock,
    pub calls: u32,
    pub on_delay: Option<Box<dyn FnMut(u32) + 'a>>,
}

impl<'a> ClockDelay<'a> {
    pub fn new(clock: &'a ManualClock) -> Self {
        Self {
            clock,
            calls: 0,
            on_delay: None,
        }
    }
}

impl DelayNs for ClockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ms(u64::from(ns / 1_000_000));
        self.calls += 1;
        if let Some(hook) = self.on_delay.as_mut() {
            hook(self.calls);
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ms(u64::from(ms));
        self.calls += 1;
        if let Some(hook) = self.on_delay.as_mut() {
            hook(self.calls);
        }
    }
}
