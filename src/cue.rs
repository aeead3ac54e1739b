use std::io::Write;
use std::time::Duration;

use crate::error::Result;

/// Pitch used for every cue, in Hz (C5).
pub const CUE_PITCH_HZ: u32 = 523;

/// Blocking wait. Tests swap in a recorder so timed scripts run instantly.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// An audible timing signal. Implementations block for `duration`.
pub trait Cue {
    fn tone(&mut self, pitch_hz: u32, duration: Duration) -> Result<()>;
}

/// Rings the terminal bell and holds for the tone's duration.
///
/// A bell has no pitch control, so `pitch_hz` only shows up in the trace log.
pub struct TerminalBell<W: Write, C: Clock> {
    out: W,
    clock: C,
}

impl TerminalBell<std::io::Stdout, SystemClock> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout(), SystemClock)
    }
}

impl<W: Write, C: Clock> TerminalBell<W, C> {
    pub fn new(out: W, clock: C) -> Self {
        Self { out, clock }
    }
}

impl<W: Write, C: Clock> Cue for TerminalBell<W, C> {
    fn tone(&mut self, pitch_hz: u32, duration: Duration) -> Result<()> {
        log::trace!("cue {pitch_hz} Hz for {duration:?}");
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        self.clock.sleep(duration);
        Ok(())
    }
}
