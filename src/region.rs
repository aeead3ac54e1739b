use std::time::Duration;

use crate::cue::{Clock, Cue, CUE_PITCH_HZ};
use crate::error::Result;
use crate::input::CursorSource;
use crate::utils::ScreenPoint;

/// Timing of the cue sequence that precedes each cursor sample.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CaptureScript {
    pub pitch_hz: u32,
    /// Announces a capture and signals completion.
    pub long_cue: Duration,
    pub short_cue: Duration,
    /// Time the user gets to move the cursor into place.
    pub lead_in: Duration,
    pub countdown: u32,
    pub countdown_gap: Duration,
}

impl Default for CaptureScript {
    fn default() -> Self {
        Self {
            pitch_hz: CUE_PITCH_HZ,
            long_cue: Duration::from_millis(600),
            short_cue: Duration::from_millis(200),
            lead_in: Duration::from_secs(5),
            countdown: 3,
            countdown_gap: Duration::from_millis(600),
        }
    }
}

/// The two raw cursor samples, in capture order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedRegion {
    pub top_left: ScreenPoint,
    pub bottom_right: ScreenPoint,
}

/// Square drawing area centered inside the captured rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareRegion {
    pub x: i32,
    pub y: i32,
    side: i32,
}

impl SquareRegion {
    /// `None` unless `side` is positive.
    pub fn new(x: i32, y: i32, side: i32) -> Option<Self> {
        (side > 0).then_some(Self { x, y, side })
    }

    pub fn side(&self) -> i32 {
        self.side
    }
}

impl CapturedRegion {
    pub fn new(top_left: ScreenPoint, bottom_right: ScreenPoint) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Largest square that fits the captured rectangle, centered on the
    /// longer axis.
    ///
    /// Returns `None` when the second point is not strictly below and to the
    /// right of the first, since the side would be zero or negative.
    pub fn square(&self) -> Option<SquareRegion> {
        let width = self.bottom_right.x.saturating_sub(self.top_left.x);
        let height = self.bottom_right.y.saturating_sub(self.top_left.y);
        let side = width.min(height);
        if side <= 0 {
            return None;
        }

        SquareRegion::new(
            self.top_left.x + (width - side) / 2,
            self.top_left.y + (height - side) / 2,
            side,
        )
    }
}

/// Runs one cue sequence and samples the cursor at its end.
pub fn capture_point(
    script: &CaptureScript,
    cursor: &mut impl CursorSource,
    cue: &mut impl Cue,
    clock: &mut impl Clock,
) -> Result<ScreenPoint> {
    cue.tone(script.pitch_hz, script.long_cue)?;
    clock.sleep(script.lead_in);
    for _ in 0..script.countdown {
        cue.tone(script.pitch_hz, script.short_cue)?;
        clock.sleep(script.countdown_gap);
    }
    cursor.cursor_position()
}

/// Captures top-left then bottom-right, then plays the completion cue.
///
/// The point order is not validated here; see [`CapturedRegion::square`].
pub fn capture_region(
    script: &CaptureScript,
    cursor: &mut impl CursorSource,
    cue: &mut impl Cue,
    clock: &mut impl Clock,
) -> Result<CapturedRegion> {
    let top_left = capture_point(script, cursor, cue, clock)?;
    log::info!("Top left mouse position recorded at ({}, {})", top_left.x, top_left.y);

    let bottom_right = capture_point(script, cursor, cue, clock)?;
    log::info!(
        "Bottom right mouse position recorded at ({}, {})",
        bottom_right.x,
        bottom_right.y
    );

    cue.tone(script.pitch_hz, script.long_cue)?;
    Ok(CapturedRegion::new(top_left, bottom_right))
}
