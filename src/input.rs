use enigo::{
    Button, Coordinate,
    Direction::Click,
    Enigo, Mouse, Settings,
};

use crate::error::{Result, TracerError};
use crate::utils::{NormalizedPoint, ScreenPoint, ScreenSize};

/// Something that can report where the cursor currently is.
pub trait CursorSource {
    fn cursor_position(&mut self) -> Result<ScreenPoint>;
}

/// One simulated click destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickTarget {
    pub screen: ScreenPoint,
    pub normalized: NormalizedPoint,
}

/// Receives the synthesized pointer events of a draw pass.
pub trait PointerSink {
    /// Absolute move to `target` followed by a left press and release.
    fn click(&mut self, target: &ClickTarget) -> Result<()>;
}

/// Real pointer backed by `enigo`.
pub struct EnigoInput {
    enigo: Enigo,
}

impl EnigoInput {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| TracerError::Input(format!("could not initialise input simulation: {e}")))?;
        Ok(Self { enigo })
    }

    pub fn screen_size(&self) -> Result<ScreenSize> {
        let (width, height) = self
            .enigo
            .main_display()
            .map_err(|e| TracerError::Input(format!("could not query display size: {e}")))?;
        Ok(ScreenSize::new(width, height))
    }
}

impl CursorSource for EnigoInput {
    fn cursor_position(&mut self) -> Result<ScreenPoint> {
        let (x, y) = self
            .enigo
            .location()
            .map_err(|e| TracerError::Input(format!("could not read cursor position: {e}")))?;
        Ok(ScreenPoint::new(x, y))
    }
}

impl PointerSink for EnigoInput {
    fn click(&mut self, target: &ClickTarget) -> Result<()> {
        // enigo does its own absolute-space normalization, so it gets pixels.
        log::trace!(
            "click at ({}, {}) normalized ({}, {})",
            target.screen.x,
            target.screen.y,
            target.normalized.x,
            target.normalized.y
        );
        self.enigo
            .move_mouse(target.screen.x, target.screen.y, Coordinate::Abs)
            .and_then(|_| self.enigo.button(Button::Left, Click))
            .map_err(|e| TracerError::Input(format!("simulated click failed: {e}")))
    }
}
