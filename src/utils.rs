/// Upper bound of the normalized absolute pointer space, per axis.
pub const NORMALIZED_MAX: u16 = 65535;

/// A cursor position in screen pixels.
///
/// Signed because multi-monitor layouts can put the origin anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of the primary display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Converts a screen pixel into the 0..=65535 absolute pointer space.
    ///
    /// Each axis is scaled independently against the display extent and
    /// truncated, then clamped so points on or past the far edge still land
    /// inside the range.
    pub fn normalize(&self, point: ScreenPoint) -> NormalizedPoint {
        NormalizedPoint {
            x: normalize_axis(point.x, self.width),
            y: normalize_axis(point.y, self.height),
        }
    }
}

fn normalize_axis(value: i32, extent: i32) -> u16 {
    if extent <= 0 {
        return 0;
    }
    let scaled = (value as f64 / extent as f64) * NORMALIZED_MAX as f64;
    scaled.clamp(0.0, NORMALIZED_MAX as f64) as u16
}

/// A point in the normalized absolute pointer space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedPoint {
    pub x: u16,
    pub y: u16,
}
