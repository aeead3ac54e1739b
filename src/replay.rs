use std::time::Duration;

use crate::cue::Clock;
use crate::edges::EdgeMask;
use crate::error::Result;
use crate::input::{ClickTarget, PointerSink};
use crate::region::SquareRegion;
use crate::utils::{ScreenPoint, ScreenSize};

/// Pause inserted between bursts of clicks so the receiving application's
/// input queue keeps up.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RateLimit {
    pub batch: u32,
    pub pause: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            batch: 6,
            pause: Duration::from_millis(1),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub clicks: usize,
    pub pauses: usize,
}

/// Nearest-neighbour index of `offset` (in `0..side`) into an axis of
/// length `extent`.
///
/// Integer form of `floor(offset / side * extent)`; always `< extent` when
/// `offset < side`.
pub fn mask_index(offset: i32, side: i32, extent: usize) -> usize {
    debug_assert!(offset >= 0 && offset < side);
    ((offset as u64 * extent as u64) / side as u64) as usize
}

/// Walks the square row by row and yields a click for every screen pixel
/// whose mapped mask pixel is set.
pub fn plan_clicks(mask: &EdgeMask, region: SquareRegion, screen: ScreenSize) -> Vec<ClickTarget> {
    let side = region.side();
    let mut targets = Vec::new();
    if mask.rows() == 0 || mask.cols() == 0 {
        return targets;
    }

    for y in 0..side {
        let row = mask_index(y, side, mask.rows());
        for x in 0..side {
            let col = mask_index(x, side, mask.cols());
            if mask.get(row, col) {
                let point = ScreenPoint::new(region.x + x, region.y + y);
                targets.push(ClickTarget {
                    screen: point,
                    normalized: screen.normalize(point),
                });
            }
        }
    }

    targets
}

/// Clicks every target in order, pausing after each full batch.
///
/// Stops at the first click the sink rejects; there is no resume.
pub fn replay(
    targets: &[ClickTarget],
    sink: &mut impl PointerSink,
    clock: &mut impl Clock,
    rate: RateLimit,
) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();
    let mut since_pause = 0u32;

    for target in targets {
        sink.click(target)?;
        stats.clicks += 1;

        since_pause += 1;
        if since_pause >= rate.batch.max(1) {
            clock.sleep(rate.pause);
            stats.pauses += 1;
            since_pause = 0;
        }
    }

    Ok(stats)
}

/// Plans and replays one drawing of `mask` into `region`.
///
/// A missing region (the captured corners were inverted or collapsed) draws
/// nothing.
pub fn draw(
    mask: &EdgeMask,
    region: Option<SquareRegion>,
    screen: ScreenSize,
    sink: &mut impl PointerSink,
    clock: &mut impl Clock,
    rate: RateLimit,
) -> Result<ReplayStats> {
    let Some(region) = region else {
        log::warn!("Selected region is empty or inverted; nothing to draw");
        return Ok(ReplayStats::default());
    };

    let targets = plan_clicks(mask, region, screen);
    log::debug!(
        "Drawing {} points into {}x{} square at ({}, {})",
        targets.len(),
        region.side(),
        region.side(),
        region.x,
        region.y
    );
    replay(&targets, sink, clock, rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TracerError;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq, Clone, Copy)]
    enum Event {
        Click(ScreenPoint),
        Pause,
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl PointerSink for Recorder {
        fn click(&mut self, target: &ClickTarget) -> Result<()> {
            self.0.borrow_mut().push(Event::Click(target.screen));
            Ok(())
        }
    }

    impl Clock for Recorder {
        fn sleep(&mut self, _duration: Duration) {
            self.0.borrow_mut().push(Event::Pause);
        }
    }

    struct FailAfter(usize);

    impl PointerSink for FailAfter {
        fn click(&mut self, _target: &ClickTarget) -> Result<()> {
            if self.0 == 0 {
                return Err(TracerError::Input("queue full".into()));
            }
            self.0 -= 1;
            Ok(())
        }
    }

    fn full_mask(rows: usize, cols: usize) -> EdgeMask {
        let mut mask = EdgeMask::empty(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                mask.set(r, c, true);
            }
        }
        mask
    }

    const SCREEN: ScreenSize = ScreenSize {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn mask_index_is_proportional_floor() {
        assert_eq!(mask_index(0, 100, 480), 0);
        assert_eq!(mask_index(50, 100, 480), 240);
        assert_eq!(mask_index(99, 100, 480), 475);
        assert_eq!(mask_index(1, 3, 480), 160);
        assert_eq!(mask_index(2, 3, 480), 320);
        // Upsampling repeats mask pixels.
        assert_eq!(mask_index(999, 1000, 480), 479);
        assert_eq!(mask_index(1, 1000, 480), 0);
        assert_eq!(mask_index(3, 1000, 480), 1);
    }

    #[test]
    fn full_mask_clicks_every_pixel_in_row_order() {
        let region = SquareRegion::new(50, 60, 3).unwrap();
        let targets = plan_clicks(&full_mask(10, 10), region, SCREEN);
        let points: Vec<_> = targets.iter().map(|t| (t.screen.x, t.screen.y)).collect();
        assert_eq!(
            points,
            vec![(50, 60), (51, 60), (52, 60), (50, 61), (51, 61), (52, 61), (50, 62), (51, 62), (52, 62)]
        );
        assert_eq!(targets[0].normalized, SCREEN.normalize(ScreenPoint::new(50, 60)));
    }

    #[test]
    fn at_most_six_clicks_between_pauses() {
        let recorder = Recorder::default();
        let targets = plan_clicks(&full_mask(4, 4), SquareRegion::new(0, 0, 5).unwrap(), SCREEN);
        assert_eq!(targets.len(), 25);

        let stats = replay(&targets, &mut recorder.clone(), &mut recorder.clone(), RateLimit::default()).unwrap();
        assert_eq!(stats, ReplayStats { clicks: 25, pauses: 4 });

        let mut run = 0;
        for event in recorder.0.borrow().iter() {
            match event {
                Event::Click(_) => {
                    run += 1;
                    assert!(run <= 6, "more than six clicks without a pause");
                }
                Event::Pause => {
                    assert_eq!(run, 6);
                    run = 0;
                }
            }
        }
    }

    #[test]
    fn missing_region_draws_nothing() {
        let recorder = Recorder::default();
        let stats = draw(
            &full_mask(480, 480),
            None,
            SCREEN,
            &mut recorder.clone(),
            &mut recorder.clone(),
            RateLimit::default(),
        )
        .unwrap();
        assert_eq!(stats, ReplayStats::default());
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn empty_mask_draws_nothing() {
        let targets = plan_clicks(&EdgeMask::empty(480, 480), SquareRegion::new(0, 0, 200).unwrap(), SCREEN);
        assert!(targets.is_empty());
        assert!(plan_clicks(&EdgeMask::empty(0, 0), SquareRegion::new(0, 0, 200).unwrap(), SCREEN).is_empty());
    }

    #[test]
    fn sink_failure_aborts_the_pass() {
        let targets = plan_clicks(&full_mask(2, 2), SquareRegion::new(0, 0, 4).unwrap(), SCREEN);
        let mut clock = Recorder::default();
        let err = replay(&targets, &mut FailAfter(3), &mut clock, RateLimit::default()).unwrap_err();
        assert!(matches!(err, TracerError::Input(_)));
    }

    proptest! {
        #[test]
        fn mapped_indices_stay_inside_mask(
            side in 1i32..600,
            rows in 1usize..600,
            cols in 1usize..600,
            offset_frac in 0.0f64..1.0,
        ) {
            let offset = ((side as f64 * offset_frac) as i32).min(side - 1);
            prop_assert!(mask_index(offset, side, rows) < rows);
            prop_assert!(mask_index(offset, side, cols) < cols);
            prop_assert!(mask_index(side - 1, side, rows) < rows);
        }

        #[test]
        fn planned_clicks_stay_inside_region(
            side in 1i32..80,
            x in -2000i32..2000,
            y in -2000i32..2000,
        ) {
            let region = SquareRegion::new(x, y, side).unwrap();
            let targets = plan_clicks(&full_mask(13, 29), region, SCREEN);
            prop_assert_eq!(targets.len(), (side * side) as usize);
            for t in targets {
                prop_assert!(t.screen.x >= x && t.screen.x < x + side);
                prop_assert!(t.screen.y >= y && t.screen.y < y + side);
            }
        }
    }
}
