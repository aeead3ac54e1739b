use crate::cue::{Clock, Cue, SystemClock, TerminalBell};
use crate::edges::EdgeMask;
use crate::error::Result;
use crate::input::{CursorSource, EnigoInput, PointerSink};
use crate::region::{capture_region, CaptureScript};
use crate::replay::{draw, RateLimit, ReplayStats};
use crate::utils::ScreenSize;

/// Where the program is in its single linear flow.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Stage {
    Idle,
    ImageLoaded,
    PreviewLoop,
    RegionCapture,
    Drawing,
    Exit,
}

/// Moves `stage` to `next`, logging the transition.
pub fn transition(stage: &mut Stage, next: Stage) {
    if *stage != next {
        log::debug!("stage {:?} -> {:?}", stage, next);
        *stage = next;
    }
}

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct DrawParams {
    pub script: CaptureScript,
    pub rate: RateLimit,
}

/// Captures a region and replays `mask` into it through the given devices.
///
/// Blocks for the whole cue script and the replay.
pub fn draw_pass<D>(
    mask: &EdgeMask,
    params: &DrawParams,
    screen: ScreenSize,
    device: &mut D,
    cue: &mut impl Cue,
    clock: &mut impl Clock,
    mut on_stage: impl FnMut(Stage),
) -> Result<ReplayStats>
where
    D: CursorSource + PointerSink,
{
    log::info!("Beginning drawing process");

    on_stage(Stage::RegionCapture);
    let captured = capture_region(&params.script, device, cue, clock)?;
    on_stage(Stage::Drawing);
    let stats = draw(mask, captured.square(), screen, device, clock, params.rate)?;

    log::info!("Drawing complete: {} points drawn", stats.clicks);
    cue.tone(params.script.pitch_hz, params.script.long_cue)?;
    Ok(stats)
}

/// [`draw_pass`] against the real pointer, terminal bell and wall clock.
pub fn run_draw_pass(
    mask: &EdgeMask,
    params: &DrawParams,
    on_stage: impl FnMut(Stage),
) -> Result<ReplayStats> {
    let mut device = EnigoInput::new()?;
    let screen = device.screen_size()?;
    draw_pass(
        mask,
        params,
        screen,
        &mut device,
        &mut TerminalBell::stdout(),
        &mut SystemClock,
        on_stage,
    )
}
