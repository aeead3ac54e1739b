use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use image_tracer::{
    edges::{Thresholds, THRESHOLD_MAX},
    gui::app::{run_app, AppConfig},
    preprocess::{load_source, select_image_path, PreprocessParams},
    region::CaptureScript,
    session::{transition, DrawParams, Stage},
    Result,
};

/// Trace an image's edges into another window with simulated clicks.
///
/// Tune the thresholds in the preview, press D, then point at the top-left
/// and bottom-right corners of the target area when the beeps count down.
#[derive(Parser, Debug)]
#[command(name = "image-tracer", version)]
struct Args {
    /// Image to trace. A file picker opens when omitted.
    image: Option<PathBuf>,

    /// Initial low threshold.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(0..=THRESHOLD_MAX as i64))]
    low: u32,

    /// Initial high threshold.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(0..=THRESHOLD_MAX as i64))]
    high: u32,

    /// Seconds to position the cursor before each corner is sampled.
    #[arg(long, default_value_t = 5)]
    lead_in_secs: u64,
}

fn run(args: Args) -> Result<()> {
    let mut stage = Stage::Idle;

    let path = select_image_path(args.image)?;
    let source = load_source(&path, &PreprocessParams::default())?;
    transition(&mut stage, Stage::ImageLoaded);

    let config = AppConfig {
        thresholds: Thresholds::new(args.low, args.high),
        draw: DrawParams {
            script: CaptureScript {
                lead_in: Duration::from_secs(args.lead_in_secs),
                ..CaptureScript::default()
            },
            ..DrawParams::default()
        },
    };

    pollster::block_on(run_app(source, config))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_without_arguments() {
        let args = Args::parse_from(["image-tracer"]);
        assert_eq!(args.image, None);
        assert_eq!((args.low, args.high), (50, 100));
        assert_eq!(args.lead_in_secs, 5);
    }

    #[test]
    fn thresholds_outside_slider_range_are_rejected() {
        assert!(Args::try_parse_from(["image-tracer", "--low", "1001"]).is_err());
        let args = Args::try_parse_from(["image-tracer", "pic.png", "--high", "1000"]).unwrap();
        assert_eq!(args.image, Some(PathBuf::from("pic.png")));
        assert_eq!(args.high, 1000);
    }
}
