use crate::{edges::THRESHOLD_MAX, gui::{app::AppState, pipeline::ThresholdChanged}};

pub const QUIT_KEY: egui::Key = egui::Key::Q;
pub const DRAW_KEY: egui::Key = egui::Key::D;

/// What the keyboard asked for this frame.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeyCommand {
    Quit,
    Draw,
}

/// Quit takes priority when both keys land in the same frame.
pub fn read_key_command(ctx: &egui::Context) -> Option<KeyCommand> {
    ctx.input(|i| {
        if i.key_pressed(QUIT_KEY) {
            Some(KeyCommand::Quit)
        } else if i.key_pressed(DRAW_KEY) {
            Some(KeyCommand::Draw)
        } else {
            None
        }
    })
}

/// The "Low" and "High" sliders plus key hints.
///
/// Returns an event when either slider changed this frame.
pub fn populate_threshold_menu(app_state: &mut AppState, ui: &mut egui::Ui) -> Option<ThresholdChanged> {
    ui.heading("Edge Thresholds");

    let low = ui.add(egui::Slider::new(
        &mut app_state.slider_thresholds.low,
        0..=THRESHOLD_MAX
    ).text("Low"));
    let high = ui.add(egui::Slider::new(
        &mut app_state.slider_thresholds.high,
        0..=THRESHOLD_MAX
    ).text("High"));

    ui.separator();

    ui.label(format!("Edge pixels: {}", app_state.preview.mask().count()));
    if app_state.slider_thresholds.low > app_state.slider_thresholds.high {
        ui.label(egui::RichText::new("Low is above High; they are swapped for detection.").weak());
    }

    ui.separator();

    ui.heading("Keys");
    ui.label("D: capture a region and draw");
    ui.label("Q: quit");

    if low.changed() || high.changed() {
        Some(ThresholdChanged {
            low: app_state.slider_thresholds.low,
            high: app_state.slider_thresholds.high,
        })
    } else {
        None
    }
}

/// Shows the current mask at its native size.
pub fn populate_preview(app_state: &AppState, ui: &mut egui::Ui) {
    if let Some(texture) = &app_state.preview_texture {
        ui.centered_and_justified(|ui| {
            ui.image((texture.id(), texture.size_vec2()));
        });
    } else {
        ui.label("Preparing preview...");
    }
}
