/// Log panel — scan history for this session and the last result's labels.
use crate::state::AppState;
use egui::Ui;

/// Draw the log panel (right column).
pub fn log_panel(ui: &mut Ui, state: &AppState) {
    let log_height = (ui.available_height() - 56.0).max(80.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_height(log_height);
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .max_height(log_height)
            .show(ui, |ui| {
                if state.log.is_empty() {
                    ui.label(
                        egui::RichText::new("Журнал пуст")
                            .italics()
                            .color(ui.visuals().weak_text_color()),
                    );
                }
                for line in &state.log {
                    ui.label(egui::RichText::new(line).monospace().size(12.0));
                }
            });
    });

    ui.add_space(6.0);
    ui.label(state.count_label());
    ui.label(state.size_label());
}
