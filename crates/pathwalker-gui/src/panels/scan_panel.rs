/// Scan panel — path input, start/stop controls and batch progress.
use crate::state::{AppPhase, AppState};
use egui::Ui;

/// Draw the scan panel (left column).
pub fn scan_panel(ui: &mut Ui, state: &mut AppState) {
    ui.group(|ui| {
        ui.heading("Выберите путь");
        ui.add_space(4.0);

        let editable = state.phase != AppPhase::Scanning;
        let response = ui.add_enabled(
            editable,
            egui::TextEdit::singleline(&mut state.path_input)
                .hint_text("Введите путь к каталогу")
                .desired_width(f32::INFINITY),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let start = ui.add_enabled(
                state.can_start(),
                egui::Button::new("▶ Запустить сканирование").min_size(egui::vec2(200.0, 28.0)),
            );
            if start.clicked() || (submitted && state.can_start()) {
                state.start_scan();
            }

            let stop = ui.add_enabled(
                state.phase == AppPhase::Scanning,
                egui::Button::new("⏹ Стоп").min_size(egui::vec2(70.0, 28.0)),
            );
            if stop.clicked() {
                state.cancel_scan();
            }
        });
    });

    ui.add_space(12.0);

    ui.group(|ui| {
        ui.heading("Прогресс сканирования");
        ui.add_space(4.0);

        // Progress is per directory batch, so the bar refills for each folder.
        let (fraction, text) = match state.phase {
            AppPhase::Scanning if state.batch_total > 0 => (
                state.batch_fraction(),
                format!("{} / {}", state.batch_processed, state.batch_total),
            ),
            AppPhase::Scanning => (0.0, String::new()),
            AppPhase::Done => (1.0, "Готово".to_string()),
            AppPhase::Idle => (0.0, String::new()),
        };
        ui.add(egui::ProgressBar::new(fraction).text(text).animate(
            state.phase == AppPhase::Scanning,
        ));

        if state.phase == AppPhase::Scanning && !state.current_dir.is_empty() {
            ui.add_space(2.0);
            ui.label(
                egui::RichText::new(&state.current_dir)
                    .size(11.0)
                    .color(ui.visuals().weak_text_color()),
            );
        }
    });
}
