/// Bottom status bar — scan progress and statistics.
use crate::state::{AppPhase, AppState};
use egui::Ui;
use pathwalker_core::model::size::{format_count, format_size};

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    // Extract theme-adaptive colours once for this frame.
    let color_accent = ui.visuals().hyperlink_color;
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();
    let color_warning = egui::Color32::from_rgb(0xfa, 0xb3, 0x87);
    let color_success = egui::Color32::from_rgb(0xa6, 0xe3, 0xa1);

    ui.horizontal(|ui| match state.phase {
        AppPhase::Idle => {
            ui.label(egui::RichText::new("Готов").size(12.0).color(color_weak));
        }
        AppPhase::Scanning => {
            ui.spinner();

            let display_path = truncate_path(&state.current_dir, 60);
            ui.label(
                egui::RichText::new(format!("Сканирование {display_path}..."))
                    .size(12.0)
                    .color(color_normal),
            );

            ui.separator();

            ui.label(
                egui::RichText::new(format!(
                    "{} файлов",
                    format_count(state.scan_entries_processed)
                ))
                .size(12.0)
                .color(color_normal),
            );

            if state.scan_skipped > 0 {
                ui.separator();
                ui.label(
                    egui::RichText::new(format!("{} ошибок", format_count(state.scan_skipped)))
                        .size(12.0)
                        .color(color_warning),
                );
            }
        }
        AppPhase::Done => match state.last_result {
            Some(result) => {
                ui.label(
                    egui::RichText::new("\u{2713} Сканирование завершено")
                        .size(12.0)
                        .color(color_success),
                );

                ui.separator();

                ui.label(
                    egui::RichText::new(format!("{} файлов", format_count(result.file_count)))
                        .size(12.0)
                        .color(color_normal),
                );

                ui.separator();

                ui.label(
                    egui::RichText::new(format_size(result.total_size_bytes))
                        .size(12.0)
                        .color(color_accent),
                );

                if let Some(duration) = state.last_duration {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("{:.1}s", duration.as_secs_f64()))
                            .size(12.0)
                            .color(color_weak),
                    );
                }

                if result.has_skipped() {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!(
                            "{} пропущено",
                            format_count(result.skipped_count)
                        ))
                        .size(12.0)
                        .color(color_warning),
                    );
                }
            }
            None => {
                ui.label(
                    egui::RichText::new("Сканирование не завершено")
                        .size(12.0)
                        .color(color_warning),
                );
            }
        },
    });
}

/// Truncate a path string to at most `max_chars` characters, replacing the
/// middle with "..." if needed.
fn truncate_path(path: &str, max_chars: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= max_chars {
        return path.to_string();
    }
    let half = max_chars.saturating_sub(3) / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}...{tail}")
}
