/// Main `eframe::App` implementation for PathWalker.
///
/// Two columns: scan controls and progress on the left, the session log
/// and result labels on the right.
use crate::panels;
use crate::state::{AppPhase, AppState};
use crate::widgets;

/// The PathWalker application.
pub struct PathWalkerApp {
    state: AppState,
}

impl PathWalkerApp {
    /// Create a new application instance.
    ///
    /// `initial_path` pre-fills the path field.
    pub fn new(cc: &eframe::CreationContext<'_>, initial_path: Option<String>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let mut state = AppState::new();
        if let Some(path) = initial_path {
            state.path_input = path;
        }
        Self { state }
    }
}

impl eframe::App for PathWalkerApp {
    /// Override the GPU clear colour to match the active theme background,
    /// preventing a colour mismatch flash between frames.
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        // ── Process background messages ───────────────────────────────────
        self.state.process_scan_messages();

        // Keep repainting while the worker is producing events.
        if self.state.phase == AppPhase::Scanning {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        // ── Top bar ───────────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(32.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("PathWalker")
                            .size(18.0)
                            .strong()
                            .color(ui.visuals().hyperlink_color),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme_label = if self.state.dark_mode { "☀" } else { "🌙" };
                        if ui.button(theme_label).clicked() {
                            self.state.dark_mode = !self.state.dark_mode;
                        }
                    });
                });
            });

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &self.state);
                ui.add_space(2.0);
            });

        // ── Left: path, start button, progress ───────────────────────────
        egui::SidePanel::left("scan_panel")
            .default_width(360.0)
            .min_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                panels::scan_panel::scan_panel(ui, &mut self.state);
            });

        // ── Right: log and result labels ─────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::log_panel::log_panel(ui, &self.state);
        });
    }
}
