use std::path::Path;

use eframe::egui::{self, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct YtDatApp {
    pub state: AppState,
}

impl YtDatApp {
    /// Start with `path` already loaded, if given.
    pub fn new(path: Option<&Path>) -> Self {
        let mut app = Self::default();
        if let Some(path) = path {
            app.state.open_path(path);
        }
        app
    }
}

impl eframe::App for YtDatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, chart, rows ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a CSV file to get started  (File → Open…)");
                });
                return;
            }

            table::metrics(ui, &self.state);
            ui.separator();

            ui.horizontal(|ui: &mut Ui| {
                ui.heading("Views Over Time");
                if !self.state.series_by_content.is_empty() {
                    ui.checkbox(&mut self.state.split_by_content, "Split by Content");
                }
            });
            plot::views_chart(ui, &self.state, 260.0);
            ui.separator();

            ui.heading("Video Details");
            table::data_table(ui, &self.state);
        });
    }
}
