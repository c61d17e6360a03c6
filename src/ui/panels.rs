use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use ytdat::data::export::default_file_name;
use ytdat::data::model::TextField;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date ranges ----
            for c in &mut state.controls.dates {
                ui.strong(format!("{} range", c.field));
                let start_salt = format!("{}-start", c.field);
                let end_salt = format!("{}-end", c.field);
                egui::Grid::new(format!("{}-grid", c.field))
                    .num_columns(2)
                    .show(ui, |ui: &mut Ui| {
                        ui.label("From");
                        changed |= ui
                            .add(DatePickerButton::new(&mut c.start).id_salt(&start_salt))
                            .changed();
                        ui.end_row();
                        ui.label("To");
                        changed |= ui
                            .add(DatePickerButton::new(&mut c.end).id_salt(&end_salt))
                            .changed();
                        ui.end_row();
                    });
                ui.separator();
            }

            // ---- Numeric ranges ----
            for c in &mut state.controls.numbers {
                ui.strong(format!("{} range", c.field));
                let (lo, hi) = c.bounds;
                let speed = ((hi - lo) / 200.0).max(0.01);
                ui.horizontal(|ui: &mut Ui| {
                    changed |= ui
                        .add(DragValue::new(&mut c.min).range(lo..=hi).speed(speed))
                        .changed();
                    ui.label("to");
                    changed |= ui
                        .add(DragValue::new(&mut c.max).range(lo..=hi).speed(speed))
                        .changed();
                });
                ui.separator();
            }

            // ---- Label selections (collapsible) ----
            for c in &mut state.controls.texts {
                let header_text = format!(
                    "{}  ({}/{})",
                    c.field,
                    c.selected.len(),
                    c.options.len()
                );

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(c.field)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                c.select_all();
                                changed = true;
                            }
                            if ui.small_button("None").clicked() {
                                c.select_none();
                                changed = true;
                            }
                        });

                        let mut toggled = None;
                        for label in &c.options {
                            let mut text = RichText::new(label);
                            if let Some(cm) = &state.color_map {
                                if c.field == TextField::Content {
                                    text = text.color(cm.color_for(label));
                                }
                            }
                            let mut checked = c.selected.contains(label);
                            if ui.checkbox(&mut checked, text).changed() {
                                toggled = Some(label.clone());
                            }
                        }
                        if let Some(label) = toggled {
                            c.toggle(&label);
                            changed = true;
                        }
                    });
            }

            ui.add_space(8.0);
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });

    if changed {
        state.refilter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.table.is_some(), egui::Button::new("Save filtered…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            if let Some(name) = state.source.as_deref().and_then(|p| p.file_name()) {
                ui.label(RichText::new(name.to_string_lossy()).strong());
            }
            ui.label(format!(
                "{} rows loaded, {} shown",
                table.len(),
                state.result.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open YouTube statistics")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let Some(table) = &state.table else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(default_file_name(table))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.save_path(&path);
    }
}
