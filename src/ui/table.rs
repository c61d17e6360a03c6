use eframe::egui::{Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

/// Count, total and average views of the current selection.
pub fn metrics(ui: &mut Ui, state: &AppState) {
    let Some(summary) = state.summary else {
        return;
    };
    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total Videos", summary.count.to_string());
        metric(&mut cols[1], "Total Views", summary.sum_label());
        metric(&mut cols[2], "Avg Views per Video", summary.mean_label());
    });
}

// ---------------------------------------------------------------------------
// Filtered rows
// ---------------------------------------------------------------------------

/// Scrollable table of the selected rows, every source column in file order.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else {
        return;
    };
    let headers = table.schema.headers();
    let indices = state.result.indices();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(60.0).clip(true), headers.len())
        .header(20.0, |mut header| {
            for h in headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(h);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, indices.len(), |mut row| {
                let record = &table.rows[indices[row.index()]];
                for cell in &record.cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
