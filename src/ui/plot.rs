use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Views-over-time chart (central panel)
// ---------------------------------------------------------------------------

/// Plot x coordinate for a date: days since 0001-01-01.
fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn to_points(series: &[(NaiveDate, f64)]) -> PlotPoints {
    series
        .iter()
        .map(|&(date, total)| [date_to_x(date), total])
        .collect()
}

/// Render summed views per day for the current selection.
pub fn views_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(date_field) = state.chart_date_field() else {
        ui.label("No date column to chart.");
        return;
    };

    Plot::new("views_over_time")
        .legend(Legend::default())
        .height(height)
        .x_axis_label(date_field.header())
        .y_axis_label("Views")
        .x_axis_formatter(|mark, _range| x_to_label(mark.value))
        .label_formatter(|name, value| {
            let date = x_to_label(value.x);
            if name.is_empty() {
                format!("{date}\n{:.0} views", value.y)
            } else {
                format!("{name}\n{date}\n{:.0} views", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if state.split_by_content && !state.series_by_content.is_empty() {
                for (label, series) in &state.series_by_content {
                    let color = state
                        .color_map
                        .as_ref()
                        .map(|cm| cm.color_for(label))
                        .unwrap_or(Color32::LIGHT_BLUE);
                    let line = Line::new(to_points(series))
                        .name(label)
                        .color(color)
                        .width(1.5);
                    plot_ui.line(line);
                }
            } else {
                let line = Line::new(to_points(&state.series))
                    .name("Views")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}
