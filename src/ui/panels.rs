use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::aggregate::KeyMetrics;
use crate::state::{AppState, FilterColumn};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(table) = state.table.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    let date_window = state.date_window();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Posted-date window ----
            if let Some((mut lower, mut upper)) = date_window {
                ui.strong("Posted between");
                let mut changed = false;
                ui.horizontal(|ui: &mut Ui| {
                    changed |= ui
                        .add(DatePickerButton::new(&mut lower).id_salt("date_lower"))
                        .changed();
                    ui.label("–");
                    changed |= ui
                        .add(DatePickerButton::new(&mut upper).id_salt("date_upper"))
                        .changed();
                });
                if changed {
                    state.set_date_range(lower, upper);
                }
                ui.separator();
            }

            // ---- Per-column multi-selects (collapsible) ----
            for column in FilterColumn::ALL {
                let all_values = column.options(&table);
                let n_selected = state
                    .criteria
                    .as_ref()
                    .map(|c| column.selected(c).len())
                    .unwrap_or_default();
                let header_text = format!("{}  ({n_selected}/{})", column.label(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(column.label())
                    .default_open(column != FilterColumn::Location)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(column);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(column);
                            }
                        });

                        for value in all_values {
                            let mut checked = state
                                .criteria
                                .as_ref()
                                .is_some_and(|c| column.selected(c).contains(value));
                            let mut text = RichText::new(value);
                            if column == FilterColumn::JobType {
                                if let Some(cm) = &state.color_map {
                                    text = text.color(cm.color_for(value));
                                }
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(column, value);
                            }
                        }
                    });
            }
        });
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
            let can_export = state.table.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Download results as CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            if let Some(path) = state.source_path() {
                ui.label(RichText::new(path.display().to_string()).weak());
            }
            ui.label(format!(
                "{} postings loaded, {} match filters, {} match search",
                table.len(),
                state.visible_indices.len(),
                state.result_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Key metrics row
// ---------------------------------------------------------------------------

/// Four headline cards with their difference to the whole dataset.
pub fn metrics_row(ui: &mut Ui, metrics: &KeyMetrics) {
    ui.columns(4, |cols| {
        metric_card(
            &mut cols[0],
            "Total Jobs",
            metrics.total_jobs.to_string(),
            format!("{:+} from selection", metrics.total_jobs_delta),
        );
        metric_card(
            &mut cols[1],
            "Average Salary (LPA)",
            fmt_opt(metrics.avg_salary, |v| format!("₹{v:.2}")),
            fmt_opt(metrics.avg_salary_delta, |v| format!("{v:+.2}")),
        );
        metric_card(
            &mut cols[2],
            "Avg Experience Required",
            fmt_opt(metrics.avg_experience, |v| format!("{v:.1} years")),
            fmt_opt(metrics.avg_experience_delta, |v| format!("{v:+.1}")),
        );
        metric_card(
            &mut cols[3],
            "Remote Jobs",
            fmt_opt(metrics.remote_pct, |v| format!("{v:.1}%")),
            fmt_opt(metrics.remote_pct_delta, |v| format!("{v:+.1}%")),
        );
    });
}

fn metric_card(ui: &mut Ui, title: &str, value: String, delta: String) {
    ui.group(|ui: &mut Ui| {
        ui.label(RichText::new(title).weak());
        ui.label(RichText::new(value).size(22.0).strong());
        let colour = if delta.starts_with('-') {
            Color32::LIGHT_RED
        } else {
            Color32::LIGHT_GREEN
        };
        ui.label(RichText::new(delta).color(colour));
    });
}

fn fmt_opt(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "n/a".to_string())
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open job postings")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Errors are logged and shown in the status line by `open`.
        let _ = state.open(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download results")
        .set_file_name("job_search_results.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export results: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
