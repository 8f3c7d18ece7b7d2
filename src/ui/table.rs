use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::{ResultRow, RESULT_COLUMNS};
use crate::state::AppState;
use crate::ui::panels::save_file_dialog;

// ---------------------------------------------------------------------------
// Job search: text box, results table, CSV download
// ---------------------------------------------------------------------------

pub fn job_search(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Job Search");

    let mut term = state.search_term.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut term)
            .hint_text("Search jobs by title, company, location, or skills")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        state.set_search_term(&term);
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{} matching postings", state.result_indices.len()));
        if ui.button("📥 Download Results as CSV").clicked() {
            save_file_dialog(state);
        }
    });

    let Some(results) = state.results() else {
        return;
    };
    let rows: Vec<usize> = results.indices().to_vec();
    let table = results.table();

    ui.push_id("results_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(60.0).clip(true), RESULT_COLUMNS.len())
            .min_scrolled_height(0.0)
            .max_scroll_height(400.0)
            .header(20.0, |mut header| {
                for name in RESULT_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let Some(posting) = table.get(rows[row.index()]) else {
                        return;
                    };
                    for cell in ResultRow::from(posting).cells() {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
