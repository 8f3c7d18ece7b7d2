use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
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

        // ---- Central panel: metrics, charts, search ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| central_panel(ui, &mut self.state));
        });
    }
}

fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            match &state.status_message {
                Some(msg) => ui.heading(RichText::new(msg).color(Color32::RED)),
                None => ui.heading("Open a postings file to start  (File → Open…)"),
            };
        });
        return;
    }

    ui.heading("🎯 Indian Job Market Analysis");
    ui.label(
        "Salary trends, skill demand and company insights. \
         Use the filters in the sidebar to customize the view.",
    );
    ui.separator();

    let Some(summary) = &state.summary else {
        ui.label(
            RichText::new(
                "No data available for the selected filters. Please adjust your selection.",
            )
            .color(Color32::YELLOW),
        );
        return;
    };

    ui.heading("📊 Key Metrics");
    panels::metrics_row(ui, &summary.metrics);
    ui.separator();

    plot::dashboard(ui, summary, state.color_map.as_ref());
    ui.separator();

    table::job_search(ui, state);
}
