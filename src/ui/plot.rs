use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, PlotUi, Points};

use crate::color::ColorMap;
use crate::data::aggregate::Summary;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Dashboard charts (central panel)
// ---------------------------------------------------------------------------

/// Render every chart section for a non-empty selection.
pub fn dashboard(ui: &mut Ui, summary: &Summary, color_map: Option<&ColorMap>) {
    ui.heading("💰 Salary Analysis");
    ui.columns(2, |cols| {
        salary_vs_experience(&mut cols[0], summary, color_map);
        salary_by_location(&mut cols[1], summary);
    });

    ui.heading("🎯 Skills in Demand");
    ui.columns(2, |cols| {
        top_skills(&mut cols[0], summary);
        highest_paying_skills(&mut cols[1], summary);
    });

    ui.heading("🏢 Company Insights");
    ui.columns(2, |cols| {
        company_sizes(&mut cols[0], summary);
        top_companies(&mut cols[1], summary);
    });

    ui.heading("📈 Market Trends");
    ui.columns(2, |cols| {
        postings_trend(&mut cols[0], summary);
        education(&mut cols[1], summary);
    });
}

/// Scatter of average salary against experience, coloured by job type and
/// sized by applicants.
fn salary_vs_experience(ui: &mut Ui, summary: &Summary, color_map: Option<&ColorMap>) {
    ui.strong("Salary vs Experience Correlation");

    Plot::new("salary_vs_experience")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Years of Experience")
        .y_axis_label("Average Salary (LPA)")
        .show(ui, |plot_ui| {
            // Same-named items share one legend entry.
            for p in &summary.salary_vs_experience {
                let color = color_map
                    .map(|cm| cm.color_for(&p.job_type))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[p.experience_years, p.avg_salary]]))
                        .name(&p.job_type)
                        .color(color)
                        .radius(2.0 + (p.applicants.unwrap_or(0) as f32).sqrt() / 4.0),
                );
            }
        });
}

fn salary_by_location(ui: &mut Ui, summary: &Summary) {
    ui.strong("Average Salary by Location");
    let labels: Vec<String> = summary
        .salary_by_location
        .iter()
        .map(|g| format!("{} ({})", g.key, g.count))
        .collect();
    let bars: Vec<Bar> = summary
        .salary_by_location
        .iter()
        .enumerate()
        .filter_map(|(i, g)| Some(Bar::new(i as f64, g.mean?).name(&g.key)))
        .collect();

    category_plot(ui, "salary_by_location", labels, "Average Salary (LPA)", false, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE).width(0.7));
    });
}

fn top_skills(ui: &mut Ui, summary: &Summary) {
    ui.strong("Top 10 Most In-Demand Skills");
    let labels: Vec<String> = summary.top_skills.iter().map(|s| s.skill.clone()).collect();
    let bars: Vec<Bar> = summary
        .top_skills
        .iter()
        .enumerate()
        .map(|(i, s)| Bar::new(i as f64, s.count as f64).name(&s.skill))
        .collect();

    category_plot(ui, "top_skills", labels, "Number of Job Postings", false, |plot_ui| {
        plot_ui.bar_chart(
            BarChart::new(bars)
                .color(Color32::from_rgb(99, 110, 250))
                .width(0.7),
        );
    });
}

fn highest_paying_skills(ui: &mut Ui, summary: &Summary) {
    ui.strong("Top 10 Highest Paying Skills");
    let labels: Vec<String> = summary
        .highest_paying_skills
        .iter()
        .map(|s| format!("{} ({})", s.skill, s.count))
        .collect();
    let bars: Vec<Bar> = summary
        .highest_paying_skills
        .iter()
        .enumerate()
        .map(|(i, s)| Bar::new(i as f64, s.mean_salary).name(&s.skill))
        .collect();

    category_plot(ui, "highest_paying_skills", labels, "Average Salary (LPA)", false, |plot_ui| {
        plot_ui.bar_chart(
            BarChart::new(bars)
                .color(Color32::from_rgb(0, 204, 150))
                .width(0.7),
        );
    });
}

/// Grouped bars: mean salary and mean applicants (scaled by 1/50) per size.
fn company_sizes(ui: &mut Ui, summary: &Summary) {
    ui.strong("Company Size Analysis");
    let labels: Vec<String> = summary.company_sizes.iter().map(|s| s.name.clone()).collect();
    let salary: Vec<Bar> = summary
        .company_sizes
        .iter()
        .enumerate()
        .filter_map(|(i, s)| Some(Bar::new(i as f64 - 0.2, s.mean_salary?).width(0.4)))
        .collect();
    let applicants: Vec<Bar> = summary
        .company_sizes
        .iter()
        .enumerate()
        .filter_map(|(i, s)| Some(Bar::new(i as f64 + 0.2, s.mean_applicants? / 50.0).width(0.4)))
        .collect();

    category_plot(ui, "company_sizes", labels, "Value", true, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(salary).name("Avg Salary").color(Color32::LIGHT_BLUE));
        plot_ui.bar_chart(
            BarChart::new(applicants)
                .name("Avg Applicants (÷50)")
                .color(Color32::LIGHT_RED),
        );
    });
}

/// Average salary against average applicants, one marker per company.
fn top_companies(ui: &mut Ui, summary: &Summary) {
    ui.strong("Top Companies Analysis");
    let colors = ColorMap::new(summary.top_companies.iter().map(|c| c.name.clone()));

    Plot::new("top_companies")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Average Salary (LPA)")
        .y_axis_label("Average Applicants per Position")
        .show(ui, |plot_ui| {
            for c in &summary.top_companies {
                let (Some(salary), Some(applicants)) = (c.mean_salary, c.mean_applicants) else {
                    continue;
                };
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[salary, applicants]]))
                        .name(format!("{} ({} openings)", c.name, c.postings))
                        .color(colors.color_for(&c.name))
                        .radius(3.0 + (c.postings as f32).sqrt() * 2.0),
                );
            }
        });
}

fn postings_trend(ui: &mut Ui, summary: &Summary) {
    ui.strong("Daily Job Postings Trend");
    let points: PlotPoints = summary
        .postings_per_day
        .iter()
        .map(|d| [d.date.num_days_from_ce() as f64, d.count as f64])
        .collect();

    Plot::new("postings_trend")
        .height(CHART_HEIGHT)
        .x_axis_label("Date")
        .y_axis_label("Number of Jobs Posted")
        .x_axis_formatter(|mark: GridMark, _range| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(Color32::LIGHT_BLUE).width(1.5));
        });
}

/// Share of each education requirement, as one coloured bar per value.
fn education(ui: &mut Ui, summary: &Summary) {
    ui.strong("Distribution of Education Requirements");
    let total: usize = summary.education.iter().map(|e| e.count).sum();
    let colors = ColorMap::new(summary.education.iter().map(|e| e.value.clone()));
    let labels: Vec<String> = summary.education.iter().map(|e| e.value.clone()).collect();
    let bars: Vec<Bar> = summary
        .education
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let pct = 100.0 * e.count as f64 / total.max(1) as f64;
            Bar::new(i as f64, pct)
                .name(format!("{} ({} jobs)", e.value, e.count))
                .fill(colors.color_for(&e.value))
        })
        .collect();

    category_plot(ui, "education", labels, "Share of Postings (%)", true, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).width(0.7));
    });
}

/// A bar plot whose x axis shows `labels` at integer positions.
fn category_plot(
    ui: &mut Ui,
    id: &str,
    labels: Vec<String>,
    y_label: &str,
    legend: bool,
    build: impl FnOnce(&mut PlotUi),
) {
    let mut plot = Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label.to_string())
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark: GridMark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
                return String::new();
            }
            labels.get(pos as usize).cloned().unwrap_or_default()
        });
    if legend {
        plot = plot.legend(Legend::default());
    }
    plot.show(ui, build);
}
