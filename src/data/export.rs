use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::filter::FilteredView;
use super::model::{columns, JobPosting};

/// User-facing columns of the results table and the CSV download.
pub const RESULT_COLUMNS: [&str; 9] = [
    columns::JOB_TITLE,
    columns::COMPANY_NAME,
    columns::JOB_LOCATION,
    columns::JOB_TYPE,
    columns::SALARY_RANGE,
    columns::EXPERIENCE_REQUIRED,
    columns::POSTED_DATE,
    columns::REMOTE_ONSITE,
    columns::NUMBER_OF_APPLICANTS,
];

/// One line of the results table.
#[derive(Debug, Serialize)]
pub struct ResultRow<'a> {
    pub job_title: &'a str,
    pub company_name: &'a str,
    pub job_location: &'a str,
    pub job_type: &'a str,
    pub salary_range: &'a str,
    pub experience_required: &'a str,
    pub posted_date: String,
    pub remote_or_onsite: &'a str,
    pub number_of_applicants: Option<u32>,
}

impl<'a> From<&'a JobPosting> for ResultRow<'a> {
    fn from(p: &'a JobPosting) -> Self {
        ResultRow {
            job_title: &p.job_title,
            company_name: &p.company_name,
            job_location: &p.job_location,
            job_type: &p.job_type,
            salary_range: &p.raw_salary_range,
            experience_required: &p.raw_experience_required,
            posted_date: p.posted_date.format("%Y-%m-%d").to_string(),
            remote_or_onsite: &p.remote_or_onsite,
            number_of_applicants: p.number_of_applicants,
        }
    }
}

impl ResultRow<'_> {
    /// Cell texts in [`RESULT_COLUMNS`] order.
    pub fn cells(&self) -> [String; 9] {
        [
            self.job_title.to_string(),
            self.company_name.to_string(),
            self.job_location.to_string(),
            self.job_type.to_string(),
            self.salary_range.to_string(),
            self.experience_required.to_string(),
            self.posted_date.clone(),
            self.remote_or_onsite.to_string(),
            self.number_of_applicants
                .map(|n| n.to_string())
                .unwrap_or_default(),
        ]
    }
}

/// The view's rows newest first; rows posted the same day keep view order.
pub fn newest_first<'a>(view: &FilteredView<'a>) -> FilteredView<'a> {
    let postings = view.table().postings();
    let mut indices = view.indices().to_vec();
    indices.sort_by(|&a, &b| postings[b].posted_date.cmp(&postings[a].posted_date));
    FilteredView::from_indices(view.table(), indices)
}

/// Write `view` as CSV: a header row of [`RESULT_COLUMNS`], then one record
/// per posting in view order. An empty view still gets its header.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(RESULT_COLUMNS)?;
    for p in view.rows() {
        wtr.serialize(ResultRow::from(p))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(view: &FilteredView<'_>) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf).context("serializing results")?;
    String::from_utf8(buf).context("results are not UTF-8")
}

/// Save `view` to `path` as CSV.
pub fn export_csv(view: &FilteredView<'_>, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(view, std::io::BufWriter::new(file))
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} postings to {}", view.len(), path.display());
    Ok(())
}
