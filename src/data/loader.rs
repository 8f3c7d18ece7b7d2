use std::io::Read;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{columns, JobPosting, JobTable, RawPosting};
use super::parse::{parse_experience, parse_salary_range, split_skills};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and normalize a postings file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the source column names (recommended)
/// * `.json`    – `[{ "Job ID": ..., "Job Title": ..., ... }, ...]`
/// * `.parquet` – one column per source field, any scalar type
pub fn load_file(path: &Path) -> Result<JobTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => read_csv(std::fs::File::open(path)?)?,
        "json" => read_json(&std::fs::read_to_string(path)?)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let table = normalize(raw)?;
    log::info!(
        "Loaded {} postings from {} ({} locations, {} job types)",
        table.len(),
        path.display(),
        table.locations().len(),
        table.job_types().len()
    );
    Ok(table)
}

/// Load and normalize CSV text from any reader.
pub fn load_csv<R: Read>(reader: R) -> Result<JobTable, LoadError> {
    normalize(read_csv(reader)?)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the source column names, one posting per
/// record. Columns beyond the required set are ignored.
fn read_csv<R: Read>(reader: R) -> Result<Vec<RawPosting>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    for col in columns::REQUIRED {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col.to_string()));
        }
    }

    reader
        .deserialize::<RawPosting>()
        .map(|record| record.map_err(LoadError::from))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the shape of `df.to_json(orient='records')`.
/// Numbers and booleans are taken as their textual form, `null` as empty.
fn read_json(text: &str) -> Result<Vec<RawPosting>, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".into()))?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;
            RawPosting::from_lookup(|col| obj.get(col).map(json_to_text))
                .map_err(LoadError::MissingColumn)
        })
        .collect()
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by Pandas, Polars, or `generate_sample`.
/// Each cell is rendered as text (nulls as empty) and normalized like CSV.
fn read_parquet(path: &Path) -> Result<Vec<RawPosting>, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    // Checked up front so a file without row groups still fails.
    let mut indices = Vec::with_capacity(columns::REQUIRED.len());
    for col in columns::REQUIRED {
        let idx = builder
            .schema()
            .index_of(col)
            .map_err(|_| LoadError::MissingColumn(col.to_string()))?;
        indices.push((col, idx));
    }

    let reader = builder.build()?;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        for row in 0..batch.num_rows() {
            let mut failure = None;
            let raw = RawPosting::from_lookup(|col| {
                let (_, idx) = indices.iter().find(|(name, _)| *name == col)?;
                let array = batch.column(*idx);
                if array.is_null(row) {
                    return Some(String::new());
                }
                match array_value_to_string(array, row) {
                    Ok(text) => Some(text),
                    Err(e) => {
                        failure = Some(e);
                        Some(String::new())
                    }
                }
            })
            .map_err(LoadError::MissingColumn)?;
            if let Some(e) = failure {
                return Err(e.into());
            }
            rows.push(raw);
        }
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Derive numeric, date and skill fields for every raw row.
///
/// Unparseable salary, experience or applicant text becomes absence; a bad
/// date fails the whole load.
pub fn normalize(raw: Vec<RawPosting>) -> Result<JobTable, LoadError> {
    let mut postings = Vec::with_capacity(raw.len());
    let mut salary_skips = 0usize;
    let mut experience_skips = 0usize;
    let mut applicant_skips = 0usize;

    for (row, r) in raw.into_iter().enumerate() {
        let posting = normalize_row(row, r)?;
        if posting.avg_salary.is_none() {
            salary_skips += 1;
            log::debug!("Row {row}: no salary range in '{}'", posting.raw_salary_range);
        }
        if posting.experience_years.is_none() {
            experience_skips += 1;
            log::debug!(
                "Row {row}: no experience in '{}'",
                posting.raw_experience_required
            );
        }
        if posting.number_of_applicants.is_none() {
            applicant_skips += 1;
        }
        postings.push(posting);
    }

    if salary_skips > 0 || experience_skips > 0 || applicant_skips > 0 {
        log::info!(
            "{salary_skips} rows without salary, {experience_skips} rows without experience, \
             {applicant_skips} rows without applicant count"
        );
    }

    Ok(JobTable::from_postings(postings))
}

fn normalize_row(row: usize, r: RawPosting) -> Result<JobPosting, LoadError> {
    let salary = parse_salary_range(&r.salary_range);
    let experience_years = parse_experience(&r.experience_required);

    let posted_date =
        parse_date(&r.posted_date).ok_or_else(|| LoadError::InvalidDate {
            row,
            column: columns::POSTED_DATE,
            value: r.posted_date.clone(),
        })?;
    let application_deadline =
        parse_date(&r.application_deadline).ok_or_else(|| LoadError::InvalidDate {
            row,
            column: columns::APPLICATION_DEADLINE,
            value: r.application_deadline.clone(),
        })?;
    let number_of_applicants = parse_count(&r.number_of_applicants);
    if number_of_applicants.is_none() {
        log::debug!(
            "Row {row}: no applicant count in '{}'",
            r.number_of_applicants
        );
    }

    Ok(JobPosting {
        skills: split_skills(&r.skills_required),
        job_id: r.job_id,
        job_title: r.job_title,
        company_name: r.company_name,
        job_location: r.job_location,
        job_type: r.job_type,
        company_size: r.company_size,
        remote_or_onsite: r.remote_or_onsite,
        education_requirement: r.education_requirement,
        raw_salary_range: r.salary_range,
        raw_experience_required: r.experience_required,
        raw_skills_required: r.skills_required,
        min_salary: salary.min,
        max_salary: salary.max,
        avg_salary: salary.avg,
        experience_years,
        posted_date,
        application_deadline,
        number_of_applicants,
    })
}

// Month-first before day-first, so `01-02-2024` is 2 January.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d/%m/%Y", "%d-%m-%Y",
];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Calendar date from the accepted layouts; any time of day is dropped.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Non-negative integer count; integral floats like `120.0` are accepted.
fn parse_count(text: &str) -> Option<u32> {
    let s = text.trim();
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Job ID,Job Title,Company Name,Job Location,Job Type,Company Size,\
Salary Range,Experience Required,Skills Required,Posted Date,Application Deadline,\
Remote/Onsite,Education Requirement,Number of Applicants";

    fn csv_with(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for r in rows {
            text.push('\n');
            text.push_str(r);
        }
        text
    }

    #[test]
    fn normalizes_derived_fields() {
        let text = csv_with(&[
            r#"J1,Data Analyst,Acme,Mumbai,Full-time,Large,₹6-10 LPA,2-5 years,"Python, SQL ,Excel",2024-01-15,2024-02-15,Remote,Bachelor's,120"#,
        ]);
        let table = load_csv(text.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);

        let p = &table.postings()[0];
        assert_eq!(p.min_salary, Some(6.0));
        assert_eq!(p.max_salary, Some(10.0));
        assert_eq!(p.avg_salary, Some(8.0));
        assert_eq!(p.experience_years, Some(3.5));
        assert_eq!(p.skills, vec!["Python", "SQL", "Excel"]);
        assert_eq!(p.raw_skills_required, "Python, SQL ,Excel");
        assert_eq!(p.posted_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(p.number_of_applicants, Some(120));
    }

    #[test]
    fn unparseable_salary_is_absent_not_zero() {
        let text = csv_with(&[
            "J1,Dev,Acme,Pune,Internship,Small,Not disclosed,Fresher,Java,2024-03-01,2024-03-30,Onsite,None,4",
        ]);
        let table = load_csv(text.as_bytes()).unwrap();
        let p = &table.postings()[0];
        assert_eq!(p.min_salary, None);
        assert_eq!(p.max_salary, None);
        assert_eq!(p.avg_salary, None);
        assert_eq!(p.experience_years, None);
    }

    #[test]
    fn missing_column_fails_load() {
        let text = "Job ID,Job Title\nJ1,Dev\n";
        match load_csv(text.as_bytes()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, "Company Name"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_fails_load() {
        let text = csv_with(&[
            "J1,Dev,Acme,Pune,Full-time,Small,4-6 LPA,1 year,Java,someday,2024-03-30,Onsite,None,4",
        ]);
        match load_csv(text.as_bytes()) {
            Err(LoadError::InvalidDate { row, column, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(column, columns::POSTED_DATE);
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_applicant_count_is_absent() {
        let text = csv_with(&[
            "J1,Dev,Acme,Pune,Full-time,Small,4-6 LPA,1 year,Java,2024-03-01,2024-03-30,Onsite,None,",
            "J2,Dev,Acme,Pune,Full-time,Small,4-6 LPA,1 year,Java,2024-03-01,2024-03-30,Onsite,None,many",
            "J3,Dev,Acme,Pune,Full-time,Small,4-6 LPA,1 year,Java,2024-03-01,2024-03-30,Onsite,None,8",
        ]);
        let table = load_csv(text.as_bytes()).unwrap();
        let counts: Vec<Option<u32>> =
            table.postings().iter().map(|p| p.number_of_applicants).collect();
        assert_eq!(counts, vec![None, None, Some(8)]);
    }

    #[test]
    fn date_layouts() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15"), Some(d));
        assert_eq!(parse_date("2024/01/15"), Some(d));
        assert_eq!(parse_date("01/15/2024"), Some(d));
        assert_eq!(parse_date("01-15-2024"), Some(d));
        assert_eq!(parse_date("15-01-2024"), Some(d));
        assert_eq!(parse_date("15/01/2024"), Some(d));
        assert_eq!(
            parse_date("01-02-2024"),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert_eq!(parse_date("2024-01-15 09:30:00"), Some(d));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("tomorrow"), None);
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count(" 120.0 "), Some(120));
        assert_eq!(parse_count("1.5"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn json_records() {
        let text = r#"[{
            "Job ID": 7, "Job Title": "ML Engineer", "Company Name": "Beta",
            "Job Location": "Bangalore", "Job Type": "Full-time", "Company Size": "Medium",
            "Salary Range": "12-18 LPA", "Experience Required": "3 years",
            "Skills Required": "Python,PyTorch", "Posted Date": "2024-02-01",
            "Application Deadline": "2024-03-01", "Remote/Onsite": "Hybrid",
            "Education Requirement": null, "Number of Applicants": 55
        }]"#;
        let table = normalize(read_json(text).unwrap()).unwrap();
        let p = &table.postings()[0];
        assert_eq!(p.job_id, "7");
        assert_eq!(p.education_requirement, "");
        assert_eq!(p.avg_salary, Some(15.0));
        assert_eq!(p.number_of_applicants, Some(55));
    }

    #[test]
    fn json_missing_column() {
        let text = r#"[{"Job ID": "1"}]"#;
        assert!(matches!(read_json(text), Err(LoadError::MissingColumn(_))));
        assert!(matches!(read_json("{}"), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn unsupported_extension() {
        assert!(matches!(
            load_file(Path::new("postings.xlsx")),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }
}
