use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

use job_market_dashboard::data::model::{columns, RawPosting};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

const TITLES: [&str; 8] = [
    "Data Analyst",
    "Software Engineer",
    "ML Engineer",
    "Product Manager",
    "DevOps Engineer",
    "Frontend Developer",
    "Business Analyst",
    "Data Scientist",
];
const COMPANIES: [&str; 12] = [
    "Infosys", "TCS", "Wipro", "HCL", "Flipkart", "Zomato", "Swiggy", "Paytm", "Razorpay",
    "Freshworks", "Zoho", "Byju's",
];
const LOCATIONS: [&str; 8] = [
    "Bangalore", "Mumbai", "Delhi", "Hyderabad", "Pune", "Chennai", "Kolkata", "Noida",
];
const JOB_TYPES: [&str; 4] = ["Full-time", "Part-time", "Contract", "Internship"];
const SIZES: [&str; 3] = ["Small", "Medium", "Large"];
const MODES: [&str; 3] = ["Remote", "Onsite", "Hybrid"];
const EDUCATION: [&str; 5] = ["Bachelor's", "Master's", "B.Tech", "MBA", "PhD"];
const SKILLS: [&str; 14] = [
    "Python", "SQL", "Java", "AWS", "Docker", "Kubernetes", "React", "Excel", "Tableau",
    "Machine Learning", "Power BI", "Go", "Spark", "Communication",
];

fn generate(rng: &mut SimpleRng, count: usize) -> Vec<RawPosting> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    (0..count)
        .map(|i| {
            let low = 2 + rng.below(20);
            let salary_range = match rng.below(20) {
                0 => "Not disclosed".to_string(),
                _ => format!("₹{low}-{} LPA", low + 2 + rng.below(10)),
            };
            let exp_low = rng.below(8);
            let experience_required = match rng.below(4) {
                0 => "Fresher".to_string(),
                1 => format!("{exp_low} years"),
                _ => format!("{exp_low}-{} years", exp_low + 1 + rng.below(5)),
            };
            let n_skills = 1 + rng.below(4);
            let skills: Vec<&str> = (0..n_skills).map(|_| *rng.pick(&SKILLS)).collect();
            let posted = start + Duration::days(rng.below(90) as i64);
            let deadline = posted + Duration::days(15 + rng.below(30) as i64);

            RawPosting {
                job_id: format!("JOB{:05}", i + 1),
                job_title: rng.pick(&TITLES).to_string(),
                company_name: rng.pick(&COMPANIES).to_string(),
                job_location: rng.pick(&LOCATIONS).to_string(),
                job_type: rng.pick(&JOB_TYPES).to_string(),
                company_size: rng.pick(&SIZES).to_string(),
                salary_range,
                experience_required,
                skills_required: skills.join(", "),
                posted_date: posted.format("%Y-%m-%d").to_string(),
                application_deadline: deadline.format("%Y-%m-%d").to_string(),
                remote_or_onsite: rng.pick(&MODES).to_string(),
                education_requirement: rng.pick(&EDUCATION).to_string(),
                number_of_applicants: (rng.below(500)).to_string(),
            }
        })
        .collect()
}

fn write_csv(rows: &[RawPosting], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        wtr.serialize(row).context("writing CSV row")?;
    }
    wtr.flush().context("flushing CSV file")?;
    Ok(())
}

/// Parquet with typed date and count columns, text for everything else.
fn write_parquet(rows: &[RawPosting], path: &Path) -> Result<()> {
    fn text(rows: &[RawPosting], f: impl Fn(&RawPosting) -> &str) -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    }
    fn days(rows: &[RawPosting], f: impl Fn(&RawPosting) -> &str) -> Result<ArrayRef> {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        let values = rows
            .iter()
            .map(|r| {
                let d = NaiveDate::parse_from_str(f(r), "%Y-%m-%d")
                    .with_context(|| format!("bad generated date '{}'", f(r)))?;
                Ok(d.num_days_from_ce() - epoch.num_days_from_ce())
            })
            .collect::<Result<Vec<i32>>>()?;
        Ok(Arc::new(Date32Array::from(values)) as ArrayRef)
    }

    let applicants = rows
        .iter()
        .map(|r| r.number_of_applicants.parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .context("bad generated applicant count")?;

    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for col in columns::REQUIRED {
        let (data_type, array) = match col {
            columns::JOB_ID => (DataType::Utf8, text(rows, |r| r.job_id.as_str())),
            columns::JOB_TITLE => (DataType::Utf8, text(rows, |r| r.job_title.as_str())),
            columns::COMPANY_NAME => (DataType::Utf8, text(rows, |r| r.company_name.as_str())),
            columns::JOB_LOCATION => (DataType::Utf8, text(rows, |r| r.job_location.as_str())),
            columns::JOB_TYPE => (DataType::Utf8, text(rows, |r| r.job_type.as_str())),
            columns::COMPANY_SIZE => (DataType::Utf8, text(rows, |r| r.company_size.as_str())),
            columns::SALARY_RANGE => (DataType::Utf8, text(rows, |r| r.salary_range.as_str())),
            columns::EXPERIENCE_REQUIRED => {
                (DataType::Utf8, text(rows, |r| r.experience_required.as_str()))
            }
            columns::SKILLS_REQUIRED => (DataType::Utf8, text(rows, |r| r.skills_required.as_str())),
            columns::POSTED_DATE => (DataType::Date32, days(rows, |r| r.posted_date.as_str())?),
            columns::APPLICATION_DEADLINE => {
                (DataType::Date32, days(rows, |r| r.application_deadline.as_str())?)
            }
            columns::REMOTE_ONSITE => (DataType::Utf8, text(rows, |r| r.remote_or_onsite.as_str())),
            columns::EDUCATION_REQUIREMENT => {
                (DataType::Utf8, text(rows, |r| r.education_requirement.as_str()))
            }
            _ => (
                DataType::Int64,
                Arc::new(Int64Array::from(applicants.clone())) as ArrayRef,
            ),
        };
        fields.push(Field::new(col, data_type, false));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Usage: `generate_sample [OUTPUT] [COUNT]`
/// Writes Parquet when OUTPUT ends in `.parquet`, CSV otherwise.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("india_job_market_dataset.csv"));
    let count: usize = match args.next() {
        Some(n) => n.parse().context("COUNT must be a positive integer")?,
        None => 2000,
    };

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, count);

    let is_parquet = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(&rows, &output)?;
    } else {
        write_csv(&rows, &output)?;
    }

    log::info!("Wrote {} postings to {}", rows.len(), output.display());
    println!("Wrote {} postings to {}", rows.len(), output.display());
    Ok(())
}
