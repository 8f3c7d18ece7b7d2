use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

pub mod columns {
    pub const JOB_ID: &str = "Job ID";
    pub const JOB_TITLE: &str = "Job Title";
    pub const COMPANY_NAME: &str = "Company Name";
    pub const JOB_LOCATION: &str = "Job Location";
    pub const JOB_TYPE: &str = "Job Type";
    pub const COMPANY_SIZE: &str = "Company Size";
    pub const SALARY_RANGE: &str = "Salary Range";
    pub const EXPERIENCE_REQUIRED: &str = "Experience Required";
    pub const SKILLS_REQUIRED: &str = "Skills Required";
    pub const POSTED_DATE: &str = "Posted Date";
    pub const APPLICATION_DEADLINE: &str = "Application Deadline";
    pub const REMOTE_ONSITE: &str = "Remote/Onsite";
    pub const EDUCATION_REQUIREMENT: &str = "Education Requirement";
    pub const NUMBER_OF_APPLICANTS: &str = "Number of Applicants";

    /// Every column the loader insists on, in source order.
    pub const REQUIRED: [&str; 14] = [
        JOB_ID,
        JOB_TITLE,
        COMPANY_NAME,
        JOB_LOCATION,
        JOB_TYPE,
        COMPANY_SIZE,
        SALARY_RANGE,
        EXPERIENCE_REQUIRED,
        SKILLS_REQUIRED,
        POSTED_DATE,
        APPLICATION_DEADLINE,
        REMOTE_ONSITE,
        EDUCATION_REQUIREMENT,
        NUMBER_OF_APPLICANTS,
    ];
}

// ---------------------------------------------------------------------------
// RawPosting – one source row, all cells as text
// ---------------------------------------------------------------------------

/// A row exactly as it appears in the source, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPosting {
    #[serde(rename = "Job ID")]
    pub job_id: String,
    #[serde(rename = "Job Title")]
    pub job_title: String,
    #[serde(rename = "Company Name")]
    pub company_name: String,
    #[serde(rename = "Job Location")]
    pub job_location: String,
    #[serde(rename = "Job Type")]
    pub job_type: String,
    #[serde(rename = "Company Size")]
    pub company_size: String,
    #[serde(rename = "Salary Range")]
    pub salary_range: String,
    #[serde(rename = "Experience Required")]
    pub experience_required: String,
    #[serde(rename = "Skills Required")]
    pub skills_required: String,
    #[serde(rename = "Posted Date")]
    pub posted_date: String,
    #[serde(rename = "Application Deadline")]
    pub application_deadline: String,
    #[serde(rename = "Remote/Onsite")]
    pub remote_or_onsite: String,
    #[serde(rename = "Education Requirement")]
    pub education_requirement: String,
    #[serde(rename = "Number of Applicants")]
    pub number_of_applicants: String,
}

impl RawPosting {
    /// Build a row from a per-column lookup. A column the lookup cannot
    /// resolve is reported by name.
    pub fn from_lookup<F>(mut cell: F) -> Result<Self, String>
    where
        F: FnMut(&'static str) -> Option<String>,
    {
        let mut get = |col: &'static str| cell(col).ok_or_else(|| col.to_string());
        Ok(RawPosting {
            job_id: get(columns::JOB_ID)?,
            job_title: get(columns::JOB_TITLE)?,
            company_name: get(columns::COMPANY_NAME)?,
            job_location: get(columns::JOB_LOCATION)?,
            job_type: get(columns::JOB_TYPE)?,
            company_size: get(columns::COMPANY_SIZE)?,
            salary_range: get(columns::SALARY_RANGE)?,
            experience_required: get(columns::EXPERIENCE_REQUIRED)?,
            skills_required: get(columns::SKILLS_REQUIRED)?,
            posted_date: get(columns::POSTED_DATE)?,
            application_deadline: get(columns::APPLICATION_DEADLINE)?,
            remote_or_onsite: get(columns::REMOTE_ONSITE)?,
            education_requirement: get(columns::EDUCATION_REQUIREMENT)?,
            number_of_applicants: get(columns::NUMBER_OF_APPLICANTS)?,
        })
    }
}

// ---------------------------------------------------------------------------
// JobPosting – one row of the normalized table
// ---------------------------------------------------------------------------

/// A normalized posting with its derived numeric, date and skill fields.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    pub job_id: String,
    pub job_title: String,
    pub company_name: String,
    pub job_location: String,
    pub job_type: String,
    pub company_size: String,
    pub remote_or_onsite: String,
    pub education_requirement: String,

    pub raw_salary_range: String,
    pub raw_experience_required: String,
    pub raw_skills_required: String,

    /// Salary bounds in the source's unit (LPA). Absent together.
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub avg_salary: Option<f64>,
    pub experience_years: Option<f64>,

    pub posted_date: NaiveDate,
    pub application_deadline: NaiveDate,

    pub skills: Vec<String>,
    pub number_of_applicants: Option<u32>,
}

// ---------------------------------------------------------------------------
// JobTable – the complete normalized dataset
// ---------------------------------------------------------------------------

/// The normalized table plus the option lists the filter widgets need.
///
/// Read-only once built; filters and aggregates only ever borrow it.
#[derive(Debug, Clone, PartialEq)]
pub struct JobTable {
    postings: Vec<JobPosting>,
    locations: BTreeSet<String>,
    company_sizes: BTreeSet<String>,
    job_types: BTreeSet<String>,
    date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl JobTable {
    /// Build the option indices from the normalized postings.
    pub fn from_postings(postings: Vec<JobPosting>) -> Self {
        let mut locations = BTreeSet::new();
        let mut company_sizes = BTreeSet::new();
        let mut job_types = BTreeSet::new();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for p in &postings {
            locations.insert(p.job_location.clone());
            company_sizes.insert(p.company_size.clone());
            job_types.insert(p.job_type.clone());
            date_bounds = Some(match date_bounds {
                None => (p.posted_date, p.posted_date),
                Some((lo, hi)) => (lo.min(p.posted_date), hi.max(p.posted_date)),
            });
        }

        JobTable {
            postings,
            locations,
            company_sizes,
            job_types,
            date_bounds,
        }
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn get(&self, index: usize) -> Option<&JobPosting> {
        self.postings.get(index)
    }

    /// Sorted distinct job locations.
    pub fn locations(&self) -> &BTreeSet<String> {
        &self.locations
    }

    /// Sorted distinct company sizes.
    pub fn company_sizes(&self) -> &BTreeSet<String> {
        &self.company_sizes
    }

    /// Sorted distinct job types.
    pub fn job_types(&self) -> &BTreeSet<String> {
        &self.job_types
    }

    /// Earliest and latest posted date, `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_bounds
    }

    /// Number of postings.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
