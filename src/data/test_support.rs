//! Row builders shared by the data layer's unit tests.

use chrono::NaiveDate;

use super::model::{JobPosting, JobTable};
use super::parse::{parse_experience, parse_salary_range, split_skills};

pub struct PostingBuilder(JobPosting);

/// A posting with the given location, job type and salary text; every
/// other field gets a neutral default.
pub fn posting(id: &str, location: &str, job_type: &str, salary: &str) -> PostingBuilder {
    let s = parse_salary_range(salary);
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    PostingBuilder(JobPosting {
        job_id: id.to_string(),
        job_title: format!("Job {id}"),
        company_name: "Acme".to_string(),
        job_location: location.to_string(),
        job_type: job_type.to_string(),
        company_size: "Medium".to_string(),
        remote_or_onsite: "Onsite".to_string(),
        education_requirement: "Bachelor's".to_string(),
        raw_salary_range: salary.to_string(),
        raw_experience_required: String::new(),
        raw_skills_required: String::new(),
        min_salary: s.min,
        max_salary: s.max,
        avg_salary: s.avg,
        experience_years: None,
        posted_date: date,
        application_deadline: date,
        skills: Vec::new(),
        number_of_applicants: Some(0),
    })
}

impl PostingBuilder {
    pub fn title(mut self, title: &str) -> Self {
        self.0.job_title = title.to_string();
        self
    }

    pub fn company(mut self, name: &str) -> Self {
        self.0.company_name = name.to_string();
        self
    }

    pub fn size(mut self, size: &str) -> Self {
        self.0.company_size = size.to_string();
        self
    }

    pub fn remote(mut self, mode: &str) -> Self {
        self.0.remote_or_onsite = mode.to_string();
        self
    }

    pub fn education(mut self, education: &str) -> Self {
        self.0.education_requirement = education.to_string();
        self
    }

    pub fn experience(mut self, text: &str) -> Self {
        self.0.raw_experience_required = text.to_string();
        self.0.experience_years = parse_experience(text);
        self
    }

    pub fn skills(mut self, text: &str) -> Self {
        self.0.raw_skills_required = text.to_string();
        self.0.skills = split_skills(text);
        self
    }

    pub fn posted(mut self, y: i32, m: u32, d: u32) -> Self {
        self.0.posted_date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        self
    }

    pub fn applicants(mut self, n: u32) -> Self {
        self.0.number_of_applicants = Some(n);
        self
    }

    pub fn unknown_applicants(mut self) -> Self {
        self.0.number_of_applicants = None;
        self
    }

    pub fn build(self) -> JobPosting {
        self.0
    }
}

pub fn table(rows: Vec<PostingBuilder>) -> JobTable {
    JobTable::from_postings(rows.into_iter().map(PostingBuilder::build).collect())
}
