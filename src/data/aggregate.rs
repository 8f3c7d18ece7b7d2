use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::filter::FilteredView;
use super::model::JobPosting;

/// Length of every top-N ranking.
pub const TOP_N: usize = 10;

/// Occurrences a skill needs before it may appear in the salary ranking.
pub const MIN_SKILL_SUPPORT: usize = 5;

// ---------------------------------------------------------------------------
// Column selectors
// ---------------------------------------------------------------------------

/// Categorical columns that can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Location,
    CompanyName,
    CompanySize,
    JobType,
    RemoteOnsite,
    Education,
}

impl Category {
    pub fn of<'p>(&self, p: &'p JobPosting) -> &'p str {
        match self {
            Category::Location => &p.job_location,
            Category::CompanyName => &p.company_name,
            Category::CompanySize => &p.company_size,
            Category::JobType => &p.job_type,
            Category::RemoteOnsite => &p.remote_or_onsite,
            Category::Education => &p.education_requirement,
        }
    }
}

/// Numeric columns that can be averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    MinSalary,
    MaxSalary,
    AvgSalary,
    ExperienceYears,
    Applicants,
}

impl Measure {
    pub fn of(&self, p: &JobPosting) -> Option<f64> {
        match self {
            Measure::MinSalary => p.min_salary,
            Measure::MaxSalary => p.max_salary,
            Measure::AvgSalary => p.avg_salary,
            Measure::ExperienceYears => p.experience_years,
            Measure::Applicants => p.number_of_applicants.map(f64::from),
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

/// Round half away from zero to two decimals.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Running sum over present values only.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Mean of the present values; absent when there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut acc = MeanAcc::default();
    values.into_iter().for_each(|v| acc.push(v));
    acc.mean()
}

// ---------------------------------------------------------------------------
// Group mean / count
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStat {
    pub key: String,
    /// Mean of the present values, rounded to 2 decimals.
    pub mean: Option<f64>,
    /// Number of present values in the group.
    pub count: usize,
}

/// Mean and count of `measure` per distinct `category` value, ordered by key.
pub fn group_mean(view: &FilteredView<'_>, category: Category, measure: Measure) -> Vec<GroupStat> {
    let mut groups: BTreeMap<&str, MeanAcc> = BTreeMap::new();
    for p in view.rows() {
        groups.entry(category.of(p)).or_default().push(measure.of(p));
    }
    groups
        .into_iter()
        .map(|(key, acc)| GroupStat {
            key: key.to_string(),
            mean: acc.mean().map(round2),
            count: acc.count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

/// Most frequent skills across all rows, counting every occurrence.
/// Ties keep the order in which skills were first seen.
pub fn top_skills(view: &FilteredView<'_>, n: usize) -> Vec<SkillCount> {
    let mut order: Vec<SkillCount> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for skill in view.rows().flat_map(|p| p.skills.iter()) {
        match position.get(skill.as_str()) {
            Some(&i) => order[i].count += 1,
            None => {
                position.insert(skill.as_str(), order.len());
                order.push(SkillCount {
                    skill: skill.clone(),
                    count: 1,
                });
            }
        }
    }

    order.sort_by(|a, b| b.count.cmp(&a.count));
    order.truncate(n);
    order
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillSalary {
    pub skill: String,
    /// Mean `avg_salary` of postings naming the skill, rounded to 2 decimals.
    pub mean_salary: f64,
    /// Occurrences with a known salary.
    pub count: usize,
}

/// Best-paid skills among those with at least `min_support` salaried
/// occurrences, highest mean first. Equal means are ordered by skill name.
pub fn highest_paying_skills(
    view: &FilteredView<'_>,
    n: usize,
    min_support: usize,
) -> Vec<SkillSalary> {
    let mut groups: BTreeMap<&str, MeanAcc> = BTreeMap::new();
    for p in view.rows() {
        for skill in &p.skills {
            groups.entry(skill.as_str()).or_default().push(p.avg_salary);
        }
    }

    let mut ranked: Vec<SkillSalary> = groups
        .into_iter()
        .filter(|(_, acc)| acc.count >= min_support)
        .filter_map(|(skill, acc)| {
            Some(SkillSalary {
                skill: skill.to_string(),
                mean_salary: round2(acc.mean()?),
                count: acc.count,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.mean_salary.total_cmp(&a.mean_salary));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyStat {
    /// Company name, or size label for the size summary.
    pub name: String,
    pub postings: usize,
    pub mean_salary: Option<f64>,
    /// Mean over postings with a known applicant count.
    pub mean_applicants: Option<f64>,
}

/// Companies with the most postings. Equal counts are ordered by name.
pub fn top_companies(view: &FilteredView<'_>, n: usize) -> Vec<CompanyStat> {
    let mut ranked = company_stats(view, Category::CompanyName);
    ranked.sort_by(|a, b| b.postings.cmp(&a.postings));
    ranked.truncate(n);
    ranked
}

/// Salary, posting count and applicants per company size, rounded to
/// 2 decimals and ordered by size label.
pub fn company_size_summary(view: &FilteredView<'_>) -> Vec<CompanyStat> {
    company_stats(view, Category::CompanySize)
        .into_iter()
        .map(|s| CompanyStat {
            mean_salary: s.mean_salary.map(round2),
            mean_applicants: s.mean_applicants.map(round2),
            ..s
        })
        .collect()
}

fn company_stats(view: &FilteredView<'_>, category: Category) -> Vec<CompanyStat> {
    let mut groups: BTreeMap<&str, (usize, MeanAcc, MeanAcc)> = BTreeMap::new();
    for p in view.rows() {
        let (rows, salary, applicants) = groups.entry(category.of(p)).or_default();
        *rows += 1;
        salary.push(p.avg_salary);
        applicants.push(Measure::Applicants.of(p));
    }
    groups
        .into_iter()
        .map(|(key, (rows, salary, applicants))| CompanyStat {
            name: key.to_string(),
            postings: rows,
            mean_salary: salary.mean(),
            mean_applicants: applicants.mean(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Time series and distributions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Postings per `posted_date`, oldest first.
pub fn postings_per_day(view: &FilteredView<'_>) -> Vec<DailyCount> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for p in view.rows() {
        *days.entry(p.posted_date).or_default() += 1;
    }
    days.into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Rows per distinct value of `category`, most common first.
/// Ties keep first-seen order.
pub fn distribution(view: &FilteredView<'_>, category: Category) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();
    for p in view.rows() {
        let value = category.of(p);
        match position.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                position.insert(value, counts.len());
                counts.push(CategoryCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

// ---------------------------------------------------------------------------
// Salary vs experience
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub experience_years: f64,
    pub avg_salary: f64,
    pub job_type: String,
    pub applicants: Option<u32>,
}

/// One point per row where both experience and salary are known.
pub fn salary_vs_experience(view: &FilteredView<'_>) -> Vec<ScatterPoint> {
    view.rows()
        .filter_map(|p| {
            Some(ScatterPoint {
                experience_years: p.experience_years?,
                avg_salary: p.avg_salary?,
                job_type: p.job_type.clone(),
                applicants: p.number_of_applicants,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Key metrics
// ---------------------------------------------------------------------------

/// Headline figures of a view, each with its difference to the full table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMetrics {
    pub total_jobs: usize,
    /// Rows in view minus rows filtered out.
    pub total_jobs_delta: i64,
    pub avg_salary: Option<f64>,
    pub avg_salary_delta: Option<f64>,
    pub avg_experience: Option<f64>,
    pub avg_experience_delta: Option<f64>,
    /// Percentage of `Remote` postings.
    pub remote_pct: Option<f64>,
    pub remote_pct_delta: Option<f64>,
}

pub const REMOTE: &str = "Remote";

impl KeyMetrics {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let all = FilteredView::all(view.table());
        let excluded = all.len() - view.len();

        let avg_salary = mean(view.rows().map(|p| p.avg_salary));
        let avg_experience = mean(view.rows().map(|p| p.experience_years));
        let remote_pct = remote_share(view);

        let delta = |a: Option<f64>, b: Option<f64>| Some(a? - b?);

        KeyMetrics {
            total_jobs: view.len(),
            total_jobs_delta: view.len() as i64 - excluded as i64,
            avg_salary,
            avg_salary_delta: delta(avg_salary, mean(all.rows().map(|p| p.avg_salary))),
            avg_experience,
            avg_experience_delta: delta(
                avg_experience,
                mean(all.rows().map(|p| p.experience_years)),
            ),
            remote_pct,
            remote_pct_delta: delta(remote_pct, remote_share(&all)),
        }
    }
}

fn remote_share(view: &FilteredView<'_>) -> Option<f64> {
    mean(
        view.rows()
            .map(|p| Some(if p.remote_or_onsite == REMOTE { 100.0 } else { 0.0 })),
    )
}

// ---------------------------------------------------------------------------
// Summary – every chart's series for one view
// ---------------------------------------------------------------------------

/// All aggregate series the dashboard renders for a non-empty view.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub metrics: KeyMetrics,
    pub salary_vs_experience: Vec<ScatterPoint>,
    pub salary_by_location: Vec<GroupStat>,
    pub top_skills: Vec<SkillCount>,
    pub highest_paying_skills: Vec<SkillSalary>,
    pub company_sizes: Vec<CompanyStat>,
    pub top_companies: Vec<CompanyStat>,
    pub postings_per_day: Vec<DailyCount>,
    pub education: Vec<CategoryCount>,
}

/// Compute every series, or `None` when the view has no rows so callers
/// show an empty state instead of degenerate charts.
pub fn summarize(view: &FilteredView<'_>) -> Option<Summary> {
    if view.is_empty() {
        return None;
    }
    Some(Summary {
        metrics: KeyMetrics::compute(view),
        salary_vs_experience: salary_vs_experience(view),
        salary_by_location: group_mean(view, Category::Location, Measure::AvgSalary),
        top_skills: top_skills(view, TOP_N),
        highest_paying_skills: highest_paying_skills(view, TOP_N, MIN_SKILL_SUPPORT),
        company_sizes: company_size_summary(view),
        top_companies: top_companies(view, TOP_N),
        postings_per_day: postings_per_day(view),
        education: distribution(view, Category::Education),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::{apply_filters, FilterCriteria};
    use crate::data::model::JobTable;
    use crate::data::test_support::{posting, table};

    fn three_rows() -> JobTable {
        table(vec![
            posting("1", "Mumbai", "Remote", "6-10 LPA"),
            posting("2", "Delhi", "Onsite", "4-8 LPA"),
            posting("3", "Mumbai", "Remote", "10-14 LPA"),
        ])
    }

    #[test]
    fn group_mean_by_location() {
        let t = three_rows();
        let stats = group_mean(&FilteredView::all(&t), Category::Location, Measure::AvgSalary);
        assert_eq!(
            stats,
            vec![
                GroupStat { key: "Delhi".into(), mean: Some(6.0), count: 1 },
                GroupStat { key: "Mumbai".into(), mean: Some(10.0), count: 2 },
            ]
        );
    }

    #[test]
    fn group_with_only_absent_values_has_absent_mean() {
        let t = table(vec![
            posting("1", "Pune", "Remote", "n/a"),
            posting("2", "Pune", "Remote", "undisclosed"),
            posting("3", "Goa", "Remote", "3.333-3.336 LPA"),
        ]);
        let stats = group_mean(&FilteredView::all(&t), Category::Location, Measure::AvgSalary);
        assert_eq!(stats[0], GroupStat { key: "Goa".into(), mean: Some(3.33), count: 1 });
        assert_eq!(stats[1], GroupStat { key: "Pune".into(), mean: None, count: 0 });
    }

    #[test]
    fn top_skills_counts_every_occurrence() {
        let t = table(vec![
            posting("1", "A", "T", "").skills("SQL, Python, SQL"),
            posting("2", "A", "T", "").skills("Excel, Python"),
            posting("3", "A", "T", "").skills("Java"),
        ]);
        let top = top_skills(&FilteredView::all(&t), TOP_N);
        let names: Vec<_> = top.iter().map(|s| (s.skill.as_str(), s.count)).collect();
        assert_eq!(
            names,
            vec![("SQL", 2), ("Python", 2), ("Excel", 1), ("Java", 1)]
        );
    }

    #[test]
    fn top_skills_is_capped() {
        let skills: Vec<String> = (0..15).map(|i| format!("S{i}")).collect();
        let t = table(vec![posting("1", "A", "T", "").skills(&skills.join(","))]);
        assert_eq!(top_skills(&FilteredView::all(&t), TOP_N).len(), TOP_N);
        assert_eq!(top_skills(&FilteredView::all(&t), 3).len(), 3);
    }

    #[test]
    fn highest_paying_skills_respects_support() {
        let mut rows = Vec::new();
        for i in 0..5 {
            rows.push(posting(&i.to_string(), "A", "T", "10-20 LPA").skills("Rust, Go"));
        }
        for i in 5..9 {
            rows.push(posting(&i.to_string(), "A", "T", "40-60 LPA").skills("Scala"));
        }
        rows.push(posting("9", "A", "T", "2-4 LPA").skills("Go"));
        let t = table(rows);

        let ranked = highest_paying_skills(&FilteredView::all(&t), TOP_N, MIN_SKILL_SUPPORT);
        assert_eq!(
            ranked,
            vec![
                SkillSalary { skill: "Rust".into(), mean_salary: 15.0, count: 5 },
                SkillSalary { skill: "Go".into(), mean_salary: 13.0, count: 6 },
            ]
        );
        assert!(ranked.iter().all(|s| s.count >= MIN_SKILL_SUPPORT));
    }

    #[test]
    fn top_companies_by_postings() {
        let t = table(vec![
            posting("1", "A", "T", "6-10").company("Beta").applicants(10),
            posting("2", "A", "T", "").company("Alpha").applicants(30),
            posting("3", "A", "T", "10-14").company("Beta").applicants(20),
            posting("4", "A", "T", "4-6").company("Gamma").applicants(5),
        ]);
        let top = top_companies(&FilteredView::all(&t), TOP_N);
        assert_eq!(top[0].name, "Beta");
        assert_eq!(top[0].postings, 2);
        assert_eq!(top[0].mean_salary, Some(10.0));
        assert_eq!(top[0].mean_applicants, Some(15.0));
        assert_eq!(top[1].name, "Alpha");
        assert_eq!(top[1].mean_salary, None);
        assert_eq!(top[2].name, "Gamma");
        assert_eq!(top_companies(&FilteredView::all(&t), 1).len(), 1);
    }

    #[test]
    fn company_size_summary_rounds() {
        let t = table(vec![
            posting("1", "A", "T", "1-2").size("Small").applicants(1),
            posting("2", "A", "T", "1-1").size("Small").applicants(1),
            posting("3", "A", "T", "1-1").size("Small").applicants(2),
        ]);
        let sizes = company_size_summary(&FilteredView::all(&t));
        assert_eq!(sizes.len(), 1);
        assert_eq!(sizes[0].postings, 3);
        assert_eq!(sizes[0].mean_salary, Some(1.17));
        assert_eq!(sizes[0].mean_applicants, Some(1.33));
    }

    #[test]
    fn unknown_applicants_are_left_out_of_the_mean() {
        let t = table(vec![
            posting("1", "A", "T", "6-10").company("Beta").applicants(10),
            posting("2", "A", "T", "6-10").company("Beta").unknown_applicants(),
            posting("3", "A", "T", "6-10").company("Gamma").unknown_applicants(),
        ]);
        let top = top_companies(&FilteredView::all(&t), TOP_N);
        assert_eq!(top[0].name, "Beta");
        assert_eq!(top[0].postings, 2);
        assert_eq!(top[0].mean_applicants, Some(10.0));
        assert_eq!(top[1].mean_applicants, None);

        let stats = group_mean(&FilteredView::all(&t), Category::CompanyName, Measure::Applicants);
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[1], GroupStat { key: "Gamma".into(), mean: None, count: 0 });
    }

    #[test]
    fn postings_per_day_is_chronological() {
        let t = table(vec![
            posting("1", "A", "T", "").posted(2024, 3, 5),
            posting("2", "A", "T", "").posted(2024, 1, 2),
            posting("3", "A", "T", "").posted(2024, 3, 5),
        ]);
        let days = postings_per_day(&FilteredView::all(&t));
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(days[0].count, 1);
        assert_eq!(days[1].count, 2);
    }

    #[test]
    fn education_distribution() {
        let t = table(vec![
            posting("1", "A", "T", "").education("B.Tech"),
            posting("2", "A", "T", "").education("MBA"),
            posting("3", "A", "T", "").education("MBA"),
            posting("4", "A", "T", "").education("PhD"),
        ]);
        let dist = distribution(&FilteredView::all(&t), Category::Education);
        let flat: Vec<_> = dist.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(flat, vec![("MBA", 2), ("B.Tech", 1), ("PhD", 1)]);
    }

    #[test]
    fn scatter_skips_rows_without_both_values() {
        let t = table(vec![
            posting("1", "A", "Remote", "6-10").experience("2-4 years"),
            posting("2", "A", "Remote", "6-10"),
            posting("3", "A", "Remote", "none").experience("1 year"),
        ]);
        let points = salary_vs_experience(&FilteredView::all(&t));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].experience_years, 3.0);
        assert_eq!(points[0].avg_salary, 8.0);
    }

    #[test]
    fn key_metrics_against_full_table() {
        let t = table(vec![
            posting("1", "Mumbai", "T", "6-10").remote("Remote").experience("2 years"),
            posting("2", "Delhi", "T", "4-8").remote("Onsite").experience("4 years"),
            posting("3", "Mumbai", "T", "10-14").remote("Remote"),
            posting("4", "Pune", "T", "2-4").remote("Onsite").experience("6 years"),
        ]);
        let mut c = FilterCriteria::select_all(&t);
        c.locations = BTreeSet::from(["Mumbai".to_string()]);
        let m = KeyMetrics::compute(&apply_filters(&t, &c));

        assert_eq!(m.total_jobs, 2);
        assert_eq!(m.total_jobs_delta, 0);
        assert_eq!(m.avg_salary, Some(10.0));
        assert_eq!(m.avg_salary_delta, Some(2.75));
        assert_eq!(m.avg_experience, Some(2.0));
        assert_eq!(m.avg_experience_delta, Some(-2.0));
        assert_eq!(m.remote_pct, Some(100.0));
        assert_eq!(m.remote_pct_delta, Some(50.0));
    }

    #[test]
    fn summarize_short_circuits_on_empty_view() {
        let t = three_rows();
        let mut c = FilterCriteria::select_all(&t);
        c.locations.clear();
        assert!(summarize(&apply_filters(&t, &c)).is_none());
        assert!(summarize(&FilteredView::all(&t)).is_some());
    }

    #[test]
    fn mean_ignores_absence() {
        assert_eq!(mean([Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean([None, None]), None);
        assert_eq!(mean(std::iter::empty::<Option<f64>>()), None);
    }
}
