use once_cell::sync::Lazy;
use regex::Regex;

// ---------------------------------------------------------------------------
// Numeric token extraction
// ---------------------------------------------------------------------------

/// Unsigned integer or decimal, e.g. `6`, `10`, `4.5`.
/// Currency symbols, unit suffixes and range dashes are skipped.
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:\.\d+)?").expect("numeric token pattern is valid")
});

/// All numeric tokens of `text`, left to right.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Salary range
// ---------------------------------------------------------------------------

/// Salary bounds derived from a free-text range such as `"6-10 LPA"`.
///
/// Either all three fields are present or none is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

/// Take the first two numbers of `text` as `(min, max)` in the order they
/// appear. Fewer than two numbers yields an all-absent range.
pub fn parse_salary_range(text: &str) -> SalaryRange {
    match extract_numbers(text).as_slice() {
        [min, max, ..] => SalaryRange {
            min: Some(*min),
            max: Some(*max),
            avg: Some((min + max) / 2.0),
        },
        _ => SalaryRange::default(),
    }
}

// ---------------------------------------------------------------------------
// Experience
// ---------------------------------------------------------------------------

/// Representative years of experience: midpoint of the first two numbers,
/// the single number if only one is present, absent otherwise.
pub fn parse_experience(text: &str) -> Option<f64> {
    match extract_numbers(text).as_slice() {
        [] => None,
        [years] => Some(*years),
        [low, high, ..] => Some((low + high) / 2.0),
    }
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

pub const SKILL_SEPARATOR: char = ',';

/// Split a comma-separated skills cell into trimmed names.
/// A blank cell has no skills; otherwise every element is kept, including
/// duplicates and empty names between adjacent separators.
pub fn split_skills(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(SKILL_SEPARATOR)
        .map(|s| s.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_with_currency_and_unit() {
        let r = parse_salary_range("₹6-10 LPA");
        assert_eq!(r.min, Some(6.0));
        assert_eq!(r.max, Some(10.0));
        assert_eq!(r.avg, Some(8.0));
    }

    #[test]
    fn salary_needs_two_numbers() {
        assert_eq!(parse_salary_range("no data"), SalaryRange::default());
        assert_eq!(parse_salary_range("5 LPA"), SalaryRange::default());
        assert_eq!(parse_salary_range(""), SalaryRange::default());
    }

    #[test]
    fn salary_keeps_source_order() {
        let r = parse_salary_range("12 - 7.5 LPA");
        assert_eq!(r.min, Some(12.0));
        assert_eq!(r.max, Some(7.5));
        assert_eq!(r.avg, Some(9.75));
    }

    #[test]
    fn salary_avg_is_midpoint() {
        for text in ["3.2-4.8 LPA", "10 to 25", "1-2-3", "0.5 - 0.75"] {
            let r = parse_salary_range(text);
            let (min, max, avg) = (r.min.unwrap(), r.max.unwrap(), r.avg.unwrap());
            assert!((avg - (min + max) / 2.0).abs() < 1e-9, "{text}");
        }
    }

    #[test]
    fn experience_variants() {
        assert_eq!(parse_experience("2-5 years"), Some(3.5));
        assert_eq!(parse_experience("3 years"), Some(3.0));
        assert_eq!(parse_experience("Fresher"), None);
        assert_eq!(parse_experience(""), None);
        assert_eq!(parse_experience("1-3-9 yrs"), Some(2.0));
    }

    #[test]
    fn decimal_tokens() {
        assert_eq!(extract_numbers("1.5 to 2.25 yrs"), vec![1.5, 2.25]);
        assert_eq!(extract_numbers("5. LPA"), vec![5.0]);
    }

    #[test]
    fn skills_are_trimmed() {
        assert_eq!(
            split_skills(" Python, SQL ,Python, AWS "),
            vec!["Python", "SQL", "Python", "AWS"]
        );
        assert_eq!(split_skills("Python,,SQL"), vec!["Python", "", "SQL"]);
        assert_eq!(split_skills("Go,"), vec!["Go", ""]);
        assert!(split_skills("").is_empty());
        assert!(split_skills("  ").is_empty());
    }
}
