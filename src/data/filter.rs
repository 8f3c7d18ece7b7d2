use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{JobPosting, JobTable};

// ---------------------------------------------------------------------------
// Filter criteria: date window plus selected values per categorical column
// ---------------------------------------------------------------------------

/// The sidebar selection.
///
/// An empty set selects nothing (no row passes), which is different from
/// the initial state where every distinct value is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Inclusive bounds on `posted_date`.
    pub date_lower: NaiveDate,
    pub date_upper: NaiveDate,
    pub locations: BTreeSet<String>,
    pub company_sizes: BTreeSet<String>,
    pub job_types: BTreeSet<String>,
}

impl FilterCriteria {
    /// Everything selected: full date span and all distinct values.
    pub fn select_all(table: &JobTable) -> Self {
        let (date_lower, date_upper) = table
            .date_bounds()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        FilterCriteria {
            date_lower,
            date_upper,
            locations: table.locations().clone(),
            company_sizes: table.company_sizes().clone(),
            job_types: table.job_types().clone(),
        }
    }

    /// Whether a single posting passes every predicate.
    pub fn matches(&self, p: &JobPosting) -> bool {
        p.posted_date >= self.date_lower
            && p.posted_date <= self.date_upper
            && self.locations.contains(&p.job_location)
            && self.company_sizes.contains(&p.company_size)
            && self.job_types.contains(&p.job_type)
    }
}

// ---------------------------------------------------------------------------
// FilteredView – ordered subset of the table, by row index
// ---------------------------------------------------------------------------

/// A borrowed, order-preserving selection of table rows.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a JobTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over every row of `table`.
    pub fn all(table: &'a JobTable) -> Self {
        Self {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    /// Rebuild a view from indices previously taken from the same table.
    /// Out-of-range indices are dropped.
    pub fn from_indices(table: &'a JobTable, indices: Vec<usize>) -> Self {
        let indices = indices.into_iter().filter(|&i| i < table.len()).collect();
        Self { table, indices }
    }

    pub fn table(&self) -> &'a JobTable {
        self.table
    }

    /// Row indices into the underlying table, in view order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    /// Postings in view order.
    pub fn rows(&self) -> impl Iterator<Item = &'a JobPosting> + '_ {
        let postings = self.table.postings();
        self.indices.iter().map(move |&i| &postings[i])
    }

    /// Keep only the rows for which `keep` holds.
    pub fn retain<F>(&self, mut keep: F) -> FilteredView<'a>
    where
        F: FnMut(&JobPosting) -> bool,
    {
        let postings = self.table.postings();
        FilteredView {
            table: self.table,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| keep(&postings[i]))
                .collect(),
        }
    }

    /// Number of rows in view.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no row is in view.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the rows of `table` passing all of `criteria`, in table order.
pub fn apply_filters<'a>(table: &'a JobTable, criteria: &FilterCriteria) -> FilteredView<'a> {
    FilteredView::all(table).retain(|p| criteria.matches(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{posting, table};

    fn sample() -> JobTable {
        table(vec![
            posting("1", "Mumbai", "Remote", "6-10 LPA").size("Large").posted(2024, 1, 10),
            posting("2", "Delhi", "Onsite", "4-8 LPA").size("Small").posted(2024, 1, 12),
            posting("3", "Mumbai", "Remote", "10-14 LPA").size("Small").posted(2024, 1, 20),
        ])
    }

    #[test]
    fn default_criteria_keep_everything() {
        let t = sample();
        let view = apply_filters(&t, &FilterCriteria::select_all(&t));
        assert_eq!(view.indices(), &[0, 1, 2]);
    }

    #[test]
    fn empty_set_selects_nothing() {
        let t = sample();
        let mut c = FilterCriteria::select_all(&t);
        c.locations.clear();
        assert!(apply_filters(&t, &c).is_empty());

        let mut c = FilterCriteria::select_all(&t);
        c.job_types.clear();
        assert!(apply_filters(&t, &c).is_empty());
    }

    #[test]
    fn predicates_are_anded_and_order_kept() {
        let t = sample();
        let mut c = FilterCriteria::select_all(&t);
        c.locations = BTreeSet::from(["Mumbai".to_string()]);
        assert_eq!(apply_filters(&t, &c).indices(), &[0, 2]);

        c.company_sizes = BTreeSet::from(["Small".to_string()]);
        assert_eq!(apply_filters(&t, &c).indices(), &[2]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let t = sample();
        let mut c = FilterCriteria::select_all(&t);
        c.date_lower = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        c.date_upper = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        assert_eq!(apply_filters(&t, &c).indices(), &[1, 2]);

        c.date_upper = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        assert_eq!(apply_filters(&t, &c).indices(), &[1]);
    }

    #[test]
    fn result_never_exceeds_input() {
        let t = sample();
        let mut c = FilterCriteria::select_all(&t);
        for loc in ["Mumbai", "Delhi", "Chennai"] {
            c.locations = BTreeSet::from([loc.to_string()]);
            assert!(apply_filters(&t, &c).len() <= t.len());
        }
    }

    #[test]
    fn from_indices_drops_stale_rows() {
        let t = sample();
        let view = FilteredView::from_indices(&t, vec![2, 7, 0]);
        assert_eq!(view.indices(), &[2, 0]);
    }
}
