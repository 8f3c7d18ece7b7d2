use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::data::aggregate::{summarize, Summary};
use crate::data::cache::DatasetCache;
use crate::data::error::LoadError;
use crate::data::export::{export_csv, newest_first};
use crate::data::filter::{apply_filters, FilterCriteria, FilteredView};
use crate::data::model::JobTable;
use crate::data::search::search;

// ---------------------------------------------------------------------------
// Filterable columns
// ---------------------------------------------------------------------------

/// The sidebar's multi-select columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    Location,
    CompanySize,
    JobType,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 3] = [
        FilterColumn::Location,
        FilterColumn::CompanySize,
        FilterColumn::JobType,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterColumn::Location => "Locations",
            FilterColumn::CompanySize => "Company Size",
            FilterColumn::JobType => "Job Type",
        }
    }

    /// Every distinct value of this column in the table.
    pub fn options<'t>(&self, table: &'t JobTable) -> &'t BTreeSet<String> {
        match self {
            FilterColumn::Location => table.locations(),
            FilterColumn::CompanySize => table.company_sizes(),
            FilterColumn::JobType => table.job_types(),
        }
    }

    pub fn selected<'c>(&self, criteria: &'c FilterCriteria) -> &'c BTreeSet<String> {
        match self {
            FilterColumn::Location => &criteria.locations,
            FilterColumn::CompanySize => &criteria.company_sizes,
            FilterColumn::JobType => &criteria.job_types,
        }
    }

    fn selected_mut<'c>(&self, criteria: &'c mut FilterCriteria) -> &'c mut BTreeSet<String> {
        match self {
            FilterColumn::Location => &mut criteria.locations,
            FilterColumn::CompanySize => &mut criteria.company_sizes,
            FilterColumn::JobType => &mut criteria.job_types,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Source of the current table (None until a file loaded).
    pub cache: Option<DatasetCache>,

    /// Normalized table, shared read-only with every view.
    pub table: Option<Arc<JobTable>>,

    /// Current sidebar selection.
    pub criteria: Option<FilterCriteria>,

    /// Indices of postings passing the filters (cached).
    pub visible_indices: Vec<usize>,

    /// Free-text search over the filtered postings.
    pub search_term: String,

    /// Indices of search hits, newest first.
    pub result_indices: Vec<usize>,

    /// Chart series for the filtered postings; None for an empty selection.
    pub summary: Option<Summary>,

    /// Colours per job type.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Make `path` the session's table. Reopening the current source reuses
    /// its cached table; a new path is loaded once and replaces the cache.
    pub fn open(&mut self, path: &Path) -> Result<(), LoadError> {
        let reused = self
            .cache
            .as_ref()
            .filter(|c| c.path() == path)
            .map(DatasetCache::get_or_load);
        let loaded = match reused {
            Some(loaded) => loaded,
            None => {
                let cache = DatasetCache::new(path);
                let loaded = cache.get_or_load();
                if loaded.is_ok() {
                    self.cache = Some(cache);
                }
                loaded
            }
        };

        match loaded {
            Ok(table) => {
                self.set_table(table);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error loading data: {e}"));
                Err(e)
            }
        }
    }

    /// Ingest a newly loaded table, select everything and recompute.
    pub fn set_table(&mut self, table: Arc<JobTable>) {
        self.criteria = Some(FilterCriteria::select_all(&table));
        self.color_map = Some(ColorMap::new(table.job_types().iter().cloned()));
        self.search_term.clear();
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    pub fn source_path(&self) -> Option<PathBuf> {
        self.cache.as_ref().map(|c| c.path().to_path_buf())
    }

    /// Recompute the filtered rows, every aggregate and the search hits.
    pub fn refilter(&mut self) {
        let (Some(table), Some(criteria)) = (&self.table, &self.criteria) else {
            return;
        };
        let view = apply_filters(table, criteria);
        self.summary = summarize(&view);
        self.result_indices = newest_first(&search(&view, &self.search_term)).into_indices();
        self.visible_indices = view.into_indices();
    }

    /// A table is loaded but no posting passes the filters.
    pub fn is_empty_selection(&self) -> bool {
        self.table.is_some() && self.visible_indices.is_empty()
    }

    /// Search hits as a view, in display order.
    pub fn results(&self) -> Option<FilteredView<'_>> {
        let table = self.table.as_deref()?;
        Some(FilteredView::from_indices(table, self.result_indices.clone()))
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.refilter();
    }

    /// The posted-date window to offer in the date pickers, or `None` when
    /// the table has no postings to bound it.
    pub fn date_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        let table = self.table.as_ref()?;
        let criteria = self.criteria.as_ref()?;
        table
            .date_bounds()
            .map(|_| (criteria.date_lower, criteria.date_upper))
    }

    /// Set the inclusive posted-date window; bounds are swapped if reversed.
    pub fn set_date_range(&mut self, lower: NaiveDate, upper: NaiveDate) {
        if let Some(c) = &mut self.criteria {
            c.date_lower = lower.min(upper);
            c.date_upper = lower.max(upper);
            self.refilter();
        }
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_filter_value(&mut self, column: FilterColumn, value: &str) {
        if let Some(c) = &mut self.criteria {
            let selected = column.selected_mut(c);
            if !selected.remove(value) {
                selected.insert(value.to_string());
            }
            self.refilter();
        }
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: FilterColumn) {
        if let (Some(table), Some(c)) = (&self.table, &mut self.criteria) {
            *column.selected_mut(c) = column.options(table).clone();
            self.refilter();
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: FilterColumn) {
        if let Some(c) = &mut self.criteria {
            column.selected_mut(c).clear();
            self.refilter();
        }
    }

    /// Write the current search hits to `path` as CSV.
    pub fn export(&self, path: &Path) -> Result<()> {
        let results = self.results().context("no dataset loaded")?;
        export_csv(&results, path)
    }
}
