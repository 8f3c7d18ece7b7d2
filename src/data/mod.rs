/// Data layer: parsing, loading, filtering, aggregation and search.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  raw rows → parse → JobTable      (cache: once per file)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → FilteredView
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌──────────┐
///   │ aggregate │  │  search   │ → export (CSV)
///   └───────────┘  └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod parse;
pub mod search;

#[cfg(test)]
mod test_support;
