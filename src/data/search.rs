use super::filter::FilteredView;
use super::model::JobPosting;

/// Text fields a search term is matched against: title, company,
/// location and the raw skills cell.
pub fn searchable_fields(p: &JobPosting) -> [&str; 4] {
    [
        p.job_title.as_str(),
        p.company_name.as_str(),
        p.job_location.as_str(),
        p.raw_skills_required.as_str(),
    ]
}

/// Rows of `view` where any searchable field contains `term`, ignoring case.
/// An empty term returns the view unchanged.
pub fn search<'a>(view: &FilteredView<'a>, term: &str) -> FilteredView<'a> {
    if term.is_empty() {
        return view.clone();
    }
    let needle = term.to_lowercase();
    view.retain(|p| {
        searchable_fields(p)
            .iter()
            .any(|field| !field.is_empty() && field.to_lowercase().contains(&needle))
    })
}
