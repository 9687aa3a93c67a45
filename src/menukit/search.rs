//! Name filtering for section pickers. A pure projection over the
//! document: no ranking, no mutation, document order preserved.

use crate::model::{Document, Section};

/// Sections whose name contains `query`, case-insensitively. An empty
/// query matches everything.
pub fn filter_by_name<'a>(document: &'a Document, query: &str) -> Vec<&'a Section> {
    let query_lower = query.to_lowercase();
    document
        .sections()
        .iter()
        .filter(|section| section.name.to_lowercase().contains(&query_lower))
        .collect()
}
