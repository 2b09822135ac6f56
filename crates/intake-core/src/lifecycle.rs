//! Keyword resolution for lifecycle updates.

use intake_config::CohortCatalog;
use intake_config::CohortOption;

use crate::resolver::normalize::contains_phrase;
use crate::resolver::normalize_label;

/// Cohort whose keywords appear in `raw`, checked in catalog order.
///
/// Keywords and input are normalized the same way option labels are, so
/// `DTCA-2502`, `dtca 2502` and `Dtca_2502 extra text` all hit the keyword
/// `DTCA-2502`.
#[must_use]
pub fn resolve_cohort<'a>(catalog: &'a CohortCatalog, raw: &str) -> Option<&'a CohortOption> {
    let normalized = normalize_label(raw);
    if normalized.is_empty() {
        return None;
    }
    catalog.options.iter().find(|cohort| {
        cohort
            .keywords
            .iter()
            .any(|keyword| contains_phrase(&normalized, &normalize_label(keyword)))
    })
}
