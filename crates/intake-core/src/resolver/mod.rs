//! Free-text to option-id resolution.
//!
//! # Design
//! - The cascade is an ordered list of [`OptionMatcher`] strategies:
//!   exact, substring, yes/no shorthand, then the work-eligibility heuristic.
//! - An enumerated field whose value does not resolve is dropped, never sent
//!   as raw text; fields without cached options accept raw text.

pub mod matchers;
pub(crate) mod normalize;

use std::sync::Arc;

use intake_telemetry::Metrics;
use tracing::{debug, warn};

use crate::cache::OptionCache;
use crate::model::{AssignmentValue, FieldAssignment, FieldOption};

pub use matchers::{
    Candidate, ExactMatcher, MatchRequest, OptionMatcher, SubstringMatcher,
    WorkEligibilityMatcher, YesNoMatcher,
};
pub use normalize::normalize_label;

/// Resolves free text against the option cache.
pub struct OptionResolver {
    cache: Arc<OptionCache>,
    matchers: Vec<Box<dyn OptionMatcher>>,
    metrics: Metrics,
}

impl OptionResolver {
    /// Resolver with the standard cascade. The eligibility heuristic is only
    /// installed when a work-eligibility field is configured.
    #[must_use]
    pub fn new(
        cache: Arc<OptionCache>,
        work_eligibility_field: Option<&str>,
        metrics: Metrics,
    ) -> Self {
        let mut matchers: Vec<Box<dyn OptionMatcher>> = vec![
            Box::new(ExactMatcher),
            Box::new(SubstringMatcher),
            Box::new(YesNoMatcher),
        ];
        if let Some(field_id) = work_eligibility_field {
            matchers.push(Box::new(WorkEligibilityMatcher::new(field_id)));
        }
        Self::with_matchers(cache, matchers, metrics)
    }

    /// Resolver with a caller-supplied cascade.
    #[must_use]
    pub fn with_matchers(
        cache: Arc<OptionCache>,
        matchers: Vec<Box<dyn OptionMatcher>>,
        metrics: Metrics,
    ) -> Self {
        Self {
            cache,
            matchers,
            metrics,
        }
    }

    /// Cache backing this resolver.
    #[must_use]
    pub const fn cache(&self) -> &Arc<OptionCache> {
        &self.cache
    }

    /// Resolve `raw` against the cached options of `field_id`.
    #[must_use]
    pub fn resolve(&self, field_id: &str, raw: &str) -> Option<String> {
        let options = self.cache.lookup(field_id);
        self.resolve_against(field_id, raw, &options)
    }

    /// Resolve `raw` against an explicit option list.
    #[must_use]
    pub fn resolve_against(
        &self,
        field_id: &str,
        raw: &str,
        options: &[FieldOption],
    ) -> Option<String> {
        let normalized = normalize_label(raw);
        let candidates: Vec<Candidate> = options
            .iter()
            .map(|option| Candidate {
                option: option.clone(),
                normalized: normalize_label(&option.name),
            })
            .collect();
        let request = MatchRequest {
            field_id,
            normalized: &normalized,
        };

        for matcher in &self.matchers {
            if let Some(index) = matcher.find(&request, &candidates) {
                let chosen = &candidates[index].option;
                debug!(
                    field_id,
                    raw,
                    rule = matcher.name(),
                    option = %chosen.name,
                    "resolved option"
                );
                self.metrics.inc_option_resolution("matched");
                return Some(chosen.id.clone());
            }
        }

        let names: Vec<&str> = options.iter().map(|option| option.name.as_str()).collect();
        warn!(field_id, raw, candidates = ?names, "no option matched submitted value");
        self.metrics.inc_option_resolution("unmatched");
        None
    }
}

/// Append an assignment for `field_id` when `raw` is usable.
///
/// Blank or absent values are skipped. A field with cached options only
/// receives a resolved option id; a field without cached options receives
/// `raw` verbatim.
pub fn push_dropdown_or_text(
    resolver: &OptionResolver,
    assignments: &mut Vec<FieldAssignment>,
    field_id: &str,
    raw: Option<&str>,
) {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return;
    };

    let options = resolver.cache.lookup(field_id);
    if options.is_empty() {
        resolver.metrics.inc_option_resolution("free_text");
        assignments.push(FieldAssignment {
            field_id: field_id.to_string(),
            value: AssignmentValue::Text(raw.to_string()),
        });
        return;
    }

    if let Some(option_id) = resolver.resolve_against(field_id, raw, &options) {
        let value = if resolver.cache.is_multi_select(field_id) {
            AssignmentValue::Labels(vec![option_id])
        } else {
            AssignmentValue::Option(option_id)
        };
        assignments.push(FieldAssignment {
            field_id: field_id.to_string(),
            value,
        });
    }
}
