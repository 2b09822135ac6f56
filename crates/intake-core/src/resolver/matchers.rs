//! Matcher strategies, tried in order by [`super::OptionResolver`].

use crate::model::FieldOption;

use super::normalize::{contains_phrase, tokens};

/// Option with its normalized display name.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Option as cached.
    pub option: FieldOption,
    /// [`super::normalize_label`] applied to the option name.
    pub normalized: String,
}

/// Input handed to each matcher.
#[derive(Debug, Clone, Copy)]
pub struct MatchRequest<'a> {
    /// Target field id.
    pub field_id: &'a str,
    /// Normalized raw value.
    pub normalized: &'a str,
}

/// One rule of the resolution cascade.
pub trait OptionMatcher: Send + Sync {
    /// Short rule name used in logs.
    fn name(&self) -> &'static str;

    /// Index of the matching candidate, if this rule finds one.
    fn find(&self, request: &MatchRequest<'_>, candidates: &[Candidate]) -> Option<usize>;
}

/// Normalized strings are equal.
pub struct ExactMatcher;

impl OptionMatcher for ExactMatcher {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn find(&self, request: &MatchRequest<'_>, candidates: &[Candidate]) -> Option<usize> {
        candidates
            .iter()
            .position(|candidate| candidate.normalized == request.normalized)
    }
}

/// Either string contains the other; first option wins.
pub struct SubstringMatcher;

impl OptionMatcher for SubstringMatcher {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn find(&self, request: &MatchRequest<'_>, candidates: &[Candidate]) -> Option<usize> {
        if request.normalized.is_empty() {
            return None;
        }
        candidates.iter().position(|candidate| {
            !candidate.normalized.is_empty()
                && (request.normalized.contains(candidate.normalized.as_str())
                    || candidate.normalized.contains(request.normalized))
        })
    }
}

/// `y` / `n` shorthand for options literally named yes / no.
pub struct YesNoMatcher;

impl OptionMatcher for YesNoMatcher {
    fn name(&self) -> &'static str {
        "yes_no"
    }

    fn find(&self, request: &MatchRequest<'_>, candidates: &[Candidate]) -> Option<usize> {
        let target = match request.normalized {
            "yes" | "y" => "yes",
            "no" | "n" => "no",
            _ => return None,
        };
        candidates
            .iter()
            .position(|candidate| candidate.normalized == target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Eligibility {
    NotEligible,
    Canada,
    UnitedStates,
}

/// Right-to-work phrasing for one designated field.
pub struct WorkEligibilityMatcher {
    field_id: String,
}

impl WorkEligibilityMatcher {
    /// Apply the heuristic to `field_id` only.
    #[must_use]
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
        }
    }

    fn classify(normalized: &str) -> Option<Eligibility> {
        let words = tokens(normalized);
        let compact: String = words.concat();

        if matches!(normalized, "no" | "n") || says_ineligible(normalized, &words) {
            return Some(Eligibility::NotEligible);
        }
        if normalized.contains("canad") {
            return Some(Eligibility::Canada);
        }
        let status_words = compact.contains("citizen")
            || compact.contains("resident")
            || compact.contains("greencard");
        if (mentions_us(&words, &compact) && (status_words || words.len() <= 2))
            || compact.contains("greencard")
        {
            return Some(Eligibility::UnitedStates);
        }
        None
    }

    fn option_matches(kind: Eligibility, normalized: &str) -> bool {
        let words = tokens(normalized);
        let compact: String = words.concat();
        let not_eligible = says_ineligible(normalized, &words);
        match kind {
            Eligibility::NotEligible => not_eligible,
            Eligibility::Canada => !not_eligible && normalized.contains("canad"),
            Eligibility::UnitedStates => !not_eligible && mentions_us(&words, &compact),
        }
    }
}

/// Phrases that negate work authorization. "No sponsorship required" is not one.
const INELIGIBLE_PHRASES: [&str; 7] = [
    "not eligible",
    "not authorized",
    "need sponsorship",
    "needs sponsorship",
    "require sponsorship",
    "requires sponsorship",
    "sponsorship needed",
];

fn says_ineligible(normalized: &str, words: &[&str]) -> bool {
    INELIGIBLE_PHRASES
        .iter()
        .any(|phrase| contains_phrase(normalized, phrase))
        || words
            .iter()
            .any(|word| matches!(*word, "none" | "neither"))
}

fn mentions_us(words: &[&str], compact: &str) -> bool {
    words
        .iter()
        .any(|word| matches!(*word, "us" | "usa" | "american"))
        || words.windows(2).any(|pair| pair == ["u", "s"])
        || compact.contains("unitedstates")
}

impl OptionMatcher for WorkEligibilityMatcher {
    fn name(&self) -> &'static str {
        "work_eligibility"
    }

    fn find(&self, request: &MatchRequest<'_>, candidates: &[Candidate]) -> Option<usize> {
        if request.field_id != self.field_id {
            return None;
        }
        let kind = Self::classify(request.normalized)?;
        candidates
            .iter()
            .position(|candidate| Self::option_matches(kind, &candidate.normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::normalize_label;

    fn candidates(names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| Candidate {
                option: FieldOption {
                    id: format!("opt-{index}"),
                    name: (*name).to_string(),
                },
                normalized: normalize_label(name),
            })
            .collect()
    }

    fn request<'a>(field_id: &'a str, normalized: &'a str) -> MatchRequest<'a> {
        MatchRequest {
            field_id,
            normalized,
        }
    }

    #[test]
    fn exact_matcher_requires_equal_labels() {
        let options = candidates(&["Bachelor's degree", "Master's degree"]);
        assert_eq!(
            ExactMatcher.find(&request("f", "master s degree"), &options),
            Some(1)
        );
        assert_eq!(ExactMatcher.find(&request("f", "master"), &options), None);
    }

    #[test]
    fn substring_matcher_works_in_both_directions() {
        let options = candidates(&["Instagram", "Friend or colleague"]);
        assert_eq!(
            SubstringMatcher.find(&request("f", "saw it on instagram"), &options),
            Some(0)
        );
        assert_eq!(
            SubstringMatcher.find(&request("f", "friend"), &options),
            Some(1)
        );
        assert_eq!(SubstringMatcher.find(&request("f", ""), &options), None);
    }

    #[test]
    fn yes_no_matcher_expands_shorthand() {
        let options = candidates(&["Maybe later", "No", "Yes"]);
        assert_eq!(YesNoMatcher.find(&request("f", "y"), &options), Some(2));
        assert_eq!(YesNoMatcher.find(&request("f", "n"), &options), Some(1));
        assert_eq!(YesNoMatcher.find(&request("f", "sure"), &options), None);
    }

    #[test]
    fn eligibility_matcher_only_applies_to_its_field() {
        let options = candidates(&[
            "US Citizen / Permanent Resident",
            "Canadian Citizen / Permanent Resident",
            "Not eligible",
        ]);
        let matcher = WorkEligibilityMatcher::new("cf-elig");
        assert_eq!(matcher.find(&request("cf-elig", "u s citizen"), &options), Some(0));
        assert_eq!(matcher.find(&request("cf-other", "u s citizen"), &options), None);
        assert_eq!(
            matcher.find(&request("cf-elig", "i have a green card"), &options),
            Some(0)
        );
        assert_eq!(
            matcher.find(&request("cf-elig", "permanent resident of canada"), &options),
            Some(1)
        );
        assert_eq!(
            matcher.find(&request("cf-elig", "neither"), &options),
            Some(2)
        );
        assert_eq!(
            matcher.find(&request("cf-elig", "i would need sponsorship"), &options),
            Some(2)
        );
        assert_eq!(matcher.find(&request("cf-elig", "maybe"), &options), None);
        assert_eq!(
            matcher.find(&request("cf-elig", "us citizen no sponsorship needed"), &options),
            Some(0)
        );
    }

    #[test]
    fn eligibility_matcher_does_not_pick_negative_us_option() {
        let options = candidates(&["Not eligible to work in the US", "Authorized in the USA"]);
        let matcher = WorkEligibilityMatcher::new("cf-elig");
        assert_eq!(matcher.find(&request("cf-elig", "us citizen"), &options), Some(1));
    }

    #[test]
    fn sponsorship_options_are_split_by_negation() {
        let options = candidates(&[
            "US Citizen (no sponsorship required)",
            "Need sponsorship",
            "Requires sponsorship to work in Canada",
        ]);
        let matcher = WorkEligibilityMatcher::new("cf-elig");
        assert_eq!(matcher.find(&request("cf-elig", "us citizen"), &options), Some(0));
        assert_eq!(matcher.find(&request("cf-elig", "not eligible"), &options), Some(1));
        assert_eq!(
            matcher.find(&request("cf-elig", "i would need sponsorship"), &options),
            Some(1)
        );
    }
}
