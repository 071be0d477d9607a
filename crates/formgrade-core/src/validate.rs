//! Per-type answer validators.
//!
//! Pure functions: they decide correctness (and, for cloze, the number of
//! matching blanks) without knowing anything about point weights, settings
//! completeness or answer-shape dispatch. The engine handles those.

use serde::{Deserialize, Serialize};

use crate::model::CategoryMap;
use crate::score;

/// How categories outside the correct mapping are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryMatch {
    /// Only categories named by the correct mapping are checked. Items filed
    /// under categories the question never defined are ignored.
    #[default]
    Lenient,
    /// Additionally, every non-empty category in the answer must exist in the
    /// correct mapping.
    Strict,
}

/// Check a categorize answer.
///
/// For every category in `correct`, the answer must hold a list of the same
/// length that contains every accepted item. Order does not matter and
/// duplicates are not collapsed. A missing answer or missing correct mapping
/// is always incorrect.
pub fn validate_categorize(
    user: Option<&CategoryMap>,
    correct: Option<&CategoryMap>,
    mode: CategoryMatch,
) -> bool {
    let (Some(user), Some(correct)) = (user, correct) else {
        return false;
    };

    let expected_filed = correct.iter().all(|(label, accepted)| {
        user.get(label).is_some_and(|given| {
            given.len() == accepted.len() && accepted.iter().all(|item| given.contains(item))
        })
    });
    if !expected_filed {
        return false;
    }

    match mode {
        CategoryMatch::Lenient => true,
        CategoryMatch::Strict => user
            .iter()
            .all(|(label, given)| given.is_empty() || correct.contains_key(label)),
    }
}

/// Strict cloze correctness: every blank the respondent filled matches the
/// accepted answer at the same position.
///
/// Positions past the end of `correct` compare against the empty string.
/// Note that an empty answer list is vacuously correct; the partial score
/// from [`cloze_score`] is what carries credit.
pub fn validate_cloze(user: &[Option<String>], correct: &[String]) -> bool {
    user.iter()
        .enumerate()
        .all(|(i, given)| blank_matches(correct, i, given.as_deref()))
}

/// Number of positions where the answer matches the accepted blank.
pub fn cloze_hits(user: &[Option<String>], correct: &[String]) -> usize {
    user.iter()
        .enumerate()
        .filter(|(i, given)| blank_matches(correct, *i, given.as_deref()))
        .count()
}

/// Partial cloze score: `weight * hits / correct.len()`, capped at `weight`.
pub fn cloze_score(user: &[Option<String>], correct: &[String], weight: f64) -> f64 {
    score::partial_score(cloze_hits(user, correct), correct.len(), weight)
}

/// Case-insensitive comparison; absent values compare as empty strings.
pub fn validate_comprehension(user: Option<&str>, correct: Option<&str>) -> bool {
    eq_ignore_case(user, correct)
}

fn blank_matches(correct: &[String], index: usize, given: Option<&str>) -> bool {
    eq_ignore_case(correct.get(index).map(String::as_str), given)
}

fn eq_ignore_case(a: Option<&str>, b: Option<&str>) -> bool {
    a.unwrap_or_default().to_lowercase() == b.unwrap_or_default().to_lowercase()
}
