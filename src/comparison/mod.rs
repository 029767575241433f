//! Unit price comparison
//!
//! Pure operations over snapshots of the candidate list. Each operation
//! returns a new list and leaves its input untouched.

pub mod candidate;
pub mod decimal;
pub mod session;

pub use candidate::{Candidate, CandidateField, CandidateId};
pub use decimal::{compute_unit_value, format_decimal, format_unit_value, parse_decimal};
pub use session::Comparison;

/// Minimum number of priced candidates before one is called the best value
pub const MIN_CANDIDATES_FOR_BEST: usize = 2;

/// Replace one field of the candidate with `id`
///
/// Other candidates are carried over unchanged. An unknown `id` yields an
/// equal copy of the list.
pub fn update_candidate(
    candidates: &[Candidate],
    id: CandidateId,
    field: CandidateField,
    value: &str,
) -> Vec<Candidate> {
    candidates
        .iter()
        .map(|c| if c.id == id { c.with_field(field, value) } else { c.clone() })
        .collect()
}

/// Append a blank candidate with the next free id
///
/// Once the highest id is `CandidateId::MAX` there is no next id and the list
/// comes back unchanged.
pub fn add_candidate(candidates: &[Candidate]) -> Vec<Candidate> {
    let mut updated = candidates.to_vec();
    let next_id = candidates.iter().map(|c| c.id).max().unwrap_or(0).checked_add(1);
    if let Some(next_id) = next_id {
        updated.push(Candidate::new(next_id));
    }
    updated
}

/// The list a fresh comparison starts from: a single blank candidate, id 1
pub fn reset_comparison() -> Vec<Candidate> {
    vec![Candidate::new(1)]
}

/// Id of the candidate with the lowest unit value
///
/// `None` unless at least two candidates have a unit value. On equal values
/// the earliest candidate in the list wins.
pub fn best_value_id(candidates: &[Candidate]) -> Option<CandidateId> {
    lowest_value(candidates.iter().map(|c| (c.id, c.unit_value())))
}

/// Key of the lowest defined value, leftmost on ties
///
/// Shared by the comparison screen and stored product presentations.
pub fn lowest_value<K, I>(entries: I) -> Option<K>
where
    I: IntoIterator<Item = (K, Option<f64>)>,
{
    let mut priced = 0usize;
    let mut best: Option<(K, f64)> = None;

    for (key, value) in entries {
        let Some(value) = value else { continue };
        priced += 1;
        let is_lower = best.as_ref().map_or(true, |(_, current)| value < *current);
        if is_lower {
            best = Some((key, value));
        }
    }

    if priced < MIN_CANDIDATES_FOR_BEST {
        return None;
    }
    best.map(|(key, _)| key)
}
