//! # Set Difference
//!
//! Comparator-driven subtraction: which required entries have no match in
//! a second list. Order and duplicates of the required list are preserved.
//!
//! An empty `required` list yields an empty, unallocated `Vec`. An empty
//! `to_check` list yields all of `required` without consulting the
//! comparator.

use mdauth_core::PartyRequirement;

/// Every entry of `required` for which no entry of `to_check` satisfies
/// `equal`, in original order with duplicates kept.
pub fn difference<R, C, F>(required: &[R], to_check: &[C], equal: F) -> Vec<R>
where
    R: Clone,
    F: Fn(&R, &C) -> bool,
{
    if required.is_empty() {
        return Vec::new();
    }
    if to_check.is_empty() {
        return required.to_vec();
    }
    required
        .iter()
        .filter(|req| !to_check.iter().any(|candidate| equal(req, candidate)))
        .cloned()
        .collect()
}

/// [`difference`] using `==`.
pub fn find_missing<T: Clone + PartialEq>(required: &[T], to_check: &[T]) -> Vec<T> {
    difference(required, to_check, |a, b| a == b)
}

/// [`difference`] of parties, matching on address and role. Optionality is
/// ignored.
pub fn find_missing_parties(
    required: &[PartyRequirement],
    to_check: &[PartyRequirement],
) -> Vec<PartyRequirement> {
    difference(required, to_check, |req, candidate| {
        req.is_same_as(&candidate.address, candidate.role)
    })
}
