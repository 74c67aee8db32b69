use hashbrown::HashMap;

use crate::tree::Tree;

/// Every pattern element has to match at least one element of the sequence.
/// Elements are not consumed, so several pattern elements may match the same
/// one and the lengths don't have to agree. The first matching element wins.
#[must_use]
pub fn seq_match<P>(
  patterns: &[P],
  items: &[Tree],
  mut test: impl FnMut(&P, &Tree) -> bool,
) -> bool {
  patterns.iter().all(|pat| items.iter().any(|item| test(pat, item)))
}

/// Every key of the pattern has to be present with a matching value. Keys are
/// tested in the order `patterns` yields them and testing stops at the first
/// failure.
#[must_use]
pub fn map_match<'a, P: 'a>(
  patterns: impl IntoIterator<Item = (&'a String, &'a P)>,
  entries: &HashMap<String, Tree>,
  mut test: impl FnMut(&P, &Tree) -> bool,
) -> bool {
  (patterns.into_iter()).all(|(key, pat)| entries.get(key).is_some_and(|value| test(pat, value)))
}
