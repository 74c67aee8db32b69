//! Decides whether a single value matches a pattern.
//!
//! # Rules
//!
//! In order, the first applicable one decides:
//! - [Pattern::Any] matches anything
//! - a predicate matches if it returns true; failures count as false
//! - a variable binds the value if unbound, otherwise the value must match
//!   the bound value (used as a pattern, not compared for equality)
//! - values of a different kind never match
//! - literals match equal scalars, `null` only matches `null`
//! - a sequence pattern matches if each of its elements matches some element
//!   of the value
//! - a mapping pattern matches if each of its keys is present in the value
//!   with a matching value, keys are checked in the order the pattern lists
//!   them
//!
//! One [Bindings] instance is threaded through the whole recursion of an
//! attempt, so a variable can tie an element constraint to an outer one.

mod any_match;
mod coll_match;
mod state;

pub use any_match::tree_match as tree_matches;
pub use state::Bindings;

use crate::pattern::Pattern;
use crate::tree::Tree;

/// Test a value against a pattern, recording variables in `bindings`.
///
/// Bindings made before a failure are not rolled back; discard the set when
/// this returns false.
#[must_use]
pub fn matches(value: &Tree, pattern: &Pattern, bindings: &mut Bindings) -> bool {
  any_match::any_match(value, pattern, bindings)
}

/// Run one complete match attempt with fresh bindings
///
/// ```
/// use treeql::{match_node, variable, Pattern, Tree};
///
/// let person = Tree::map([("name", Tree::from("Andrei")), ("age", Tree::from(28))]);
/// let pattern = Pattern::map([("name", Pattern::from("Andrei")), ("age", variable("age"))]);
/// let bindings = match_node(&person, &pattern).expect("matches");
/// assert_eq!(bindings["age"], Tree::from(28));
/// ```
#[must_use]
pub fn match_node(value: &Tree, pattern: &Pattern) -> Option<Bindings> {
  let mut bindings = Bindings::new();
  matches(value, pattern, &mut bindings).then_some(bindings)
}
