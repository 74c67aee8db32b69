use super::coll_match::{map_match, seq_match};
use super::state::Bindings;
use crate::pattern::Pattern;
use crate::tree::Tree;

/// Test a value against a pattern. Variables seen for the first time are
/// bound in `bindings` and stay bound even if the attempt fails later.
#[must_use]
pub fn any_match(value: &Tree, pattern: &Pattern, bindings: &mut Bindings) -> bool {
  match (pattern, value) {
    (Pattern::Any, _) => true,
    (Pattern::Predicate(pred), _) => pred.test(value),
    (Pattern::Variable(var), _) => match bindings.lookup(var) {
      Some(bound) => tree_match(value, bound),
      None => {
        bindings.bind(var, value.clone());
        true
      },
    },
    (Pattern::Literal(lit), Tree::Scalar(scal)) => lit == scal,
    (Pattern::Seq(pats), Tree::Seq(items)) =>
      seq_match(pats, items, |pat, item| any_match(item, pat, bindings)),
    (Pattern::Map(pats), Tree::Map(entries)) => {
      let pats = pats.iter().map(|(key, pat)| (key, pat));
      map_match(pats, entries, |pat, item| any_match(item, pat, bindings))
    },
    _ => false,
  }
}

/// Test a value against a plain tree used as a pattern. This is how a value
/// is checked against the earlier binding of a variable, so the bound value
/// doesn't have to be equal, only to match. Subset and sequence quantifier
/// rules apply exactly as in [any_match].
#[must_use]
pub fn tree_match(value: &Tree, pattern: &Tree) -> bool {
  match (pattern, value) {
    (Tree::Scalar(lit), Tree::Scalar(scal)) => lit == scal,
    (Tree::Seq(pats), Tree::Seq(items)) =>
      seq_match(pats, items, |pat, item| tree_match(item, pat)),
    (Tree::Map(pats), Tree::Map(entries)) =>
      map_match(pats, entries, |pat, item| tree_match(item, pat)),
    _ => false,
  }
}

#[cfg(test)]
mod test {
  use super::{any_match, tree_match};
  use crate::matcher::state::Bindings;
  use crate::pattern::{variable, Pattern};
  use crate::tree::Tree;

  fn check(value: &Tree, pattern: &Pattern) -> bool {
    any_match(value, pattern, &mut Bindings::new())
  }

  #[test]
  fn scalars() {
    assert!(check(&Tree::from("Andrei"), &Pattern::from("Andrei")));
    assert!(!check(&Tree::from("Andrei"), &Pattern::from("Corina")));
    assert!(!check(&Tree::from(1), &Pattern::from("1")));
    assert!(!check(&Tree::from(true), &Pattern::from(1)));
    assert!(check(&Tree::NULL, &Pattern::from(Tree::NULL)));
  }

  #[test]
  fn null_only_matches_null() {
    let null = Pattern::from(Tree::NULL);
    assert!(!check(&Tree::map([("a", 1)]), &null));
    assert!(!check(&Tree::NULL, &Pattern::map([("a", 1)])));
    assert!(!check(&Tree::NULL, &Pattern::Map(Default::default())));
  }

  #[test]
  fn sequence_and_mapping_never_mix() {
    assert!(!check(&Tree::map([("name", "Andrei")]), &Pattern::Seq(vec![])));
    assert!(!check(&Tree::seq(["Andrei"]), &Pattern::Map(Default::default())));
    assert!(check(&Tree::seq(["Andrei"]), &Pattern::Seq(vec![])));
  }

  #[test]
  fn mapping_is_subset() {
    let value = Tree::map([("name", Tree::from("Andrei")), ("age", Tree::from(28))]);
    assert!(check(&value, &Pattern::map([("name", "Andrei")])));
    assert!(check(&value, &Pattern::Map(Default::default())));
    assert!(!check(&value, &Pattern::map([("city", "London")])));
    assert!(check(&value, &Pattern::map([("age", Pattern::Any)])));
    assert!(!check(&value, &Pattern::map([("city", Pattern::Any)])));
  }

  #[test]
  fn sequence_quantifier() {
    let value = Tree::seq([1, 2, 3]);
    assert!(check(&value, &Pattern::seq([3, 1])));
    assert!(check(&value, &Pattern::seq([2, 2, 2, 2])));
    assert!(!check(&value, &Pattern::seq([1, 4])));
    assert!(!check(&Tree::Seq(vec![]), &Pattern::seq([1])));
  }

  #[test]
  fn predicates() {
    let under_50 = Pattern::pred(|t| t.as_f64().map(|n| n < 50.0));
    assert!(check(&Tree::from(28), &under_50));
    assert!(!check(&Tree::from(60), &under_50));
    assert!(!check(&Tree::from("Andrei"), &under_50));
    let always = Pattern::pred(|_| true);
    assert!(check(&Tree::seq([1]), &always));
  }

  #[test]
  fn variables_bind_then_rematch() {
    let pattern = Pattern::map([
      ("os", variable("os")),
      ("team", Pattern::map([("favorite_os", variable("os"))])),
    ]);
    let same = Tree::map([
      ("os", Tree::from("MacOS")),
      ("team", Tree::map([("favorite_os", "MacOS")])),
    ]);
    let mut bindings = Bindings::new();
    assert!(any_match(&same, &pattern, &mut bindings));
    assert_eq!(bindings["os"], Tree::from("MacOS"));
    let different = Tree::map([
      ("os", Tree::from("MacOS")),
      ("team", Tree::map([("favorite_os", "Windows")])),
    ]);
    assert!(!check(&different, &pattern));
  }

  #[test]
  fn rematch_is_structural_not_equality() {
    // "a" is bound first, "b" only has to contain what "a" has
    let pattern = Pattern::map([("a", variable("x")), ("b", variable("x"))]);
    let superset = Tree::map([
      ("a", Tree::map([("k", 1)])),
      ("b", Tree::map([("k", Tree::from(1)), ("j", Tree::from(2))])),
    ]);
    assert!(check(&superset, &pattern));
    let subset = Tree::map([
      ("a", Tree::map([("k", Tree::from(1)), ("j", Tree::from(2))])),
      ("b", Tree::map([("k", 1)])),
    ]);
    assert!(!check(&subset, &pattern));
  }

  #[test]
  fn variables_link_sequence_elements_to_outer_keys() {
    let pattern = Pattern::map([
      ("owner", variable("who")),
      ("people", Pattern::seq([Pattern::map([("name", variable("who"))])])),
    ]);
    let value = Tree::map([
      ("owner", Tree::from("Corina")),
      ("people", Tree::seq([Tree::map([("name", "Andrei")]), Tree::map([("name", "Corina")])])),
    ]);
    assert!(check(&value, &pattern));
  }

  #[test]
  fn listed_key_order_decides_binding() {
    let members = Tree::seq([Tree::map([("os", "Windows")]), Tree::map([("os", "MacOS")])]);
    let team = Tree::map([("os", Tree::from("MacOS")), ("members", members)]);
    let element = || Pattern::seq([Pattern::map([("os", variable("os"))])]);
    // the outer key binds first, then the second element re-matches it
    let outer_first = Pattern::map([("os", variable("os")), ("members", element())]);
    let mut bindings = Bindings::new();
    assert!(any_match(&team, &outer_first, &mut bindings));
    assert_eq!(bindings["os"], Tree::from("MacOS"));
    // the first element binds Windows and the outer key no longer agrees
    let elements_first = Pattern::map([("members", element()), ("os", variable("os"))]);
    assert!(!check(&team, &elements_first));
  }

  #[test]
  fn failed_attempts_keep_partial_bindings() {
    let pattern = Pattern::map([("a", variable("x")), ("b", Pattern::from(2))]);
    let mut bindings = Bindings::new();
    assert!(!any_match(&Tree::map([("a", 1), ("b", 3)]), &pattern, &mut bindings));
    assert_eq!(bindings.get("x"), Some(&Tree::from(1)));
  }

  #[test]
  fn tree_as_pattern() {
    let pattern = Tree::map([("tags", Tree::seq(["b"]))]);
    let value = Tree::map([("tags", Tree::seq(["a", "b"])), ("id", Tree::from(1))]);
    assert!(tree_match(&value, &pattern));
    assert!(!tree_match(&pattern, &value));
  }
}
