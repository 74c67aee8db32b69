//! Patterns describe the subtrees a query is looking for.
//!
//! A pattern has the shape of the data it matches, with three extra kinds of
//! node: [Pattern::Any] which accepts anything, [Pattern::Predicate] which
//! runs a function on the candidate and [Pattern::Variable] which captures
//! the candidate under a name.
mod predicate;
mod variable;

use std::fmt::{self, Write};

use itertools::Itertools;

pub use predicate::{Predicate, PredicateOutput};
pub use variable::{variable, Variable, VARIABLE_TAG};

use crate::tree::{write_str_lit, Scalar, Tree};

/// A query pattern
#[derive(Clone, Debug)]
pub enum Pattern {
  /// No constraint. This is different from [Scalar::Null], which only
  /// matches `null`.
  Any,
  /// Matches an equal scalar
  Literal(Scalar),
  /// Matches values the function accepts
  Predicate(Predicate),
  /// Binds the value, or matches the value bound earlier in the same attempt
  Variable(Variable),
  /// Matches a sequence if every element of the pattern matches at least one
  /// element of the sequence
  Seq(Vec<Pattern>),
  /// Matches a mapping if it has every key of the pattern with a matching
  /// value. Other keys are ignored. Keys are checked in the listed order,
  /// which decides where a repeated variable is bound first.
  Map(Vec<(String, Pattern)>),
}

impl Pattern {
  /// Build a sequence pattern
  pub fn seq<P: Into<Pattern>>(items: impl IntoIterator<Item = P>) -> Self {
    Self::Seq(items.into_iter().map(Into::into).collect())
  }

  /// Build a mapping pattern from key-pattern pairs. The order is kept. A
  /// repeated key replaces the earlier value in its original position.
  pub fn map<K: Into<String>, P: Into<Pattern>>(
    entries: impl IntoIterator<Item = (K, P)>,
  ) -> Self {
    let mut map: Vec<(String, Pattern)> = Vec::new();
    for (key, value) in entries {
      let (key, value) = (key.into(), value.into());
      match map.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => map.push((key, value)),
      }
    }
    Self::Map(map)
  }

  /// The pattern of a key, if this is a mapping pattern that lists it
  #[must_use]
  pub fn get(&self, key: &str) -> Option<&Pattern> {
    match self {
      Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, p)| p),
      _ => None,
    }
  }

  /// Build a predicate pattern, see [Predicate::new]
  pub fn pred<R: PredicateOutput + 'static>(
    f: impl Fn(&Tree) -> R + Send + Sync + 'static,
  ) -> Self {
    Self::Predicate(Predicate::new(f))
  }

  /// Whether this node is a placeholder
  #[must_use]
  pub fn is_variable(&self) -> bool { matches!(self, Self::Variable(_)) }

  /// The placeholder, if this node is one
  #[must_use]
  pub fn as_variable(&self) -> Option<&Variable> {
    match self {
      Self::Variable(v) => Some(v),
      _ => None,
    }
  }

  /// Names of all variables in the pattern in order of first appearance
  #[must_use]
  pub fn variables(&self) -> Vec<&str> {
    let mut names = Vec::new();
    self.collect_variables(&mut names);
    names.into_iter().unique().collect()
  }

  fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
    match self {
      Self::Any | Self::Literal(_) | Self::Predicate(_) => (),
      Self::Variable(v) => names.push(v.name()),
      Self::Seq(items) => items.iter().for_each(|p| p.collect_variables(names)),
      Self::Map(entries) => entries.iter().for_each(|(_, p)| p.collect_variables(names)),
    }
  }
}

/// Data converts to a pattern that only contains literals, sequences and
/// mappings. Such a pattern matches the tree itself, and every tree it is a
/// subset of. Tree mappings are unordered, so keys are listed sorted.
impl From<Tree> for Pattern {
  fn from(value: Tree) -> Self {
    match value {
      Tree::Scalar(s) => Self::Literal(s),
      Tree::Seq(items) => Self::seq(items),
      Tree::Map(entries) => Self::map(entries.into_iter().sorted_by(|a, b| a.0.cmp(&b.0))),
    }
  }
}
impl From<Scalar> for Pattern {
  fn from(value: Scalar) -> Self { Self::Literal(value) }
}
impl From<Variable> for Pattern {
  fn from(value: Variable) -> Self { Self::Variable(value) }
}
impl From<Predicate> for Pattern {
  fn from(value: Predicate) -> Self { Self::Predicate(value) }
}
impl<P: Into<Pattern>> From<Vec<P>> for Pattern {
  fn from(value: Vec<P>) -> Self { Self::seq(value) }
}

macro_rules! from_data {
  ($($t:ty),*) => {$(
    impl From<$t> for Pattern {
      fn from(value: $t) -> Self { Tree::from(value).into() }
    }
  )*};
}
from_data!(bool, &str, String, i32, i64, u32, u64, usize);

impl fmt::Display for Pattern {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Any => f.write_char('_'),
      Self::Literal(s) => write!(f, "{s}"),
      Self::Predicate(p) => write!(f, "{p}"),
      Self::Variable(v) => write!(f, "{v}"),
      Self::Seq(items) => write!(f, "[{}]", items.iter().join(",")),
      Self::Map(entries) => {
        f.write_char('{')?;
        for (i, (k, v)) in entries.iter().enumerate() {
          if i != 0 {
            f.write_char(',')?;
          }
          write_str_lit(f, k)?;
          write!(f, ":{v}")?;
        }
        f.write_char('}')
      },
    }
  }
}

#[cfg(test)]
mod test {
  use super::{variable, Pattern};
  use crate::tree::Tree;

  #[test]
  fn data_becomes_literals() {
    let pattern = Pattern::from(Tree::map([("tags", Tree::seq(["a", "b"]))]));
    assert!(matches!(pattern.get("tags"), Some(Pattern::Seq(items)) if items.len() == 2));
    assert_eq!(pattern.to_string(), r#"{"tags":["a","b"]}"#);
  }

  #[test]
  fn display() {
    let pattern = Pattern::map([
      ("age", Pattern::pred(|t| t.as_f64().map(|n| n < 50.0))),
      ("name", Pattern::Any),
      ("os", variable("os")),
    ]);
    assert_eq!(pattern.to_string(), r#"{"age":<predicate>,"name":_,"os":$os}"#);
  }

  #[test]
  fn variables_are_unique_and_ordered() {
    let pattern = Pattern::map([
      ("os", variable("os")),
      ("team", Pattern::seq([variable("name"), variable("os")])),
    ]);
    assert_eq!(pattern.variables(), vec!["os", "name"]);
    assert!(variable("x").is_variable());
    assert_eq!(variable("x").as_variable().map(|v| v.name()), Some("x"));
    assert!(!Pattern::Any.is_variable());
  }

  #[test]
  fn mapping_keeps_listed_order() {
    let pattern =
      Pattern::map([("os", variable("os")), ("members", variable("m")), ("os", variable("x"))]);
    assert_eq!(pattern.variables(), vec!["x", "m"]);
    assert_eq!(pattern.to_string(), r#"{"os":$x,"members":$m}"#);
    assert!(pattern.get("members").is_some_and(Pattern::is_variable));
    assert!(pattern.get("team").is_none());
  }
}
