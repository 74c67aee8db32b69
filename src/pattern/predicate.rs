use std::fmt::{self, Display};
use std::sync::Arc;

use trait_set::trait_set;

use crate::tree::Tree;

/// Anything a predicate may return. Failures are reported as `Err` with a
/// description and count as a non-match.
pub trait PredicateOutput {
  /// Whether the predicate accepted the value, or why it couldn't decide
  fn verdict(self) -> Result<bool, String>;
}
impl PredicateOutput for bool {
  fn verdict(self) -> Result<bool, String> { Ok(self) }
}
/// `None` is a failure, which lets predicates use `?` on accessors
impl PredicateOutput for Option<bool> {
  fn verdict(self) -> Result<bool, String> {
    self.ok_or_else(|| "predicate returned None".to_string())
  }
}
impl<E: Display> PredicateOutput for Result<bool, E> {
  fn verdict(self) -> Result<bool, String> { self.map_err(|e| e.to_string()) }
}

trait_set! {
  trait TestFn = Fn(&Tree) -> Result<bool, String> + Send + Sync + 'static;
}

/// An inline constraint inside a pattern
#[derive(Clone)]
pub struct Predicate {
  label: Option<Arc<str>>,
  test: Arc<dyn TestFn>,
}
impl Predicate {
  /// Wrap a function. It may return `bool`, `Option<bool>` or
  /// `Result<bool, E>`, see [PredicateOutput].
  pub fn new<R: PredicateOutput + 'static>(
    f: impl Fn(&Tree) -> R + Send + Sync + 'static,
  ) -> Self {
    Self { label: None, test: Arc::new(move |t: &Tree| f(t).verdict()) }
  }

  /// Attach a name shown when the pattern is printed
  #[must_use]
  pub fn labelled(self, label: &str) -> Self { Self { label: Some(label.into()), ..self } }

  /// The name given with [Predicate::labelled]
  #[must_use]
  pub fn label(&self) -> Option<&str> { self.label.as_deref() }

  /// Evaluate the predicate. Failures are logged and treated as `false`.
  #[must_use]
  pub fn test(&self, value: &Tree) -> bool {
    match (self.test)(value) {
      Ok(verdict) => verdict,
      Err(reason) => {
        tracing::debug!(predicate = %self, value = %value, "predicate failed: {reason}");
        false
      },
    }
  }
}

impl Display for Predicate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.label {
      Some(label) => write!(f, "<{label}>"),
      None => write!(f, "<predicate>"),
    }
  }
}

impl fmt::Debug for Predicate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Predicate({self})")
  }
}

#[cfg(test)]
mod test {
  use super::Predicate;
  use crate::tree::Tree;

  #[test]
  fn outcomes() {
    let under_50 = Predicate::new(|t| t.as_f64().map(|age| age < 50.0));
    assert!(under_50.test(&Tree::from(28)));
    assert!(!under_50.test(&Tree::from(60)));
    // None is a failure, not a panic
    assert!(!under_50.test(&Tree::from("28")));
  }

  #[test]
  fn errors_are_non_matches() {
    let pred = Predicate::new(|t| match t.as_str() {
      Some(s) => s.parse::<i32>().map(|n| n > 3),
      None => Ok(false),
    });
    assert!(pred.test(&Tree::from("4")));
    assert!(!pred.test(&Tree::from("four")));
  }

  #[test]
  fn labels() {
    let pred = Predicate::new(|_| true);
    assert_eq!(pred.to_string(), "<predicate>");
    assert_eq!(pred.labelled("adult").to_string(), "<adult>");
  }
}
