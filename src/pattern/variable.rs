use std::fmt;

use intern_all::{i, Tok};

use super::Pattern;

/// Key of the single-entry object that marks a variable in JSON encoded
/// patterns, see [crate::json::pattern_from_json]
pub const VARIABLE_TAG: &str = "__treeql_variable__";

/// A named placeholder. The first occurrence within a match attempt binds
/// the name to the candidate value, later occurrences must match the bound
/// value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable(Tok<String>);
impl Variable {
  /// Create a placeholder with the given name
  #[must_use]
  pub fn new(name: &str) -> Self { Self(i(name)) }
  /// The name this placeholder binds
  #[must_use]
  pub fn name(&self) -> &str { &self.0 }
  /// The interned name, which is the key of [crate::Bindings]
  #[must_use]
  pub fn tok(&self) -> &Tok<String> { &self.0 }
}

impl fmt::Display for Variable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "${}", self.name())
  }
}

/// Build a variable pattern node. Names need not be unique; reusing a name
/// ties the positions together.
///
/// ```
/// use treeql::{variable, Pattern};
///
/// let pattern = Pattern::map([
///   ("os", variable("os")),
///   ("team", Pattern::map([("favorite_os", variable("os"))])),
/// ]);
/// assert!(pattern.variables().contains(&"os"));
/// ```
#[must_use]
pub fn variable(name: &str) -> Pattern { Pattern::Variable(Variable::new(name)) }
