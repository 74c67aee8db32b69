use std::ops::Index;

use hashbrown::HashMap;
use intern_all::Tok;
use itertools::Itertools;

use crate::pattern::Variable;
use crate::tree::Tree;

/// Values captured by variables during one match attempt
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings(HashMap<Tok<String>, Tree>);
impl Bindings {
  /// An empty set, as used at the start of every attempt
  #[must_use]
  pub fn new() -> Self { Self::default() }

  /// The value bound to a name. Names are compared as strings so that
  /// asking for an unknown name doesn't intern it.
  #[must_use]
  pub fn get(&self, name: &str) -> Option<&Tree> {
    self.0.iter().find(|(k, _)| k.as_str() == name).map(|(_, v)| v)
  }

  /// Whether the name is bound
  #[must_use]
  pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

  /// Number of bound names
  #[must_use]
  pub fn len(&self) -> usize { self.0.len() }

  /// Whether nothing is bound
  #[must_use]
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Iterate over the bindings in name order
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Tree)> + '_ {
    (self.0.iter())
      .map(|(k, v)| (k.as_str(), v))
      .sorted_by(|a, b| a.0.cmp(b.0))
  }

  /// Gather the bindings into a mapping, for printing or serialization
  #[must_use]
  pub fn to_tree(&self) -> Tree {
    Tree::Map(self.0.iter().map(|(k, v)| (k.as_str().to_owned(), v.clone())).collect())
  }

  pub(crate) fn lookup(&self, var: &Variable) -> Option<&Tree> { self.0.get(var.tok()) }

  pub(crate) fn bind(&mut self, var: &Variable, value: Tree) {
    self.0.insert(var.tok().clone(), value);
  }
}

/// Panics if the name isn't bound. Handy in callbacks where the pattern
/// guarantees the name.
impl Index<&str> for Bindings {
  type Output = Tree;
  fn index(&self, name: &str) -> &Self::Output {
    self.get(name).unwrap_or_else(|| panic!("Variable ${name} is not bound"))
  }
}

#[cfg(test)]
mod test {
  use super::Bindings;
  use crate::pattern::Variable;
  use crate::tree::Tree;

  #[test]
  fn bind_and_read() {
    let mut bindings = Bindings::new();
    assert!(bindings.is_empty());
    bindings.bind(&Variable::new("os"), Tree::from("MacOS"));
    bindings.bind(&Variable::new("age"), Tree::from(28));
    assert_eq!(bindings.len(), 2);
    assert!(bindings.contains("os"));
    assert_eq!(bindings["age"], Tree::from(28));
    assert_eq!(bindings.get("city"), None);
    let names = bindings.iter().map(|(k, _)| k).collect::<Vec<_>>();
    assert_eq!(names, vec!["age", "os"]);
    assert_eq!(bindings.to_tree().to_string(), r#"{"age":28,"os":"MacOS"}"#);
  }

  #[test]
  fn lookup_by_plain_name() {
    let mut bindings = Bindings::new();
    bindings.bind(&Variable::new("city"), Tree::from("London"));
    let name = String::from("ci") + "ty";
    assert_eq!(bindings.get(&name), Some(&Tree::from("London")));
    assert!(!bindings.contains("town"));
    assert_eq!(bindings.get("never bound anywhere"), None);
  }
}
