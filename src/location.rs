//! Addresses of nodes within a tree, for logs and error messages
use std::fmt::{self, Display};

use substack::Substack;

use crate::tree::{write_str_lit, Tree};

/// One step from a container to one of its children
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSeg {
  /// Entry of a mapping
  Key(String),
  /// Element of a sequence
  Index(usize),
}

impl Display for PathSeg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Index(i) => write!(f, "[{i}]"),
      Self::Key(k) if is_ident(k) => write!(f, ".{k}"),
      Self::Key(k) => {
        f.write_str("[")?;
        write_str_lit(f, k)?;
        f.write_str("]")
      },
    }
  }
}

fn is_ident(s: &str) -> bool {
  let mut chars = s.chars();
  (chars.next()).is_some_and(|c| c.is_alphabetic() || c == '_')
    && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// The route from the root of a tree to one of its nodes. Displayed in a
/// JSONPath-like notation such as `$.people[1].name`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TreePath(Vec<PathSeg>);
impl TreePath {
  /// The path of the root node
  #[must_use]
  pub fn root() -> Self { Self(Vec::new()) }
  /// Collect the steps recorded on a traversal stack
  #[must_use]
  pub fn from_stack(stack: &Substack<PathSeg>) -> Self { Self(stack.unreverse()) }
  /// The steps from the root
  #[must_use]
  pub fn segments(&self) -> &[PathSeg] { &self.0 }
  /// Number of steps from the root
  #[must_use]
  pub fn depth(&self) -> usize { self.0.len() }
  /// Extend the path by one step
  #[must_use]
  pub fn join(mut self, seg: PathSeg) -> Self {
    self.0.push(seg);
    self
  }

  /// Follow the path in a tree
  #[must_use]
  pub fn resolve<'a>(&self, tree: &'a Tree) -> Option<&'a Tree> {
    self.0.iter().try_fold(tree, |node, seg| match (seg, node) {
      (PathSeg::Key(k), Tree::Map(m)) => m.get(k),
      (PathSeg::Index(i), Tree::Seq(v)) => v.get(*i),
      _ => None,
    })
  }
}

impl FromIterator<PathSeg> for TreePath {
  fn from_iter<T: IntoIterator<Item = PathSeg>>(iter: T) -> Self {
    Self(iter.into_iter().collect())
  }
}

impl Display for TreePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("$")?;
    self.0.iter().try_for_each(|seg| write!(f, "{seg}"))
  }
}
