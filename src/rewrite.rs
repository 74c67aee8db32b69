//! Postorder traversal that matches every node and applies the callback's
//! decision.
//!
//! Children are processed before their parent, so a parent is tested in its
//! rewritten form and replacements deep in the tree are visible to matches
//! higher up.
use std::mem;

use substack::Substack;

use crate::error::{QueryError, QueryResult};
use crate::location::{PathSeg, TreePath};
use crate::matcher::{matches, Bindings};
use crate::pattern::Pattern;
use crate::query::QueryConfig;
use crate::tree::Tree;

/// What to do with a matched node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Rewrite {
  /// Leave the node where it is, including any changes the callback made
  /// through its mutable reference
  #[default]
  Keep,
  /// Put this value in place of the node. It is not tested against the
  /// pattern again.
  Replace(Tree),
  /// Take the node out of its parent. A removed root leaves `null`.
  Remove,
}

impl From<()> for Rewrite {
  fn from((): ()) -> Self { Self::Keep }
}
impl From<Tree> for Rewrite {
  fn from(value: Tree) -> Self { Self::Replace(value) }
}
impl From<Option<Tree>> for Rewrite {
  fn from(value: Option<Tree>) -> Self { value.map_or(Self::Keep, Self::Replace) }
}

/// Outcome of rewriting a subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
  /// The new subtree, or [None] if it was removed
  pub tree: Option<Tree>,
  /// Number of matches within the subtree, including its root
  pub matches: usize,
}

/// Rewrite a tree in place of the original. Every node is tested with a fresh
/// set of bindings; on a match the count goes up and `on_match` decides the
/// fate of the node.
pub fn rewrite<R: Into<Rewrite>>(
  tree: Tree,
  pattern: &Pattern,
  on_match: &mut impl FnMut(&mut Tree, &Bindings) -> R,
  config: &QueryConfig,
) -> QueryResult<Rewritten> {
  let mut on_match =
    |node: &mut Tree, bindings: &Bindings| -> Rewrite { on_match(node, bindings).into() };
  let mut rewriter = Rewriter { pattern, on_match: &mut on_match, limit: config.max_depth };
  rewriter.visit(tree, Substack::Bottom, 0)
}

struct Rewriter<'a> {
  pattern: &'a Pattern,
  on_match: &'a mut dyn FnMut(&mut Tree, &Bindings) -> Rewrite,
  limit: Option<usize>,
}

impl Rewriter<'_> {
  fn visit(
    &mut self,
    mut tree: Tree,
    path: Substack<PathSeg>,
    depth: usize,
  ) -> QueryResult<Rewritten> {
    if let Some(limit) = self.limit.filter(|limit| depth > *limit) {
      return Err(QueryError::TooDeep { limit, path: TreePath::from_stack(&path) });
    }
    let mut count = 0;
    match &mut tree {
      Tree::Scalar(_) => (),
      Tree::Seq(items) =>
        for (idx, item) in mem::take(items).into_iter().enumerate() {
          let sub = self.visit(item, path.push(PathSeg::Index(idx)), depth + 1)?;
          count += sub.matches;
          items.extend(sub.tree);
        },
      Tree::Map(entries) =>
        for (key, value) in mem::take(entries) {
          let sub = self.visit(value, path.push(PathSeg::Key(key.clone())), depth + 1)?;
          count += sub.matches;
          if let Some(value) = sub.tree {
            entries.insert(key, value);
          }
        },
    }
    let mut bindings = Bindings::new();
    if !matches(&tree, self.pattern, &mut bindings) {
      return Ok(Rewritten { tree: Some(tree), matches: count });
    }
    tracing::trace!(path = %TreePath::from_stack(&path), bindings = bindings.len(), "node matched");
    let tree = match (self.on_match)(&mut tree, &bindings) {
      Rewrite::Keep => Some(tree),
      Rewrite::Replace(new) => Some(new),
      Rewrite::Remove => None,
    };
    Ok(Rewritten { tree, matches: count + 1 })
  }
}
