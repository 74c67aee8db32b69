//! Entry points. A query works on its own copy of the input, the caller's
//! tree is never modified.
use crate::error::QueryResult;
use crate::matcher::Bindings;
use crate::pattern::Pattern;
use crate::rewrite::{rewrite, Rewrite, Rewritten};
use crate::tree::Tree;

/// Settings for a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryConfig {
  /// Deepest nesting accepted, counted in containers below the root. Without
  /// a limit the traversal recurses as deep as the tree goes.
  pub max_depth: Option<usize>,
}
impl QueryConfig {
  /// Default settings
  #[must_use]
  pub fn new() -> Self { Self::default() }
  /// Fail the query if the tree is nested deeper than this
  #[must_use]
  pub fn with_max_depth(self, max_depth: usize) -> Self {
    Self { max_depth: Some(max_depth), ..self }
  }
}

/// The result of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutput {
  /// The rewritten copy of the input
  pub tree: Tree,
  /// Number of matched nodes
  pub matches: usize,
}

/// Match callback that leaves every node as it is
pub fn keep(_: &mut Tree, _: &Bindings) -> Rewrite { Rewrite::Keep }

/// Completion callback that discards the result
pub fn ignore(_: Tree, _: usize) {}

/// A configured query, for callers that prefer a return value over a
/// completion callback
///
/// ```
/// use treeql::{Pattern, Query, Tree};
///
/// let people = Tree::seq([
///   Tree::map([("name", Tree::from("Andrei")), ("age", Tree::from(28))]),
///   Tree::map([("name", Tree::from("Corina")), ("age", Tree::from(26))]),
/// ]);
/// let out = Query::new(&Pattern::map([("name", "Andrei")]))
///   .on_match(|node, _| {
///     if let Some(age) = node.get_mut("age") {
///       *age = Tree::from(29);
///     }
///   })
///   .run(&people)
///   .unwrap();
/// assert_eq!(out.matches, 1);
/// assert_eq!(out.tree.as_seq().unwrap()[0].get("age"), Some(&Tree::from(29)));
/// ```
pub struct Query<'a, F = fn(&mut Tree, &Bindings) -> Rewrite> {
  pattern: &'a Pattern,
  config: QueryConfig,
  on_match: F,
}
impl<'a> Query<'a> {
  /// A query that counts matches and changes nothing
  #[must_use]
  pub fn new(pattern: &'a Pattern) -> Self {
    Self { pattern, config: QueryConfig::default(), on_match: keep }
  }
}
impl<'a, F> Query<'a, F> {
  /// Replace the settings
  #[must_use]
  pub fn config(self, config: QueryConfig) -> Self { Self { config, ..self } }

  /// Set the callback invoked on every match. It may edit the node in place
  /// and return anything convertible to [Rewrite]: `()` keeps the node, a
  /// [Tree] replaces it.
  pub fn on_match<G, R>(self, on_match: G) -> Query<'a, G>
  where
    G: FnMut(&mut Tree, &Bindings) -> R,
    R: Into<Rewrite>,
  {
    Query { pattern: self.pattern, config: self.config, on_match }
  }

  /// Run the query on a copy of the tree
  pub fn run<R>(mut self, tree: &Tree) -> QueryResult<QueryOutput>
  where
    F: FnMut(&mut Tree, &Bindings) -> R,
    R: Into<Rewrite>,
  {
    tracing::debug!(pattern = %self.pattern, "running query");
    let working = tree.clone();
    let Rewritten { tree, matches } =
      rewrite(working, self.pattern, &mut self.on_match, &self.config)?;
    tracing::debug!(matches, "query finished");
    Ok(QueryOutput { tree: tree.unwrap_or_default(), matches })
  }
}

/// Find every subtree of `tree` that matches `pattern`.
///
/// `on_match` is called for each match in postorder with the node and the
/// variables bound while matching it, see [Query::on_match]. When the
/// traversal is done, `on_complete` receives the rewritten copy and the number
/// of matches. Pass [keep] and [ignore] to skip either callback.
///
/// ```
/// use treeql::{ignore, query, variable, Pattern, Tree};
///
/// let tree = Tree::map([("person", Tree::map([("name", "Andrei"), ("city", "London")]))]);
/// let pattern = Pattern::map([("name", Pattern::from("Andrei")), ("city", variable("city"))]);
/// let mut cities = Vec::new();
/// query(&tree, &pattern, |_, bindings| cities.push(bindings["city"].clone()), ignore).unwrap();
/// assert_eq!(cities, vec![Tree::from("London")]);
/// ```
pub fn query<R: Into<Rewrite>>(
  tree: &Tree,
  pattern: &Pattern,
  on_match: impl FnMut(&mut Tree, &Bindings) -> R,
  on_complete: impl FnOnce(Tree, usize),
) -> QueryResult<()> {
  let QueryOutput { tree, matches } = Query::new(pattern).on_match(on_match).run(tree)?;
  on_complete(tree, matches);
  Ok(())
}

/// Count the subtrees of `tree` that match `pattern`
pub fn count(tree: &Tree, pattern: &Pattern) -> QueryResult<usize> {
  Query::new(pattern).run(tree).map(|out| out.matches)
}

#[cfg(test)]
mod test {
  use super::{count, ignore, keep, query, Query, QueryConfig};
  use crate::error::QueryError;
  use crate::pattern::Pattern;
  use crate::rewrite::Rewrite;
  use crate::tree::Tree;

  #[test]
  fn no_match_is_identity() {
    let tree = Tree::map([("a", Tree::seq([1, 2])), ("b", Tree::from("x"))]);
    let mut result = None;
    query(&tree, &Pattern::from("nope"), keep, |t, n| result = Some((t, n))).unwrap();
    assert_eq!(result, Some((tree, 0)));
  }

  #[test]
  fn input_is_untouched() {
    let tree = Tree::seq([Tree::map([("age", 28)])]);
    let before = tree.clone();
    let out = Query::new(&Pattern::map([("age", 28)]))
      .on_match(|node, _| {
        *node = Tree::from("replaced in place");
      })
      .run(&tree)
      .unwrap();
    assert_eq!(tree, before);
    assert_eq!(out.tree, Tree::seq(["replaced in place"]));
  }

  #[test]
  fn on_complete_runs_once() {
    let mut calls = 0;
    query(&Tree::from(1), &Pattern::Any, keep, |_, _| calls += 1).unwrap();
    assert_eq!(calls, 1);
    query(&Tree::from(1), &Pattern::Any, keep, ignore).unwrap();
  }

  #[test]
  fn depth_limit_is_opt_in() {
    let deep = Tree::seq([Tree::seq([Tree::seq([1])])]);
    let limited = Query::new(&Pattern::Any).config(QueryConfig::new().with_max_depth(1));
    assert!(matches!(limited.run(&deep), Err(QueryError::TooDeep { limit: 1, .. })));
    let mut completed = false;
    assert!(query(&deep, &Pattern::Any, keep, |_, _| completed = true).is_ok());
    assert!(completed);
  }

  #[test]
  fn removed_root_is_null() {
    let out = Query::new(&Pattern::Any)
      .on_match(|_, _| Rewrite::Remove)
      .run(&Tree::seq([1]))
      .unwrap();
    assert_eq!(out.tree, Tree::NULL);
    assert_eq!(out.matches, 2);
  }

  #[test]
  fn counting() {
    let tree = Tree::seq([Tree::from(5), Tree::seq([5, 6]), Tree::from("5")]);
    assert_eq!(count(&tree, &Pattern::from(5)), Ok(2));
    assert_eq!(count(&tree, &Pattern::Any), Ok(6));
  }
}
