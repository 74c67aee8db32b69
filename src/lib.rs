#![warn(missing_docs)]
//! Structural pattern matching and rewriting over JSON-like trees.
//!
//! A [Pattern] describes the shape of the nodes you are looking for. Mappings
//! match any value that has at least the listed keys, sequences match when
//! each element of the pattern is found somewhere in the value, and
//! [variable]s capture values and demand that later occurrences agree.
//! [query] walks a copy of the tree bottom-up, hands every matching node to a
//! callback that can edit, replace or remove it, and finally reports the
//! rewritten copy.
//!
//! ```
//! use treeql::{count, variable, Pattern, Tree};
//!
//! let team = Tree::map([
//!   ("os", Tree::from("MacOS")),
//!   ("members", Tree::seq([
//!     Tree::map([("name", "Andrei"), ("os", "MacOS")]),
//!     Tree::map([("name", "Corina"), ("os", "Windows")]),
//!   ])),
//! ]);
//! let pattern = Pattern::map([
//!   ("os", variable("os")),
//!   ("members", Pattern::seq([Pattern::map([("os", variable("os"))])])),
//! ]);
//! assert_eq!(count(&team, &pattern), Ok(1));
//! ```
pub mod error;
pub mod json;
pub mod location;
pub mod matcher;
pub mod pattern;
pub mod query;
pub mod rewrite;
pub mod tree;

pub use error::{NanError, QueryError, QueryResult};
pub use location::{PathSeg, TreePath};
pub use matcher::{match_node, matches, tree_matches, Bindings};
pub use pattern::{variable, Pattern, Predicate, PredicateOutput, Variable};
pub use query::{count, ignore, keep, query, Query, QueryConfig, QueryOutput};
pub use rewrite::Rewrite;
pub use tree::{Scalar, Tree};
