//! Errors that can escape a query. Predicate failures never show up here,
//! the matcher turns them into non-matches.
use std::error::Error;
use std::fmt::{self, Display};

use crate::location::TreePath;

/// Attempted to build a [crate::Tree] number from NaN, which has no place in
/// the data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NanError;

impl Display for NanError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "NaN cannot be stored in a tree")
  }
}
impl Error for NanError {}

/// Problems that abort a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
  /// The input is nested deeper than [crate::QueryConfig::max_depth]
  TooDeep {
    /// The configured limit
    limit: usize,
    /// The first node found beyond the limit
    path: TreePath,
  },
}

impl Display for QueryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::TooDeep { limit, path } => {
        write!(f, "Tree is nested deeper than {limit} levels at {path}")
      },
    }
  }
}
impl Error for QueryError {}

/// Alias for the result of fallible query operations
pub type QueryResult<T> = Result<T, QueryError>;
