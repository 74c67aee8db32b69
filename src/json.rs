//! Conversions between [serde_json::Value] and the crate's own [Tree] and
//! [Pattern].
//!
//! Patterns are plain JSON with one convention: an object with the single key
//! [VARIABLE_TAG] and a string value is a variable. Object keys keep their
//! document order, which is the order a mapping pattern checks them in.
//! Predicates and [Pattern::Any] have no JSON form.
use std::error::Error;
use std::fmt::{self, Display};

use ordered_float::NotNan;
use serde_json::{Map, Number, Value};
use substack::Substack;

use crate::location::{PathSeg, TreePath};
use crate::pattern::{Pattern, Variable, VARIABLE_TAG};
use crate::tree::{Scalar, Tree};

/// A value that can't cross the JSON boundary
#[derive(Debug, Clone, PartialEq)]
pub enum JsonError {
  /// JSON number without a double precision equivalent
  Number {
    /// Location of the number in the document
    path: TreePath,
  },
  /// Infinities can be stored in a tree but not written as JSON
  NonFinite {
    /// Location of the number in the tree
    path: TreePath,
    /// The number itself
    value: f64,
  },
  /// Predicates are functions
  Predicate {
    /// Location of the predicate in the pattern
    path: TreePath,
  },
  /// [Pattern::Any] can't be told apart from `null`
  Unconstrained {
    /// Location of the node in the pattern
    path: TreePath,
  },
}

impl Display for JsonError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Number { path } => write!(f, "Number at {path} is not representable"),
      Self::NonFinite { path, value } => write!(f, "{value} at {path} is not valid JSON"),
      Self::Predicate { path } => write!(f, "Predicate at {path} cannot be encoded"),
      Self::Unconstrained { path } => write!(f, "Wildcard at {path} cannot be encoded"),
    }
  }
}
impl Error for JsonError {}

/// Convert a JSON document into a tree
pub fn tree_from_json(value: &Value) -> Result<Tree, JsonError> {
  tree_from_json_rec(value, Substack::Bottom)
}

fn tree_from_json_rec(value: &Value, path: Substack<PathSeg>) -> Result<Tree, JsonError> {
  Ok(match value {
    Value::Null => Tree::NULL,
    Value::Bool(b) => Tree::from(*b),
    Value::Number(n) => Tree::Scalar(num_from_json(n, &path)?),
    Value::String(s) => Tree::from(s.as_str()),
    Value::Array(items) => Tree::Seq(
      (items.iter().enumerate())
        .map(|(i, item)| tree_from_json_rec(item, path.push(PathSeg::Index(i))))
        .collect::<Result<_, _>>()?,
    ),
    Value::Object(entries) => Tree::Map(
      (entries.iter())
        .map(|(k, v)| {
          let tree = tree_from_json_rec(v, path.push(PathSeg::Key(k.clone())))?;
          Ok::<_, JsonError>((k.clone(), tree))
        })
        .collect::<Result<_, _>>()?,
    ),
  })
}

fn num_from_json(n: &Number, path: &Substack<PathSeg>) -> Result<Scalar, JsonError> {
  (n.as_f64().and_then(|f| NotNan::new(f).ok()))
    .map(Scalar::Num)
    .ok_or_else(|| JsonError::Number { path: TreePath::from_stack(path) })
}

/// Convert a tree into a JSON document. Whole numbers are written as
/// integers.
pub fn tree_to_json(tree: &Tree) -> Result<Value, JsonError> {
  tree_to_json_rec(tree, Substack::Bottom)
}

fn tree_to_json_rec(tree: &Tree, path: Substack<PathSeg>) -> Result<Value, JsonError> {
  Ok(match tree {
    Tree::Scalar(s) => scalar_to_json(s, &path)?,
    Tree::Seq(items) => Value::Array(
      (items.iter().enumerate())
        .map(|(i, item)| tree_to_json_rec(item, path.push(PathSeg::Index(i))))
        .collect::<Result<_, _>>()?,
    ),
    Tree::Map(entries) => Value::Object(
      (entries.iter())
        .map(|(k, v)| {
          let value = tree_to_json_rec(v, path.push(PathSeg::Key(k.clone())))?;
          Ok::<_, JsonError>((k.clone(), value))
        })
        .collect::<Result<Map<_, _>, _>>()?,
    ),
  })
}

fn scalar_to_json(scalar: &Scalar, path: &Substack<PathSeg>) -> Result<Value, JsonError> {
  Ok(match scalar {
    Scalar::Null => Value::Null,
    Scalar::Bool(b) => Value::Bool(*b),
    Scalar::Str(s) => Value::String(s.clone()),
    Scalar::Num(n) => {
      let value = n.into_inner();
      // 2^53, beyond which not every integer is representable
      if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
      } else {
        let number = Number::from_f64(value).ok_or_else(|| JsonError::NonFinite {
          path: TreePath::from_stack(path),
          value,
        })?;
        Value::Number(number)
      }
    },
  })
}

/// Convert a JSON document into a pattern. Objects of the form
/// `{"__treeql_variable__": "name"}` become variables, everything else is
/// taken literally.
pub fn pattern_from_json(value: &Value) -> Result<Pattern, JsonError> {
  pattern_from_json_rec(value, Substack::Bottom)
}

fn as_variable_tag(entries: &Map<String, Value>) -> Option<&str> {
  match (entries.len(), entries.get(VARIABLE_TAG)) {
    (1, Some(Value::String(name))) => Some(name),
    _ => None,
  }
}

fn pattern_from_json_rec(value: &Value, path: Substack<PathSeg>) -> Result<Pattern, JsonError> {
  Ok(match value {
    Value::Null => Pattern::Literal(Scalar::Null),
    Value::Bool(b) => Pattern::Literal(Scalar::Bool(*b)),
    Value::Number(n) => Pattern::Literal(num_from_json(n, &path)?),
    Value::String(s) => Pattern::Literal(Scalar::Str(s.clone())),
    Value::Array(items) => Pattern::Seq(
      (items.iter().enumerate())
        .map(|(i, item)| pattern_from_json_rec(item, path.push(PathSeg::Index(i))))
        .collect::<Result<_, _>>()?,
    ),
    Value::Object(entries) => match as_variable_tag(entries) {
      Some(name) => Pattern::Variable(Variable::new(name)),
      None => Pattern::Map(
        (entries.iter())
          .map(|(k, v)| {
            let pattern = pattern_from_json_rec(v, path.push(PathSeg::Key(k.clone())))?;
            Ok::<_, JsonError>((k.clone(), pattern))
          })
          .collect::<Result<_, _>>()?,
      ),
    },
  })
}

/// Convert a pattern into JSON, the inverse of [pattern_from_json]
pub fn pattern_to_json(pattern: &Pattern) -> Result<Value, JsonError> {
  pattern_to_json_rec(pattern, Substack::Bottom)
}

fn pattern_to_json_rec(pattern: &Pattern, path: Substack<PathSeg>) -> Result<Value, JsonError> {
  Ok(match pattern {
    Pattern::Any => return Err(JsonError::Unconstrained { path: TreePath::from_stack(&path) }),
    Pattern::Predicate(_) =>
      return Err(JsonError::Predicate { path: TreePath::from_stack(&path) }),
    Pattern::Variable(var) =>
      Value::Object(Map::from_iter([(VARIABLE_TAG.to_string(), Value::from(var.name()))])),
    Pattern::Literal(s) => scalar_to_json(s, &path)?,
    Pattern::Seq(items) => Value::Array(
      (items.iter().enumerate())
        .map(|(i, item)| pattern_to_json_rec(item, path.push(PathSeg::Index(i))))
        .collect::<Result<_, _>>()?,
    ),
    Pattern::Map(entries) => Value::Object(
      (entries.iter())
        .map(|(k, v)| {
          let value = pattern_to_json_rec(v, path.push(PathSeg::Key(k.clone())))?;
          Ok::<_, JsonError>((k.clone(), value))
        })
        .collect::<Result<Map<_, _>, _>>()?,
    ),
  })
}
