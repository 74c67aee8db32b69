//! Owned JSON-like values, the data queried and rewritten by the engine
//!
//! A [Tree] is a closed enum, so cloning it is a complete structural copy.
//! There is no way to embed functions, foreign objects or cycles, which is
//! what makes the isolation step of [crate::query] infallible.
use std::fmt::{self, Write};

use hashbrown::HashMap;
use itertools::Itertools;
use ordered_float::NotNan;

use crate::error::NanError;

/// A leaf value. Literal patterns are scalars too, see
/// [crate::pattern::Pattern::Literal]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
  /// The JSON `null`
  Null,
  /// `true` or `false`
  Bool(bool),
  /// A double precision number which is never NaN
  Num(NotNan<f64>),
  /// A string
  Str(String),
}
impl Scalar {
  /// Short name of the kind of value, for diagnostics
  #[must_use]
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Null => "null",
      Self::Bool(_) => "boolean",
      Self::Num(_) => "number",
      Self::Str(_) => "string",
    }
  }
}

/// A node of a JSON-like tree. Mapping keys are unordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tree {
  /// A leaf
  Scalar(Scalar),
  /// An ordered list of subtrees
  Seq(Vec<Tree>),
  /// String keys mapped to subtrees
  Map(HashMap<String, Tree>),
}

impl Tree {
  /// The `null` tree
  pub const NULL: Tree = Tree::Scalar(Scalar::Null);

  /// Build a sequence from anything convertible to trees
  pub fn seq<T: Into<Tree>>(items: impl IntoIterator<Item = T>) -> Self {
    Self::Seq(items.into_iter().map(Into::into).collect())
  }

  /// Build a mapping from key-value pairs. Later duplicates overwrite
  /// earlier ones.
  pub fn map<K: Into<String>, T: Into<Tree>>(
    entries: impl IntoIterator<Item = (K, T)>,
  ) -> Self {
    Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }

  /// Build a number, rejecting NaN
  pub fn num(n: f64) -> Result<Self, NanError> {
    NotNan::new(n).map(Self::from).map_err(|_| NanError)
  }

  /// Short name of the kind of value, for diagnostics
  #[must_use]
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Scalar(s) => s.kind(),
      Self::Seq(_) => "sequence",
      Self::Map(_) => "mapping",
    }
  }

  /// The leaf value, if this is a leaf
  #[must_use]
  pub fn as_scalar(&self) -> Option<&Scalar> {
    match self {
      Self::Scalar(s) => Some(s),
      _ => None,
    }
  }
  /// The number, if this is a number
  #[must_use]
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Self::Scalar(Scalar::Num(n)) => Some(n.into_inner()),
      _ => None,
    }
  }
  /// The string, if this is a string
  #[must_use]
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::Scalar(Scalar::Str(s)) => Some(s),
      _ => None,
    }
  }
  /// The boolean, if this is a boolean
  #[must_use]
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Scalar(Scalar::Bool(b)) => Some(*b),
      _ => None,
    }
  }
  /// The elements, if this is a sequence
  #[must_use]
  pub fn as_seq(&self) -> Option<&[Tree]> {
    match self {
      Self::Seq(v) => Some(v),
      _ => None,
    }
  }
  /// The entries, if this is a mapping
  #[must_use]
  pub fn as_map(&self) -> Option<&HashMap<String, Tree>> {
    match self {
      Self::Map(m) => Some(m),
      _ => None,
    }
  }
  /// Whether this is `null`
  #[must_use]
  pub fn is_null(&self) -> bool { matches!(self, Self::Scalar(Scalar::Null)) }

  /// Look up a key if this is a mapping
  #[must_use]
  pub fn get(&self, key: &str) -> Option<&Tree> { self.as_map()?.get(key) }

  /// Mutable access to a key if this is a mapping
  pub fn get_mut(&mut self, key: &str) -> Option<&mut Tree> {
    match self {
      Self::Map(m) => m.get_mut(key),
      _ => None,
    }
  }
}

impl Default for Tree {
  fn default() -> Self { Self::NULL }
}

impl From<Scalar> for Tree {
  fn from(value: Scalar) -> Self { Self::Scalar(value) }
}
impl From<bool> for Tree {
  fn from(value: bool) -> Self { Self::Scalar(Scalar::Bool(value)) }
}
impl From<NotNan<f64>> for Tree {
  fn from(value: NotNan<f64>) -> Self { Self::Scalar(Scalar::Num(value)) }
}
impl From<&str> for Tree {
  fn from(value: &str) -> Self { Self::Scalar(Scalar::Str(value.to_string())) }
}
impl From<String> for Tree {
  fn from(value: String) -> Self { Self::Scalar(Scalar::Str(value)) }
}
impl<T: Into<Tree>> From<Vec<T>> for Tree {
  fn from(value: Vec<T>) -> Self { Self::seq(value) }
}
impl From<HashMap<String, Tree>> for Tree {
  fn from(value: HashMap<String, Tree>) -> Self { Self::Map(value) }
}
impl TryFrom<f64> for Tree {
  type Error = NanError;
  fn try_from(value: f64) -> Result<Self, Self::Error> { Self::num(value) }
}

macro_rules! from_int {
  ($($t:ty),*) => {$(
    impl From<$t> for Tree {
      fn from(value: $t) -> Self {
        let num = NotNan::new(value as f64).expect("integers are never NaN");
        Self::Scalar(Scalar::Num(num))
      }
    }
  )*};
}
from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// ################ Display ################

/// Write a string literal with JSON escapes
pub(crate) fn write_str_lit(f: &mut impl Write, s: &str) -> fmt::Result {
  f.write_char('"')?;
  for c in s.chars() {
    match c {
      '"' => f.write_str("\\\"")?,
      '\\' => f.write_str("\\\\")?,
      '\n' => f.write_str("\\n")?,
      '\r' => f.write_str("\\r")?,
      '\t' => f.write_str("\\t")?,
      c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
      c => f.write_char(c)?,
    }
  }
  f.write_char('"')
}

/// Numbers that are whole and small enough print without a fraction
pub(crate) fn write_num(f: &mut impl Write, n: f64) -> fmt::Result {
  if n.fract() == 0.0 && n.abs() < 1e15 {
    write!(f, "{}", n as i64)
  } else {
    write!(f, "{n}")
  }
}

impl fmt::Display for Scalar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Null => write!(f, "null"),
      Self::Bool(b) => write!(f, "{b}"),
      Self::Num(n) => write_num(f, n.into_inner()),
      Self::Str(s) => write_str_lit(f, s),
    }
  }
}

impl fmt::Display for Tree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Scalar(s) => write!(f, "{s}"),
      Self::Seq(v) => write!(f, "[{}]", v.iter().join(",")),
      Self::Map(m) => {
        f.write_char('{')?;
        for (i, (k, v)) in m.iter().sorted_by(|a, b| a.0.cmp(b.0)).enumerate() {
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
  use super::{Scalar, Tree};

  #[test]
  fn display_is_json() {
    let tree = Tree::map([
      ("name", Tree::from("An\"drei")),
      ("age", Tree::from(28)),
      ("tags", Tree::seq([Tree::NULL, Tree::from(true), Tree::num(1.5).unwrap()])),
    ]);
    assert_eq!(tree.to_string(), r#"{"age":28,"name":"An\"drei","tags":[null,true,1.5]}"#);
  }

  #[test]
  fn nan_is_rejected() {
    assert!(Tree::num(f64::NAN).is_err());
    assert!(Tree::try_from(f64::INFINITY).is_ok());
  }

  #[test]
  fn accessors() {
    let tree = Tree::map([("age", 28)]);
    assert_eq!(tree.get("age").and_then(Tree::as_f64), Some(28.0));
    assert_eq!(tree.get("name"), None);
    assert_eq!(Tree::from("x").as_scalar(), Some(&Scalar::Str("x".to_string())));
    assert!(Tree::default().is_null());
    assert_eq!(Tree::seq(Vec::<Tree>::new()).kind(), "sequence");
  }
}
