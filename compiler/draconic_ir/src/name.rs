//! Identifiers.
//!
//! A `Name` is a reference-counted string. Trees are shared between
//! function values (bodies are never copied), so names must be cheap to
//! clone and `Send + Sync` for trees cached by a multi-threaded host.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// An identifier in the syntax tree or a binding registry.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Name(Arc<str>);

impl Name {
    pub fn new(name: impl AsRef<str>) -> Self {
        Name(Arc::from(name.as_ref()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `__x__`-shaped identifiers.
    #[inline]
    pub fn is_dunder(&self) -> bool {
        is_dunder(&self.0)
    }
}

/// True if `name` has leading and trailing double underscores.
///
/// `____` and shorter are not dunders: there must be at least one character
/// between the underscore pairs.
pub fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// True if `name` follows ordinary identifier rules.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name(Arc::from(s))
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dunder_detection() {
        assert!(is_dunder("__init__"));
        assert!(is_dunder("__class__"));
        assert!(!is_dunder("____"));
        assert!(!is_dunder("__init"));
        assert!(!is_dunder("_private_"));
        assert!(!is_dunder("name"));
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_x1"));
        assert!(is_identifier("übung"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a b"));
    }

    #[test]
    fn names_compare_with_str() {
        let n = Name::new("abc");
        assert_eq!(n, "abc");
        assert_eq!(n.as_str(), "abc");
        assert_eq!(n.to_string(), "abc");
    }
}
