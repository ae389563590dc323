//! Source-level names
//!
//! A [`Name`] is an opaque, interned, user-facing identifier. Names are never
//! synthesized silently: every name displayed to a user or used as an export
//! key traces back to source syntax. Equality and ordering are structural on
//! the underlying text.

use std::fmt;
use std::sync::Arc;

/// An interned identifier taken from source syntax.
///
/// Cloning is cheap (the text is shared), so names flow freely through
/// environments, export tables, and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Arc<str>);

impl Name {
    /// Create a name from its source text
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(Arc::from(text.as_ref()))
    }

    /// Get the underlying text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}
