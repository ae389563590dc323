//! Path value types for module resolution
//!
//! [`ImportPath`] is the syntactic classification of a specifier as written;
//! [`ModulePath`] is the canonical identity of a module once found. The two
//! are deliberately distinct from the many candidate file-system paths tried
//! during search.

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Whether a specifier is resolved against the importing module's directory
/// or searched through the ecosystem's dependency directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relativity {
    Relative,
    NonRelative,
}

/// An import specifier as written in source, quote-stripped and classified.
///
/// Classification is purely syntactic - relative iff the first remaining
/// character is `.` - and never inspects the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPath {
    pub raw: String,
    pub relativity: Relativity,
}

impl ImportPath {
    /// Classify an already-unquoted specifier
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let relativity = if raw.starts_with('.') {
            Relativity::Relative
        } else {
            Relativity::NonRelative
        };
        Self { raw, relativity }
    }

    /// Strip the surrounding quote characters from a source literal, then
    /// classify
    pub fn from_quoted(literal: &str) -> Self {
        Self::new(literal.trim_matches(|c| c == '"' || c == '\'' || c == '`'))
    }

    /// Whether this specifier resolves relative to the importing module
    pub fn is_relative(&self) -> bool {
        self.relativity == Relativity::Relative
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// The resolved, canonical identity of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(PathBuf);

impl ModulePath {
    /// Create a module path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// A synthetic stand-in for a module that could not be resolved; loads
    /// as an empty module so analysis can continue
    pub fn unknown(specifier: &str) -> Self {
        Self(Path::new("<unknown>").join(specifier))
    }

    /// The underlying path
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// The directory this module lives in, used as the base for relative
    /// resolution
    pub fn directory(&self) -> PathBuf {
        self.0
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(PathBuf::new)
    }
}

impl From<&str> for ModulePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Identity of the module currently being evaluated.
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    pub path: ModulePath,
}

/// Project-level package metadata: maps candidate `package.json`-like
/// descriptor paths to the file their "types"/"main"-equivalent field
/// designates, when present.
#[derive(Debug, Clone, Default)]
pub struct PackageInfo {
    entries: HashMap<PathBuf, PathBuf>,
}

impl PackageInfo {
    /// Create an empty metadata map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `descriptor` designates `entry` as its module entry point
    pub fn insert(&mut self, descriptor: impl Into<PathBuf>, entry: impl Into<PathBuf>) {
        self.entries.insert(descriptor.into(), entry.into());
    }

    /// The entry point a descriptor designates, if the descriptor resolved
    pub fn entry_for(&self, descriptor: &Path) -> Option<&Path> {
        self.entries.get(descriptor).map(PathBuf::as_path)
    }

    /// Iterate all known descriptors
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries
            .iter()
            .map(|(d, e)| (d.as_path(), e.as_path()))
    }

    /// Number of known descriptors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no descriptors are known
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join a raw specifier onto a base directory and normalize `.` and `..`
/// components lexically (without touching the filesystem).
pub fn join_normalized(base: &Path, raw: &str) -> PathBuf {
    normalize(&base.join(raw))
}

/// Lexically normalize a path, resolving `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}
