//! Module path resolver
//!
//! A deterministic state machine over `(ImportPath, current module, package
//! metadata)`:
//! 1. Classify the specifier (purely syntactic).
//! 2. Relative: join onto the importing module's directory and run one
//!    candidate search; failure is terminal.
//! 3. Non-relative: search `<dir>/node_modules/<specifier>` for each
//!    directory from the importing module up to the filesystem root,
//!    accumulating failed candidates across levels.
//! 4. Candidate search tries, in order: direct extension matches, the
//!    package descriptor's declared entry, then `index` files. The order is
//!    significant - changing it changes which file analysis attributes
//!    symbols to.
//!
//! Existence checks go through an injected [`ModuleOracle`], so hosts decide
//! what "exists" means (a real filesystem, a virtual one, a test fixture).

use crate::resolve::path::{join_normalized, ImportPath, ModuleInfo, ModulePath, PackageInfo};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension set for import forms that understand declaration files
pub const DECLARATION_EXTENSIONS: &[&str] = &["ts", "tsx", "d.ts"];

/// Extension set for plain-source forms (dynamic require)
pub const SOURCE_EXTENSIONS: &[&str] = &["js"];

/// Module existence oracle: answers whether a candidate path exists and, if
/// so, its canonical module identity.
pub trait ModuleOracle {
    fn locate(&self, candidate: &Path) -> Option<ModulePath>;
}

/// Oracle over an in-memory set of paths, for tests and virtual hosts.
#[derive(Debug, Default)]
pub struct MemoryOracle {
    files: HashSet<PathBuf>,
}

impl MemoryOracle {
    /// Build an oracle that knows exactly the given paths
    pub fn new(files: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

impl ModuleOracle for MemoryOracle {
    fn locate(&self, candidate: &Path) -> Option<ModulePath> {
        self.files
            .contains(candidate)
            .then(|| ModulePath::new(candidate))
    }
}

/// Oracle backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOracle;

impl ModuleOracle for FsOracle {
    fn locate(&self, candidate: &Path) -> Option<ModulePath> {
        candidate.is_file().then(|| ModulePath::new(candidate))
    }
}

/// Resolution exhausted every candidate.
///
/// Carries the specifier, the ecosystem tag, and the full ordered candidate
/// list tried across every searched level, for diagnostics. Raised through
/// the evaluator's recovery channel before becoming a hard error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not resolve {ecosystem} module '{specifier}' ({} candidates tried)", .candidates.len())]
pub struct ResolutionFailure {
    pub specifier: String,
    pub ecosystem: String,
    pub candidates: Vec<PathBuf>,
}

/// The resolver: an oracle plus project package metadata.
pub struct Resolver<O> {
    oracle: O,
    packages: PackageInfo,
    ecosystem: String,
}

impl<O: ModuleOracle> Resolver<O> {
    /// Create a resolver with the default ecosystem tag
    pub fn new(oracle: O, packages: PackageInfo) -> Self {
        Self {
            oracle,
            packages,
            ecosystem: "typescript".to_string(),
        }
    }

    /// Tag failures with a different source ecosystem
    pub fn with_ecosystem(mut self, ecosystem: impl Into<String>) -> Self {
        self.ecosystem = ecosystem.into();
        self
    }

    /// Resolve an import specifier from the given module, searching the
    /// provided extension set. Which set an import form searches is the
    /// caller's responsibility.
    pub fn resolve(
        &self,
        import: &ImportPath,
        current: &ModuleInfo,
        extensions: &[&str],
    ) -> Result<ModulePath, ResolutionFailure> {
        if import.is_relative() {
            self.resolve_relative(import, current, extensions)
        } else {
            self.resolve_non_relative(import, current, extensions)
        }
    }

    fn resolve_relative(
        &self,
        import: &ImportPath,
        current: &ModuleInfo,
        extensions: &[&str],
    ) -> Result<ModulePath, ResolutionFailure> {
        tracing::debug!(
            "attempting to resolve (relative) import '{}' from {}",
            import.raw,
            current.path
        );
        let base = join_normalized(&current.path.directory(), &import.raw);
        self.search(&base, extensions)
            .map_err(|candidates| self.failure(import, candidates))
    }

    fn resolve_non_relative(
        &self,
        import: &ImportPath,
        current: &ModuleInfo,
        extensions: &[&str],
    ) -> Result<ModulePath, ResolutionFailure> {
        tracing::debug!(
            "attempting to resolve (non-relative) import '{}' from {}",
            import.raw,
            current.path
        );
        let mut tried = Vec::new();
        let mut dir = current.path.directory();
        loop {
            tracing::debug!("searching in {}", dir.display());
            let base = dir.join("node_modules").join(&import.raw);
            match self.search(&base, extensions) {
                Ok(found) => return Ok(found),
                Err(candidates) => tried.extend(candidates),
            }
            match dir.parent() {
                Some(parent) if parent != dir => dir = parent.to_path_buf(),
                _ => break,
            }
        }
        Err(self.failure(import, tried))
    }

    /// One candidate search: first existing path wins, or the full ordered
    /// candidate list comes back for diagnostics.
    fn search(&self, base: &Path, extensions: &[&str]) -> Result<ModulePath, Vec<PathBuf>> {
        let candidates = self.candidates(base, extensions);
        for candidate in &candidates {
            if let Some(found) = self.oracle.locate(candidate) {
                tracing::debug!("resolved to {}", found);
                return Ok(found);
            }
        }
        Err(candidates)
    }

    fn candidates(&self, base: &Path, extensions: &[&str]) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(extensions.len() * 2 + 1);
        for ext in extensions {
            candidates.push(append_extension(base, ext));
        }
        if let Some(entry) = self.packages.entry_for(&base.join("package.json")) {
            candidates.push(entry.to_path_buf());
        }
        for ext in extensions {
            candidates.push(base.join(format!("index.{}", ext)));
        }
        candidates
    }

    fn failure(&self, import: &ImportPath, candidates: Vec<PathBuf>) -> ResolutionFailure {
        ResolutionFailure {
            specifier: import.raw.clone(),
            ecosystem: self.ecosystem.clone(),
            candidates,
        }
    }
}

/// `base` + `.` + `ext`, keeping multi-dot extensions like `d.ts` intact
fn append_extension(base: &Path, ext: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}
