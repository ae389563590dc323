//! # Symflow - Abstract interpretation core for cross-language static analysis
//!
//! Symflow evaluates parsed source trees against a pluggable abstract value
//! domain instead of concrete runtime values, recovering facts about
//! bindings, module structure, and symbol flow without executing programs.
//!
//! Symflow provides:
//! - A capability-typed abstract value algebra (unit, bool, string, record, closure)
//! - A capture-safe, locally-nameless bound-term representation for closures
//! - An environment/store protocol with recursive (letrec) allocation and export tables
//! - A deterministic module path resolver with pluggable existence oracles
//! - Import/export/module/class evaluation semantics driving all of the above

pub mod name;
pub mod syntax;
pub mod term;
pub mod value;
pub mod domain;
pub mod scope;
pub mod resolve;
pub mod eval;
pub mod config;
pub mod project;

// Re-exports for convenient access
pub use name::Name;
pub use syntax::{Node, SyntaxKind};
pub use term::{BoundTerm, Term};
pub use value::Value;
pub use domain::{AbstractDomain, Domain};
pub use resolve::path::{ImportPath, ModuleInfo, ModulePath, PackageInfo};
pub use resolve::resolver::{ModuleOracle, Resolver};
pub use eval::machine::Evaluator;

/// Result type alias for Symflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Symflow operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Module path resolution exhausted every candidate. Resumable: the
    /// evaluator offers this failure to its recovery hook before raising.
    #[error(transparent)]
    Resolution(#[from] resolve::resolver::ResolutionFailure),

    #[error("expected exactly one free variable, found [{}]", .0.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(", "))]
    FreeVariables(Vec<Name>),

    #[error("cannot re-export '{name}' from {module}: no such binding")]
    ExportResolution { name: Name, module: ModulePath },

    #[error("default export subject has no derivable name")]
    DefaultExport,

    #[error("duplicate export of '{0}'")]
    ExportCollision(Name),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
