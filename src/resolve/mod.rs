//! Module path resolution
//!
//! Turns an import specifier plus the importing module's location and the
//! project's package metadata into a concrete module identity, or a
//! structured failure carrying every candidate tried.

pub mod path;
pub mod resolver;

pub use path::{ImportPath, ModuleInfo, ModulePath, PackageInfo, Relativity};
pub use resolver::{
    FsOracle, MemoryOracle, ModuleOracle, ResolutionFailure, Resolver, DECLARATION_EXTENSIONS,
    SOURCE_EXTENSIONS,
};
