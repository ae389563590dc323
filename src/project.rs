//! Project discovery
//!
//! Driver-side collaborator that walks a project tree and harvests
//! `package.json` descriptors into the [`PackageInfo`] map the resolver
//! consults. A descriptor contributes an entry when its "types" field (or,
//! failing that, "main") names a file.

use crate::resolve::path::{normalize, PackageInfo};
use crate::Result;
use std::path::{Path, PathBuf};

/// Walk `root` and collect every resolvable package descriptor.
pub fn discover_packages(root: &Path) -> Result<PackageInfo> {
    let mut packages = PackageInfo::new();
    for entry in ignore::Walk::new(root).filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.file_name().and_then(|n| n.to_str()) != Some("package.json") {
            continue;
        }
        match read_descriptor(path) {
            Some(target) => {
                tracing::debug!("descriptor {} -> {}", path.display(), target.display());
                packages.insert(path.to_path_buf(), target);
            }
            None => tracing::debug!("descriptor {} has no usable entry", path.display()),
        }
    }
    Ok(packages)
}

fn read_descriptor(path: &Path) -> Option<PathBuf> {
    let contents = std::fs::read_to_string(path).ok()?;
    let descriptor: serde_json::Value = serde_json::from_str(&contents).ok()?;
    let entry = descriptor
        .get("types")
        .or_else(|| descriptor.get("main"))?
        .as_str()?;
    let dir = path.parent()?;
    Some(normalize(&dir.join(entry)))
}
