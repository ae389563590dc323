//! Per-module export tables
//!
//! Each module accumulates a partial mapping from public name to the local
//! name it re-exposes and, once known, the storage address. The address is
//! absent while an export is pure alias bookkeeping (`export {a as b}` with
//! no resolved storage yet) and present once the underlying value exists.

use crate::name::Name;
use crate::scope::store::Address;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// How to handle two exports registered under the same public name.
///
/// Observed source behavior is silent overwrite; whether that is intended is
/// undeterminable from behavior alone, so the choice is a policy rather
/// than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportCollisionPolicy {
    /// Last writer wins
    #[default]
    Overwrite,
    /// Raise [`Error::ExportCollision`]
    Error,
}

/// One export: the local name behind a public name, plus its address once
/// the underlying value is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub local: Name,
    pub address: Option<Address>,
}

/// Insertion-ordered export table keyed by public name.
#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    entries: Vec<(Name, ExportEntry)>,
}

impl ExportTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an export under `public`. Behavior on an existing `public`
    /// entry follows `policy`.
    pub fn insert(
        &mut self,
        public: Name,
        entry: ExportEntry,
        policy: ExportCollisionPolicy,
    ) -> Result<()> {
        match self.entries.iter_mut().find(|(name, _)| *name == public) {
            Some(existing) => match policy {
                ExportCollisionPolicy::Overwrite => {
                    tracing::debug!("export '{}' overwritten by later registration", public);
                    existing.1 = entry;
                    Ok(())
                }
                ExportCollisionPolicy::Error => Err(Error::ExportCollision(public)),
            },
            None => {
                self.entries.push((public, entry));
                Ok(())
            }
        }
    }

    /// Look up an export by its public name
    pub fn lookup(&self, public: &Name) -> Option<&ExportEntry> {
        self.entries
            .iter()
            .find(|(name, _)| name == public)
            .map(|(_, entry)| entry)
    }

    /// Iterate exports in registration order
    pub fn iter(&self) -> impl Iterator<Item = &(Name, ExportEntry)> {
        self.entries.iter()
    }

    /// Number of exports
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
