//! Environment & store - the name binding model
//!
//! Names bind to addresses in a stack of lexical frames; addresses index an
//! arena store of abstract values. The indirection is what makes recursion
//! and export aliasing work: two names bound to one address share storage.

pub mod env;
pub mod store;
pub mod exports;

pub use env::{Environment, Frame};
pub use store::{Address, Slot, Store};
pub use exports::{ExportCollisionPolicy, ExportEntry, ExportTable};
