//! Runtime support for funccover-instrumented code.
//!
//! The instrumenter rewrites each source file so that every function sets a
//! flag on entry, and appends a `static` [`CoverageTable`] holding those flags.
//! A static constructor registers the table into the process-wide
//! [`Registry`] before `main` runs; reporting code reads the registry at exit.
//!
//! ```
//! use funccover_runtime::{CoverageTable, Registry};
//!
//! static TABLE: CoverageTable<2> = CoverageTable::new("src/lib.rs", ["parse", "emit"], [3, 17]);
//!
//! let registry = Registry::new();
//! TABLE.register_into(&registry);
//!
//! TABLE.hit(1);
//! let snapshot = registry.snapshot();
//! assert_eq!(snapshot.total, 2);
//! assert_eq!(snapshot.executed, 1);
//! ```

#![warn(missing_docs)]

mod error;
mod exit_hook;
mod registry;
mod table;

pub use error::{RegistryError, RegistryResult};
pub use exit_hook::{ExitGuard, ExitHook};
pub use registry::{CoverageRow, CoverageSnapshot, Registry, RowSnapshot};
pub use table::{CoverageTable, FlagCell};
