//! Process-wide Coverage Registry
//!
//! Every instrumented file registers its coverage table exactly once, from a
//! static constructor that the loader runs before `main`. The registry keeps
//! one row per function; each row holds a `&'static` reference to the flag
//! cell owned by the file's table, so writes performed by instrumented code
//! after registration are observed when the row is read.
//!
//! # Lifecycle
//!
//! ```text
//! load time                      run time                    exit
//! ─────────                      ────────                    ────
//! ctor → Registry::register  →   fn entry → FlagCell = true  →  rows() / snapshot()
//! ```
//!
//! Rows are appended only. There is no removal and no teardown.

use std::sync::atomic::Ordering;
use std::sync::{OnceLock, PoisonError, RwLock};

use serde::Serialize;

use crate::{ExitHook, FlagCell, RegistryError, RegistryResult};

static GLOBAL: Registry = Registry::new();

/// One registered function, aliasing the flag cell of its coverage table
#[derive(Debug, Clone, Copy)]
pub struct CoverageRow {
    /// Source path recorded by the instrumenter
    pub source_path: &'static str,
    /// Function name
    pub name: &'static str,
    /// Line of the function's `fn` keyword (1-based)
    pub line: u32,
    flag: &'static FlagCell,
}

impl CoverageRow {
    /// Whether the function has executed, read through the aliased cell
    #[inline]
    #[must_use]
    pub fn executed(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// The flag cell this row aliases
    #[must_use]
    pub const fn flag(&self) -> &'static FlagCell {
        self.flag
    }

    /// Copy the row's current state
    #[must_use]
    pub fn snapshot(&self) -> RowSnapshot {
        RowSnapshot {
            source_path: self.source_path.to_string(),
            name: self.name.to_string(),
            line: self.line,
            executed: self.executed(),
        }
    }
}

/// Point-in-time copy of a registry row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSnapshot {
    /// Source path
    pub source_path: String,
    /// Function name
    pub name: String,
    /// Definition line
    pub line: u32,
    /// Flag value at snapshot time
    pub executed: bool,
}

/// Point-in-time copy of the whole registry, in registration order
#[derive(Debug, Clone, Serialize)]
pub struct CoverageSnapshot {
    /// All rows
    pub rows: Vec<RowSnapshot>,
    /// Number of registered functions
    pub total: usize,
    /// Number of functions that executed
    pub executed: usize,
    /// Executed share in percent (100 when nothing is registered)
    pub coverage_percent: f64,
}

impl CoverageSnapshot {
    fn from_rows(rows: Vec<RowSnapshot>) -> Self {
        let total = rows.len();
        let executed = rows.iter().filter(|row| row.executed).count();
        let coverage_percent = if total == 0 {
            100.0
        } else {
            executed as f64 / total as f64 * 100.0
        };
        Self {
            rows,
            total,
            executed,
            coverage_percent,
        }
    }
}

/// Append-only table of every registered function
///
/// Use [`Registry::global`] for the process-wide instance that generated
/// code registers into. Separate instances can be built with
/// [`Registry::new`], which is mainly useful in tests.
#[derive(Debug)]
pub struct Registry {
    rows: RwLock<Vec<CoverageRow>>,
    exit_hook: OnceLock<&'static ExitHook>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            exit_hook: OnceLock::new(),
        }
    }

    /// The process-wide registry
    #[inline]
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Register one file's functions
    ///
    /// Appends one row per index, aliasing `flags[i]`. Returns the index of
    /// the first appended row.
    pub fn register(
        &self,
        source_path: &'static str,
        names: &'static [&'static str],
        lines: &'static [u32],
        flags: &'static [FlagCell],
    ) -> RegistryResult<usize> {
        if names.len() != lines.len() || names.len() != flags.len() {
            return Err(RegistryError::length_mismatch(
                names.len(),
                lines.len(),
                flags.len(),
            ));
        }
        Ok(self.push_rows(source_path, names, lines, flags))
    }

    pub(crate) fn push_rows(
        &self,
        source_path: &'static str,
        names: &'static [&'static str],
        lines: &'static [u32],
        flags: &'static [FlagCell],
    ) -> usize {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let first = rows.len();
        rows.extend(
            names
                .iter()
                .zip(lines)
                .zip(flags)
                .map(|((name, line), flag)| CoverageRow {
                    source_path,
                    name: *name,
                    line: *line,
                    flag,
                }),
        );
        first
    }

    /// Number of registered rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All rows in registration order
    ///
    /// The returned rows still alias the original cells.
    #[must_use]
    pub fn rows(&self) -> Vec<CoverageRow> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rows registered under `source_path`
    #[must_use]
    pub fn rows_for(&self, source_path: &str) -> Vec<CoverageRow> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|row| row.source_path == source_path)
            .copied()
            .collect()
    }

    /// Copy the current state of every row
    #[must_use]
    pub fn snapshot(&self) -> CoverageSnapshot {
        let rows = self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(CoverageRow::snapshot)
            .collect();
        CoverageSnapshot::from_rows(rows)
    }

    /// Remember the entry point's exit hook
    ///
    /// The first attached hook wins; later calls return `false`. Load order
    /// between files is unspecified, so only the crate root should attach.
    pub fn attach_exit_hook(&self, hook: &'static ExitHook) -> bool {
        self.exit_hook.set(hook).is_ok()
    }

    /// The entry point's exit hook, if an instrumented `main` was loaded
    #[must_use]
    pub fn exit_hook(&self) -> Option<&'static ExitHook> {
        self.exit_hook.get().copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
