//! Per-file coverage table
//!
//! The instrumenter emits one `static` of this type per source file. Its
//! arrays are parallel: entry `i` of `function_names`, `function_lines` and
//! `flags` describe the same function, in source order.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::Registry;

/// A single "has this function executed" cell
///
/// Concurrent writers all store `true`, so relaxed atomics are enough.
pub type FlagCell = AtomicBool;

const UNSET: FlagCell = FlagCell::new(false);

/// Coverage data for one instrumented source file
#[derive(Debug)]
pub struct CoverageTable<const N: usize> {
    /// Source path given to the instrumenter
    pub source_path: &'static str,
    /// Function names in source order
    pub function_names: [&'static str; N],
    /// Definition lines, parallel to `function_names`
    pub function_lines: [u32; N],
    /// Execution flags, parallel to `function_names`
    pub flags: [FlagCell; N],
}

impl<const N: usize> CoverageTable<N> {
    /// Create a table with every flag unset
    #[must_use]
    pub const fn new(
        source_path: &'static str,
        function_names: [&'static str; N],
        function_lines: [u32; N],
    ) -> Self {
        Self {
            source_path,
            function_names,
            function_lines,
            flags: [UNSET; N],
        }
    }

    /// Mark function `index` as executed
    ///
    /// This is the hot path spliced into every instrumented function.
    #[inline(always)]
    pub fn hit(&self, index: usize) {
        if let Some(flag) = self.flags.get(index) {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Whether function `index` has executed
    #[inline]
    #[must_use]
    pub fn executed(&self, index: usize) -> bool {
        self.flags
            .get(index)
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Number of functions that have executed
    #[must_use]
    pub fn executed_count(&self) -> usize {
        self.flags
            .iter()
            .filter(|flag| flag.load(Ordering::Relaxed))
            .count()
    }

    /// Number of functions in the table
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    /// Check if the file had no instrumentable functions
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Register this table into the process-wide registry
    ///
    /// Called once from the file's static constructor. Returns the index of
    /// the first row.
    pub fn register(&'static self) -> usize {
        self.register_into(Registry::global())
    }

    /// Register this table into `registry`
    pub fn register_into(&'static self, registry: &Registry) -> usize {
        registry.push_rows(
            self.source_path,
            &self.function_names,
            &self.function_lines,
            &self.flags,
        )
    }
}
