//! Insertion planning (InsertionPlanner)
//!
//! Turns scanned records into the splice offsets the rewriter walks in a
//! single pass. Pure: no I/O, no errors.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::DEFAULT_ENTRY_POINT;
use crate::FunctionRecord;

/// Where to splice statements into one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InsertionPlan {
    /// One splice offset per function, strictly ascending; the position in
    /// this list is the function's flag index
    pub events: Vec<usize>,
    /// Splice offset inside the entry point's body, right after its opening
    /// delimiter, if the file defines one
    pub entry_point: Option<usize>,
}

impl InsertionPlan {
    /// Whether the file defines the entry point
    #[must_use]
    pub const fn has_entry_point(&self) -> bool {
        self.entry_point.is_some()
    }
}

/// Plan insertions for `records`, using `main` as the entry point
#[must_use]
pub fn plan(records: &[FunctionRecord]) -> InsertionPlan {
    plan_with_entry_point(records, DEFAULT_ENTRY_POINT)
}

/// Plan insertions for `records` with a custom entry point name
///
/// If several top-level functions carry the entry point name, the first one
/// in source order receives the exit hook.
#[must_use]
pub fn plan_with_entry_point(records: &[FunctionRecord], entry_point: &str) -> InsertionPlan {
    let events: Vec<usize> = records.iter().map(|record| record.insert_offset).collect();
    debug_assert!(
        events.windows(2).all(|pair| pair[0] < pair[1]),
        "records must arrive in source order"
    );

    let mut candidates = records
        .iter()
        .filter(|record| record.is_entry_point(entry_point));
    let entry = candidates.next();
    if let Some(duplicate) = candidates.next() {
        warn!(
            entry_point,
            line = duplicate.line,
            "multiple entry points found; using the first"
        );
    }

    debug!(
        events = events.len(),
        has_entry_point = entry.is_some(),
        "planned insertions"
    );
    InsertionPlan {
        events,
        entry_point: entry.map(|record| record.insert_offset),
    }
}
