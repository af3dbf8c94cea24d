//! Source-level function coverage instrumentation for Rust.
//!
//! Rewrites one source file at a time so that every function body starts by
//! setting its own flag, and appends a declaration block holding those flags
//! in a [`funccover_runtime`]-style `CoverageTable`. The pipeline:
//!
//! 1. [`scan`] parses the file and lists instrumentable functions
//! 2. [`plan`] turns them into splice offsets
//! 3. [`rewrite`] splices tracking statements into the original bytes
//! 4. [`emit_declaration`] renders the table and its registration
//!
//! [`instrument`] runs all four.
//!
//! ```
//! let out = funccover::instrument("src/lib.rs", b"fn parse() {}\n", "FuncCover_0").unwrap();
//! let out = String::from_utf8(out).unwrap();
//! assert!(out.starts_with("fn parse() { FuncCover_0.hit(0);}\n"));
//! assert!(out.contains("static FuncCover_0: ::funccover_runtime::CoverageTable<1>"));
//! ```
//!
//! [`funccover_runtime`]: https://docs.rs/funccover-runtime

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod emitter;
mod error;
pub mod instrument;
mod line_index;
pub mod planner;
pub mod rewriter;
pub mod scanner;

pub use config::InstrumentConfig;
pub use emitter::{emit_declaration, noop_fn_name, register_static_name, CoverageDeclaration};
pub use error::{InstrumentError, Result};
pub use instrument::{instrument, Instrumenter};
pub use planner::{plan, plan_with_entry_point, InsertionPlan};
pub use rewriter::{exit_guard_statement, rewrite, tracking_statement, Rewritten};
pub use scanner::{scan, FunctionKind, FunctionRecord};
