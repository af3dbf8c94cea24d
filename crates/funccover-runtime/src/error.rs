//! Error types for the coverage registry.

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while registering coverage data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The parallel arrays handed to `register` differ in length
    #[error("Parallel arrays differ in length: {names} names, {lines} lines, {flags} flags")]
    LengthMismatch {
        /// Number of function names
        names: usize,
        /// Number of function lines
        lines: usize,
        /// Number of flag cells
        flags: usize,
    },
}

impl RegistryError {
    /// Create a length mismatch error
    #[must_use]
    pub const fn length_mismatch(names: usize, lines: usize, flags: usize) -> Self {
        Self::LengthMismatch {
            names,
            lines,
            flags,
        }
    }
}
