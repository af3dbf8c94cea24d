//! Per-file instrumentation pipeline
//!
//! `scan` → `plan` → `rewrite` → `emit_declaration`, plus a file driver that
//! never leaves partial output behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::emitter::{emit_declaration, noop_fn_name, register_static_name};
use crate::planner::plan_with_entry_point;
use crate::rewriter::rewrite;
use crate::scanner::scan;
use crate::{InstrumentConfig, InstrumentError, Result};

/// Instruments source files with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Instrumenter {
    config: InstrumentConfig,
}

impl Instrumenter {
    /// Create an instrumenter
    #[must_use]
    pub const fn new(config: InstrumentConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    /// Instrument one compilation unit
    ///
    /// `source_path` is only recorded in the generated table. `cover_var`
    /// names the table and must be unique across the program.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, an invalid `cover_var`, or source
    /// that does not parse.
    pub fn instrument(&self, source_path: &str, source: &[u8], cover_var: &str) -> Result<Vec<u8>> {
        self.config.validate()?;
        self.check_cover_var(cover_var)?;

        let records = scan(source)?;
        let mut plan = plan_with_entry_point(&records, &self.config.entry_point);
        if !self.config.crate_root {
            plan.entry_point = None;
        }
        let rewritten = rewrite(source, &plan, cover_var, &self.config.exit_hook_var)?;
        let declaration = emit_declaration(
            cover_var,
            source_path,
            rewritten.has_entry_point,
            &records,
            &self.config,
        )?;

        debug!(
            source_path,
            functions = records.len(),
            has_entry_point = rewritten.has_entry_point,
            "instrumented unit"
        );
        let mut out = rewritten.bytes;
        out.extend_from_slice(declaration.as_bytes());
        Ok(out)
    }

    /// Instrument `src_path` into `out_path`
    ///
    /// The output is written to a temporary file next to `out_path` and
    /// renamed into place, so a failure leaves `out_path` untouched.
    pub fn instrument_file(
        &self,
        src_path: &Path,
        src_name: &str,
        cover_var: &str,
        out_path: &Path,
    ) -> Result<()> {
        let source = std::fs::read(src_path)?;
        let output = self.instrument(src_name, &source, cover_var)?;

        let dir = match out_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&output)?;
        tmp.as_file().sync_all()?;
        tmp.persist(out_path).map_err(|e| InstrumentError::Io(e.error))?;

        info!(
            src = %src_path.display(),
            out = %out_path.display(),
            bytes = output.len(),
            "wrote instrumented source"
        );
        Ok(())
    }

    /// `cover_var` must be a plain identifier that no generated item shares
    fn check_cover_var(&self, cover_var: &str) -> Result<()> {
        let is_plain_ident =
            !cover_var.starts_with("r#") && syn::parse_str::<syn::Ident>(cover_var).is_ok();
        let hook = &self.config.exit_hook_var;
        let clashes = cover_var == hook
            || cover_var == noop_fn_name(hook)
            || *hook == register_static_name(cover_var);
        if !is_plain_ident || clashes {
            return Err(InstrumentError::invalid_cover_var(cover_var));
        }
        Ok(())
    }
}

/// Instrument one compilation unit with the default configuration
pub fn instrument(source_path: &str, source: &[u8], cover_var: &str) -> Result<Vec<u8>> {
    Instrumenter::default().instrument(source_path, source, cover_var)
}
