//! Instrumentation configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{InstrumentError, Result};

/// Path under which generated code reaches the runtime crate
pub const DEFAULT_RUNTIME_CRATE: &str = "::funccover_runtime";

/// Conventional name of the program entry point
pub const DEFAULT_ENTRY_POINT: &str = "main";

/// Name of the generated exit hook static
pub const DEFAULT_EXIT_HOOK_VAR: &str = "FUNC_COVER_EXIT_HOOK";

/// Instrumentation settings shared by every file of a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentConfig {
    /// Path to the runtime crate as seen from instrumented code
    pub runtime_crate: String,
    /// Name of the top-level function that receives the exit hook
    pub entry_point: String,
    /// Name of the generated exit hook static
    pub exit_hook_var: String,
    /// Whether the file is the crate root
    ///
    /// Only crate roots wire the exit hook. A `fn main` elsewhere (say in
    /// `cli.rs`) would otherwise attach its own hook, and the registry keeps
    /// whichever hook registers first.
    pub crate_root: bool,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            exit_hook_var: DEFAULT_EXIT_HOOK_VAR.to_string(),
            crate_root: true,
        }
    }
}

impl InstrumentConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the runtime crate path
    #[must_use]
    pub fn with_runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    /// Set the entry point name
    #[must_use]
    pub fn with_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry_point = name.into();
        self
    }

    /// Set the exit hook static name
    #[must_use]
    pub fn with_exit_hook_var(mut self, name: impl Into<String>) -> Self {
        self.exit_hook_var = name.into();
        self
    }

    /// Mark whether the file is the crate root
    #[must_use]
    pub const fn with_crate_root(mut self, crate_root: bool) -> Self {
        self.crate_root = crate_root;
        self
    }

    /// Parse a configuration from YAML; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml_ng::from_str(yaml).map_err(|e| InstrumentError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Check that every generated name is usable in Rust source
    pub fn validate(&self) -> Result<()> {
        if syn::parse_str::<syn::Path>(&self.runtime_crate).is_err() {
            return Err(InstrumentError::config(format!(
                "runtime_crate '{}' is not a Rust path",
                self.runtime_crate
            )));
        }
        for (key, value) in [
            ("entry_point", &self.entry_point),
            ("exit_hook_var", &self.exit_hook_var),
        ] {
            if syn::parse_str::<syn::Ident>(value).is_err() {
                return Err(InstrumentError::config(format!(
                    "{key} '{value}' is not a Rust identifier"
                )));
            }
        }
        Ok(())
    }
}
