//! Declaration block generation (DeclarationEmitter)
//!
//! Renders the block appended to every instrumented file:
//!
//! ```text
//! static <table>: <rt>::CoverageTable<N>     names, lines, N unset flags
//! static <table>_REGISTER: extern "C" fn()  static constructor → register()
//! fn <hook>_noop() {}                        ┐ entry point files only
//! pub static <HOOK>: <rt>::ExitHook          ┘
//! ```
//!
//! The constructor lands in the loader's initializer section, so the table
//! is registered before `main` and before any instrumented function runs.
//! Targets without such a section never register; their flags still flip.

use std::fmt::{self, Display, Write as _};

use crate::{FunctionRecord, InstrumentConfig, Result};

const INIT_SECTION_ATTRS: &[&str] = &[
    r#"#[cfg_attr(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "netbsd", target_os = "openbsd", target_os = "dragonfly", target_os = "illumos"), unsafe(link_section = ".init_array"))]"#,
    r#"#[cfg_attr(target_vendor = "apple", unsafe(link_section = "__DATA,__mod_init_func"))]"#,
    r#"#[cfg_attr(windows, unsafe(link_section = ".CRT$XCU"))]"#,
];

/// Everything the declaration block is rendered from
#[derive(Debug, Clone, Copy)]
pub struct CoverageDeclaration<'a> {
    /// Name of the coverage table static
    pub table_var: &'a str,
    /// Source path recorded in the table
    pub source_path: &'a str,
    /// Whether to declare the exit hook
    pub has_entry_point: bool,
    /// Functions, in flag order
    pub functions: &'a [FunctionRecord],
    /// Path to the runtime crate
    pub runtime_crate: &'a str,
    /// Name of the exit hook static
    pub exit_hook_var: &'a str,
}

/// Name of the no-op callback generated for `exit_hook_var`
#[must_use]
pub fn noop_fn_name(exit_hook_var: &str) -> String {
    format!("{}_noop", exit_hook_var.to_lowercase())
}

/// Name of the static constructor generated for `table_var`
#[must_use]
pub fn register_static_name(table_var: &str) -> String {
    format!("{table_var}_REGISTER")
}

impl CoverageDeclaration<'_> {
    fn write_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rt = self.runtime_crate;
        writeln!(f, "#[allow(non_upper_case_globals, dead_code)]")?;
        writeln!(
            f,
            "static {}: {rt}::CoverageTable<{}> = {rt}::CoverageTable {{",
            self.table_var,
            self.functions.len()
        )?;
        writeln!(f, "    source_path: {:?},", self.source_path)?;
        write_array(
            f,
            "function_names",
            self.functions.iter().map(|record| format!("{:?}", record.name)),
        )?;
        write_array(
            f,
            "function_lines",
            self.functions.iter().map(|record| record.line),
        )?;
        write_array(
            f,
            "flags",
            self.functions
                .iter()
                .map(|_| format!("{rt}::FlagCell::new(false)")),
        )?;
        writeln!(f, "}};")
    }

    fn write_constructor(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#[used]")?;
        writeln!(f, "#[allow(non_upper_case_globals, unsafe_code)]")?;
        for attr in INIT_SECTION_ATTRS {
            writeln!(f, "{attr}")?;
        }
        writeln!(
            f,
            "static {}: extern \"C\" fn() = {{",
            register_static_name(self.table_var)
        )?;
        writeln!(f, "    extern \"C\" fn register() {{")?;
        writeln!(f, "        let _ = {}.register();", self.table_var)?;
        if self.has_entry_point {
            writeln!(
                f,
                "        let _ = {}::Registry::global().attach_exit_hook(&{});",
                self.runtime_crate, self.exit_hook_var
            )?;
        }
        writeln!(f, "    }}")?;
        writeln!(f, "    register")?;
        writeln!(f, "}};")
    }

    fn write_exit_hook(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rt = self.runtime_crate;
        let noop = noop_fn_name(self.exit_hook_var);
        writeln!(f, "#[allow(dead_code)]")?;
        writeln!(f, "fn {noop}() {{}}")?;
        writeln!(f)?;
        writeln!(f, "#[allow(non_upper_case_globals)]")?;
        writeln!(
            f,
            "pub static {}: {rt}::ExitHook = {rt}::ExitHook::new({noop});",
            self.exit_hook_var
        )
    }
}

impl Display for CoverageDeclaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Leading newline: the source may end inside a line comment.
        writeln!(f)?;
        writeln!(f)?;
        self.write_table(f)?;
        writeln!(f)?;
        self.write_constructor(f)?;
        if self.has_entry_point {
            writeln!(f)?;
            self.write_exit_hook(f)?;
        }
        Ok(())
    }
}

fn write_array<T: Display>(
    f: &mut fmt::Formatter<'_>,
    field: &str,
    items: impl Iterator<Item = T>,
) -> fmt::Result {
    write!(f, "    {field}: [")?;
    for item in items {
        write!(f, "\n        {item},")?;
    }
    writeln!(f, "\n    ],")
}

/// Render the declaration block for one file
pub fn emit_declaration(
    table_var: &str,
    source_path: &str,
    has_entry_point: bool,
    records: &[FunctionRecord],
    config: &InstrumentConfig,
) -> Result<String> {
    let declaration = CoverageDeclaration {
        table_var,
        source_path,
        has_entry_point,
        functions: records,
        runtime_crate: &config.runtime_crate,
        exit_hook_var: &config.exit_hook_var,
    };
    let mut out = String::new();
    write!(out, "{declaration}")?;
    Ok(out)
}
