//! Subcommand implementations

use std::io::Write;
use std::path::Path;

use funccover::{scan, FunctionRecord, InstrumentConfig, Instrumenter};
use tracing::debug;

use crate::{CliError, CliResult, InstrumentArgs, ScanArgs, ScanFormat};

/// Build the instrumentation config from the YAML file and flag overrides
pub fn resolve_config(args: &InstrumentArgs) -> CliResult<InstrumentConfig> {
    let mut config = match &args.config {
        Some(path) => InstrumentConfig::from_yaml_file(path)?,
        None => InstrumentConfig::default(),
    };
    if let Some(runtime_crate) = &args.runtime_crate {
        config = config.with_runtime_crate(runtime_crate.as_str());
    }
    if let Some(entry_point) = &args.entry_point {
        config = config.with_entry_point(entry_point.as_str());
    }
    if let Some(crate_root) = args.crate_root {
        config = config.with_crate_root(crate_root);
    }
    config.validate()?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

/// Run `funccover instrument`
pub fn run_instrument(args: &InstrumentArgs) -> CliResult<()> {
    if same_file(&args.src, &args.out) {
        return Err(CliError::invalid_argument(format!(
            "--out {} would overwrite the source file",
            args.out.display()
        )));
    }

    let config = resolve_config(args)?;
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| args.src.display().to_string());
    Instrumenter::new(config).instrument_file(&args.src, &name, &args.cover_var, &args.out)?;
    Ok(())
}

/// Run `funccover scan`, writing the listing to `out`
pub fn run_scan(args: &ScanArgs, out: &mut impl Write) -> CliResult<()> {
    let content = std::fs::read(&args.file)?;
    let records = scan(&content)?;
    match args.format {
        ScanFormat::Text => write_text(&records, out)?,
        ScanFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text(records: &[FunctionRecord], out: &mut impl Write) -> std::io::Result<()> {
    for (index, record) in records.iter().enumerate() {
        writeln!(
            out,
            "{index:>4}  line {:<6} {:<13} {}",
            record.line, record.kind, record.name
        )?;
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
