//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// funccover: function-level coverage instrumentation for Rust sources
#[derive(Parser, Debug)]
#[command(name = "funccover")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Instrument one source file
    Instrument(InstrumentArgs),

    /// List the functions that would be instrumented
    Scan(ScanArgs),
}

/// Arguments for the instrument command
#[derive(Parser, Debug)]
pub struct InstrumentArgs {
    /// Source file to instrument
    #[arg(long)]
    pub src: PathBuf,

    /// Source path recorded in the coverage table (defaults to --src)
    #[arg(long)]
    pub name: Option<String>,

    /// Name of the generated coverage table, unique per program
    #[arg(long)]
    pub cover_var: String,

    /// Where to write the instrumented source
    #[arg(short, long)]
    pub out: PathBuf,

    /// Path to the runtime crate as seen from the instrumented code
    #[arg(long, env = "FUNCCOVER_RUNTIME_CRATE")]
    pub runtime_crate: Option<String>,

    /// Name of the function that receives the exit hook
    #[arg(long)]
    pub entry_point: Option<String>,

    /// Whether the file is the crate root; only crate roots wire the exit hook
    #[arg(long, value_name = "BOOL")]
    pub crate_root: Option<bool>,

    /// YAML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the scan command
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Source file to scan
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ScanFormat,
}

/// Output format for scan
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanFormat {
    /// One function per line
    #[default]
    Text,
    /// JSON array of records
    Json,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_instrument() {
        let cli = parse(&[
            "funccover",
            "instrument",
            "--src",
            "src/main.rs",
            "--cover-var",
            "FuncCover_0",
            "--out",
            "out/main.rs",
        ]);
        let Commands::Instrument(args) = cli.command else {
            panic!("expected Instrument command");
        };
        assert_eq!(args.src, PathBuf::from("src/main.rs"));
        assert_eq!(args.cover_var, "FuncCover_0");
        assert_eq!(args.out, PathBuf::from("out/main.rs"));
        assert!(args.name.is_none());
        assert!(args.entry_point.is_none());
        assert!(args.config.is_none());
        assert!(args.crate_root.is_none());
    }

    #[test]
    fn test_parse_instrument_overrides() {
        let cli = parse(&[
            "funccover",
            "instrument",
            "--src",
            "a.rs",
            "--name",
            "pkg/a.rs",
            "--cover-var",
            "Cov",
            "-o",
            "b.rs",
            "--runtime-crate",
            "crate::rt",
            "--entry-point",
            "start",
            "-c",
            "funccover.yaml",
            "--crate-root",
            "false",
        ]);
        let Commands::Instrument(args) = cli.command else {
            panic!("expected Instrument command");
        };
        assert_eq!(args.name.as_deref(), Some("pkg/a.rs"));
        assert_eq!(args.runtime_crate.as_deref(), Some("crate::rt"));
        assert_eq!(args.entry_point.as_deref(), Some("start"));
        assert_eq!(args.config, Some(PathBuf::from("funccover.yaml")));
        assert_eq!(args.crate_root, Some(false));
    }

    #[test]
    fn test_instrument_requires_cover_var() {
        let result = Cli::try_parse_from(["funccover", "instrument", "--src", "a.rs", "--out", "b.rs"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_scan_formats() {
        let cli = parse(&["funccover", "scan", "lib.rs"]);
        let Commands::Scan(args) = cli.command else {
            panic!("expected Scan command");
        };
        assert_eq!(args.format, ScanFormat::Text);

        let cli = parse(&["funccover", "scan", "lib.rs", "--format", "json"]);
        let Commands::Scan(args) = cli.command else {
            panic!("expected Scan command");
        };
        assert_eq!(args.format, ScanFormat::Json);
    }

    #[test]
    fn test_global_verbosity_flags() {
        let cli = parse(&["funccover", "-vv", "scan", "lib.rs"]);
        assert_eq!(cli.verbose, 2);
        let cli = parse(&["funccover", "scan", "lib.rs", "--quiet"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["funccover", "-q", "-v", "scan", "lib.rs"]).is_err());
    }
}
