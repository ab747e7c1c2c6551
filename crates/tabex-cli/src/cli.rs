//! CLI argument definitions for tabex.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tabex",
    version,
    about = "Export JSON records to CSV through declarative column schemas",
    long_about = "Export JSON records to CSV through declarative column schemas.\n\n\
                  A schema file lists models, the JSON file holding their records,\n\
                  and the ordered [header, resolver] pairs that make up each row."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export one model to a CSV file.
    Export(ExportArgs),

    /// List the models and columns declared in a schema file.
    Models(ModelsArgs),
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Path to the JSON schema file.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Model to export.
    #[arg(long = "model", short = 'm', value_name = "NAME")]
    pub model: String,

    /// Directory for the generated file (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR", conflicts_with = "stdout")]
    pub output_dir: Option<PathBuf>,

    /// Print the CSV to stdout instead of writing a file.
    #[arg(long = "stdout")]
    pub stdout: bool,

    /// Option passed to the record scope (repeatable).
    ///
    /// `limit=N` caps the record count; any other `member=value` keeps only
    /// records whose member equals the value.
    #[arg(long = "option", short = 'o', value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,
}

#[derive(Parser)]
pub struct ModelsArgs {
    /// Path to the JSON schema file.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("option key is empty in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_arguments() {
        let cli = Cli::try_parse_from([
            "tabex",
            "export",
            "schema.json",
            "--model",
            "Appointment",
            "-o",
            "limit=5",
            "--option",
            "clinic=north=east",
            "--stdout",
        ])
        .expect("valid arguments");
        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.model, "Appointment");
        assert!(args.stdout);
        assert_eq!(
            args.options,
            vec![
                ("limit".to_string(), "5".to_string()),
                ("clinic".to_string(), "north=east".to_string()),
            ]
        );
    }

    #[test]
    fn output_dir_conflicts_with_stdout() {
        let result = Cli::try_parse_from([
            "tabex",
            "export",
            "schema.json",
            "-m",
            "Appointment",
            "--stdout",
            "--output-dir",
            "out",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_malformed_option() {
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
        assert_eq!(
            parse_key_value("a=").expect("empty value is allowed"),
            ("a".to_string(), String::new())
        );
    }
}
