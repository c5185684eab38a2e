use clap::Parser;
use sbparse::config::{ParserConfig, DEFAULT_CONFIG_FILE};
use sbparse::format::{self, OutputFormat};
use sbparse::input;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Parse a sysbench report (from a file or a pipe) and print its
/// statistics as one row.
#[derive(Parser, Debug)]
#[command(name = "sbparse", version, about)]
pub struct Cli {
    /// Read the report from this file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Print a CSV row (shortcut for --format csv)
    #[arg(short, long, conflicts_with = "format")]
    csv: bool,

    /// Output format (overrides config)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Print column names before a CSV row
    #[arg(long)]
    header: bool,

    /// Config file path [default: sbparse.toml if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log skipped fields and matched lines to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Output format and header flag after applying CLI overrides.
    fn output(&self, cfg: &ParserConfig) -> (OutputFormat, bool) {
        let format = match (self.format, self.csv) {
            (Some(f), _) => f,
            (None, true) => OutputFormat::Csv,
            (None, false) => cfg.output.format,
        };
        (format, self.header || cfg.output.header)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "sbparse=debug"
    } else {
        "sbparse=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(?cli, "parsed CLI arguments");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = match &cli.config {
        Some(path) => ParserConfig::load(path, true)?,
        None => ParserConfig::load(Path::new(DEFAULT_CONFIG_FILE), false)?,
    };
    let (output_format, header) = cli.output(&cfg);

    let source = input::detect_source(cli.file.as_deref())?;
    let result = input::read_report(&source)?;
    tracing::debug!(?result, "parsed report");

    if header && output_format == OutputFormat::Csv {
        println!("{}", format::csv_header());
    }
    println!("{}", format::render(&result, output_format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sbparse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_follow_config() {
        let cli = parse(&[]);
        assert!(cli.file.is_none());
        assert_eq!(
            cli.output(&ParserConfig::default()),
            (OutputFormat::Plain, false)
        );

        let mut cfg = ParserConfig::default();
        cfg.output.format = OutputFormat::Json;
        cfg.output.header = true;
        assert_eq!(cli.output(&cfg), (OutputFormat::Json, true));
    }

    #[test]
    fn csv_flag_overrides_config() {
        let cli = parse(&["-c", "-f", "report.txt"]);
        assert_eq!(cli.file, Some(PathBuf::from("report.txt")));
        let mut cfg = ParserConfig::default();
        cfg.output.format = OutputFormat::Json;
        assert_eq!(cli.output(&cfg).0, OutputFormat::Csv);
    }

    #[test]
    fn format_flag_and_header() {
        let cli = parse(&["--format", "csv", "--header"]);
        assert_eq!(
            cli.output(&ParserConfig::default()),
            (OutputFormat::Csv, true)
        );
    }

    #[test]
    fn csv_conflicts_with_format() {
        let res = Cli::try_parse_from(["sbparse", "-c", "--format", "json"]);
        assert!(res.is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        let res = Cli::try_parse_from(["sbparse", "--format", "xml"]);
        assert!(res.is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
