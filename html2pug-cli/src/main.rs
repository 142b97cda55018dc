//! `html2pug`: read HTML on stdin, write Pug on stdout.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, CommandFactory, Parser};
use html2pug::ConvertOptions;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:
  # Accept input from file and write to stdout
  $ html2pug < example.html

  # Or write to a file
  $ html2pug < example.html > example.pug";

/// Convert HTML from stdin to Pug
#[derive(Parser, Debug)]
#[command(
    name = "html2pug",
    version,
    about,
    disable_version_flag = true,
    after_help = EXAMPLES
)]
struct Cli {
    /// Use tabs instead of spaces
    #[arg(short, long)]
    tabs: bool,

    /// Use double quotes
    #[arg(short, long, visible_alias = "doubleQuotes")]
    double_quotes: bool,

    /// Separate attributes with spaces instead of commas
    #[arg(long)]
    no_commas: bool,

    /// Fail on malformed markup instead of repairing it
    #[arg(long)]
    strict: bool,

    /// Read options from a JSON file; flags take precedence
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    fn options(&self) -> anyhow::Result<ConvertOptions> {
        let mut opts = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                ConvertOptions::from_json(&json)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => ConvertOptions::default(),
        };

        if self.tabs {
            opts = opts.tabs();
        }
        if self.double_quotes {
            opts = opts.double_quotes();
        }
        if self.no_commas {
            opts = opts.spaces_separator();
        }
        if self.strict {
            opts = opts.strict();
        }
        Ok(opts)
    }
}

/// Convert `input` and write the result to `out`. Blank input gets the help
/// text instead.
fn run(cli: &Cli, input: &str, out: &mut impl Write) -> anyhow::Result<()> {
    if input.trim().is_empty() {
        tracing::debug!("no input, showing help");
        writeln!(out, "{}", Cli::command().render_help())?;
        return Ok(());
    }

    let opts = cli.options()?;
    let pug = html2pug::convert(input, &opts)?;
    writeln!(out, "{pug}")?;
    Ok(())
}

fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("html2pug: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut input = String::new();
    let result = io::stdin()
        .read_to_string(&mut input)
        .context("reading stdin")
        .and_then(|_| run(&cli, &input, &mut io::stdout().lock()));
    exit_code(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_options() {
        let cli = Cli::parse_from(["html2pug", "-t", "--doubleQuotes", "--no-commas"]);
        let style = cli.options().unwrap().style();
        assert_eq!(style.indent, "\t");
        assert_eq!(style.quote, '"');
        assert_eq!(style.separator, " ");
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["html2pug"]);
        assert_eq!(cli.options().unwrap(), ConvertOptions::default());
    }

    fn run_with(args: &[&str], input: &str) -> (anyhow::Result<()>, String) {
        let cli = Cli::parse_from(args.iter().copied());
        let mut out = Vec::new();
        let result = run(&cli, input, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_converts_input() {
        let (result, out) = run_with(&["html2pug", "-t"], "<div><span>Tabs!</span></div>");
        result.unwrap();
        assert_eq!(out, "div\n\tspan Tabs!\n");
    }

    #[test]
    fn test_blank_input_prints_help() {
        for input in ["", "  \n\t "] {
            let (result, out) = run_with(&["html2pug"], input);
            result.unwrap();
            assert!(out.contains("Usage: html2pug"), "{out}");
            assert!(out.contains("Examples:"), "{out}");
        }
    }

    #[test]
    fn test_malformed_markup_fails_in_strict_mode() {
        let (result, out) = run_with(&["html2pug", "--strict"], "<div></span></div>");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("malformed markup"), "{err:#}");
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_config_fails() {
        let (result, _) = run_with(
            &["html2pug", "-c", "/nonexistent/html2pug.json"],
            "<p>x</p>",
        );
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("reading /nonexistent/html2pug.json"), "{err:#}");
    }

    #[test]
    fn test_short_double_quotes() {
        let cli = Cli::parse_from(["html2pug", "-d", "--strict"]);
        let opts = cli.options().unwrap();
        assert!(opts.use_double_quotes);
        assert!(opts.parser.strict);
    }
}
