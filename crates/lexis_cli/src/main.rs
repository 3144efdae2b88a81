//! lexis: Scan a file with a JSON rule set and print its tokens.
//!
//! Usage:
//!   lexis [options] [FILE]
//!
//! Without `--rules` or `--preset` the built-in `c` rule set is used.

use clap::{Parser as ClapParser, ValueEnum};
use lexis_core::InternedString;
use lexis_diagnostics::Diagnostic;
use lexis_ruleset::Ruleset;
use lexis_scanner::{Token, TokenValue};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};

#[derive(ClapParser, Debug)]
#[command(name = "lexis", version, about = "lexis - A rule-driven lexical scanner")]
struct Cli {
    /// File to scan. Reads standard input when omitted.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// JSON rule file describing the token rules.
    #[arg(short = 'r', long, value_name = "PATH", conflicts_with = "preset")]
    rules: Option<PathBuf>,

    /// Built-in rule set to use.
    #[arg(short = 'p', long, value_name = "NAME")]
    preset: Option<String>,

    /// Output format for the token stream.
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print scan diagnostics to stderr and fail when any is an error.
    #[arg(long)]
    diagnostics: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// One token as written by `--format json`.
#[derive(Debug, Serialize)]
struct TokenRecord<'a> {
    kind: &'a str,
    value: serde_json::Value,
    offset: usize,
    length: usize,
    line: usize,
    column: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    unterminated: bool,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const DEFAULT_PRESET: &str = "c";

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            print_error(&e.to_string());
            1
        }
    };
    process::exit(exit_code);
}

/// Log to stderr. `RUST_LOG` wins over the default `warn` filter unless
/// `--verbose` asks for debug output.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> CliResult<i32> {
    let ruleset = load_ruleset(cli)?;
    let input = open_input(cli)?;
    let mut scanner = ruleset.build_scanner(input)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0usize;

    match cli.format {
        OutputFormat::Text => {
            for token in scanner.by_ref() {
                let token = token?;
                writeln!(out, "{}", text_line(&ruleset, &token))?;
                count += 1;
            }
        }
        OutputFormat::Json => {
            let mut records = Vec::new();
            for token in scanner.by_ref() {
                records.push(record(&ruleset, &token?));
            }
            count = records.len();
            serde_json::to_writer_pretty(&mut out, &records)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    info!(tokens = count, "scan finished");

    let diagnostics = scanner.take_diagnostics();
    if !cli.diagnostics {
        return Ok(0);
    }

    let use_color = io::stderr().is_terminal();
    for diag in diagnostics.diagnostics() {
        print_diagnostic(diag, use_color);
    }
    if diagnostics.has_errors() {
        let count = diagnostics.error_count();
        let plural = if count == 1 { "" } else { "s" };
        if use_color {
            eprintln!("\n{}Found {} error{}.{}", RED, count, plural, RESET);
        } else {
            eprintln!("\nFound {} error{}.", count, plural);
        }
        return Ok(2);
    }
    Ok(0)
}

fn load_ruleset(cli: &Cli) -> CliResult<Ruleset> {
    let ruleset = match (&cli.rules, &cli.preset) {
        (Some(path), _) => Ruleset::from_file(path)?,
        (None, Some(name)) => Ruleset::preset(name)?,
        (None, None) => {
            debug!(preset = DEFAULT_PRESET, "no rules given, using default preset");
            Ruleset::preset(DEFAULT_PRESET)?
        }
    };
    Ok(ruleset)
}

fn open_input(cli: &Cli) -> CliResult<Box<dyn Read>> {
    match &cli.file {
        Some(path) => {
            debug!(path = %path.display(), "scanning file");
            let file = File::open(path)
                .map_err(|e| format!("failed to open '{}': {}", path.display(), e))?;
            Ok(Box::new(file))
        }
        None => {
            debug!("scanning standard input");
            Ok(Box::new(io::stdin().lock()))
        }
    }
}

/// `kind<TAB>"value"<TAB>offset<TAB>length<TAB>line<TAB>column`
fn text_line(ruleset: &Ruleset, token: &Token<InternedString>) -> String {
    format!(
        "{}\t{:?}\t{}\t{}\t{}\t{}",
        ruleset.kind_name(*token.kind()),
        token.value().to_string(),
        token.offset(),
        token.length(),
        token.line(),
        token.column()
    )
}

fn record<'a>(ruleset: &'a Ruleset, token: &Token<InternedString>) -> TokenRecord<'a> {
    TokenRecord {
        kind: ruleset.kind_name(*token.kind()),
        value: json_value(token.value()),
        offset: token.offset(),
        length: token.length(),
        line: token.line(),
        column: token.column(),
        unterminated: token.is_unterminated(),
    }
}

/// Integers stay numbers; decimals are written as text to keep their precision.
fn json_value(value: &TokenValue) -> serde_json::Value {
    match value {
        TokenValue::None => serde_json::Value::Null,
        TokenValue::Integer(i) => serde_json::Value::from(*i),
        TokenValue::Decimal(d) => serde_json::Value::String(d.to_string()),
        TokenValue::Str(s) => serde_json::Value::String(s.clone()),
        TokenValue::Char(c) => serde_json::Value::String(c.to_string()),
    }
}

fn print_diagnostic(diag: &Diagnostic, use_color: bool) {
    if use_color {
        let color = if diag.is_error() { RED } else { YELLOW };
        eprintln!(
            "{}({}:{}){} {}{}{}{} {}LX{}{}: {}",
            CYAN,
            diag.line,
            diag.column,
            RESET,
            BOLD,
            color,
            diag.category,
            RESET,
            CYAN,
            diag.code,
            RESET,
            diag.message_text
        );
    } else {
        eprintln!("{}", diag);
    }
}

fn print_error(msg: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_and_preset_conflict() {
        let err = Cli::try_parse_from(["lexis", "--rules", "r.json", "--preset", "c"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["lexis"]).unwrap();
        assert!(cli.file.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.diagnostics);
        assert!(load_ruleset(&cli).is_ok());
    }

    #[test]
    fn test_unknown_preset_fails_to_load() {
        let cli = Cli::try_parse_from(["lexis", "-p", "cobol", "-f", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        let err = load_ruleset(&cli).unwrap_err();
        assert!(err.to_string().contains("cobol"));
    }

    #[test]
    fn test_token_output() {
        let ruleset = Ruleset::preset("c").unwrap();
        let mut scanner = ruleset.build_scanner("return 'a\tb'".as_bytes()).unwrap();

        let keyword = scanner.next_token().unwrap();
        assert_eq!(text_line(&ruleset, &keyword), "Return\t\"\"\t0\t6\t1\t0");

        let string = scanner.next_token().unwrap();
        assert_eq!(text_line(&ruleset, &string), "String\t\"a\\tb\"\t7\t5\t1\t7");

        let json = serde_json::to_value(record(&ruleset, &string)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "String",
                "value": "a\tb",
                "offset": 7,
                "length": 5,
                "line": 1,
                "column": 7
            })
        );
    }

    #[test]
    fn test_json_values() {
        assert_eq!(json_value(&TokenValue::None), serde_json::Value::Null);
        assert_eq!(json_value(&TokenValue::Integer(42)), serde_json::json!(42));
        assert_eq!(json_value(&TokenValue::Char('x')), serde_json::json!("x"));
    }
}
