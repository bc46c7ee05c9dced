//! Stub dmypy client for development testing
//!
//! Accepts the same argv as the real client (`--status-file <file>` followed by
//! `run`, `suggest` or `inspect`) and answers with canned output. The scenario
//! comes from `DMYPY_STUB_SCENARIO` because the bridge builds the argv itself:
//!
//! | Scenario | run | suggest | inspect |
//! |----------|-----|---------|---------|
//! | `success` | clean, exit 0 | JSON, exit 0 | `builtins.int` |
//! | `type-errors` | two errors, exit 1 | JSON, exit 0 | `builtins.int` |
//! | `inspect-fail` | clean, exit 0 | JSON, exit 0 | exit 2 |
//! | `crash` | exit 2 | exit 2 | exit 2 |
//! | `hang` | sleeps | sleeps | sleeps |
//!
//! When `DMYPY_STUB_LOG` is set, each invocation appends its argv to that file,
//! one line per call with arguments separated by spaces.

use clap::{Arg, ArgAction, Command};
use serde_json::json;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let matches = Command::new("dmypy-stub")
        .version("1.13.0")
        .about("Stub dmypy client for testing")
        .arg(
            Arg::new("status-file")
                .long("status-file")
                .value_name("FILE")
                .default_value(".dmypy.json"),
        )
        .arg(
            Arg::new("command")
                .value_name("COMMAND")
                .required(true)
                .action(ArgAction::Append)
                .num_args(1..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        )
        .get_matches();

    let command: Vec<&String> = matches
        .get_many::<String>("command")
        .map(Iterator::collect)
        .unwrap_or_default();

    if let Some(log) = std::env::var_os("DMYPY_STUB_LOG") {
        let mut file = OpenOptions::new().create(true).append(true).open(log)?;
        let argv: Vec<String> = std::env::args().skip(1).collect();
        writeln!(file, "{}", argv.join(" "))?;
    }

    let scenario = std::env::var("DMYPY_STUB_SCENARIO").unwrap_or_else(|_| "success".to_string());
    if scenario == "hang" {
        thread::sleep(Duration::from_secs(60));
    }
    if scenario == "crash" {
        eprintln!("Daemon crashed!");
        return Ok(ExitCode::from(2));
    }

    let subcommand = command.first().map_or("", |s| s.as_str());
    let mut stdout = io::stdout();
    let code = match subcommand {
        "run" => handle_run(&scenario, &mut stdout)?,
        "suggest" => {
            let symbol = command.get(1).map_or("", |s| s.as_str());
            handle_suggest(symbol, &mut stdout)?
        }
        "inspect" => handle_inspect(&scenario, &mut stdout)?,
        other => {
            eprintln!("dmypy: error: invalid choice: '{other}'");
            2
        }
    };
    stdout.flush()?;
    Ok(ExitCode::from(code))
}

fn handle_run(scenario: &str, out: &mut impl Write) -> io::Result<u8> {
    if scenario == "type-errors" {
        writeln!(
            out,
            "pkg/mod.py:3:12:3:13: error: Incompatible return value type (got \"int\", expected \"str\")  [return-value]"
        )?;
        writeln!(
            out,
            "pkg/mod.py:7:1:7:4: error: Name \"foo\" is not defined  [name-defined]"
        )?;
        writeln!(out, "Found 2 errors in 1 file (checked 2 source files)")?;
        return Ok(1);
    }
    writeln!(out, "Success: no issues found in 2 source files")?;
    Ok(0)
}

fn handle_suggest(symbol: &str, out: &mut impl Write) -> io::Result<u8> {
    let suggestion = json!([{
        "func_name": symbol,
        "line": 1,
        "path": "pkg/mod.py",
        "samples": 0,
        "signature": {"arg_types": ["int"], "return_type": "str"},
    }]);
    writeln!(out, "{suggestion}")?;
    Ok(0)
}

fn handle_inspect(scenario: &str, out: &mut impl Write) -> io::Result<u8> {
    if scenario == "inspect-fail" {
        eprintln!("Can't find expression at span 9:1 to 9:2");
        return Ok(2);
    }
    writeln!(out, "  \"builtins.int\"  ")?;
    Ok(0)
}
