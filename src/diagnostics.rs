//! Parsing of mypy report lines.
//!
//! With `--show-error-end --no-pretty --hide-error-context` every finding is a
//! single line:
//!
//! ```text
//! pkg/mod.py:12:5:12:18: error: Incompatible return value type (got "int", expected "str")  [return-value]
//! ```
//!
//! The bridge passes check output through untouched; parsing is only used to
//! log what a check found.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static REPORT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<path>.+?):(?P<line>\d+):(?P<col>\d+):(?:(?P<end_line>\d+):(?P<end_col>\d+):)? (?P<severity>error|warning|note|baseline): (?P<message>\S.*?)(?: {2}\[(?P<code>[\w-]+)\])?$",
    )
    .expect("report line pattern is valid")
});

/// Severity of one report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Note,
    /// An error already recorded in a basedmypy baseline file
    Baseline,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
            Self::Baseline => "baseline",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "note" => Some(Self::Note),
            "baseline" => Some(Self::Baseline),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding from a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: String,
    /// 1-based
    pub line: u32,
    /// 1-based
    pub column: u32,
    /// End position, present when the daemon was asked for error ends
    pub end: Option<(u32, u32)>,
    pub severity: Severity,
    pub message: String,
    /// Error code such as `return-value`, absent for notes
    pub code: Option<String>,
}

/// Parse a single line; `None` for anything that is not a finding
/// (summary lines, blank lines, daemon chatter).
#[must_use]
pub fn parse_line(line: &str) -> Option<Diagnostic> {
    let caps = REPORT_LINE.captures(line.trim_end())?;

    let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());

    let end = match (number("end_line"), number("end_col")) {
        (Some(line), Some(col)) => Some((line, col)),
        _ => None,
    };

    Some(Diagnostic {
        path: caps["path"].to_string(),
        line: number("line")?,
        column: number("col")?,
        end,
        severity: Severity::from_label(&caps["severity"])?,
        message: caps["message"].to_string(),
        code: caps.name("code").map(|m| m.as_str().to_string()),
    })
}

/// Every finding in a block of check output.
#[must_use]
pub fn parse_output(output: &str) -> Vec<Diagnostic> {
    output.lines().filter_map(parse_line).collect()
}

/// Per-severity counts of a check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub notes: usize,
    pub baselined: usize,
}

impl Summary {
    #[must_use]
    pub fn of(diagnostics: &[Diagnostic]) -> Self {
        diagnostics
            .iter()
            .fold(Self::default(), |mut summary, d| {
                match d.severity {
                    Severity::Error => summary.errors += 1,
                    Severity::Warning => summary.warnings += 1,
                    Severity::Note => summary.notes += 1,
                    Severity::Baseline => summary.baselined += 1,
                }
                summary
            })
    }
}
