//! The stdin line protocol spoken by the editor plugin
//!
//! One command per line, tokens joined by `::`. The first token is the
//! positional argument (a location string or a symbol), the remaining tokens
//! select what to do:
//!
//! ```text
//! run
//! pkg/mod.py:4:5:4:12::inspect
//! pkg.mod.func::suggest
//! pkg/mod.py:4:5:4:12::run::inspect
//! ```

use std::fmt;

/// Token separator within one input line
pub const SEPARATOR: &str = "::";

/// Line written to stdout after a check or a suggestion completes
pub const DONE_MARKER: &str = "# done!";

/// A daemon operation selected by a token on the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Full incremental check of the project
    Run,
    /// Signature suggestion for the symbol in the first token
    Suggest,
    /// Type of the expression at the location in the first token
    Inspect,
}

impl Opcode {
    /// All opcodes, in the order they are executed when several share a line.
    pub const ALL: [Opcode; 3] = [Opcode::Run, Opcode::Suggest, Opcode::Inspect];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Suggest => "suggest",
            Self::Inspect => "inspect",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == token)
    }

    /// Recovery policy: whether a daemon failure during this operation is
    /// reported and the loop continues, or the failure ends the bridge.
    ///
    /// | Opcode | Recoverable |
    /// |--------|-------------|
    /// | `run` | no |
    /// | `suggest` | no |
    /// | `inspect` | yes |
    ///
    /// `run` and `suggest` failures terminate the process; the host plugin
    /// restarts the bridge when it sees it exit. Changing a row here is the only
    /// change needed to make an operation resilient.
    #[must_use]
    pub const fn recoverable(self) -> bool {
        match self {
            Self::Run | Self::Suggest => false,
            Self::Inspect => true,
        }
    }

    /// Whether a client exit status means the operation completed.
    ///
    /// A check that found type errors exits with 1 and still produced a full
    /// report, so only 2 and above is a failed check.
    ///
    /// The Python handler this bridge replaces stopped without `# done!` on
    /// status 1. Here the check completes with `# done!` and the bridge keeps
    /// serving.
    #[must_use]
    pub const fn accepts_status(self, status: i32) -> bool {
        match self {
            // 1 = type errors reported, not a failed check
            Self::Run => matches!(status, 0 | 1),
            Self::Suggest | Self::Inspect => status == 0,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    tokens: Vec<String>,
}

impl Command {
    /// Parse one line. Surrounding whitespace (including the newline) is
    /// stripped first; an empty line yields a single empty token.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        Self {
            tokens: line.trim().split(SEPARATOR).map(str::to_owned).collect(),
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The positional argument: a location for `inspect`, a symbol for `suggest`.
    #[must_use]
    pub fn argument(&self) -> &str {
        // split always yields at least one element
        self.tokens.first().map_or("", String::as_str)
    }

    /// Whether `opcode` appears anywhere on the line.
    #[must_use]
    pub fn has(&self, opcode: Opcode) -> bool {
        self.tokens.iter().any(|t| t == opcode.as_str())
    }

    /// Opcodes present on the line, each once, in execution order.
    pub fn opcodes(&self) -> impl Iterator<Item = Opcode> + '_ {
        Opcode::ALL.into_iter().filter(|op| self.has(*op))
    }

    /// Token list as echoed to stderr, e.g. `["m.py:1:1:1:1", "inspect"]`.
    #[must_use]
    pub fn echo(&self) -> String {
        format!("{:?}", self.tokens)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(SEPARATOR))
    }
}
