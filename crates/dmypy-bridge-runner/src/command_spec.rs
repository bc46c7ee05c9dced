use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

// ============================================================================
// CommandSpec - argv-only description of one client invocation
// ============================================================================

/// Specification for a command to execute.
///
/// Arguments are stored as discrete `OsString` elements. A location string such as
/// `pkg/mod.py:3:1:3:9` or a symbol like `pkg.mod.func` is one argument, whatever
/// characters it contains.
///
/// # Example
///
/// ```rust
/// use dmypy_bridge_runner::CommandSpec;
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("dmypy")
///     .args(["--status-file", ".mypy_cache/.dmypy.json"])
///     .arg("inspect")
///     .arg("pkg/mod.py:3:1:3:9")
///     .cwd("/path/to/project");
///
/// assert_eq!(cmd.program, OsString::from("dmypy"));
/// assert_eq!(cmd.args.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements (NOT shell strings)
    pub args: Vec<OsString>,
    /// Optional working directory
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a new `CommandSpec` with the given program.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Add a single argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the command.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Program name as text, for logs and error messages.
    #[must_use]
    pub fn program_display(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Convert this `CommandSpec` into a `std::process::Command`.
    ///
    /// The resulting `Command` uses argv-style argument passing only.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
