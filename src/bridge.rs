//! The command loop
//!
//! Reads one command per line, runs the requested daemon operations and writes
//! results for the editor plugin. Every line is handled independently: nothing
//! read or captured for one line is visible to the next.
//!
//! Where output goes:
//!
//! | Operation | stdout | stderr |
//! |-----------|--------|--------|
//! | every line | | `MYPY [tokens] HH:MM:SS.ffffff` |
//! | `run` | check output, `# done!` | |
//! | `run` with `inspect` | | check output |
//! | `suggest` | suggestion JSON, `# done!` | |
//! | `inspect` | trimmed result | `MYPY result: <result>` |
//! | failed `inspect` | blank line | `MYPY result: ...`, `MYPY <kind>: <message>` |
//!
//! The client's own stderr is always forwarded to stderr.

use chrono::Local;
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::daemon::{DaemonClient, DaemonOutput, Request};
use crate::diagnostics::{self, Summary};
use crate::error::{BridgeError, DaemonFailure};
use crate::protocol::{Command, DONE_MARKER, Opcode};

/// Drives a [`DaemonClient`] from a line-oriented command stream.
#[derive(Debug)]
pub struct Bridge<C> {
    client: C,
}

impl<C: DaemonClient> Bridge<C> {
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Handle lines from `input` until it is exhausted.
    ///
    /// Returns `Ok(())` at end of input. Any error is fatal to the loop:
    /// stream I/O failures and daemon failures in operations whose policy
    /// does not allow recovery.
    pub fn serve<R, O, E>(&self, mut input: R, out: &mut O, err: &mut E) -> Result<(), BridgeError>
    where
        R: BufRead,
        O: Write,
        E: Write,
    {
        let mut buf = Vec::new();
        let mut handled: u64 = 0;
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                info!(lines = handled, "Input closed, stopping");
                return Ok(());
            }
            let line = String::from_utf8_lossy(&buf);
            self.handle_line(&line, out, err)?;
            handled += 1;
        }
    }

    /// Handle one input line, flushing both streams afterwards.
    pub fn handle_line<O, E>(&self, line: &str, out: &mut O, err: &mut E) -> Result<(), BridgeError>
    where
        O: Write,
        E: Write,
    {
        let command = Command::parse(line);
        writeln!(
            err,
            "MYPY {} {}",
            command.echo(),
            Local::now().format("%H:%M:%S%.6f")
        )?;

        let inspecting = command.has(Opcode::Inspect);
        for opcode in command.opcodes() {
            let result = match opcode {
                Opcode::Run => self.check(inspecting, out, err),
                Opcode::Suggest => self.suggest(command.argument(), out, err),
                Opcode::Inspect => self.inspect(command.argument(), out, err),
            };
            match result {
                Ok(()) => {}
                Err(BridgeError::Daemon(failure)) if opcode.recoverable() => {
                    self.recover(&failure, out, err)?;
                }
                Err(e) => {
                    // Leave whatever was written visible to the plugin
                    out.flush()?;
                    err.flush()?;
                    return Err(e);
                }
            }
        }

        out.flush()?;
        err.flush()?;
        Ok(())
    }

    fn check(&self, inspecting: bool, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), BridgeError> {
        let output = self.call(&Request::Check, "", err)?;

        let sink: &mut dyn Write = if inspecting { &mut *err } else { &mut *out };
        sink.write_all(output.stdout.as_bytes())?;

        let summary = Summary::of(&diagnostics::parse_output(&output.stdout));
        info!(
            errors = summary.errors,
            warnings = summary.warnings,
            notes = summary.notes,
            baselined = summary.baselined,
            "Check finished"
        );

        settle(&output, Opcode::Run)?;
        if !inspecting {
            writeln!(out, "{DONE_MARKER}")?;
        }
        Ok(())
    }

    fn suggest(&self, symbol: &str, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), BridgeError> {
        let output = self.call(&Request::Suggest { symbol }, symbol, err)?;
        out.write_all(output.stdout.as_bytes())?;
        settle(&output, Opcode::Suggest)?;

        match serde_json::from_str::<serde_json::Value>(output.stdout.trim()) {
            Ok(serde_json::Value::Array(items)) => {
                debug!(symbol = %symbol, suggestions = items.len(), "Suggestion received");
            }
            Ok(_) => debug!(symbol = %symbol, "Suggestion received"),
            Err(e) => warn!(symbol = %symbol, error = %e, "Suggestion output is not JSON"),
        }

        writeln!(out, "{DONE_MARKER}")?;
        Ok(())
    }

    fn inspect(&self, location: &str, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), BridgeError> {
        let output = self.call(&Request::Inspect { location }, location, err)?;
        if let Err(error) = output.check_status(Opcode::Inspect) {
            return Err(DaemonFailure::new(output.stdout, error).into());
        }

        let result = output.stdout.trim();
        writeln!(out, "{result}")?;
        writeln!(err, "MYPY result: {result}")?;
        Ok(())
    }

    /// Report a failure that the opcode's policy allows the loop to survive.
    fn recover<O, E>(&self, failure: &DaemonFailure, out: &mut O, err: &mut E) -> Result<(), BridgeError>
    where
        O: Write,
        E: Write,
    {
        warn!(kind = failure.kind(), error = %failure.error, "Recovered from daemon failure");
        writeln!(out)?;
        writeln!(err, "MYPY result: {}", failure.captured.trim())?;
        writeln!(err, "MYPY {}: {}", failure.kind(), failure.error)?;
        Ok(())
    }

    /// Invoke the client and forward its stderr. The exit status is not judged here.
    fn call(&self, request: &Request<'_>, argument: &str, err: &mut dyn Write) -> Result<DaemonOutput, BridgeError> {
        let opcode = request.opcode();
        let started = Instant::now();
        let output = self.client.invoke(request)?;
        err.write_all(output.stderr.as_bytes())?;

        info!(
            opcode = %opcode,
            argument = %argument,
            exit_code = ?output.exit_code,
            duration_ms = %started.elapsed().as_millis(),
            "Daemon call completed"
        );
        Ok(output)
    }
}

/// Exit status check for operations whose stdout was already written out.
fn settle(output: &DaemonOutput, opcode: Opcode) -> Result<(), DaemonFailure> {
    output
        .check_status(opcode)
        .map_err(|error| DaemonFailure::new(String::new(), error))
}
