use crate::error::RunnerError;
use std::process::{Output, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use super::{CommandSpec, ProcessOutput, ProcessRunner};

/// How long to wait for the killed client to be reaped before detaching the waiter
const KILL_GRACE: Duration = Duration::from_secs(2);

// ============================================================================
// NativeRunner - spawn the client directly with std::process
// ============================================================================

/// Native process runner using `std::process::Command`.
///
/// The child gets a null stdin (the bridge's own stdin carries the editor
/// protocol and must not be consumed by the client) and piped stdout/stderr.
///
/// Without a timeout the runner simply waits. With one, the wait happens on a
/// helper thread and the child is killed once the deadline passes.
///
/// On Unix the child leads its own process group and the whole group is
/// killed, so wrappers such as `uv run dmypy` do not leave the real client
/// behind. A descendant that escaped the group can still hold the output
/// pipes open; the waiter is then detached after [`KILL_GRACE`] so the
/// timeout is honoured regardless.
///
/// # Example
///
/// ```rust,no_run
/// use dmypy_bridge_runner::{CommandSpec, NativeRunner, ProcessRunner};
///
/// let cmd = CommandSpec::new("dmypy").arg("status");
/// let output = NativeRunner::new().run(&cmd, None).unwrap();
/// println!("{}", output.stdout_string());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for NativeRunner {
    fn run(
        &self,
        cmd: &CommandSpec,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, RunnerError> {
        let mut command = cmd.to_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
            program: cmd.program_display(),
            reason: e.to_string(),
        })?;

        let Some(timeout) = timeout else {
            let output = child
                .wait_with_output()
                .map_err(|e| RunnerError::WaitFailed {
                    program: cmd.program_display(),
                    reason: e.to_string(),
                })?;
            return Ok(into_process_output(output));
        };

        let (tx, rx) = mpsc::channel();
        let child_id = child.id();

        let handle = thread::spawn(move || {
            let output = child.wait_with_output();
            let _ = tx.send(output);
        });

        match rx.recv_timeout(timeout) {
            Ok(output_result) => {
                let _ = handle.join();
                let output = output_result.map_err(|e| RunnerError::WaitFailed {
                    program: cmd.program_display(),
                    reason: e.to_string(),
                })?;
                Ok(into_process_output(output))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Self::terminate_process(child_id);
                // Reap the killed child unless something else keeps the pipes open
                if rx.recv_timeout(KILL_GRACE).is_ok() {
                    let _ = handle.join();
                }
                Err(RunnerError::Timeout {
                    timeout_seconds: timeout.as_secs(),
                })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(RunnerError::WaitFailed {
                program: cmd.program_display(),
                reason: "process monitoring thread terminated unexpectedly".to_string(),
            }),
        }
    }
}

impl NativeRunner {
    /// Terminate a process by its PID.
    ///
    /// On Unix, sends SIGKILL to the process group the child leads.
    /// On Windows, uses TerminateProcess.
    fn terminate_process(pid: u32) {
        #[cfg(unix)]
        {
            // SAFETY: killpg(2) on the group created for a child we have not reaped.
            unsafe {
                libc::killpg(pid as libc::pid_t, libc::SIGKILL);
            }
        }

        #[cfg(windows)]
        {
            use windows::Win32::Foundation::CloseHandle;
            use windows::Win32::System::Threading::{
                OpenProcess, PROCESS_TERMINATE, TerminateProcess,
            };

            // SAFETY: the handle is opened for this pid only and closed before returning.
            unsafe {
                if let Ok(handle) = OpenProcess(PROCESS_TERMINATE, false, pid) {
                    let _ = TerminateProcess(handle, 1);
                    let _ = CloseHandle(handle);
                }
            }
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = pid;
        }
    }
}

fn into_process_output(output: Output) -> ProcessOutput {
    ProcessOutput::new(output.stdout, output.stderr, output.status.code())
}
