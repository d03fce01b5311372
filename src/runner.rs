//! Running `go test` and draining its event stream
//!
//! The child process is spawned with its stdout redirected into a pipe; a
//! consumer thread owns the read end and the colorizer state, so the two run
//! concurrently for the duration of the pass. Process exit closes the write
//! end of the pipe, which the consumer observes as end-of-stream; the driver
//! then joins the consumer exactly once, so its terminal error is always
//! observed before the outcome is reported.

use crate::colorize::Colorizer;
use crate::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::io::{self, BufReader, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

/// Outcome of one colorized test run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Exit code of the underlying test runner, mirrored verbatim.
    pub exit_code: i32,
    /// Terminal error of the colorization pass, if it had one. Reported as
    /// a secondary diagnostic; it never overrides a non-zero exit code.
    pub engine_error: Option<Error>,
}

/// Builder/executor for one `go test` invocation.
#[derive(Debug)]
pub struct GoTestCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl GoTestCommand {
    /// Create a command that runs `go test` with the given extra arguments.
    pub fn new(args: Vec<OsString>) -> Self {
        Self::with_program("go", args)
    }

    /// Override the runner executable (used to stub the runner in tests).
    pub fn with_program(program: impl Into<OsString>, args: Vec<OsString>) -> Self {
        GoTestCommand {
            program: program.into(),
            args,
        }
    }

    /// True when the caller explicitly asked for the raw JSON stream, in
    /// which case the colorization engine is bypassed entirely.
    pub fn wants_raw_json(&self) -> bool {
        self.args.iter().any(|arg| arg == OsStr::new("-json"))
    }

    fn build(&self, inject_json: bool) -> Command {
        let mut command = Command::new(&self.program);
        command.arg("test");
        if inject_json {
            command.arg("-json");
        }
        command.args(&self.args);
        command
    }

    /// Delegate to the runner with inherited stdio.
    pub fn run_passthrough(&self) -> Result<i32> {
        let status = self
            .build(false)
            .status()
            .map_err(|e| spawn_error(&self.program, e))?;
        Ok(exit_code(status))
    }

    /// Run the test process and drain its JSON event stream through
    /// `colorizer` into `out` concurrently, returning once the process has
    /// exited and the consumer has fully drained the pipe. Child stderr is
    /// inherited and streams through untouched.
    pub fn run_colorized<W>(&self, mut colorizer: Colorizer, mut out: W) -> Result<RunOutcome>
    where
        W: Write + Send + 'static,
    {
        let mut child = self
            .build(true)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| spawn_error(&self.program, e))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            Error::CommandExecution("runner stdout was not captured".to_string())
        })?;

        let consumer = thread::spawn(move || colorizer.process(BufReader::new(stdout), &mut out));

        let status = child.wait().map_err(|e| {
            Error::CommandExecution(format!("Failed to wait for test runner: {}", e))
        })?;

        // The child's exit closed the pipe; the consumer drains whatever is
        // still buffered and returns. Join it before reporting the outcome
        // so its error is never lost.
        let engine_error = match consumer.join() {
            Ok(result) => result.err(),
            Err(_) => Some(Error::CommandExecution(
                "colorizer thread panicked".to_string(),
            )),
        };

        Ok(RunOutcome {
            exit_code: exit_code(status),
            engine_error,
        })
    }
}

fn spawn_error(program: &OsStr, err: io::Error) -> Error {
    Error::CommandExecution(format!(
        "Failed to execute {}: {}",
        program.to_string_lossy(),
        err
    ))
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
