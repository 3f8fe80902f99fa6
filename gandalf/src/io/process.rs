//! Running a child process with piped stdin, a timeout, and bounded output.

use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

/// Captured output of a child that exited on its own.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
}

/// How a supervised child settled. Decided exactly once per run.
#[derive(Debug)]
pub enum Settlement {
    Exited(CommandOutput),
    /// The timer fired first; the child was killed and its output discarded.
    TimedOut,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("spawn command")]
    Spawn(#[source] io::Error),
    #[error("{context}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    fn io(context: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| ProcessError::Io { context, source }
    }
}

/// Run `cmd`, feed it `stdin`, and wait at most `timeout` from launch.
///
/// Stdin is written and stdout/stderr are drained on helper threads so a chatty
/// child can never deadlock against a large prompt. `output_limit_bytes` bounds
/// what is kept of each stream; the rest is drained and counted.
#[instrument(skip_all, fields(timeout_ms = timeout.as_millis() as u64, output_limit_bytes = output_limit_bytes))]
pub fn run_command_with_timeout(
    mut cmd: Command,
    stdin: Vec<u8>,
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<Settlement, ProcessError> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(ProcessError::Spawn(e));
        }
    };

    let stdout = child.stdout.take().ok_or_else(|| not_piped("stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| not_piped("stderr"))?;
    let mut child_stdin = child.stdin.take().ok_or_else(|| not_piped("stdin"))?;

    let stdout_handle = thread::spawn(move || read_stream_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, output_limit_bytes));
    // Dropping the handle at the end of the closure closes the pipe.
    let stdin_handle = thread::spawn(move || child_stdin.write_all(&stdin));

    let status = match child
        .wait_timeout(timeout)
        .map_err(ProcessError::io("wait for command"))?
    {
        Some(status) => status,
        None => {
            warn!(
                timeout_ms = timeout.as_millis() as u64,
                "command timed out, killing"
            );
            child.kill().map_err(ProcessError::io("kill command"))?;
            child
                .wait()
                .map_err(ProcessError::io("wait command after kill"))?;
            // Helper threads finish once the pipes close; anything they still
            // collect belongs to a settled run and is dropped unread.
            return Ok(Settlement::TimedOut);
        }
    };

    match join(stdin_handle, "stdin writer")? {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("child closed stdin before reading all input");
        }
        Err(e) => return Err(ProcessError::io("write stdin")(e)),
    }
    let (stdout, stdout_truncated) =
        join(stdout_handle, "stdout reader")?.map_err(ProcessError::io("read stdout"))?;
    let (stderr, stderr_truncated) =
        join(stderr_handle, "stderr reader")?.map_err(ProcessError::io("read stderr"))?;

    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    debug!(exit_code = ?status.code(), "command finished");
    Ok(Settlement::Exited(CommandOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
    }))
}

fn not_piped(stream: &str) -> ProcessError {
    ProcessError::Io {
        context: "configure pipes",
        source: io::Error::other(format!("{stream} was not piped")),
    }
}

fn join<T>(handle: thread::JoinHandle<T>, name: &'static str) -> Result<T, ProcessError> {
    handle.join().map_err(|_| ProcessError::Io {
        context: name,
        source: io::Error::other("helper thread panicked"),
    })
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> io::Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            let keep = n.min(remaining);
            buf.extend_from_slice(&chunk[..keep]);
            truncated += n.saturating_sub(keep);
        } else {
            truncated += n;
        }
    }

    Ok((buf, truncated))
}
