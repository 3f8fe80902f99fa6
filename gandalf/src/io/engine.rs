//! Inference engine abstraction.
//!
//! The [`InferenceEngine`] trait decouples the review pipeline from the actual
//! model backend (by default `ollama run <model>`). Tests use scripted engines
//! that return canned output without spawning processes.

use std::io;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::error::ReviewError;
use crate::io::config::EngineConfig;
use crate::io::process::{ProcessError, Settlement, run_command_with_timeout};

/// Abstraction over inference backends.
pub trait InferenceEngine {
    /// Send `prompt` to the model and return its raw text response.
    fn infer(&self, prompt: &str) -> Result<String, ReviewError>;
}

/// Engine that runs a local executable, passing the prompt on stdin.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl CommandEngine {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        timeout: Duration,
        output_limit_bytes: usize,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            output_limit_bytes,
        }
    }

    /// Build from config: `command[0]` is the program, then `command[1..]`, then the model.
    pub fn from_config(config: &EngineConfig) -> Self {
        let (program, rest) = config
            .command
            .split_first()
            .map(|(program, rest)| (program.clone(), rest.to_vec()))
            .unwrap_or_default();
        let mut args = rest;
        args.push(config.model.clone());
        Self::new(
            program,
            args,
            Duration::from_millis(config.timeout_ms),
            config.output_limit_bytes,
        )
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl InferenceEngine for CommandEngine {
    #[instrument(skip_all, fields(program = %self.program, timeout_ms = self.timeout.as_millis() as u64))]
    fn infer(&self, prompt: &str) -> Result<String, ReviewError> {
        info!(prompt_bytes = prompt.len(), "starting inference");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        let settlement = run_command_with_timeout(
            cmd,
            prompt.as_bytes().to_vec(),
            self.timeout,
            self.output_limit_bytes,
        )
        .map_err(|err| self.classify(err))?;

        let output = match settlement {
            Settlement::Exited(output) => output,
            Settlement::TimedOut => {
                warn!("inference timed out");
                return Err(ReviewError::Timeout {
                    timeout: self.timeout,
                });
            }
        };

        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "inference engine failed");
            return Err(ReviewError::EngineFailure {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(response_bytes = text.len(), "inference completed");
        Ok(text)
    }
}

impl CommandEngine {
    fn classify(&self, err: ProcessError) -> ReviewError {
        let program = self.program.clone();
        match err {
            ProcessError::Spawn(source)
                if matches!(
                    source.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
                ) =>
            {
                ReviewError::ToolUnavailable { program, source }
            }
            ProcessError::Spawn(source) => ReviewError::Spawn {
                program,
                context: "spawn command",
                source,
            },
            ProcessError::Io { context, source } => ReviewError::Spawn {
                program,
                context,
                source,
            },
        }
    }
}
