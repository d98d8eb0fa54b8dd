//! # Command Gateway
//!
//! Every `lncli` invocation goes through one process-wide lock, so at most one
//! command runs at a time regardless of how many tasks want one:
//!
//! ```text
//!  refresh task ─┐
//!  alias lookup ─┼──► lock ──► lncli <global flags> <command> <args> ──► unlock
//!  form submit  ─┘
//! ```
//!
//! Interactive commands (`payinvoice`) hold the lock across the whole
//! conversation. The [`InteractiveSession`] owns the lock guard, so whichever
//! way the session ends (finished, failed, dropped) the lock is released.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use regex::Regex;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::{Instant, timeout_at};

use super::runner::{CommandRunner, InteractiveProcess, ProcessRequest};
use crate::errors::ProcessError;

pub const PROMPT_TIMEOUT: Duration = Duration::from_secs(10);
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct CommandGateway {
    lock: Arc<Mutex<()>>,
    runner: Arc<dyn CommandRunner>,
    program: String,
    global_args: Vec<String>,
}

impl CommandGateway {
    pub fn new(runner: Arc<dyn CommandRunner>, program: &str, global_args: Vec<String>) -> Self {
        Self {
            lock: Arc::new(Mutex::new(())),
            runner,
            program: program.to_string(),
            global_args,
        }
    }

    fn request(&self, command: &str, args: &[String]) -> ProcessRequest {
        let mut full = self.global_args.clone();
        full.push(command.to_string());
        full.extend(args.iter().cloned());
        ProcessRequest {
            program: self.program.clone(),
            args: full,
        }
    }

    /// Run `command` and return its stdout. Non-zero exit is an error carrying stderr.
    pub async fn execute(&self, command: &str, args: &[String]) -> Result<Vec<u8>, ProcessError> {
        let request = self.request(command, args);
        let _guard = self.lock.lock().await;
        debug!("Executing {} {:?}", command, args);
        let output = self.runner.run(request).await?;
        if output.exit_code != 0 {
            warn!("{} exited with status {}", command, output.exit_code);
            return Err(ProcessError::Exit {
                command: command.to_string(),
                code: output.exit_code,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }

    /// Start an interactive command and wait for its prompt.
    ///
    /// The returned session keeps the gateway locked until it is finished or dropped.
    pub async fn begin_interactive(
        &self,
        command: &str,
        args: &[String],
        prompt: &Regex,
        timeout: Duration,
    ) -> Result<InteractiveSession, ProcessError> {
        let request = self.request(command, args);
        let guard = self.lock.clone().lock_owned().await;
        info!("Starting interactive {}", command);
        let mut process = self.runner.spawn_interactive(request).await?;
        match expect(process.as_mut(), prompt, timeout).await {
            Ok(prompt) => Ok(InteractiveSession {
                process,
                prompt,
                _guard: guard,
            }),
            Err(e) => {
                process.kill();
                Err(e)
            }
        }
    }

    /// Run an interactive command answering its prompt with `confirmation`.
    pub async fn execute_interactive(
        &self,
        command: &str,
        args: &[String],
        prompt: &Regex,
        confirmation: &str,
        completion: &Regex,
    ) -> Result<String, ProcessError> {
        let session = self
            .begin_interactive(command, args, prompt, PROMPT_TIMEOUT)
            .await?;
        session
            .finish(Some(confirmation), completion, COMPLETION_TIMEOUT)
            .await
    }
}

/// A running interactive command waiting for the user's decision.
pub struct InteractiveSession {
    // Declared before the guard: the process is killed before the lock is released.
    process: Box<dyn InteractiveProcess>,
    prompt: String,
    _guard: OwnedMutexGuard<()>,
}

impl InteractiveSession {
    /// Everything the process printed up to and including the prompt.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Send the optional confirmation line, then wait for `completion`.
    pub async fn finish(
        mut self,
        confirmation: Option<&str>,
        completion: &Regex,
        timeout: Duration,
    ) -> Result<String, ProcessError> {
        if let Some(line) = confirmation {
            self.process.write_line(line).await?;
        }
        let result = expect(self.process.as_mut(), completion, timeout).await;
        self.process.kill();
        result
    }
}

impl Drop for InteractiveSession {
    fn drop(&mut self) {
        self.process.kill();
        debug!("Interactive session closed");
    }
}

impl fmt::Debug for InteractiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveSession")
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

/// Read output until `pattern` matches the accumulated text.
async fn expect(
    process: &mut dyn InteractiveProcess,
    pattern: &Regex,
    timeout: Duration,
) -> Result<String, ProcessError> {
    let deadline = Instant::now() + timeout;
    let mut seen = String::new();
    loop {
        let chunk = timeout_at(deadline, process.read_chunk())
            .await
            .map_err(|_| ProcessError::Timeout {
                pattern: pattern.as_str().to_string(),
                after: timeout,
            })??;
        match chunk {
            Some(chunk) => {
                seen.push_str(&chunk);
                if pattern.is_match(&seen) {
                    return Ok(seen);
                }
            }
            None => {
                return Err(ProcessError::Closed {
                    pattern: pattern.as_str().to_string(),
                    output: seen,
                });
            }
        }
    }
}
