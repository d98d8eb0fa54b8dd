//! Process execution behind a trait so the gateway can be driven by fakes in tests.

use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc;

use crate::errors::ProcessError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub program: String,
    pub args: Vec<String>,
}

impl ProcessRequest {
    /// The `lncli` subcommand, i.e. the first argument that isn't a global flag.
    pub fn command(&self) -> &str {
        self.args
            .iter()
            .find(|a| !a.starts_with("--"))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion and collect the output.
    async fn run(&self, request: ProcessRequest) -> Result<ProcessOutput, ProcessError>;

    /// Start a process whose output is read incrementally and which accepts input lines.
    async fn spawn_interactive(
        &self,
        request: ProcessRequest,
    ) -> Result<Box<dyn InteractiveProcess>, ProcessError>;
}

/// A running process. Dropping it kills the process.
#[async_trait]
pub trait InteractiveProcess: Send {
    /// Next piece of stdout or stderr; `None` once both are closed.
    async fn read_chunk(&mut self) -> Result<Option<String>, ProcessError>;

    async fn write_line(&mut self, line: &str) -> Result<(), ProcessError>;

    fn kill(&mut self);
}

/// Runs real processes with `tokio::process`.
#[derive(Debug, Default, Clone)]
pub struct TokioRunner;

#[async_trait]
impl CommandRunner for TokioRunner {
    async fn run(&self, request: ProcessRequest) -> Result<ProcessOutput, ProcessError> {
        let output = Command::new(&request.program)
            .args(&request.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessError::Spawn {
                program: request.program.clone(),
                source,
            })?;
        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    async fn spawn_interactive(
        &self,
        request: ProcessRequest,
    ) -> Result<Box<dyn InteractiveProcess>, ProcessError> {
        let mut child = Command::new(&request.program)
            .args(&request.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: request.program.clone(),
                source,
            })?;

        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            forward(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward(stderr, tx);
        }
        let stdin = child.stdin.take();
        debug!("Spawned interactive {} {:?}", request.program, request.args);
        Ok(Box::new(TokioProcess { child, stdin, rx }))
    }
}

fn forward<R>(mut reader: R, tx: mpsc::UnboundedSender<std::io::Result<String>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                    if tx.send(Ok(chunk)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        }
    });
}

struct TokioProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    rx: mpsc::UnboundedReceiver<std::io::Result<String>>,
}

#[async_trait]
impl InteractiveProcess for TokioProcess {
    async fn read_chunk(&mut self) -> Result<Option<String>, ProcessError> {
        match self.rx.recv().await {
            Some(chunk) => Ok(Some(chunk?)),
            None => Ok(None),
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<(), ProcessError> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            ProcessError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stdin already closed",
            ))
        })?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    fn kill(&mut self) {
        self.stdin = None;
        let _ = self.child.start_kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_skips_global_flags() {
        let request = ProcessRequest {
            program: "lncli".into(),
            args: vec![
                "--rpcserver=host:10009".into(),
                "--no-macaroons".into(),
                "getnodeinfo".into(),
                "02abc".into(),
            ],
        };
        assert_eq!(request.command(), "getnodeinfo");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let result = TokioRunner
            .run(ProcessRequest {
                program: "/nonexistent/lncli-for-tests".into(),
                args: vec![],
            })
            .await;
        assert!(matches!(result, Err(ProcessError::Spawn { .. })));
    }
}
