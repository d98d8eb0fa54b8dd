//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ProcessError;
use crate::lnd::{
    CommandGateway, CommandRunner, InteractiveProcess, LndClient, ProcessOutput, ProcessRequest,
};

/// A scripted stand-in for `lncli`.
///
/// Responses are queued per subcommand; the last one queued for a command keeps
/// answering once the earlier ones are used up.
#[derive(Clone, Default)]
pub struct FakeRunner {
    responses: Arc<Mutex<HashMap<String, VecDeque<ProcessOutput>>>>,
    interactive: Arc<Mutex<VecDeque<FakeInteractive>>>,
    requests: Arc<Mutex<Vec<ProcessRequest>>>,
    delay: Duration,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `run` sleeps this long while counted as active.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn push(&self, command: &str, output: ProcessOutput) {
        self.responses
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(output);
    }

    pub fn respond(&self, command: &str, exit_code: i32, stdout: &str) {
        self.push(
            command,
            ProcessOutput {
                exit_code,
                stdout: stdout.as_bytes().to_vec(),
                stderr: String::new(),
            },
        );
    }

    pub fn fail(&self, command: &str, exit_code: i32, stderr: &str) {
        self.push(
            command,
            ProcessOutput {
                exit_code,
                stdout: Vec::new(),
                stderr: stderr.to_string(),
            },
        );
    }

    pub fn interactive(&self, process: FakeInteractive) {
        self.interactive.lock().unwrap().push_back(process);
    }

    pub fn requests(&self) -> Vec<ProcessRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose subcommand is `command`.
    pub fn count(&self, command: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.command() == command)
            .count()
    }

    /// Highest number of `run` calls that were in flight at once.
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn next_output(&self, command: &str) -> ProcessOutput {
        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(command) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => ProcessOutput {
                exit_code: 1,
                stdout: Vec::new(),
                stderr: format!("no fake response for {command}"),
            },
        }
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, request: ProcessRequest) -> Result<ProcessOutput, ProcessError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        let command = request.command().to_string();
        self.requests.lock().unwrap().push(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let output = self.next_output(&command);
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(output)
    }

    async fn spawn_interactive(
        &self,
        request: ProcessRequest,
    ) -> Result<Box<dyn InteractiveProcess>, ProcessError> {
        let program = request.program.clone();
        self.requests.lock().unwrap().push(request);
        match self.interactive.lock().unwrap().pop_front() {
            Some(process) => Ok(Box::new(process)),
            None => Err(ProcessError::Spawn {
                program,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no fake process"),
            }),
        }
    }
}

/// A scripted interactive process: yields its chunks, then EOF (or hangs).
pub struct FakeInteractive {
    chunks: VecDeque<String>,
    written: Arc<Mutex<Vec<String>>>,
    killed: Arc<Mutex<bool>>,
    hanging: bool,
}

impl FakeInteractive {
    pub fn new(chunks: Vec<String>) -> Self {
        Self {
            chunks: chunks.into(),
            written: Arc::default(),
            killed: Arc::default(),
            hanging: false,
        }
    }

    /// Never reach EOF once the chunks are used up.
    pub fn hanging(mut self) -> Self {
        self.hanging = true;
        self
    }

    pub fn written(&self) -> Arc<Mutex<Vec<String>>> {
        self.written.clone()
    }

    pub fn killed(&self) -> Arc<Mutex<bool>> {
        self.killed.clone()
    }
}

#[async_trait]
impl InteractiveProcess for FakeInteractive {
    async fn read_chunk(&mut self) -> Result<Option<String>, ProcessError> {
        if let Some(chunk) = self.chunks.pop_front() {
            return Ok(Some(chunk));
        }
        if self.hanging {
            std::future::pending::<()>().await;
        }
        Ok(None)
    }

    async fn write_line(&mut self, line: &str) -> Result<(), ProcessError> {
        self.written.lock().unwrap().push(line.to_string());
        Ok(())
    }

    fn kill(&mut self) {
        *self.killed.lock().unwrap() = true;
    }
}

pub fn fake_gateway(runner: FakeRunner) -> CommandGateway {
    CommandGateway::new(Arc::new(runner), "lncli", Vec::new())
}

pub fn fake_client(runner: FakeRunner) -> LndClient {
    LndClient::new(fake_gateway(runner))
}

pub const GETINFO_JSON: &str = r#"{
    "identity_pubkey": "02aa",
    "alias": "my-node",
    "version": "0.17.0-beta",
    "num_pending_channels": 1,
    "num_active_channels": 2,
    "num_inactive_channels": 0,
    "num_peers": 3,
    "block_height": 800000,
    "synced_to_chain": true,
    "testnet": false,
    "chains": [{"chain": "bitcoin", "network": "mainnet"}]
}"#;

pub const WALLETBALANCE_JSON: &str =
    r#"{"total_balance": "1234567", "confirmed_balance": "1200000", "unconfirmed_balance": "34567"}"#;

pub const LISTCHANNELS_JSON: &str = r#"{"channels": [
    {"active": true, "remote_pubkey": "02bb", "channel_point": "aa:0", "capacity": "1000000",
     "local_balance": "600000", "remote_balance": "390000"},
    {"active": false, "remote_pubkey": "03cc", "channel_point": "bb:1", "capacity": "50000",
     "local_balance": "0", "remote_balance": "49000"}
]}"#;

pub const LISTPEERS_JSON: &str = r#"{"peers": [
    {"pub_key": "02bb", "address": "10.0.0.2:9735", "bytes_sent": "100", "bytes_recv": "200",
     "inbound": false, "ping_time": "1500"}
]}"#;

pub fn nodeinfo_json(alias: &str) -> String {
    format!(r#"{{"node": {{"pub_key": "x", "alias": "{alias}"}}, "num_channels": 1}}"#)
}

/// Wait (up to two seconds) for `n` actions from background tasks.
pub async fn recv_actions(rx: &std::sync::mpsc::Receiver<crate::core::action::Action>, n: usize) -> Vec<crate::core::action::Action> {
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    let mut actions = Vec::new();
    while actions.len() < n && std::time::Instant::now() < deadline {
        match rx.try_recv() {
            Ok(action) => actions.push(action),
            Err(_) => tokio::time::sleep(Duration::from_millis(5)).await,
        }
    }
    assert_eq!(actions.len(), n, "expected {n} actions, got {actions:?}");
    actions
}
