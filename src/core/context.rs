//! Handles shared by everything that starts background work.

use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use log::{info, warn};

use crate::core::action::Action;
use crate::core::enrichment::EnrichmentCache;
use crate::errors::AppError;
use crate::lnd::LndClient;

#[derive(Clone)]
pub struct AppContext {
    pub client: LndClient,
    pub cache: Arc<EnrichmentCache>,
    tx: Sender<Action>,
}

impl AppContext {
    pub fn new(client: LndClient, cache: Arc<EnrichmentCache>, tx: Sender<Action>) -> Self {
        Self { client, cache, tx }
    }

    pub fn sender(&self) -> Sender<Action> {
        self.tx.clone()
    }

    /// Run `task` on the runtime and deliver its action to the main loop.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let action = task.await;
            if tx.send(action).is_err() {
                warn!("Failed to send command result: receiver dropped");
            }
        });
    }

    /// Run a mutating command. Success shows its message and refreshes the view.
    pub fn run_command<F, Fut>(&self, title: &str, command: F)
    where
        F: FnOnce(LndClient) -> Fut,
        Fut: Future<Output = Result<String, AppError>> + Send + 'static,
    {
        let title = title.to_string();
        info!("Running command: {}", title);
        let pending = command(self.client.clone());
        self.spawn(async move {
            match pending.await {
                Ok(message) => Action::CommandDone {
                    title,
                    message,
                    refresh: true,
                },
                Err(e) => {
                    warn!("{} failed: {}", title, e);
                    Action::CommandFailed {
                        title,
                        error: e.to_string(),
                    }
                }
            }
        });
    }
}
