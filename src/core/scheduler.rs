//! # Refresh Scheduler
//!
//! Keeps the active view fresh. A tick fans out into independent tasks:
//!
//! ```text
//! tick(view)
//!   ├─► pipeline(view): fetch ─► parse ─► Action::Bind
//!   │                                  └─► one task per lookup key
//!   │                                        cache hit or getnodeinfo ─► Action::Enriched
//!   └─► (header on) getinfo ─► Action::Summary, walletbalance ─► Action::Summary
//! ```
//!
//! Ticks happen when the interval elapses, after a view switch and after a
//! mutating command. Nothing is cancelled: a result for a view that is no
//! longer active is still applied to that view's retained state.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::core::action::{Action, Summary, ViewId, ViewUpdate};
use crate::core::enrichment::EnrichmentCache;
use crate::errors::AppError;
use crate::lnd::LndClient;

/// One pipeline run: the records plus the keys still needing a label.
#[derive(Debug)]
pub struct Refresh {
    pub update: ViewUpdate,
    pub lookups: Vec<String>,
}

fn distinct<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<String> {
    keys.filter(|k| !k.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Fetch and parse the records behind `view`. The Logs view has nothing to fetch.
pub async fn run_pipeline(client: &LndClient, view: ViewId) -> Result<Option<Refresh>, AppError> {
    let refresh = match view {
        ViewId::Channels => {
            let channels = client.list_channels().await?;
            let lookups = distinct(channels.iter().map(|c| c.remote_pubkey.as_str()));
            Refresh {
                update: ViewUpdate::Channels(channels),
                lookups,
            }
        }
        ViewId::Peers => {
            let peers = client.list_peers().await?;
            let lookups = distinct(peers.iter().map(|p| p.pub_key.as_str()));
            Refresh {
                update: ViewUpdate::Peers(peers),
                lookups,
            }
        }
        ViewId::PendingChannels => {
            let channels = client.pending_channels().await?;
            let lookups = distinct(channels.iter().map(|c| c.remote_node_pub.as_str()));
            Refresh {
                update: ViewUpdate::PendingChannels(channels),
                lookups,
            }
        }
        ViewId::Invoices => Refresh {
            update: ViewUpdate::Invoices(client.list_invoices().await?),
            lookups: Vec::new(),
        },
        ViewId::Payments => Refresh {
            update: ViewUpdate::Payments(client.list_payments().await?),
            lookups: Vec::new(),
        },
        ViewId::Transactions => Refresh {
            update: ViewUpdate::Transactions(client.list_chain_txns().await?),
            lookups: Vec::new(),
        },
        ViewId::Logs => return Ok(None),
    };
    Ok(Some(refresh))
}

fn send(tx: &Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to send action: receiver dropped");
    }
}

pub struct RefreshScheduler {
    client: LndClient,
    cache: Arc<EnrichmentCache>,
    tx: Sender<Action>,
    interval: Duration,
    show_header: bool,
    last_tick: Option<Instant>,
}

impl RefreshScheduler {
    pub fn new(
        client: LndClient,
        cache: Arc<EnrichmentCache>,
        tx: Sender<Action>,
        interval: Duration,
        show_header: bool,
    ) -> Self {
        Self {
            client,
            cache,
            tx,
            interval,
            show_header,
            last_tick: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True before the first tick and whenever the interval has elapsed since the last.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_tick {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Start a refresh of `view` (and the header summaries) in the background.
    pub fn tick(&mut self, view: ViewId) {
        self.last_tick = Some(Instant::now());
        info!("Refreshing {}", view);

        let client = self.client.clone();
        let cache = self.cache.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match run_pipeline(&client, view).await {
                Ok(Some(refresh)) => {
                    debug!("{} refresh: {} records", view, refresh.update.len());
                    send(&tx, Action::Bind(refresh.update));
                    for key in refresh.lookups {
                        spawn_lookup(client.clone(), cache.clone(), tx.clone(), view, key);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("{} refresh failed: {}", view, e);
                    send(
                        &tx,
                        Action::RefreshFailed {
                            source: view.title().to_string(),
                            error: e.to_string(),
                        },
                    );
                }
            }
        });

        if self.show_header {
            self.spawn_summaries();
        }
    }

    fn spawn_summaries(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match client.get_info().await {
                Ok(info) => send(&tx, Action::Summary(Summary::Node(info))),
                Err(e) => send(
                    &tx,
                    Action::RefreshFailed {
                        source: "Node info".to_string(),
                        error: e.to_string(),
                    },
                ),
            }
        });

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match client.wallet_balance().await {
                Ok(balance) => send(&tx, Action::Summary(Summary::Wallet(balance))),
                Err(e) => send(
                    &tx,
                    Action::RefreshFailed {
                        source: "Wallet".to_string(),
                        error: e.to_string(),
                    },
                ),
            }
        });
    }
}

fn spawn_lookup(
    client: LndClient,
    cache: Arc<EnrichmentCache>,
    tx: Sender<Action>,
    view: ViewId,
    key: String,
) {
    tokio::spawn(async move {
        let result = cache.get_or_fetch(&key, || client.node_alias(&key)).await;
        match result {
            Ok(label) => send(&tx, Action::Enriched { view, key, label }),
            // Not cached, so the next tick retries it.
            Err(e) => warn!("Alias lookup for {} failed: {}", key, e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        FakeRunner, GETINFO_JSON, LISTCHANNELS_JSON, WALLETBALANCE_JSON, fake_client,
        nodeinfo_json, recv_actions,
    };
    use std::sync::mpsc;

    fn scheduler(runner: FakeRunner, show_header: bool) -> (RefreshScheduler, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        let scheduler = RefreshScheduler::new(
            fake_client(runner),
            Arc::new(EnrichmentCache::new()),
            tx,
            Duration::from_secs(60),
            show_header,
        );
        (scheduler, rx)
    }

    #[test]
    fn test_due_before_first_tick_then_after_interval() {
        let (tx, _rx) = mpsc::channel();
        let mut s = RefreshScheduler::new(
            fake_client(FakeRunner::new()),
            Arc::new(EnrichmentCache::new()),
            tx,
            Duration::from_secs(60),
            false,
        );
        let now = Instant::now();
        assert!(s.is_due(now));
        s.last_tick = Some(now);
        assert!(!s.is_due(now + Duration::from_secs(59)));
        assert!(s.is_due(now + Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_pipeline_collects_distinct_lookups() {
        let runner = FakeRunner::new();
        runner.respond(
            "listchannels",
            0,
            r#"{"channels":[{"remote_pubkey":"02b"},{"remote_pubkey":"02a"},{"remote_pubkey":"02b"}]}"#,
        );
        let refresh = run_pipeline(&fake_client(runner), ViewId::Channels)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(refresh.update.len(), 3);
        assert_eq!(refresh.lookups, vec!["02a", "02b"]);
    }

    #[tokio::test]
    async fn test_pending_pipeline_looks_up_remote_nodes() {
        let runner = FakeRunner::new();
        runner.respond(
            "pendingchannels",
            0,
            r#"{"pending_open_channels":[{"channel":{"remote_node_pub":"02a"}}],
                "waiting_close_channels":[{"channel":{"remote_node_pub":"02a"}}]}"#,
        );
        let refresh = run_pipeline(&fake_client(runner), ViewId::PendingChannels)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(&refresh.update, ViewUpdate::PendingChannels(c) if c.len() == 2));
        assert_eq!(refresh.lookups, vec!["02a"]);
    }

    #[tokio::test]
    async fn test_logs_view_has_no_pipeline() {
        let runner = FakeRunner::new();
        let result = run_pipeline(&fake_client(runner.clone()), ViewId::Logs).await;
        assert!(result.unwrap().is_none());
        assert!(runner.requests().is_empty());
    }

    #[tokio::test]
    async fn test_tick_binds_then_enriches() {
        let runner = FakeRunner::new();
        runner.respond("listchannels", 0, LISTCHANNELS_JSON);
        runner.respond("getnodeinfo", 0, &nodeinfo_json("ACINQ"));
        let (mut s, rx) = scheduler(runner.clone(), false);

        s.tick(ViewId::Channels);
        let actions = recv_actions(&rx, 3).await;
        assert!(matches!(&actions[0], Action::Bind(ViewUpdate::Channels(c)) if c.len() == 2));
        let enriched: Vec<_> = actions[1..]
            .iter()
            .filter_map(|a| match a {
                Action::Enriched { view, key, label } => Some((*view, key.clone(), label.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(enriched.len(), 2);
        assert!(enriched.iter().all(|(v, _, l)| *v == ViewId::Channels && l == "ACINQ"));
        assert_eq!(runner.count("getinfo"), 0);
    }

    #[tokio::test]
    async fn test_second_tick_uses_cached_aliases() {
        let runner = FakeRunner::new();
        runner.respond("listchannels", 0, LISTCHANNELS_JSON);
        runner.respond("getnodeinfo", 0, &nodeinfo_json("ACINQ"));
        let (mut s, rx) = scheduler(runner.clone(), false);

        s.tick(ViewId::Channels);
        recv_actions(&rx, 3).await;
        s.tick(ViewId::Channels);
        recv_actions(&rx, 3).await;
        assert_eq!(runner.count("listchannels"), 2);
        assert_eq!(runner.count("getnodeinfo"), 2);
    }

    #[tokio::test]
    async fn test_failed_pipeline_reports() {
        let runner = FakeRunner::new();
        runner.fail("listpeers", 1, "rpc error: unavailable");
        let (mut s, rx) = scheduler(runner, false);
        s.tick(ViewId::Peers);
        let actions = recv_actions(&rx, 1).await;
        match &actions[0] {
            Action::RefreshFailed { source, error } => {
                assert_eq!(source, "Peers");
                assert!(error.contains("unavailable"));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_header_summaries() {
        let runner = FakeRunner::new();
        runner.respond("getinfo", 0, GETINFO_JSON);
        runner.respond("walletbalance", 0, WALLETBALANCE_JSON);
        let (mut s, rx) = scheduler(runner, true);
        s.tick(ViewId::Logs);
        let actions = recv_actions(&rx, 2).await;
        assert!(actions.iter().any(|a| matches!(a, Action::Summary(Summary::Node(n)) if n.alias == "my-node")));
        assert!(actions.iter().any(
            |a| matches!(a, Action::Summary(Summary::Wallet(w)) if w.total_balance == 1_234_567)
        ));
    }
}
