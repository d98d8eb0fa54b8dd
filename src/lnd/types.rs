//! Records parsed from `lncli` JSON output.
//!
//! `lncli` prints protobuf JSON: 64-bit integers arrive as strings, 32-bit
//! ones as numbers, and fields may be missing on older `lnd` versions. Every
//! field therefore has a default and integer fields accept either encoding.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::record::{Accessors, Record, Value};

pub mod de {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Float(f64),
        Text(String),
    }

    /// An integer encoded either as a JSON number or a JSON string.
    pub fn int_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match IntOrString::deserialize(deserializer)? {
            IntOrString::Int(i) => Ok(i),
            IntOrString::Float(f) => Ok(f as i64),
            IntOrString::Text(s) if s.trim().is_empty() => Ok(0),
            IntOrString::Text(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

// ============================================================================
// Channels
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Channel {
    pub active: bool,
    pub private: bool,
    pub remote_pubkey: String,
    pub channel_point: String,
    pub chan_id: String,
    #[serde(deserialize_with = "de::int_or_string")]
    pub capacity: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub local_balance: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub remote_balance: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub commit_fee: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub commit_weight: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub fee_per_kw: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub unsettled_balance: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub total_satoshis_sent: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub total_satoshis_received: i64,
    /// Filled in by alias enrichment.
    #[serde(skip)]
    pub node_alias: String,
}

impl Record for Channel {
    fn accessors() -> &'static Accessors<Self> {
        static TABLE: OnceLock<Accessors<Channel>> = OnceLock::new();
        TABLE.get_or_init(|| {
            Accessors::<Self>::new()
                .property("active", |c| Value::Bool(c.active))
                .property("private", |c| Value::Bool(c.private))
                .property("remote_pubkey", |c| text(&c.remote_pubkey))
                .property("channel_point", |c| text(&c.channel_point))
                .property("chan_id", |c| text(&c.chan_id))
                .property("capacity", |c| Value::Int(c.capacity))
                .property("local_balance", |c| Value::Int(c.local_balance))
                .property("remote_balance", |c| Value::Int(c.remote_balance))
                .property("commit_fee", |c| Value::Int(c.commit_fee))
                .property("commit_weight", |c| Value::Int(c.commit_weight))
                .property("fee_per_kw", |c| Value::Int(c.fee_per_kw))
                .property("unsettled_balance", |c| Value::Int(c.unsettled_balance))
                .property("total_satoshis_sent", |c| Value::Int(c.total_satoshis_sent))
                .property("total_satoshis_received", |c| {
                    Value::Int(c.total_satoshis_received)
                })
                .property("node_alias", |c| text(&c.node_alias))
                // Alias once resolved, pubkey until then.
                .derived("node", |c| {
                    if c.node_alias.is_empty() {
                        text(&c.remote_pubkey)
                    } else {
                        text(&c.node_alias)
                    }
                })
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListChannels {
    pub channels: Vec<Channel>,
}

// ============================================================================
// Pending channels
// ============================================================================

/// Which `pendingchannels` list a channel came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PendingKind {
    #[default]
    Open,
    Closing,
    ForceClosing,
    WaitingClose,
}

impl PendingKind {
    /// One-letter code shown in the grid.
    pub fn code(self) -> &'static str {
        match self {
            PendingKind::Open => "O",
            PendingKind::Closing => "C",
            PendingKind::ForceClosing => "F",
            PendingKind::WaitingClose => "W",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PendingKind::Open => "Pending open channel",
            PendingKind::Closing => "Pending closing channel",
            PendingKind::ForceClosing => "Pending force closing channel",
            PendingKind::WaitingClose => "Waiting close channel",
        }
    }
}

/// The `channel` object shared by every pending list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PendingChannelBase {
    pub remote_node_pub: String,
    pub channel_point: String,
    #[serde(deserialize_with = "de::int_or_string")]
    pub capacity: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub local_balance: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub remote_balance: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PendingOpenChannel {
    pub channel: PendingChannelBase,
    #[serde(deserialize_with = "de::int_or_string")]
    pub confirmation_height: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub commit_fee: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub commit_weight: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub fee_per_kw: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClosedChannel {
    pub channel: PendingChannelBase,
    pub closing_txid: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForceClosedChannel {
    pub channel: PendingChannelBase,
    pub closing_txid: String,
    #[serde(deserialize_with = "de::int_or_string")]
    pub limbo_balance: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub maturity_height: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub blocks_til_maturity: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub recovered_balance: i64,
    pub pending_htlcs: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WaitingCloseChannel {
    pub channel: PendingChannelBase,
    #[serde(deserialize_with = "de::int_or_string")]
    pub limbo_balance: i64,
}

/// `lncli pendingchannels` output.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PendingChannels {
    #[serde(deserialize_with = "de::int_or_string")]
    pub total_limbo_balance: i64,
    pub pending_open_channels: Vec<PendingOpenChannel>,
    pub pending_closing_channels: Vec<ClosedChannel>,
    pub pending_force_closing_channels: Vec<ForceClosedChannel>,
    pub waiting_close_channels: Vec<WaitingCloseChannel>,
}

/// One row of the pending channels grid, whichever list it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingChannel {
    pub kind: PendingKind,
    pub remote_node_pub: String,
    pub channel_point: String,
    pub capacity: i64,
    pub local_balance: i64,
    pub remote_balance: i64,
    pub closing_txid: String,
    pub limbo_balance: i64,
    pub recovered_balance: i64,
    pub maturity_height: i64,
    pub blocks_til_maturity: i64,
    pub pending_htlcs: usize,
    pub confirmation_height: i64,
    pub commit_fee: i64,
    pub commit_weight: i64,
    pub fee_per_kw: i64,
    /// Filled in by alias enrichment.
    pub node_alias: String,
}

impl PendingChannel {
    fn from_base(kind: PendingKind, base: PendingChannelBase) -> Self {
        Self {
            kind,
            remote_node_pub: base.remote_node_pub,
            channel_point: base.channel_point,
            capacity: base.capacity,
            local_balance: base.local_balance,
            remote_balance: base.remote_balance,
            ..Default::default()
        }
    }
}

impl PendingChannels {
    /// Flatten the four lists: closing, force closing, open, then waiting close.
    pub fn into_channels(self) -> Vec<PendingChannel> {
        let closing = self.pending_closing_channels.into_iter().map(|c| PendingChannel {
            closing_txid: c.closing_txid,
            ..PendingChannel::from_base(PendingKind::Closing, c.channel)
        });
        let force_closing = self
            .pending_force_closing_channels
            .into_iter()
            .map(|c| PendingChannel {
                closing_txid: c.closing_txid,
                limbo_balance: c.limbo_balance,
                recovered_balance: c.recovered_balance,
                maturity_height: c.maturity_height,
                blocks_til_maturity: c.blocks_til_maturity,
                pending_htlcs: c.pending_htlcs.len(),
                ..PendingChannel::from_base(PendingKind::ForceClosing, c.channel)
            });
        let open = self.pending_open_channels.into_iter().map(|c| PendingChannel {
            confirmation_height: c.confirmation_height,
            commit_fee: c.commit_fee,
            commit_weight: c.commit_weight,
            fee_per_kw: c.fee_per_kw,
            ..PendingChannel::from_base(PendingKind::Open, c.channel)
        });
        let waiting = self.waiting_close_channels.into_iter().map(|c| PendingChannel {
            limbo_balance: c.limbo_balance,
            ..PendingChannel::from_base(PendingKind::WaitingClose, c.channel)
        });
        closing.chain(force_closing).chain(open).chain(waiting).collect()
    }
}

impl Record for PendingChannel {
    fn accessors() -> &'static Accessors<Self> {
        static TABLE: OnceLock<Accessors<PendingChannel>> = OnceLock::new();
        TABLE.get_or_init(|| {
            Accessors::<Self>::new()
                .property("remote_node_pub", |c| text(&c.remote_node_pub))
                .property("channel_point", |c| text(&c.channel_point))
                .property("capacity", |c| Value::Int(c.capacity))
                .property("local_balance", |c| Value::Int(c.local_balance))
                .property("remote_balance", |c| Value::Int(c.remote_balance))
                .property("closing_txid", |c| text(&c.closing_txid))
                .property("limbo_balance", |c| Value::Int(c.limbo_balance))
                .property("recovered_balance", |c| Value::Int(c.recovered_balance))
                .property("maturity_height", |c| Value::Int(c.maturity_height))
                .property("blocks_til_maturity", |c| Value::Int(c.blocks_til_maturity))
                .property("confirmation_height", |c| Value::Int(c.confirmation_height))
                .property("node_alias", |c| text(&c.node_alias))
                .derived("type", |c| text(c.kind.code()))
                .derived("node", |c| {
                    if c.node_alias.is_empty() {
                        text(&c.remote_node_pub)
                    } else {
                        text(&c.node_alias)
                    }
                })
        })
    }
}

// ============================================================================
// Peers
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Peer {
    pub pub_key: String,
    pub address: String,
    #[serde(deserialize_with = "de::int_or_string")]
    pub bytes_sent: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub bytes_recv: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub sat_sent: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub sat_recv: i64,
    pub inbound: bool,
    #[serde(deserialize_with = "de::int_or_string")]
    pub ping_time: i64,
    #[serde(skip)]
    pub alias: String,
}

impl Record for Peer {
    fn accessors() -> &'static Accessors<Self> {
        static TABLE: OnceLock<Accessors<Peer>> = OnceLock::new();
        TABLE.get_or_init(|| {
            Accessors::<Self>::new()
                .property("pub_key", |p| text(&p.pub_key))
                .property("address", |p| text(&p.address))
                .property("bytes_sent", |p| Value::Int(p.bytes_sent))
                .property("bytes_recv", |p| Value::Int(p.bytes_recv))
                .property("sat_sent", |p| Value::Int(p.sat_sent))
                .property("sat_recv", |p| Value::Int(p.sat_recv))
                .property("inbound", |p| Value::Bool(p.inbound))
                .property("ping_time", |p| Value::Int(p.ping_time))
                .property("alias", |p| {
                    if p.alias.is_empty() {
                        text(&p.pub_key)
                    } else {
                        text(&p.alias)
                    }
                })
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListPeers {
    pub peers: Vec<Peer>,
}

// ============================================================================
// Invoices
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Invoice {
    pub memo: String,
    pub receipt: String,
    pub r_hash: String,
    #[serde(deserialize_with = "de::int_or_string")]
    pub value: i64,
    pub settled: bool,
    #[serde(deserialize_with = "de::int_or_string")]
    pub creation_date: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub settle_date: i64,
    pub payment_request: String,
    #[serde(deserialize_with = "de::int_or_string")]
    pub expiry: i64,
    pub private: bool,
    #[serde(deserialize_with = "de::int_or_string")]
    pub add_index: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub amt_paid_sat: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub amt_paid_msat: i64,
}

impl Record for Invoice {
    fn accessors() -> &'static Accessors<Self> {
        static TABLE: OnceLock<Accessors<Invoice>> = OnceLock::new();
        TABLE.get_or_init(|| {
            Accessors::<Self>::new()
                .property("memo", |i| text(&i.memo))
                .property("receipt", |i| text(&i.receipt))
                .property("r_hash", |i| text(&i.r_hash))
                .property("value", |i| Value::Int(i.value))
                .property("settled", |i| Value::Bool(i.settled))
                .property("creation_date", |i| Value::Timestamp(i.creation_date))
                .property("settle_date", |i| Value::Timestamp(i.settle_date))
                .property("payment_request", |i| text(&i.payment_request))
                .property("expiry", |i| Value::Int(i.expiry))
                .property("private", |i| Value::Bool(i.private))
                .property("add_index", |i| Value::Int(i.add_index))
                .property("amt_paid_sat", |i| Value::Int(i.amt_paid_sat))
                .property("amt_paid_msat", |i| Value::Int(i.amt_paid_msat))
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListInvoices {
    pub invoices: Vec<Invoice>,
    #[serde(deserialize_with = "de::int_or_string")]
    pub first_index_offset: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub last_index_offset: i64,
}

// ============================================================================
// Payments
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Payment {
    pub payment_hash: String,
    #[serde(deserialize_with = "de::int_or_string")]
    pub value: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub value_msat: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub creation_date: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub fee: i64,
    pub payment_preimage: String,
    pub path: Vec<String>,
}

impl Record for Payment {
    fn accessors() -> &'static Accessors<Self> {
        static TABLE: OnceLock<Accessors<Payment>> = OnceLock::new();
        TABLE.get_or_init(|| {
            Accessors::<Self>::new()
                .property("payment_hash", |p| text(&p.payment_hash))
                .property("value", |p| Value::Int(p.value))
                .property("value_msat", |p| Value::Int(p.value_msat))
                .property("creation_date", |p| Value::Timestamp(p.creation_date))
                .property("fee", |p| Value::Int(p.fee))
                .property("payment_preimage", |p| text(&p.payment_preimage))
                .property("path", |p| Value::List(p.path.clone()))
                .derived("hops", |p| Value::Int(p.path.len() as i64))
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListPayments {
    pub payments: Vec<Payment>,
}

// ============================================================================
// On-chain transactions
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Transaction {
    pub tx_hash: String,
    #[serde(deserialize_with = "de::int_or_string")]
    pub amount: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub num_confirmations: i64,
    pub block_hash: String,
    #[serde(deserialize_with = "de::int_or_string")]
    pub block_height: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub time_stamp: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub total_fees: i64,
    pub dest_addresses: Vec<String>,
}

impl Record for Transaction {
    fn accessors() -> &'static Accessors<Self> {
        static TABLE: OnceLock<Accessors<Transaction>> = OnceLock::new();
        TABLE.get_or_init(|| {
            Accessors::<Self>::new()
                .property("tx_hash", |t| text(&t.tx_hash))
                .property("amount", |t| Value::Int(t.amount))
                .property("num_confirmations", |t| Value::Int(t.num_confirmations))
                .property("block_hash", |t| text(&t.block_hash))
                .property("block_height", |t| Value::Int(t.block_height))
                .property("time_stamp", |t| Value::Timestamp(t.time_stamp))
                .property("total_fees", |t| Value::Int(t.total_fees))
                .property("dest_addresses", |t| Value::List(t.dest_addresses.clone()))
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TransactionDetails {
    pub transactions: Vec<Transaction>,
}

// ============================================================================
// Node and wallet summaries
// ============================================================================

/// A chain the node is on. Older `lnd` reports bare names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "ChainEntry")]
pub struct Chain {
    pub chain: String,
    pub network: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChainEntry {
    Name(String),
    Detailed {
        #[serde(default)]
        chain: String,
        #[serde(default)]
        network: String,
    },
}

impl From<ChainEntry> for Chain {
    fn from(entry: ChainEntry) -> Self {
        match entry {
            ChainEntry::Name(chain) => Chain {
                chain,
                network: String::new(),
            },
            ChainEntry::Detailed { chain, network } => Chain { chain, network },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeInfo {
    pub identity_pubkey: String,
    pub alias: String,
    pub version: String,
    #[serde(deserialize_with = "de::int_or_string")]
    pub num_pending_channels: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub num_active_channels: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub num_inactive_channels: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub num_peers: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub block_height: i64,
    pub synced_to_chain: bool,
    pub testnet: bool,
    pub chains: Vec<Chain>,
}

impl NodeInfo {
    pub fn chain_names(&self) -> String {
        self.chains
            .iter()
            .map(|c| c.chain.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `testnet`/`mainnet`/..., from the chains list or the legacy flag.
    pub fn network(&self) -> String {
        match self.chains.iter().find(|c| !c.network.is_empty()) {
            Some(chain) => chain.network.clone(),
            None if self.testnet => "testnet".to_string(),
            None => "mainnet".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletBalance {
    #[serde(deserialize_with = "de::int_or_string")]
    pub total_balance: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub confirmed_balance: i64,
    #[serde(deserialize_with = "de::int_or_string")]
    pub unconfirmed_balance: i64,
}

/// `getnodeinfo` output; only the announced node is used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeInfoResponse {
    pub node: LightningNode,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LightningNode {
    pub pub_key: String,
    pub alias: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewAddress {
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::resolve;

    #[test]
    fn test_channel_accepts_string_integers() {
        let json = r#"{
            "active": true,
            "remote_pubkey": "02abc",
            "channel_point": "deadbeef:1",
            "capacity": "1000000",
            "local_balance": 250000,
            "commit_weight": "724",
            "fee_per_kw": ""
        }"#;
        let channel: Channel = serde_json::from_str(json).unwrap();
        assert!(channel.active);
        assert_eq!(channel.capacity, 1_000_000);
        assert_eq!(channel.local_balance, 250_000);
        assert_eq!(channel.fee_per_kw, 0);
        assert_eq!(channel.channel_point, "deadbeef:1");
    }

    #[test]
    fn test_pending_channels_flatten_in_list_order() {
        let json = r#"{
            "total_limbo_balance": "5000",
            "pending_open_channels": [
                {"channel": {"remote_node_pub": "02a", "capacity": "100000"},
                 "confirmation_height": 0, "commit_fee": "9050", "fee_per_kw": "12500"}
            ],
            "pending_force_closing_channels": [
                {"channel": {"remote_node_pub": "02b", "channel_point": "ff:1"},
                 "closing_txid": "cc", "limbo_balance": "5000", "blocks_til_maturity": 144,
                 "pending_htlcs": [{"incoming": false}, {"incoming": true}]}
            ],
            "waiting_close_channels": [
                {"channel": {"remote_node_pub": "02c"}, "limbo_balance": "700"}
            ]
        }"#;
        let pending: PendingChannels = serde_json::from_str(json).unwrap();
        assert_eq!(pending.total_limbo_balance, 5_000);
        let channels = pending.into_channels();
        let kinds: Vec<_> = channels.iter().map(|c| c.kind.code()).collect();
        assert_eq!(kinds, vec!["F", "O", "W"]);
        assert_eq!(channels[0].pending_htlcs, 2);
        assert_eq!(channels[0].blocks_til_maturity, 144);
        assert_eq!(channels[1].commit_fee, 9_050);
        assert_eq!(channels[2].limbo_balance, 700);
        assert_eq!(resolve(&channels[2], "node"), Some(Value::Text("02c".into())));
        assert_eq!(resolve(&channels[0], "type"), Some(Value::Text("F".into())));
    }

    #[test]
    fn test_channel_node_falls_back_to_pubkey() {
        let mut channel = Channel {
            remote_pubkey: "02abc".into(),
            ..Default::default()
        };
        assert_eq!(resolve(&channel, "node"), Some(Value::Text("02abc".into())));
        channel.node_alias = "ACINQ".into();
        assert_eq!(resolve(&channel, "node"), Some(Value::Text("ACINQ".into())));
    }

    #[test]
    fn test_getinfo_chains_both_shapes() {
        let modern: NodeInfo = serde_json::from_str(
            r#"{"alias":"n","chains":[{"chain":"bitcoin","network":"testnet"}],"num_peers":3}"#,
        )
        .unwrap();
        assert_eq!(modern.chain_names(), "bitcoin");
        assert_eq!(modern.network(), "testnet");
        assert_eq!(modern.num_peers, 3);

        let legacy: NodeInfo =
            serde_json::from_str(r#"{"chains":["bitcoin"],"testnet":false}"#).unwrap();
        assert_eq!(legacy.chain_names(), "bitcoin");
        assert_eq!(legacy.network(), "mainnet");
    }

    #[test]
    fn test_payment_path_is_list() {
        let payment: Payment =
            serde_json::from_str(r#"{"payment_hash":"ab","path":["02a","03b"],"fee":"3"}"#)
                .unwrap();
        assert_eq!(
            resolve(&payment, "path"),
            Some(Value::List(vec!["02a".into(), "03b".into()]))
        );
        assert_eq!(resolve(&payment, "hops"), Some(Value::Int(2)));
        assert_eq!(payment.fee, 3);
    }

    #[test]
    fn test_invalid_integer_string_is_error() {
        let result: Result<Peer, _> = serde_json::from_str(r#"{"bytes_sent":"lots"}"#);
        assert!(result.is_err());
    }
}
