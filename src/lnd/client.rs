//! Typed `lncli` commands on top of the gateway.

use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;
use serde::de::DeserializeOwned;

use super::gateway::{CommandGateway, InteractiveSession, PROMPT_TIMEOUT};
use super::types::{
    Channel, Invoice, ListChannels, ListInvoices, ListPayments, ListPeers, NewAddress, NodeInfo,
    NodeInfoResponse, Payment, PendingChannel, PendingChannels, Peer, Transaction,
    TransactionDetails, WalletBalance,
};
use crate::errors::{AppError, ParseError};

/// Invoices fetched per refresh, newest first.
pub const MAX_INVOICES: u32 = 100;
pub const DEFAULT_PEER_PORT: i64 = 9735;
pub const DEFAULT_ADDRESS_TYPE: &str = "np2wkh";

pub static PAY_PROMPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/no\):").expect("static pattern")
});
pub static PAY_DONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(confirmed)|(\})").expect("static pattern")
});
static PAYMENT_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""payment_error":\s*"(.+)""#).expect("static pattern")
});

// ============================================================================
// Requests (also the records behind the input forms)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenChannelRequest {
    pub node_key: String,
    pub connect: String,
    pub local_amt: i64,
    pub push_amt: i64,
    pub private: bool,
    pub block: bool,
    pub min_confs: i64,
    pub conf_target: i64,
    pub sat_per_byte: i64,
    pub min_htlc_msat: i64,
    pub remote_csv_delay: i64,
}

impl Default for OpenChannelRequest {
    fn default() -> Self {
        Self {
            node_key: String::new(),
            connect: String::new(),
            local_amt: 0,
            push_amt: 0,
            private: false,
            block: false,
            min_confs: 1,
            conf_target: 0,
            sat_per_byte: 0,
            min_htlc_msat: 0,
            remote_csv_delay: 0,
        }
    }
}

fn push_text(args: &mut Vec<String>, flag: &str, value: &str) {
    if !value.is_empty() {
        args.push(format!("--{flag}"));
        args.push(value.to_string());
    }
}

fn push_positive(args: &mut Vec<String>, flag: &str, value: i64) {
    if value > 0 {
        args.push(format!("--{flag}"));
        args.push(value.to_string());
    }
}

fn push_switch(args: &mut Vec<String>, flag: &str, on: bool) {
    if on {
        args.push(format!("--{flag}"));
    }
}

impl OpenChannelRequest {
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        push_text(&mut args, "node_key", self.node_key.trim());
        push_text(&mut args, "connect", self.connect.trim());
        push_positive(&mut args, "local_amt", self.local_amt);
        push_positive(&mut args, "push_amt", self.push_amt);
        push_switch(&mut args, "block", self.block);
        push_switch(&mut args, "private", self.private);
        push_positive(&mut args, "conf_target", self.conf_target);
        push_positive(&mut args, "sat_per_byte", self.sat_per_byte);
        push_positive(&mut args, "min_htlc_msat", self.min_htlc_msat);
        push_positive(&mut args, "remote_csv_delay", self.remote_csv_delay);
        push_positive(&mut args, "min_confs", self.min_confs);
        args
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseChannelRequest {
    pub node_alias: String,
    pub local_balance: String,
    pub remote_balance: String,
    pub channel_point: String,
    pub force: bool,
}

impl CloseChannelRequest {
    pub fn for_channel(channel: &Channel) -> Self {
        Self {
            node_alias: channel.node_alias.clone(),
            local_balance: channel.local_balance.to_string(),
            remote_balance: channel.remote_balance.to_string(),
            channel_point: channel.channel_point.clone(),
            force: false,
        }
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        push_switch(&mut args, "force", self.force);
        match self.channel_point.split_once(':') {
            Some((txid, index)) => {
                args.push(txid.to_string());
                args.push(index.to_string());
            }
            None => args.push(self.channel_point.clone()),
        }
        args
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectPeerRequest {
    pub pub_key: String,
    pub host: String,
    pub port: i64,
}

impl Default for ConnectPeerRequest {
    fn default() -> Self {
        Self {
            pub_key: String::new(),
            host: String::new(),
            port: DEFAULT_PEER_PORT,
        }
    }
}

impl ConnectPeerRequest {
    pub fn args(&self) -> Vec<String> {
        vec![format!(
            "{}@{}:{}",
            self.pub_key.trim(),
            self.host.trim(),
            self.port
        )]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisconnectPeerRequest {
    pub alias: String,
    pub pub_key: String,
}

impl DisconnectPeerRequest {
    pub fn for_peer(peer: &Peer) -> Self {
        Self {
            alias: peer.alias.clone(),
            pub_key: peer.pub_key.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddInvoiceRequest {
    pub memo: String,
    pub receipt: String,
    pub preimage: String,
    pub amt: i64,
    pub description_hash: String,
    pub fallback_addr: String,
    pub expiry: i64,
    pub private: bool,
}

impl AddInvoiceRequest {
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        push_text(&mut args, "memo", &self.memo);
        push_text(&mut args, "receipt", self.receipt.trim());
        push_text(&mut args, "preimage", self.preimage.trim());
        push_positive(&mut args, "amt", self.amt);
        push_text(&mut args, "description_hash", self.description_hash.trim());
        push_text(&mut args, "fallback_addr", self.fallback_addr.trim());
        push_positive(&mut args, "expiry", self.expiry);
        push_switch(&mut args, "private", self.private);
        args
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayInvoiceRequest {
    pub pay_req: String,
    pub amount: i64,
    pub fee_limit: i64,
    pub fee_limit_percent: i64,
    pub force: bool,
}

impl PayInvoiceRequest {
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        push_text(&mut args, "pay_req", self.pay_req.trim());
        push_positive(&mut args, "amt", self.amount);
        push_positive(&mut args, "fee_limit", self.fee_limit);
        push_positive(&mut args, "fee_limit_percent", self.fee_limit_percent);
        push_switch(&mut args, "force", self.force);
        args
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddressRequest {
    pub address_type: String,
}

impl Default for NewAddressRequest {
    fn default() -> Self {
        Self {
            address_type: DEFAULT_ADDRESS_TYPE.to_string(),
        }
    }
}

/// Shown after `newaddress` succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAddressResponse {
    pub address_type: String,
    pub address: String,
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone)]
pub struct LndClient {
    gateway: CommandGateway,
}

fn parse<T: DeserializeOwned>(command: &str, bytes: &[u8]) -> Result<T, ParseError> {
    serde_json::from_slice(bytes).map_err(|source| ParseError::Json {
        command: command.to_string(),
        source,
    })
}

/// Pull one top-level string attribute out of a JSON object.
fn attribute(command: &str, bytes: &[u8], name: &str) -> Result<String, ParseError> {
    let object: serde_json::Map<String, serde_json::Value> = parse(command, bytes)?;
    match object.get(name) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(ParseError::MissingAttribute {
            command: command.to_string(),
            attribute: name.to_string(),
        }),
    }
}

/// Interpret the tail of a `payinvoice` conversation.
pub fn payment_outcome(output: &str) -> Result<(), String> {
    match PAYMENT_ERROR.captures(output).and_then(|c| c.get(1)) {
        Some(error) => Err(error.as_str().to_string()),
        None => Ok(()),
    }
}

impl LndClient {
    pub fn new(gateway: CommandGateway) -> Self {
        Self { gateway }
    }

    async fn query<T: DeserializeOwned>(&self, command: &str, args: &[String]) -> Result<T, AppError> {
        let out = self.gateway.execute(command, args).await?;
        Ok(parse(command, &out)?)
    }

    pub async fn get_info(&self) -> Result<NodeInfo, AppError> {
        self.query("getinfo", &[]).await
    }

    pub async fn wallet_balance(&self) -> Result<WalletBalance, AppError> {
        self.query("walletbalance", &[]).await
    }

    pub async fn list_channels(&self) -> Result<Vec<Channel>, AppError> {
        let list: ListChannels = self.query("listchannels", &[]).await?;
        Ok(list.channels)
    }

    pub async fn pending_channels(&self) -> Result<Vec<PendingChannel>, AppError> {
        let pending: PendingChannels = self.query("pendingchannels", &[]).await?;
        debug!("Limbo balance: {}", pending.total_limbo_balance);
        Ok(pending.into_channels())
    }

    pub async fn list_peers(&self) -> Result<Vec<Peer>, AppError> {
        let list: ListPeers = self.query("listpeers", &[]).await?;
        Ok(list.peers)
    }

    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let args = [
            "--reversed".to_string(),
            "--max_invoices".to_string(),
            MAX_INVOICES.to_string(),
            "--index_offset".to_string(),
            "0".to_string(),
        ];
        let list: ListInvoices = self.query("listinvoices", &args).await?;
        Ok(list.invoices)
    }

    pub async fn list_payments(&self) -> Result<Vec<Payment>, AppError> {
        let list: ListPayments = self.query("listpayments", &[]).await?;
        Ok(list.payments)
    }

    pub async fn list_chain_txns(&self) -> Result<Vec<Transaction>, AppError> {
        let details: TransactionDetails = self.query("listchaintxns", &[]).await?;
        Ok(details.transactions)
    }

    /// Announced alias of `pubkey`.
    pub async fn node_alias(&self, pubkey: &str) -> Result<String, AppError> {
        let info: NodeInfoResponse = self.query("getnodeinfo", &[pubkey.to_string()]).await?;
        debug!("Resolved alias for {}: {}", pubkey, info.node.alias);
        Ok(info.node.alias)
    }

    pub async fn new_address(&self, request: &NewAddressRequest) -> Result<String, AppError> {
        let kind = match request.address_type.trim() {
            "" => DEFAULT_ADDRESS_TYPE.to_string(),
            other => other.to_string(),
        };
        let response: NewAddress = self.query("newaddress", &[kind]).await?;
        Ok(response.address)
    }

    /// Returns the funding txid.
    pub async fn open_channel(&self, request: &OpenChannelRequest) -> Result<String, AppError> {
        info!("Opening channel to {}", request.node_key);
        let out = self.gateway.execute("openchannel", &request.args()).await?;
        Ok(attribute("openchannel", &out, "funding_txid")?)
    }

    /// Returns the closing txid.
    pub async fn close_channel(&self, request: &CloseChannelRequest) -> Result<String, AppError> {
        info!("Closing channel {} (force={})", request.channel_point, request.force);
        let out = self.gateway.execute("closechannel", &request.args()).await?;
        Ok(attribute("closechannel", &out, "closing_txid")?)
    }

    pub async fn connect(&self, request: &ConnectPeerRequest) -> Result<String, AppError> {
        let out = self.gateway.execute("connect", &request.args()).await?;
        Ok(String::from_utf8_lossy(&out).trim().to_string())
    }

    pub async fn disconnect(&self, request: &DisconnectPeerRequest) -> Result<String, AppError> {
        let out = self
            .gateway
            .execute("disconnect", &[request.pub_key.clone()])
            .await?;
        Ok(String::from_utf8_lossy(&out).trim().to_string())
    }

    /// Returns the payment request of the new invoice.
    pub async fn add_invoice(&self, request: &AddInvoiceRequest) -> Result<String, AppError> {
        let out = self.gateway.execute("addinvoice", &request.args()).await?;
        Ok(attribute("addinvoice", &out, "pay_req")?)
    }

    /// Start `payinvoice` and stop at its confirmation prompt.
    pub async fn begin_payment(&self, request: &PayInvoiceRequest) -> Result<InteractiveSession, AppError> {
        let session = self
            .gateway
            .begin_interactive("payinvoice", &request.args(), &PAY_PROMPT, PROMPT_TIMEOUT)
            .await?;
        Ok(session)
    }

    /// `payinvoice --force` skips the prompt, so it runs like any other command.
    pub async fn pay_forced(&self, request: &PayInvoiceRequest) -> Result<String, AppError> {
        let out = self.gateway.execute("payinvoice", &request.args()).await?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProcessError;
    use crate::test_support::{FakeRunner, fake_client};

    #[test]
    fn test_open_channel_args_skip_empty_values() {
        let request = OpenChannelRequest {
            node_key: "02abc".into(),
            local_amt: 20000,
            private: true,
            ..Default::default()
        };
        assert_eq!(
            request.args(),
            vec![
                "--node_key",
                "02abc",
                "--local_amt",
                "20000",
                "--private",
                "--min_confs",
                "1"
            ]
        );
    }

    #[test]
    fn test_close_channel_args() {
        let request = CloseChannelRequest {
            channel_point: "abcd:1".into(),
            force: true,
            ..Default::default()
        };
        assert_eq!(request.args(), vec!["--force", "abcd", "1"]);
    }

    #[test]
    fn test_connect_args() {
        let request = ConnectPeerRequest {
            pub_key: "02abc".into(),
            host: "10.0.0.2".into(),
            ..Default::default()
        };
        assert_eq!(request.args(), vec!["02abc@10.0.0.2:9735"]);
    }

    #[test]
    fn test_payment_outcome() {
        assert_eq!(payment_outcome("{\n \"payment_error\": \"\",\n}"), Ok(()));
        assert_eq!(
            payment_outcome("{\n \"payment_error\": \"unable to route payment\",\n}"),
            Err("unable to route payment".to_string())
        );
        assert!(PAY_PROMPT.is_match("Confirm payment (yes/no): "));
        assert!(PAY_DONE.is_match("}"));
    }

    #[tokio::test]
    async fn test_list_channels_parses() {
        let runner = FakeRunner::new();
        runner.respond(
            "listchannels",
            0,
            r#"{"channels":[{"remote_pubkey":"02a","capacity":"500"},{"remote_pubkey":"03b"}]}"#,
        );
        let client = fake_client(runner);
        let channels = client.list_channels().await.unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].capacity, 500);
    }

    #[tokio::test]
    async fn test_garbage_output_is_parse_error() {
        let runner = FakeRunner::new();
        runner.respond("listpeers", 0, "not json");
        let err = fake_client(runner).list_peers().await.unwrap_err();
        assert!(matches!(err, AppError::Parse(ParseError::Json { .. })));
    }

    #[tokio::test]
    async fn test_add_invoice_returns_pay_req() {
        let runner = FakeRunner::new();
        runner.respond(
            "addinvoice",
            0,
            r#"{"r_hash":"ab","pay_req":"lnbc1...","add_index":"4"}"#,
        );
        let client = fake_client(runner.clone());
        let request = AddInvoiceRequest {
            memo: "coffee".into(),
            amt: 1500,
            ..Default::default()
        };
        assert_eq!(client.add_invoice(&request).await.unwrap(), "lnbc1...");
        assert_eq!(
            runner.requests()[0].args,
            vec!["addinvoice", "--memo", "coffee", "--amt", "1500"]
        );
    }

    #[tokio::test]
    async fn test_missing_attribute() {
        let runner = FakeRunner::new();
        runner.respond("openchannel", 0, "{}");
        let err = fake_client(runner)
            .open_channel(&OpenChannelRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Parse(ParseError::MissingAttribute { .. })
        ));
    }

    #[tokio::test]
    async fn test_process_failure_surfaces() {
        let runner = FakeRunner::new();
        runner.fail("getinfo", 1, "wallet locked");
        let err = fake_client(runner).get_info().await.unwrap_err();
        assert!(matches!(err, AppError::Process(ProcessError::Exit { .. })));
        assert!(err.to_string().contains("wallet locked"));
    }
}
