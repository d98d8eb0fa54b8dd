//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.lnboard/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Grid layouts are part of the config too. Each `[grids.<view>]` table picks
//! which declared columns a view shows, in which order and how wide. Views the
//! file doesn't mention keep their built-in layout.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LnboardConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub lncli: LncliConfig,
    #[serde(default)]
    pub grids: HashMap<String, GridLayout>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub refresh_secs: Option<u64>,
    pub show_header: Option<bool>,
    /// Path to the `lncli` binary.
    pub lncli: Option<String>,
}

/// Global flags passed through to every `lncli` invocation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LncliConfig {
    pub rpcserver: Option<String>,
    pub lnddir: Option<String>,
    pub tlscertpath: Option<String>,
    pub no_macaroons: Option<bool>,
    pub macaroonpath: Option<String>,
    pub macaroontimeout: Option<u64>,
    pub macaroonip: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GridLayout {
    pub header: Option<String>,
    pub shortcut_header: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnLayout {
    pub key: String,
    pub header: Option<String>,
    /// 0 = take a share of the remaining width.
    pub width: Option<u16>,
}

impl ColumnLayout {
    fn new(key: &str, header: &str, width: u16) -> Self {
        Self {
            key: key.to_string(),
            header: Some(header.to_string()),
            width: Some(width),
        }
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_REFRESH_SECS: u64 = 60;
pub const DEFAULT_LNCLI: &str = "lncli";

fn layout(header: &str, shortcut_header: &str, columns: &[(&str, &str, u16)]) -> GridLayout {
    GridLayout {
        header: Some(header.to_string()),
        shortcut_header: Some(shortcut_header.to_string()),
        columns: columns
            .iter()
            .map(|(key, header, width)| ColumnLayout::new(key, header, *width))
            .collect(),
    }
}

/// Built-in layouts, keyed by view.
pub fn default_grid_layouts() -> HashMap<String, GridLayout> {
    let mut grids = HashMap::new();
    grids.insert(
        "channels".to_string(),
        layout(
            "Channels",
            "Channels",
            &[
                ("active", "Active", 2),
                ("private", "Private", 2),
                ("node", "Node", 0),
                ("capacity", "Capacity", 13),
                ("local_balance", "Local", 13),
                ("remote_balance", "Remote", 13),
                ("commit_fee", "ComFee", 9),
                ("commit_weight", "ComWeight", 12),
                ("fee_per_kw", "FeeKw", 7),
                ("unsettled_balance", "Unsettled", 13),
                ("total_satoshis_sent", "TotSent", 13),
                ("total_satoshis_received", "TotRec", 13),
            ],
        ),
    );
    grids.insert(
        "peers".to_string(),
        layout(
            "Peers",
            "Peers",
            &[
                ("alias", "Alias", 0),
                ("address", "Address", 22),
                ("bytes_sent", "Bytes sent", 13),
                ("bytes_recv", "Bytes rec.", 13),
                ("sat_sent", "Sat sent", 12),
                ("sat_recv", "Sat rec.", 12),
                ("inbound", "In", 2),
                ("ping_time", "Ping", 6),
            ],
        ),
    );
    grids.insert(
        "pending_channels".to_string(),
        layout(
            "Pending channels",
            "Pending",
            &[
                ("type", "T", 2),
                ("node", "Node", 0),
                ("capacity", "Capacity", 10),
                ("local_balance", "Local", 10),
                ("remote_balance", "Remote", 10),
            ],
        ),
    );
    grids.insert(
        "invoices".to_string(),
        layout(
            "Invoices",
            "Invoices",
            &[
                ("settled", "Settled", 2),
                ("private", "Private", 2),
                ("memo", "Memo", 0),
                ("value", "Value", 16),
                ("creation_date", "Creation", 18),
                ("settle_date", "Settled date", 18),
                ("expiry", "Expiry", 10),
                ("amt_paid_sat", "Paid", 16),
            ],
        ),
    );
    grids.insert(
        "payments".to_string(),
        layout(
            "Payments",
            "Payments",
            &[
                ("creation_date", "Creation", 18),
                ("payment_hash", "Hash", 0),
                ("value_msat", "Value mSat", 16),
                ("fee", "Fee", 16),
                ("payment_preimage", "Preimage", 6),
                ("path", "Path", 0),
            ],
        ),
    );
    grids.insert(
        "transactions".to_string(),
        layout(
            "Transactions",
            "Transactions",
            &[
                ("amount", "Amount", 12),
                ("num_confirmations", "Conf", 8),
                ("block_height", "BlockHeight", 8),
                ("total_fees", "Fees", 8),
                ("time_stamp", "Timestamp", 18),
                ("tx_hash", "TxHash", 0),
                ("block_hash", "BlockHash", 0),
                ("dest_addresses", "Dest", 0),
            ],
        ),
    );
    grids.insert(
        "logs".to_string(),
        layout(
            "Logs",
            "Logs",
            &[
                ("level", "Level", 6),
                ("timestamp", "Timestamp", 18),
                ("message", "Message", 0),
            ],
        ),
    );
    grids
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub refresh_secs: u64,
    pub show_header: bool,
    pub lncli: String,
    pub lncli_flags: LncliConfig,
    pub grids: HashMap<String, GridLayout>,
}

impl ResolvedConfig {
    pub fn grid(&self, view: &str) -> Option<&GridLayout> {
        self.grids.get(view)
    }

    /// The `lncli` global flags, in the order `lncli` documents them.
    pub fn global_args(&self) -> Vec<String> {
        let flags = &self.lncli_flags;
        let mut args = Vec::new();
        if let Some(dir) = &flags.lnddir {
            args.push(format!("--lnddir={dir}"));
        }
        if let Some(server) = &flags.rpcserver {
            args.push(format!("--rpcserver={server}"));
        }
        if let Some(cert) = &flags.tlscertpath {
            args.push(format!("--tlscertpath={cert}"));
        }
        if flags.no_macaroons == Some(true) {
            args.push("--no-macaroons".to_string());
        }
        if let Some(path) = &flags.macaroonpath {
            args.push(format!("--macaroonpath={path}"));
        }
        if let Some(timeout) = flags.macaroontimeout {
            args.push(format!("--macaroontimeout={timeout}"));
        }
        if let Some(ip) = &flags.macaroonip {
            args.push(format!("--macaroonip={ip}"));
        }
        args
    }
}

/// Flags from the command line. `None` = not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub refresh_secs: Option<u64>,
    pub lncli: Option<String>,
    pub rpcserver: Option<String>,
    pub no_header: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.lnboard/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".lnboard").join("config.toml"))
}

/// Load config from `path`, or `~/.lnboard/config.toml` when `None`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `LnboardConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<LnboardConfig, ConfigError> {
    let path = match path.map(Path::to_path_buf).or_else(config_path) {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(LnboardConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(LnboardConfig::default());
    }

    let contents = fs::read_to_string(&path)?;
    let config: LnboardConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# lnboard configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# refresh_secs = 60          # How often the active view is refreshed
# show_header = true         # Node info and wallet balance panels
# lncli = "lncli"            # Or set LNBOARD_LNCLI env var

# [lncli]
# rpcserver = "localhost:10009"   # Or set LNBOARD_RPCSERVER env var
# lnddir = "~/.lnd"
# tlscertpath = "~/.lnd/tls.cert"
# no_macaroons = false
# macaroonpath = "~/.lnd/data/chain/bitcoin/mainnet/admin.macaroon"
# macaroontimeout = 60
# macaroonip = "127.0.0.1"

# Grid layouts. Width 0 shares the remaining space.
# [grids.channels]
# header = "Channels"
# shortcut_header = "Channels"
# columns = [
#   { key = "active", header = "Active", width = 2 },
#   { key = "node", header = "Node", width = 0 },
#   { key = "capacity", header = "Capacity", width = 13 },
# ]
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &LnboardConfig, cli: &CliOverrides) -> ResolvedConfig {
    // lncli binary: CLI → env → config → default
    let lncli = cli
        .lncli
        .clone()
        .or_else(|| std::env::var("LNBOARD_LNCLI").ok())
        .or_else(|| config.general.lncli.clone())
        .unwrap_or_else(|| DEFAULT_LNCLI.to_string());

    // rpcserver: CLI → env → config
    let mut lncli_flags = config.lncli.clone();
    if let Some(server) = cli
        .rpcserver
        .clone()
        .or_else(|| std::env::var("LNBOARD_RPCSERVER").ok())
    {
        lncli_flags.rpcserver = Some(server);
    }

    let refresh_secs = cli
        .refresh_secs
        .or(config.general.refresh_secs)
        .unwrap_or(DEFAULT_REFRESH_SECS)
        .max(1);

    let show_header = !cli.no_header && config.general.show_header.unwrap_or(true);

    // File layouts replace built-in ones view by view
    let mut grids = default_grid_layouts();
    for (view, layout) in &config.grids {
        grids.insert(view.clone(), layout.clone());
    }

    ResolvedConfig {
        refresh_secs,
        show_header,
        lncli,
        lncli_flags,
        grids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = LnboardConfig::default();
        assert!(config.grids.is_empty());
        assert!(config.general.refresh_secs.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve(&LnboardConfig::default(), &CliOverrides::default());
        assert_eq!(resolved.refresh_secs, DEFAULT_REFRESH_SECS);
        assert!(resolved.show_header);
        assert_eq!(resolved.grids.len(), 7);
        assert_eq!(
            resolved.grid("channels").map(|g| g.columns.len()),
            Some(12)
        );
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = LnboardConfig {
            general: GeneralConfig {
                refresh_secs: Some(30),
                show_header: Some(true),
                lncli: Some("/opt/lncli".to_string()),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            refresh_secs: Some(5),
            lncli: Some("./lncli".to_string()),
            rpcserver: Some("10.0.0.1:10009".to_string()),
            no_header: true,
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.refresh_secs, 5);
        assert_eq!(resolved.lncli, "./lncli");
        assert!(!resolved.show_header);
        assert_eq!(
            resolved.lncli_flags.rpcserver.as_deref(),
            Some("10.0.0.1:10009")
        );
    }

    #[test]
    fn test_zero_refresh_is_clamped() {
        let cli = CliOverrides {
            refresh_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(resolve(&LnboardConfig::default(), &cli).refresh_secs, 1);
    }

    #[test]
    fn test_file_layout_replaces_builtin() {
        let toml_str = r#"
[grids.peers]
header = "My peers"
columns = [
  { key = "alias", width = 20 },
  { key = "ping_time", header = "Ping" },
]
"#;
        let config: LnboardConfig = toml::from_str(toml_str).unwrap();
        let resolved = resolve(&config, &CliOverrides::default());
        let peers = resolved.grid("peers").unwrap();
        assert_eq!(peers.header.as_deref(), Some("My peers"));
        assert_eq!(peers.columns.len(), 2);
        assert_eq!(peers.columns[0].width, Some(20));
        assert_eq!(peers.columns[1].width, None);
        // Untouched views keep the built-in layout
        assert_eq!(resolved.grid("logs").map(|g| g.columns.len()), Some(3));
    }

    #[test]
    fn test_global_args() {
        let config = LnboardConfig {
            lncli: LncliConfig {
                rpcserver: Some("host:10009".to_string()),
                no_macaroons: Some(true),
                macaroontimeout: Some(60),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(
            resolved.global_args(),
            vec![
                "--rpcserver=host:10009",
                "--no-macaroons",
                "--macaroontimeout=60"
            ]
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[general]
refresh_secs = 15
"#;
        let config: LnboardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.refresh_secs, Some(15));
        assert!(config.general.lncli.is_none());
        assert!(config.grids.is_empty());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result: Result<LnboardConfig, _> = toml::from_str("[general\nrefresh_secs = ");
        assert!(result.is_err());
    }
}
