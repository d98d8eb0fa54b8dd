//! Channels view: Alt+O opens a channel, Alt+C closes the selected one.

use crate::core::action::ViewId;
use crate::core::config::ResolvedConfig;
use crate::core::enrichment::EnrichmentCache;
use crate::core::form::{Form, FormSchema};
use crate::core::grid::{ColumnFormat, Grid, GridSurface};
use crate::core::key::Key;
use crate::lnd::client::{CloseChannelRequest, OpenChannelRequest};
use crate::lnd::types::Channel;

use super::{BoundForm, Modal, Shortcut, View, build_grid, shortcut_header};

const SHORTCUTS: &[Shortcut] = &[
    Shortcut::new(Key::Alt('c'), "Close"),
    Shortcut::new(Key::Alt('o'), "Open"),
];

pub fn open_channel_schema() -> FormSchema<OpenChannelRequest> {
    FormSchema::new()
        .text("node_key", "Node pubkey", 66, |r: &mut OpenChannelRequest| {
            &mut r.node_key
        })
        .text("connect", "Connect (host:port)", 32, |r| &mut r.connect)
        .integer("local_amt", "Local amount (sat)", 16, |r| &mut r.local_amt)
        .integer("push_amt", "Push amount (sat)", 16, |r| &mut r.push_amt)
        .boolean("block", "Wait for confirmation", |r| &mut r.block)
        .boolean("private", "Private", |r| &mut r.private)
        .integer("conf_target", "Confirmation target", 4, |r| &mut r.conf_target)
        .integer("sat_per_byte", "Sat per byte", 6, |r| &mut r.sat_per_byte)
        .integer("min_htlc_msat", "Min HTLC (msat)", 12, |r| &mut r.min_htlc_msat)
        .integer("remote_csv_delay", "Remote CSV delay", 6, |r| &mut r.remote_csv_delay)
        .integer("min_confs", "Min confirmations", 4, |r| &mut r.min_confs)
}

pub fn close_channel_schema() -> FormSchema<CloseChannelRequest> {
    FormSchema::new()
        .text("node_alias", "Node", 32, |r: &mut CloseChannelRequest| {
            &mut r.node_alias
        })
        .readonly()
        .text("local_balance", "Local balance", 16, |r| &mut r.local_balance)
        .readonly()
        .text("remote_balance", "Remote balance", 16, |r| &mut r.remote_balance)
        .readonly()
        .text("channel_point", "Channel point", 32, |r| &mut r.channel_point)
        .lines(2)
        .readonly()
        .boolean("force", "Force close", |r| &mut r.force)
}

pub struct ChannelsView {
    grid: Grid<Channel>,
    shortcut_header: String,
}

impl ChannelsView {
    pub fn new(config: &ResolvedConfig) -> Self {
        use ColumnFormat::*;
        let grid = build_grid(
            ViewId::Channels,
            config,
            &[
                ("active", 2, Boolean),
                ("private", 2, Boolean),
                ("node", 0, Text),
                ("remote_pubkey", 0, Text),
                ("channel_point", 0, Text),
                ("chan_id", 20, Text),
                ("capacity", 13, Integer),
                ("local_balance", 13, Integer),
                ("remote_balance", 13, Integer),
                ("commit_fee", 9, Integer),
                ("commit_weight", 12, Integer),
                ("fee_per_kw", 7, Integer),
                ("unsettled_balance", 13, Integer),
                ("total_satoshis_sent", 13, Integer),
                ("total_satoshis_received", 13, Integer),
            ],
        );
        Self {
            grid,
            shortcut_header: shortcut_header(ViewId::Channels, config),
        }
    }

    /// Rebind, filling in aliases that are already known.
    pub fn bind(&mut self, mut channels: Vec<Channel>, cache: &EnrichmentCache) {
        for channel in &mut channels {
            if let Some(alias) = cache.peek(&channel.remote_pubkey) {
                channel.node_alias = alias;
            }
        }
        self.grid.bind_items(channels);
    }

    /// Patch the alias of every channel with `pubkey`. Returns true if any changed.
    pub fn enrich(&mut self, pubkey: &str, alias: &str) -> bool {
        let mut changed = false;
        for channel in self.grid.items_mut() {
            if channel.remote_pubkey == pubkey && channel.node_alias != alias {
                channel.node_alias = alias.to_string();
                changed = true;
            }
        }
        changed
    }

    #[cfg(test)]
    pub fn items(&self) -> &[Channel] {
        self.grid.items()
    }

    fn open_form() -> Box<dyn Modal> {
        let form = Form::new("Open channel", OpenChannelRequest::default(), open_channel_schema());
        Box::new(BoundForm::new(form, |request, ctx| {
            ctx.run_command("Open channel", |client| async move {
                client
                    .open_channel(&request)
                    .await
                    .map(|txid| format!("Funding txid:\n{txid}"))
            });
        }))
    }

    fn close_form(channel: &Channel) -> Box<dyn Modal> {
        let form = Form::new(
            "Close channel",
            CloseChannelRequest::for_channel(channel),
            close_channel_schema(),
        );
        Box::new(BoundForm::new(form, |request, ctx| {
            ctx.run_command("Close channel", |client| async move {
                client
                    .close_channel(&request)
                    .await
                    .map(|txid| format!("Closing txid:\n{txid}"))
            });
        }))
    }
}

impl View for ChannelsView {
    fn grid(&mut self) -> &mut dyn GridSurface {
        &mut self.grid
    }

    fn shortcut_header(&self) -> &str {
        &self.shortcut_header
    }

    fn shortcuts(&self) -> &'static [Shortcut] {
        SHORTCUTS
    }

    fn handle_shortcut(&mut self, key: &Key) -> Option<Box<dyn Modal>> {
        match key {
            Key::Alt('o') => Some(Self::open_form()),
            Key::Alt('c') => self.grid.selected_item().map(Self::close_form),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, LnboardConfig, resolve};
    use crate::core::record::{Value, resolve as resolve_value};

    fn view() -> ChannelsView {
        ChannelsView::new(&resolve(&LnboardConfig::default(), &CliOverrides::default()))
    }

    fn channel(pubkey: &str) -> Channel {
        Channel {
            remote_pubkey: pubkey.into(),
            channel_point: format!("{pubkey}tx:0"),
            ..Default::default()
        }
    }

    #[test]
    fn test_close_requires_selection() {
        let mut view = view();
        assert!(view.handle_shortcut(&Key::Alt('c')).is_none());
        view.bind(vec![channel("02a")], &EnrichmentCache::new());
        assert!(view.handle_shortcut(&Key::Alt('c')).is_some());
        assert!(view.handle_shortcut(&Key::Alt('o')).is_some());
        assert!(view.handle_shortcut(&Key::Alt('x')).is_none());
    }

    #[test]
    fn test_enrich_patches_matching_channels() {
        let mut view = view();
        view.bind(
            vec![channel("02a"), channel("02b"), channel("02a")],
            &EnrichmentCache::new(),
        );
        assert!(view.enrich("02a", "alice"));
        assert!(!view.enrich("02a", "alice"));
        let names: Vec<_> = view
            .items()
            .iter()
            .map(|c| resolve_value(c, "node"))
            .collect();
        assert_eq!(
            names,
            vec![
                Some(Value::Text("alice".into())),
                Some(Value::Text("02b".into())),
                Some(Value::Text("alice".into())),
            ]
        );
    }

    #[tokio::test]
    async fn test_bind_uses_cached_aliases() {
        let cache = EnrichmentCache::new();
        cache
            .get_or_fetch("02b", || async { Ok::<_, String>("bob".to_string()) })
            .await
            .unwrap();
        let mut view = view();
        view.bind(vec![channel("02b")], &cache);
        assert_eq!(view.items()[0].node_alias, "bob");
    }

    #[test]
    fn test_default_layout_applies() {
        let mut view = view();
        view.grid().set_viewport(200, 10);
        let rows = view.grid().render_rows();
        assert!(rows[0].starts_with("Channels"));
        assert!(rows[1].contains("Capacity"));
        assert!(!rows[1].contains("chan_id"));
    }
}
