//! Pending channels view: Alt+D (or Enter) shows the selected channel.
//!
//! Rows come from all four `pendingchannels` lists; the `T` column tells them
//! apart (O open, C closing, F force closing, W waiting close). The details
//! pop-up shows the fields that matter for that kind.

use crate::core::action::ViewId;
use crate::core::config::ResolvedConfig;
use crate::core::enrichment::EnrichmentCache;
use crate::core::form::{Form, FormSchema};
use crate::core::grid::{ColumnFormat, Grid, GridSurface, group_thousands};
use crate::core::key::Key;
use crate::lnd::types::{PendingChannel, PendingKind};

use super::{BoundForm, Modal, Shortcut, View, build_grid, shortcut_header};

const SHORTCUTS: &[Shortcut] = &[Shortcut::new(Key::Alt('d'), "Details")];

const WIDE: u16 = 32;
const NARROW: u16 = 16;

/// Read-only projection of a pending channel for the details pop-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChannelDetails {
    pub node_alias: String,
    pub channel_point: String,
    pub capacity: String,
    pub local_balance: String,
    pub remote_balance: String,
    pub closing_txid: String,
    pub limbo_balance: String,
    pub recovered_balance: String,
    pub maturity_height: String,
    pub blocks_til_maturity: String,
    pub pending_htlcs: String,
    pub commit_fee: String,
    pub commit_weight: String,
    pub fee_per_kw: String,
    pub confirmation_height: String,
}

impl From<&PendingChannel> for PendingChannelDetails {
    fn from(c: &PendingChannel) -> Self {
        Self {
            node_alias: c.node_alias.clone(),
            channel_point: c.channel_point.clone(),
            capacity: group_thousands(c.capacity),
            local_balance: group_thousands(c.local_balance),
            remote_balance: group_thousands(c.remote_balance),
            closing_txid: c.closing_txid.clone(),
            limbo_balance: group_thousands(c.limbo_balance),
            recovered_balance: group_thousands(c.recovered_balance),
            maturity_height: c.maturity_height.to_string(),
            blocks_til_maturity: c.blocks_til_maturity.to_string(),
            pending_htlcs: c.pending_htlcs.to_string(),
            commit_fee: group_thousands(c.commit_fee),
            commit_weight: group_thousands(c.commit_weight),
            fee_per_kw: group_thousands(c.fee_per_kw),
            confirmation_height: c.confirmation_height.to_string(),
        }
    }
}

/// Every field is read-only; which ones appear depends on `kind`.
pub fn pending_details_schema(kind: PendingKind) -> FormSchema<PendingChannelDetails> {
    let schema = FormSchema::new()
        .text("node_alias", "Node alias", WIDE, |r: &mut PendingChannelDetails| {
            &mut r.node_alias
        })
        .readonly()
        .text("channel_point", "Channel point", WIDE, |r| &mut r.channel_point)
        .lines(2)
        .readonly()
        .text("capacity", "Capacity", NARROW, |r| &mut r.capacity)
        .readonly()
        .text("local_balance", "Local balance", NARROW, |r| &mut r.local_balance)
        .readonly()
        .text("remote_balance", "Remote balance", NARROW, |r| &mut r.remote_balance)
        .readonly();
    match kind {
        PendingKind::Open => schema
            .text("commit_fee", "Commit fee", NARROW, |r| &mut r.commit_fee)
            .readonly()
            .text("commit_weight", "Commit weight", NARROW, |r| &mut r.commit_weight)
            .readonly()
            .text("fee_per_kw", "Fee per kw", NARROW, |r| &mut r.fee_per_kw)
            .readonly()
            .text("confirmation_height", "Confirmation height", NARROW, |r| {
                &mut r.confirmation_height
            })
            .readonly(),
        PendingKind::Closing => schema
            .text("closing_txid", "Closing txid", WIDE, |r| &mut r.closing_txid)
            .lines(2)
            .readonly(),
        PendingKind::ForceClosing => schema
            .text("limbo_balance", "Limbo balance", NARROW, |r| &mut r.limbo_balance)
            .readonly()
            .text("recovered_balance", "Recovered balance", NARROW, |r| {
                &mut r.recovered_balance
            })
            .readonly()
            .text("maturity_height", "Maturity height", NARROW, |r| &mut r.maturity_height)
            .readonly()
            .text("blocks_til_maturity", "Blocks until maturity", NARROW, |r| {
                &mut r.blocks_til_maturity
            })
            .readonly()
            .text("pending_htlcs", "Pending HTLCs", NARROW, |r| &mut r.pending_htlcs)
            .readonly(),
        PendingKind::WaitingClose => schema
            .text("limbo_balance", "Limbo balance", NARROW, |r| &mut r.limbo_balance)
            .readonly(),
    }
}

pub struct PendingChannelsView {
    grid: Grid<PendingChannel>,
    shortcut_header: String,
}

impl PendingChannelsView {
    pub fn new(config: &ResolvedConfig) -> Self {
        use ColumnFormat::*;
        let grid = build_grid(
            ViewId::PendingChannels,
            config,
            &[
                ("type", 2, Text),
                ("node", 0, Text),
                ("remote_node_pub", 0, Text),
                ("channel_point", 0, Text),
                ("capacity", 10, Integer),
                ("local_balance", 10, Integer),
                ("remote_balance", 10, Integer),
                ("closing_txid", 0, Text),
                ("limbo_balance", 10, Integer),
                ("recovered_balance", 10, Integer),
                ("maturity_height", 8, Integer),
                ("blocks_til_maturity", 6, Integer),
                ("confirmation_height", 8, Integer),
            ],
        );
        Self {
            grid,
            shortcut_header: shortcut_header(ViewId::PendingChannels, config),
        }
    }

    /// Rebind, filling in aliases that are already known.
    pub fn bind(&mut self, mut channels: Vec<PendingChannel>, cache: &EnrichmentCache) {
        for channel in &mut channels {
            if let Some(alias) = cache.peek(&channel.remote_node_pub) {
                channel.node_alias = alias;
            }
        }
        self.grid.bind_items(channels);
    }

    /// Patch the alias of every channel with `pubkey`. Returns true if any changed.
    pub fn enrich(&mut self, pubkey: &str, alias: &str) -> bool {
        let mut changed = false;
        for channel in self.grid.items_mut() {
            if channel.remote_node_pub == pubkey && channel.node_alias != alias {
                channel.node_alias = alias.to_string();
                changed = true;
            }
        }
        changed
    }

    fn details_form(channel: &PendingChannel) -> Box<dyn Modal> {
        let form = Form::new(
            channel.kind.title(),
            PendingChannelDetails::from(channel),
            pending_details_schema(channel.kind),
        )
        .focus_ok();
        Box::new(BoundForm::info(form))
    }
}

impl View for PendingChannelsView {
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
            Key::Alt('d') | Key::Enter => self.grid.selected_item().map(Self::details_form),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, LnboardConfig, resolve};
    use crate::core::form::Focus;

    fn view() -> PendingChannelsView {
        PendingChannelsView::new(&resolve(&LnboardConfig::default(), &CliOverrides::default()))
    }

    fn pending(kind: PendingKind, pubkey: &str) -> PendingChannel {
        PendingChannel {
            kind,
            remote_node_pub: pubkey.into(),
            capacity: 1_000_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_details_fields_depend_on_kind() {
        let count = |kind| pending_details_schema(kind).descriptors().count();
        assert_eq!(count(PendingKind::Open), 9);
        assert_eq!(count(PendingKind::Closing), 6);
        assert_eq!(count(PendingKind::ForceClosing), 10);
        assert_eq!(count(PendingKind::WaitingClose), 6);
        assert!(pending_details_schema(PendingKind::ForceClosing)
            .descriptors()
            .all(|d| d.readonly));
    }

    #[test]
    fn test_details_open_with_ok_focused() {
        let channel = pending(PendingKind::WaitingClose, "02a");
        let details = PendingChannelDetails::from(&channel);
        assert_eq!(details.capacity, "1,000,000");
        let form = Form::new(
            channel.kind.title(),
            details,
            pending_details_schema(channel.kind),
        )
        .focus_ok();
        assert_eq!(form.focus(), Focus::Ok);
    }

    #[test]
    fn test_enter_opens_details_for_selection() {
        let mut view = view();
        assert!(view.handle_shortcut(&Key::Enter).is_none());
        view.bind(vec![pending(PendingKind::Open, "02a")], &EnrichmentCache::new());
        assert!(view.handle_shortcut(&Key::Alt('d')).is_some());
        assert!(view.handle_shortcut(&Key::Alt('c')).is_none());
    }

    #[test]
    fn test_enrich_and_default_layout() {
        let mut view = view();
        view.bind(
            vec![
                pending(PendingKind::Closing, "02a"),
                pending(PendingKind::ForceClosing, "02b"),
            ],
            &EnrichmentCache::new(),
        );
        assert!(view.enrich("02a", "alice"));
        assert!(!view.enrich("02a", "alice"));
        view.grid().set_viewport(80, 10);
        let rows = view.grid().render_rows();
        assert!(rows[0].starts_with("Pending channels"));
        assert!(rows[1].starts_with("T│Node"));
        assert!(rows[2].starts_with("C│alice"));
        assert!(rows[3].starts_with("F│02b"));
    }
}
