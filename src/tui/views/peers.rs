//! Peers view: Alt+C connects a peer, Alt+D disconnects the selected one.

use crate::core::action::ViewId;
use crate::core::config::ResolvedConfig;
use crate::core::enrichment::EnrichmentCache;
use crate::core::form::{Form, FormSchema};
use crate::core::grid::{ColumnFormat, Grid, GridSurface};
use crate::core::key::Key;
use crate::lnd::client::{ConnectPeerRequest, DisconnectPeerRequest};
use crate::lnd::types::Peer;

use super::{BoundForm, Modal, Shortcut, View, build_grid, shortcut_header};

const SHORTCUTS: &[Shortcut] = &[
    Shortcut::new(Key::Alt('c'), "Connect"),
    Shortcut::new(Key::Alt('d'), "Disconnect"),
];

pub fn connect_schema() -> FormSchema<ConnectPeerRequest> {
    FormSchema::new()
        .text("pub_key", "Pubkey", 64, |r: &mut ConnectPeerRequest| &mut r.pub_key)
        .text("host", "Host", 16, |r| &mut r.host)
        .integer("port", "Port", 5, |r| &mut r.port)
}

pub fn disconnect_schema() -> FormSchema<DisconnectPeerRequest> {
    FormSchema::new()
        .text("alias", "Alias", 32, |r: &mut DisconnectPeerRequest| &mut r.alias)
        .readonly()
        .text("pub_key", "Pubkey", 32, |r| &mut r.pub_key)
        .lines(3)
        .readonly()
}

pub struct PeersView {
    grid: Grid<Peer>,
    shortcut_header: String,
}

impl PeersView {
    pub fn new(config: &ResolvedConfig) -> Self {
        use ColumnFormat::*;
        let grid = build_grid(
            ViewId::Peers,
            config,
            &[
                ("alias", 0, Text),
                ("pub_key", 0, Text),
                ("address", 22, Text),
                ("bytes_sent", 13, Integer),
                ("bytes_recv", 13, Integer),
                ("sat_sent", 12, Integer),
                ("sat_recv", 12, Integer),
                ("inbound", 2, Boolean),
                ("ping_time", 6, Integer),
            ],
        );
        Self {
            grid,
            shortcut_header: shortcut_header(ViewId::Peers, config),
        }
    }

    pub fn bind(&mut self, mut peers: Vec<Peer>, cache: &EnrichmentCache) {
        for peer in &mut peers {
            if let Some(alias) = cache.peek(&peer.pub_key) {
                peer.alias = alias;
            }
        }
        self.grid.bind_items(peers);
    }

    pub fn enrich(&mut self, pubkey: &str, alias: &str) -> bool {
        let mut changed = false;
        for peer in self.grid.items_mut() {
            if peer.pub_key == pubkey && peer.alias != alias {
                peer.alias = alias.to_string();
                changed = true;
            }
        }
        changed
    }

    #[cfg(test)]
    pub fn items(&self) -> &[Peer] {
        self.grid.items()
    }

    fn connect_form() -> Box<dyn Modal> {
        let form = Form::new("Connect peer", ConnectPeerRequest::default(), connect_schema());
        Box::new(BoundForm::new(form, |request, ctx| {
            ctx.run_command("Connect peer", |client| async move {
                client
                    .connect(&request)
                    .await
                    .map(|_| format!("Connected to\n{}", request.pub_key))
            });
        }))
    }

    fn disconnect_form(peer: &Peer) -> Box<dyn Modal> {
        let form = Form::new(
            "Disconnect peer",
            DisconnectPeerRequest::for_peer(peer),
            disconnect_schema(),
        );
        Box::new(BoundForm::new(form, |request, ctx| {
            ctx.run_command("Disconnect peer", |client| async move {
                client
                    .disconnect(&request)
                    .await
                    .map(|_| format!("Disconnected from\n{}", request.pub_key))
            });
        }))
    }
}

impl View for PeersView {
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
            Key::Alt('c') => Some(Self::connect_form()),
            Key::Alt('d') => self.grid.selected_item().map(Self::disconnect_form),
            _ => None,
        }
    }
}
