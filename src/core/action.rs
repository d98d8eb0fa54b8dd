//! # Actions
//!
//! Background tasks never touch view state. Everything they produce becomes an
//! `Action`, sent over a channel and applied by the main loop:
//!
//! ```text
//! refresh task ──┐
//! alias lookup ──┼──► mpsc::Sender<Action> ──► main loop ──► views ──► redraw?
//! command task ──┘
//! ```
//!
//! Applying an action returns an [`Effect`] telling the loop what to do next.

use std::fmt;

use crate::lnd::InteractiveSession;
use crate::lnd::types::{
    Channel, Invoice, NodeInfo, Payment, PendingChannel, Peer, Transaction, WalletBalance,
};

/// The on-screen views, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Channels,
    Peers,
    PendingChannels,
    Invoices,
    Payments,
    Transactions,
    Logs,
}

impl ViewId {
    pub const ALL: [ViewId; 7] = [
        ViewId::Channels,
        ViewId::Peers,
        ViewId::PendingChannels,
        ViewId::Invoices,
        ViewId::Payments,
        ViewId::Transactions,
        ViewId::Logs,
    ];

    /// Key used in `[grids.<key>]` config sections.
    pub fn key(self) -> &'static str {
        match self {
            ViewId::Channels => "channels",
            ViewId::Peers => "peers",
            ViewId::PendingChannels => "pending_channels",
            ViewId::Invoices => "invoices",
            ViewId::Payments => "payments",
            ViewId::Transactions => "transactions",
            ViewId::Logs => "logs",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewId::Channels => "Channels",
            ViewId::Peers => "Peers",
            ViewId::PendingChannels => "Pending",
            ViewId::Invoices => "Invoices",
            ViewId::Payments => "Payments",
            ViewId::Transactions => "Transactions",
            ViewId::Logs => "Logs",
        }
    }

    pub fn index(self) -> usize {
        ViewId::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    /// `'1'` is the first view.
    pub fn from_digit(c: char) -> Option<ViewId> {
        let n = c.to_digit(10)? as usize;
        ViewId::ALL.get(n.checked_sub(1)?).copied()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Freshly fetched records for one view.
#[derive(Debug, Clone)]
pub enum ViewUpdate {
    Channels(Vec<Channel>),
    Peers(Vec<Peer>),
    PendingChannels(Vec<PendingChannel>),
    Invoices(Vec<Invoice>),
    Payments(Vec<Payment>),
    Transactions(Vec<Transaction>),
}

impl ViewUpdate {
    pub fn view(&self) -> ViewId {
        match self {
            ViewUpdate::Channels(_) => ViewId::Channels,
            ViewUpdate::Peers(_) => ViewId::Peers,
            ViewUpdate::PendingChannels(_) => ViewId::PendingChannels,
            ViewUpdate::Invoices(_) => ViewId::Invoices,
            ViewUpdate::Payments(_) => ViewId::Payments,
            ViewUpdate::Transactions(_) => ViewId::Transactions,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ViewUpdate::Channels(v) => v.len(),
            ViewUpdate::Peers(v) => v.len(),
            ViewUpdate::PendingChannels(v) => v.len(),
            ViewUpdate::Invoices(v) => v.len(),
            ViewUpdate::Payments(v) => v.len(),
            ViewUpdate::Transactions(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub enum Summary {
    Node(NodeInfo),
    Wallet(WalletBalance),
}

#[derive(Debug)]
pub enum Action {
    /// Replace a view's records.
    Bind(ViewUpdate),
    /// A lookup resolved: patch records of `view` matching `key`.
    Enriched {
        view: ViewId,
        key: String,
        label: String,
    },
    Summary(Summary),
    /// A refresh pipeline failed; bound records are kept.
    RefreshFailed { source: String, error: String },
    /// A mutating command succeeded.
    CommandDone {
        title: String,
        message: String,
        refresh: bool,
    },
    CommandFailed { title: String, error: String },
    /// `newaddress` returned.
    AddressCreated {
        address_type: String,
        address: String,
    },
    /// An interactive command is waiting at its prompt for the user.
    ConfirmationRequested {
        title: String,
        session: InteractiveSession,
    },
}

/// What the main loop should do after applying an action or a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Refresh the active view now.
    Refresh,
}
