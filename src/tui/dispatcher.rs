//! # View Dispatcher
//!
//! Owns every view plus the one pop-up that may be open, and decides where a
//! key goes:
//!
//! ```text
//! key ──► modal open? ──yes──► modal.handle_key ──► closed? drop it
//!              │no
//!              ├── Alt+1..7 ──► switch view (then refresh)
//!              ├── F5 ──────► refresh
//!              ├── arrows / paging ──► active grid
//!              └── anything else ──► active view's shortcut table ──► maybe a modal
//! ```
//!
//! Actions from background tasks are applied through [`ViewDispatcher::apply`],
//! which reports whether the screen needs repainting. Updates for views that
//! are not on screen are kept without a repaint.

use std::time::{Duration, Instant};

use log::{debug, info};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::action::{Action, Effect, Summary, ViewId, ViewUpdate};
use crate::core::config::ResolvedConfig;
use crate::core::context::AppContext;
use crate::core::form::message_form;
use crate::core::key::Key;
use crate::core::logbook::{Level, Logbook};
use crate::core::scheduler::RefreshScheduler;
use crate::lnd::InteractiveSession;
use crate::lnd::client::NewAddressResponse;
use crate::lnd::types::{NodeInfo, WalletBalance};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::summary::{HEADER_HEIGHT, render_header};
use crate::tui::components::{GridPanel, MenuBar};
use crate::tui::event::TuiEvent;
use crate::tui::views::payments::confirm_payment;
use crate::tui::views::transactions::new_address_response_form;
use crate::tui::views::{
    BoundForm, ChannelsView, InvoicesView, LogsView, Modal, ModalState, PaymentsView, PeersView,
    PendingChannelsView, TransactionsView, View,
};

/// Confirmation prompts carry the decoded invoice, so they get a bigger box.
const PROMPT_WIDTH: u16 = 70;
const PROMPT_LINES: u16 = 12;

pub struct ViewDispatcher {
    channels: ChannelsView,
    peers: PeersView,
    pending: PendingChannelsView,
    invoices: InvoicesView,
    payments: PaymentsView,
    transactions: TransactionsView,
    logs: LogsView,
    active: ViewId,
    modal: Option<Box<dyn Modal>>,
    ctx: AppContext,
    scheduler: RefreshScheduler,
    logbook: Logbook,
    node_info: Option<NodeInfo>,
    wallet: Option<WalletBalance>,
    show_header: bool,
}

impl ViewDispatcher {
    pub fn new(config: &ResolvedConfig, ctx: AppContext) -> Self {
        let scheduler = RefreshScheduler::new(
            ctx.client.clone(),
            ctx.cache.clone(),
            ctx.sender(),
            Duration::from_secs(config.refresh_secs),
            config.show_header,
        );
        Self {
            channels: ChannelsView::new(config),
            peers: PeersView::new(config),
            pending: PendingChannelsView::new(config),
            invoices: InvoicesView::new(config),
            payments: PaymentsView::new(config),
            transactions: TransactionsView::new(config),
            logs: LogsView::new(config),
            active: ViewId::Channels,
            modal: None,
            ctx,
            scheduler,
            logbook: Logbook::default(),
            node_info: None,
            wallet: None,
            show_header: config.show_header,
        }
    }

    #[cfg(test)]
    fn active(&self) -> ViewId {
        self.active
    }

    #[cfg(test)]
    fn has_modal(&self) -> bool {
        self.modal.is_some()
    }

    #[cfg(test)]
    fn logbook(&self) -> &Logbook {
        &self.logbook
    }

    fn view_mut(&mut self, id: ViewId) -> &mut dyn View {
        match id {
            ViewId::Channels => &mut self.channels,
            ViewId::Peers => &mut self.peers,
            ViewId::PendingChannels => &mut self.pending,
            ViewId::Invoices => &mut self.invoices,
            ViewId::Payments => &mut self.payments,
            ViewId::Transactions => &mut self.transactions,
            ViewId::Logs => &mut self.logs,
        }
    }

    /// Refresh the active view now.
    pub fn refresh(&mut self) {
        self.scheduler.tick(self.active);
    }

    /// Refresh if the interval has elapsed. Returns true if a refresh started.
    pub fn tick_if_due(&mut self, now: Instant) -> bool {
        if self.scheduler.is_due(now) {
            self.refresh();
            return true;
        }
        false
    }

    fn switch_to(&mut self, view: ViewId) -> Effect {
        if view == self.active {
            return Effect::None;
        }
        info!("Switching to {}", view);
        self.active = view;
        Effect::Refresh
    }

    fn handle_key(&mut self, key: &Key) -> Option<Effect> {
        if let Some(modal) = self.modal.as_mut() {
            if modal.handle_key(key, &self.ctx) == ModalState::Closed {
                self.modal = None;
            }
            return Some(Effect::None);
        }

        if let Key::Alt(c) = key
            && let Some(view) = ViewId::from_digit(*c)
        {
            return Some(self.switch_to(view));
        }

        let active = self.active;
        let grid = self.view_mut(active).grid();
        match key {
            Key::F(5) => return Some(Effect::Refresh),
            Key::Up => grid.move_selection_up(),
            Key::Down => grid.move_selection_down(),
            Key::PageUp => grid.page_up(),
            Key::PageDown => grid.page_down(),
            Key::Home => grid.home(),
            Key::End => grid.end(),
            _ => {
                let modal = self.view_mut(active).handle_shortcut(key)?;
                self.modal = Some(modal);
            }
        }
        Some(Effect::None)
    }

    fn record(&mut self, level: Level, message: String) {
        self.logbook.push(level, message);
        self.logs.set_entries(self.logbook.entries());
    }

    fn show_message(&mut self, title: &str, text: &str) {
        let form = message_form(title, text, 0, 0);
        self.modal = Some(Box::new(BoundForm::info(form)));
    }

    fn request_confirmation(&mut self, title: &str, session: InteractiveSession) {
        let form = message_form(title, session.prompt().trim(), PROMPT_WIDTH, PROMPT_LINES);
        // Cancel drops the closure and with it the session, which kills the process.
        self.modal = Some(Box::new(BoundForm::new(form, move |_, ctx| {
            confirm_payment(session, ctx)
        })));
    }

    /// Apply a background result. Returns true if the screen needs repainting.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Bind(update) => {
                let view = update.view();
                match update {
                    ViewUpdate::Channels(items) => self.channels.bind(items, &self.ctx.cache),
                    ViewUpdate::Peers(items) => self.peers.bind(items, &self.ctx.cache),
                    ViewUpdate::PendingChannels(items) => {
                        self.pending.bind(items, &self.ctx.cache)
                    }
                    ViewUpdate::Invoices(items) => self.invoices.bind(items),
                    ViewUpdate::Payments(items) => self.payments.bind(items),
                    ViewUpdate::Transactions(items) => self.transactions.bind(items),
                }
                view == self.active
            }
            Action::Enriched { view, key, label } => {
                let changed = match view {
                    ViewId::Channels => self.channels.enrich(&key, &label),
                    ViewId::Peers => self.peers.enrich(&key, &label),
                    ViewId::PendingChannels => self.pending.enrich(&key, &label),
                    _ => false,
                };
                changed && view == self.active
            }
            Action::Summary(summary) => {
                match summary {
                    Summary::Node(info) => self.node_info = Some(info),
                    Summary::Wallet(balance) => self.wallet = Some(balance),
                }
                self.show_header
            }
            Action::RefreshFailed { source, error } => {
                self.record(Level::Warn, format!("{source}: {error}"));
                self.active == ViewId::Logs
            }
            Action::CommandDone {
                title,
                message,
                refresh,
            } => {
                self.record(Level::Info, format!("{title}: {message}"));
                self.show_message(&title, &message);
                if refresh {
                    self.refresh();
                }
                true
            }
            Action::CommandFailed { title, error } => {
                self.record(Level::Error, format!("{title}: {error}"));
                self.show_message(&title, &error);
                true
            }
            Action::AddressCreated {
                address_type,
                address,
            } => {
                self.modal = Some(new_address_response_form(NewAddressResponse {
                    address_type,
                    address,
                }));
                true
            }
            Action::ConfirmationRequested { title, session } => {
                debug!("Awaiting confirmation for {}", title);
                self.request_confirmation(&title, session);
                true
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let header_height = if self.show_header { HEADER_HEIGHT } else { 0 };
        let [menu_area, header_area, body_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(header_height),
            Constraint::Min(0),
        ])
        .areas(area);

        if self.show_header {
            render_header(
                frame,
                header_area,
                self.node_info.as_ref(),
                self.wallet.as_ref(),
            );
        }

        let active = self.active;
        let view = self.view_mut(active);
        MenuBar::new(active, view.shortcut_header(), view.shortcuts()).render(frame, menu_area);
        GridPanel::new(view.grid()).render(frame, body_area);

        if let Some(modal) = self.modal.as_mut() {
            modal.render(frame, area);
        }
    }
}

impl EventHandler for ViewDispatcher {
    type Event = Effect;

    /// `None` when the event was ignored.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Effect> {
        match event {
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::Resize | TuiEvent::Quit => None,
        }
    }
}
