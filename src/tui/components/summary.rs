//! # Summary Header
//!
//! Two bordered panels above the grid, refreshed with every tick:
//!
//! ```text
//! ┌ Node ───────────────────────────┐┌ Wallet ──────────────────┐
//! │ Alias:    my-node               ││ Total:        1,234,567  │
//! │ Pubkey:   02aa…                 ││ Confirmed:    1,200,000  │
//! │ ...                             ││ Unconfirmed:     34,567  │
//! └─────────────────────────────────┘└──────────────────────────┘
//! ```
//!
//! Before the first summary arrives the panels show a placeholder.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::grid::group_thousands;
use crate::lnd::types::{NodeInfo, WalletBalance};
use crate::tui::component::Component;

/// Rows the header takes, borders included.
pub const HEADER_HEIGHT: u16 = 9;

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<13}"), Style::default().fg(Color::Gray)),
        Span::raw(value),
    ])
}

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {title} "))
}

fn placeholder() -> Vec<Line<'static>> {
    vec![Line::styled("loading...", Style::default().fg(Color::DarkGray))]
}

pub struct NodePanel<'a> {
    pub info: Option<&'a NodeInfo>,
}

impl NodePanel<'_> {
    fn lines(&self) -> Vec<Line<'static>> {
        let Some(info) = self.info else {
            return placeholder();
        };
        vec![
            field("Alias:", info.alias.clone()),
            field("Pubkey:", info.identity_pubkey.clone()),
            field("Version:", info.version.clone()),
            field(
                "Chains:",
                format!("{} ({})", info.chain_names(), info.network()),
            ),
            field(
                "Synced:",
                format!(
                    "{} at block {}",
                    if info.synced_to_chain { "yes" } else { "no" },
                    info.block_height
                ),
            ),
            field("Peers:", info.num_peers.to_string()),
            field(
                "Channels:",
                format!(
                    "{} active, {} inactive, {} pending",
                    info.num_active_channels, info.num_inactive_channels, info.num_pending_channels
                ),
            ),
        ]
    }
}

impl Component for NodePanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.lines()).block(panel("Node")), area);
    }
}

pub struct WalletPanel<'a> {
    pub balance: Option<&'a WalletBalance>,
}

impl WalletPanel<'_> {
    fn lines(&self) -> Vec<Line<'static>> {
        let Some(balance) = self.balance else {
            return placeholder();
        };
        let amount = |sat: i64| format!("{:>15} sat", group_thousands(sat));
        vec![
            field("Total:", amount(balance.total_balance)),
            field("Confirmed:", amount(balance.confirmed_balance)),
            field("Unconfirmed:", amount(balance.unconfirmed_balance)),
        ]
    }
}

impl Component for WalletPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.lines()).block(panel("Wallet")), area);
    }
}

/// Node and wallet panels side by side.
pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    info: Option<&NodeInfo>,
    balance: Option<&WalletBalance>,
) {
    let [node_area, wallet_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
    NodePanel { info }.render(frame, node_area);
    WalletPanel { balance }.render(frame, wallet_area);
}
