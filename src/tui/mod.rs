//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, runs the main loop and hands
//! keys and background results to the [`ViewDispatcher`](dispatcher::ViewDispatcher).
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Main Loop
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ draw (only if needs_redraw)                                  │
//! │ refresh if the interval elapsed                              │
//! │ poll one event (up to 250ms), then drain the pending ones    │
//! │ drain Actions from background tasks                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here blocks on `lncli`: every command runs on a tokio task and comes
//! back as an `Action` over the channel.

mod component;
mod components;
mod dispatcher;
mod event;
mod views;

use log::{debug, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;

use crate::core::action::Effect;
use crate::core::config::ResolvedConfig;
use crate::core::context::AppContext;
use crate::core::enrichment::EnrichmentCache;
use crate::lnd::{CommandGateway, LndClient, TokioRunner};
use crate::tui::component::EventHandler;
use crate::tui::dispatcher::ViewDispatcher;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const POLL_TIMEOUT: Duration = Duration::from_millis(250);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), Hide)?;
        info!("Terminal modes enabled (hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let gateway = CommandGateway::new(
        Arc::new(TokioRunner),
        &config.lncli,
        config.global_args(),
    );
    let client = LndClient::new(gateway);
    let (tx, rx) = mpsc::channel();
    let ctx = AppContext::new(client, Arc::new(EnrichmentCache::new()), tx);
    let mut dispatcher = ViewDispatcher::new(&config, ctx);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();
    info!(
        "lnboard started: lncli={}, refresh every {}s",
        config.lncli, config.refresh_secs
    );

    let mut needs_redraw = true;

    'main: loop {
        if needs_redraw {
            terminal.draw(|f| dispatcher.render(f))?;
            needs_redraw = false;
        }

        dispatcher.tick_if_due(Instant::now());

        let first_event = poll_event_timeout(POLL_TIMEOUT);
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Quit => break 'main,
                TuiEvent::Resize => needs_redraw = true,
                TuiEvent::Key(_) => {
                    if let Some(effect) = dispatcher.handle_event(&event) {
                        needs_redraw = true;
                        if effect == Effect::Refresh {
                            dispatcher.refresh();
                        }
                    }
                }
            }
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            debug!("Event loop received: {:?}", action);
            if dispatcher.apply(action) {
                needs_redraw = true;
            }
        }
    }

    info!("lnboard shutting down");
    ratatui::restore();
    Ok(())
}
