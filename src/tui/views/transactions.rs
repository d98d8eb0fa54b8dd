//! On-chain transactions view. Alt+N asks the wallet for a new address.

use crate::core::action::{Action, ViewId};
use crate::core::config::ResolvedConfig;
use crate::core::form::{Form, FormSchema};
use crate::core::grid::{ColumnFormat, Grid, GridSurface};
use crate::core::key::Key;
use crate::lnd::client::{NewAddressRequest, NewAddressResponse};
use crate::lnd::types::Transaction;

use super::{BoundForm, Modal, Shortcut, View, build_grid, shortcut_header};

const SHORTCUTS: &[Shortcut] = &[Shortcut::new(Key::Alt('n'), "New address")];

const TITLE: &str = "New address";

pub fn new_address_schema() -> FormSchema<NewAddressRequest> {
    FormSchema::new().text("address_type", "Type (np2wkh|p2wkh)", 6, |r: &mut NewAddressRequest| {
        &mut r.address_type
    })
}

pub fn new_address_response_schema() -> FormSchema<NewAddressResponse> {
    FormSchema::new()
        .text("address_type", "Type", 6, |r: &mut NewAddressResponse| {
            &mut r.address_type
        })
        .readonly()
        .text("address", "Address", 50, |r| &mut r.address)
        .readonly()
}

/// Pop-up showing the address `newaddress` returned.
pub fn new_address_response_form(response: NewAddressResponse) -> Box<dyn Modal> {
    let form = Form::new(TITLE, response, new_address_response_schema()).focus_ok();
    Box::new(BoundForm::info(form))
}

pub struct TransactionsView {
    grid: Grid<Transaction>,
    shortcut_header: String,
}

impl TransactionsView {
    pub fn new(config: &ResolvedConfig) -> Self {
        use ColumnFormat::*;
        let grid = build_grid(
            ViewId::Transactions,
            config,
            &[
                ("amount", 12, Integer),
                ("num_confirmations", 8, Integer),
                ("block_height", 8, Integer),
                ("total_fees", 8, Integer),
                ("time_stamp", 18, Timestamp),
                ("tx_hash", 0, Text),
                ("block_hash", 0, Text),
                ("dest_addresses", 0, List),
            ],
        );
        Self {
            grid,
            shortcut_header: shortcut_header(ViewId::Transactions, config),
        }
    }

    pub fn bind(&mut self, transactions: Vec<Transaction>) {
        self.grid.bind_items(transactions);
    }

    fn new_address_form() -> Box<dyn Modal> {
        let form = Form::new(TITLE, NewAddressRequest::default(), new_address_schema());
        Box::new(BoundForm::new(form, |request, ctx| {
            let client = ctx.client.clone();
            ctx.spawn(async move {
                match client.new_address(&request).await {
                    Ok(address) => Action::AddressCreated {
                        address_type: request.address_type,
                        address,
                    },
                    Err(e) => Action::CommandFailed {
                        title: TITLE.to_string(),
                        error: e.to_string(),
                    },
                }
            });
        }))
    }
}

impl View for TransactionsView {
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
            Key::Alt('n') => Some(Self::new_address_form()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::AppContext;
    use crate::core::enrichment::EnrichmentCache;
    use crate::core::config::{CliOverrides, LnboardConfig, resolve};
    use crate::test_support::{FakeRunner, fake_client, recv_actions};
    use std::sync::{Arc, mpsc};

    #[tokio::test]
    async fn test_new_address_form_submits_default_type() {
        let runner = FakeRunner::new();
        runner.respond("newaddress", 0, r#"{"address": "3Jx7"}"#);
        let (tx, rx) = mpsc::channel();
        let ctx = AppContext::new(fake_client(runner.clone()), Arc::new(EnrichmentCache::new()), tx);

        let mut view = TransactionsView::new(&resolve(&LnboardConfig::default(), &CliOverrides::default()));
        let mut modal = view.handle_shortcut(&Key::Alt('n')).unwrap();
        modal.handle_key(&Key::Tab, &ctx);
        modal.handle_key(&Key::Enter, &ctx);

        match recv_actions(&rx, 1).await.remove(0) {
            Action::AddressCreated {
                address_type,
                address,
            } => {
                assert_eq!(address_type, "np2wkh");
                assert_eq!(address, "3Jx7");
            }
            other => panic!("unexpected action: {other:?}"),
        }
        assert_eq!(runner.requests()[0].args, vec!["newaddress", "np2wkh"]);
    }

    #[test]
    fn test_response_form_is_readonly() {
        assert!(new_address_response_schema().descriptors().all(|d| d.readonly));
    }
}
