//! Invoices view: Alt+A adds an invoice, Alt+D (or Enter) shows the selected one.

use crate::core::action::ViewId;
use crate::core::config::ResolvedConfig;
use crate::core::form::{Form, FormSchema};
use crate::core::grid::{ColumnFormat, Grid, GridSurface, format_timestamp, group_thousands};
use crate::core::key::Key;
use crate::lnd::client::AddInvoiceRequest;
use crate::lnd::types::Invoice;

use super::{BoundForm, Modal, Shortcut, View, build_grid, shortcut_header};

const SHORTCUTS: &[Shortcut] = &[
    Shortcut::new(Key::Alt('a'), "Add"),
    Shortcut::new(Key::Alt('d'), "Details"),
];

const DETAIL_WIDTH: u16 = 50;

pub fn add_invoice_schema() -> FormSchema<AddInvoiceRequest> {
    FormSchema::new()
        .text("memo", "Memo", 64, |r: &mut AddInvoiceRequest| &mut r.memo)
        .text("receipt", "Receipt", 64, |r| &mut r.receipt)
        .text("preimage", "Preimage", 64, |r| &mut r.preimage)
        .integer("amt", "Amount (sat)", 16, |r| &mut r.amt)
        .text("description_hash", "Description hash", 64, |r| {
            &mut r.description_hash
        })
        .text("fallback_addr", "Fallback address", 64, |r| &mut r.fallback_addr)
        .integer("expiry", "Expiry (s)", 8, |r| &mut r.expiry)
        .boolean("private", "Private", |r| &mut r.private)
}

/// Read-only projection of an invoice for the details pop-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceDetails {
    pub memo: String,
    pub receipt: String,
    pub r_hash: String,
    pub value: String,
    pub settled: String,
    pub creation_date: String,
    pub settle_date: String,
    pub expiry: String,
    pub amt_paid: String,
    pub payment_request: String,
}

impl From<&Invoice> for InvoiceDetails {
    fn from(invoice: &Invoice) -> Self {
        Self {
            memo: invoice.memo.clone(),
            receipt: invoice.receipt.clone(),
            r_hash: invoice.r_hash.clone(),
            value: group_thousands(invoice.value),
            settled: if invoice.settled { "yes" } else { "no" }.to_string(),
            creation_date: format_timestamp(invoice.creation_date),
            settle_date: format_timestamp(invoice.settle_date),
            expiry: invoice.expiry.to_string(),
            amt_paid: group_thousands(invoice.amt_paid_sat),
            payment_request: invoice.payment_request.clone(),
        }
    }
}

pub fn invoice_details_schema() -> FormSchema<InvoiceDetails> {
    FormSchema::new()
        .text("memo", "Memo", DETAIL_WIDTH, |r: &mut InvoiceDetails| &mut r.memo)
        .readonly()
        .text("receipt", "Receipt", DETAIL_WIDTH, |r| &mut r.receipt)
        .readonly()
        .text("r_hash", "Hash", DETAIL_WIDTH, |r| &mut r.r_hash)
        .readonly()
        .text("value", "Value", DETAIL_WIDTH, |r| &mut r.value)
        .readonly()
        .text("settled", "Settled", DETAIL_WIDTH, |r| &mut r.settled)
        .readonly()
        .text("creation_date", "Created", DETAIL_WIDTH, |r| &mut r.creation_date)
        .readonly()
        .text("settle_date", "Settle date", DETAIL_WIDTH, |r| &mut r.settle_date)
        .readonly()
        .text("expiry", "Expiry", DETAIL_WIDTH, |r| &mut r.expiry)
        .readonly()
        .text("amt_paid", "Paid (sat)", DETAIL_WIDTH, |r| &mut r.amt_paid)
        .readonly()
        .text("payment_request", "Pay req", DETAIL_WIDTH, |r| &mut r.payment_request)
        .lines(5)
        .readonly()
}

pub struct InvoicesView {
    grid: Grid<Invoice>,
    shortcut_header: String,
}

impl InvoicesView {
    pub fn new(config: &ResolvedConfig) -> Self {
        use ColumnFormat::*;
        let grid = build_grid(
            ViewId::Invoices,
            config,
            &[
                ("settled", 2, Boolean),
                ("private", 2, Boolean),
                ("memo", 0, Text),
                ("receipt", 0, Text),
                ("r_hash", 0, Text),
                ("value", 16, Integer),
                ("creation_date", 18, Timestamp),
                ("settle_date", 18, Timestamp),
                ("payment_request", 0, Text),
                ("expiry", 10, Integer),
                ("add_index", 8, Integer),
                ("amt_paid_sat", 16, Integer),
                ("amt_paid_msat", 16, Integer),
            ],
        );
        Self {
            grid,
            shortcut_header: shortcut_header(ViewId::Invoices, config),
        }
    }

    pub fn bind(&mut self, invoices: Vec<Invoice>) {
        self.grid.bind_items(invoices);
    }

    fn add_form() -> Box<dyn Modal> {
        let form = Form::new("Add invoice", AddInvoiceRequest::default(), add_invoice_schema());
        Box::new(BoundForm::new(form, |request, ctx| {
            ctx.run_command("Add invoice", |client| async move {
                client
                    .add_invoice(&request)
                    .await
                    .map(|pay_req| format!("Payment request:\n{pay_req}"))
            });
        }))
    }

    fn details_form(invoice: &Invoice) -> Box<dyn Modal> {
        let form = Form::new(
            "Invoice",
            InvoiceDetails::from(invoice),
            invoice_details_schema(),
        )
        .focus_ok();
        Box::new(BoundForm::info(form))
    }
}

impl View for InvoicesView {
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
            Key::Alt('a') => Some(Self::add_form()),
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

    #[test]
    fn test_details_are_readonly_strings() {
        let invoice = Invoice {
            memo: "coffee".into(),
            value: 1_500,
            settled: true,
            creation_date: 0,
            payment_request: "lnbc15u1p...".into(),
            ..Default::default()
        };
        let details = InvoiceDetails::from(&invoice);
        assert_eq!(details.value, "1,500");
        assert_eq!(details.settled, "yes");
        assert_eq!(details.creation_date, "");
        assert!(invoice_details_schema().descriptors().all(|d| d.readonly));
    }

    #[test]
    fn test_details_open_with_ok_focused() {
        let form = Form::new(
            "Invoice",
            InvoiceDetails::default(),
            invoice_details_schema(),
        )
        .focus_ok();
        assert_eq!(form.focus(), Focus::Ok);
        assert_eq!(form.height(), 9 + 5 + 4);
    }

    #[test]
    fn test_enter_opens_details_for_selection() {
        let mut view = InvoicesView::new(&resolve(&LnboardConfig::default(), &CliOverrides::default()));
        assert!(view.handle_shortcut(&Key::Enter).is_none());
        view.bind(vec![Invoice::default()]);
        assert!(view.handle_shortcut(&Key::Enter).is_some());
        assert!(view.handle_shortcut(&Key::Alt('a')).is_some());
    }
}
