//! Payments view: Alt+P pays an invoice.
//!
//! Paying is interactive. `lncli payinvoice` prints the decoded invoice and
//! asks for confirmation; the prompt is shown to the user in a message form
//! and only their OK sends "yes":
//!
//! ```text
//! Pay form OK ──► begin_payment ──► Action::ConfirmationRequested ──► message form
//!                                                                      │OK      │Cancel
//!                                                                      ▼        ▼
//!                                                          finish("yes")   session dropped
//! ```

use log::info;

use crate::core::action::{Action, ViewId};
use crate::core::config::ResolvedConfig;
use crate::core::context::AppContext;
use crate::core::form::{Form, FormSchema};
use crate::core::grid::{ColumnFormat, Grid, GridSurface};
use crate::core::key::Key;
use crate::lnd::client::{PAY_DONE, PayInvoiceRequest, payment_outcome};
use crate::lnd::{COMPLETION_TIMEOUT, InteractiveSession};
use crate::lnd::types::Payment;

use super::{BoundForm, Modal, Shortcut, View, build_grid, shortcut_header};

const SHORTCUTS: &[Shortcut] = &[Shortcut::new(Key::Alt('p'), "Pay")];

pub const PAY_TITLE: &str = "Pay invoice";
pub const PAY_SUCCESS: &str = "Success";

pub fn pay_invoice_schema() -> FormSchema<PayInvoiceRequest> {
    FormSchema::new()
        .text("pay_req", "Pay req", 70, |r: &mut PayInvoiceRequest| &mut r.pay_req)
        .lines(3)
        .integer("amount", "Amount (sat)", 16, |r| &mut r.amount)
        .integer("fee_limit", "Fee limit (sat)", 5, |r| &mut r.fee_limit)
        .integer("fee_limit_percent", "Fee limit (%)", 3, |r| &mut r.fee_limit_percent)
        .boolean("force", "Skip confirmation", |r| &mut r.force)
}

fn settle(output: &str) -> Action {
    match payment_outcome(output) {
        Ok(()) => Action::CommandDone {
            title: PAY_TITLE.to_string(),
            message: PAY_SUCCESS.to_string(),
            refresh: true,
        },
        Err(error) => Action::CommandFailed {
            title: PAY_TITLE.to_string(),
            error,
        },
    }
}

/// Start paying. Without `force` the result is a confirmation request.
pub fn start_payment(request: PayInvoiceRequest, ctx: &AppContext) {
    let client = ctx.client.clone();
    ctx.spawn(async move {
        if request.force {
            return match client.pay_forced(&request).await {
                Ok(output) => settle(&output),
                Err(e) => Action::CommandFailed {
                    title: PAY_TITLE.to_string(),
                    error: e.to_string(),
                },
            };
        }
        match client.begin_payment(&request).await {
            Ok(session) => Action::ConfirmationRequested {
                title: PAY_TITLE.to_string(),
                session,
            },
            Err(e) => Action::CommandFailed {
                title: PAY_TITLE.to_string(),
                error: e.to_string(),
            },
        }
    });
}

/// Answer "yes" at the prompt and wait for the payment to complete.
pub fn confirm_payment(session: InteractiveSession, ctx: &AppContext) {
    info!("Payment confirmed by user");
    ctx.spawn(async move {
        match session.finish(Some("yes"), &PAY_DONE, COMPLETION_TIMEOUT).await {
            Ok(output) => settle(&output),
            Err(e) => Action::CommandFailed {
                title: PAY_TITLE.to_string(),
                error: e.to_string(),
            },
        }
    });
}

pub struct PaymentsView {
    grid: Grid<Payment>,
    shortcut_header: String,
}

impl PaymentsView {
    pub fn new(config: &ResolvedConfig) -> Self {
        use ColumnFormat::*;
        let grid = build_grid(
            ViewId::Payments,
            config,
            &[
                ("creation_date", 18, Timestamp),
                ("payment_hash", 0, Text),
                ("value", 16, Integer),
                ("value_msat", 16, Integer),
                ("fee", 16, Integer),
                ("payment_preimage", 0, Text),
                ("path", 0, List),
                ("hops", 5, Integer),
            ],
        );
        Self {
            grid,
            shortcut_header: shortcut_header(ViewId::Payments, config),
        }
    }

    pub fn bind(&mut self, payments: Vec<Payment>) {
        self.grid.bind_items(payments);
    }

    fn pay_form() -> Box<dyn Modal> {
        let form = Form::new(PAY_TITLE, PayInvoiceRequest::default(), pay_invoice_schema());
        Box::new(BoundForm::new(form, start_payment))
    }
}

impl View for PaymentsView {
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
            Key::Alt('p') => Some(Self::pay_form()),
            _ => None,
        }
    }
}
