//! # Views
//!
//! One module per screen. A view owns a grid over its record type, a table of
//! shortcuts, and the forms those shortcuts open:
//!
//! ```text
//! view
//! ├── grid: Grid<Record>                       bound by Action::Bind
//! ├── shortcuts: [(Alt+C, "Close"), ...]       shown in the menu bar
//! └── handle_shortcut(key) → Box<dyn Modal>    a pop-up form
//! ```
//!
//! Forms are wrapped in a [`BoundForm`], which pairs the form with what to do
//! with its record once the user presses OK.

pub mod channels;
pub mod invoices;
pub mod logs;
pub mod payments;
pub mod peers;
pub mod pending_channels;
pub mod transactions;

use ratatui::Frame;
use ratatui::layout::Rect;

use crate::core::action::ViewId;
use crate::core::config::ResolvedConfig;
use crate::core::context::AppContext;
use crate::core::form::Form;
use crate::core::grid::{ColumnFormat, Grid, GridSurface};
use crate::core::key::Key;
use crate::core::record::Record;
use crate::tui::component::Component;
use crate::tui::components::FormPanel;

pub use channels::ChannelsView;
pub use invoices::InvoicesView;
pub use logs::LogsView;
pub use payments::PaymentsView;
pub use peers::PeersView;
pub use pending_channels::PendingChannelsView;
pub use transactions::TransactionsView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: Key,
    pub label: &'static str,
}

impl Shortcut {
    pub const fn new(key: Key, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Human form of a key, as shown in the menu bar.
pub fn key_label(key: Key) -> String {
    match key {
        Key::Alt(c) => format!("Alt+{}", c.to_ascii_uppercase()),
        Key::Ctrl(c) => format!("Ctrl+{}", c.to_ascii_uppercase()),
        Key::F(n) => format!("F{n}"),
        Key::Char(c) => c.to_string(),
        Key::Enter => "Enter".to_string(),
        other => format!("{other:?}"),
    }
}

pub trait View {
    fn grid(&mut self) -> &mut dyn GridSurface;

    /// Label in front of the shortcut list.
    fn shortcut_header(&self) -> &str;

    fn shortcuts(&self) -> &'static [Shortcut] {
        &[]
    }

    /// Open the pop-up bound to `key`, if any.
    fn handle_shortcut(&mut self, _key: &Key) -> Option<Box<dyn Modal>> {
        None
    }
}

/// A pop-up that takes all input while open.
pub trait Modal {
    fn handle_key(&mut self, key: &Key, ctx: &AppContext) -> ModalState;

    fn render(&mut self, frame: &mut Frame, area: Rect);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Open,
    Closed,
}

type Submit<T> = Box<dyn FnOnce(T, &AppContext)>;

/// A form plus the action run with its committed record on OK.
pub struct BoundForm<T> {
    form: Option<Form<T>>,
    on_submit: Option<Submit<T>>,
}

impl<T: 'static> BoundForm<T> {
    pub fn new(form: Form<T>, on_submit: impl FnOnce(T, &AppContext) + 'static) -> Self {
        Self {
            form: Some(form),
            on_submit: Some(Box::new(on_submit)),
        }
    }

    /// A form that only shows information; OK and Cancel both just close it.
    pub fn info(form: Form<T>) -> Self {
        Self {
            form: Some(form),
            on_submit: None,
        }
    }

    #[cfg(test)]
    pub fn form(&self) -> Option<&Form<T>> {
        self.form.as_ref()
    }
}

impl<T: 'static> Modal for BoundForm<T> {
    fn handle_key(&mut self, key: &Key, ctx: &AppContext) -> ModalState {
        let Some(form) = self.form.as_mut() else {
            return ModalState::Closed;
        };
        let Some(valid) = form.handle_key(key) else {
            return ModalState::Open;
        };
        // Completed: the form and its editors go away before the action runs.
        if let Some(form) = self.form.take()
            && valid
            && let Some(on_submit) = self.on_submit.take()
        {
            on_submit(form.into_record(), ctx);
        }
        self.on_submit = None;
        ModalState::Closed
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if let Some(form) = &self.form {
            FormPanel::new(form).render(frame, area);
        }
    }
}

/// Build a view's grid: declare `columns`, then apply the configured layout.
pub(crate) fn build_grid<R: Record>(
    view: ViewId,
    config: &ResolvedConfig,
    columns: &[(&str, u16, ColumnFormat)],
) -> Grid<R> {
    let mut grid = Grid::new(view.title());
    for (key, width, format) in columns {
        grid = grid.with_column(key, key, *width, *format);
    }
    grid.configure(config.grid(view.key()));
    grid
}

/// The shortcut header configured for `view`, or its title.
pub(crate) fn shortcut_header(view: ViewId, config: &ResolvedConfig) -> String {
    config
        .grid(view.key())
        .and_then(|g| g.shortcut_header.clone())
        .unwrap_or_else(|| view.title().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::enrichment::EnrichmentCache;
    use crate::core::form::FormSchema;
    use crate::test_support::{FakeRunner, fake_client};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::{Arc, mpsc};

    fn context() -> AppContext {
        let (tx, _rx) = mpsc::channel();
        AppContext::new(fake_client(FakeRunner::new()), Arc::new(EnrichmentCache::new()), tx)
    }

    #[derive(Default)]
    struct Request {
        amount: i64,
    }

    fn amount_form() -> Form<Request> {
        let schema = FormSchema::new().integer("amount", "Amount", 8, |r: &mut Request| &mut r.amount);
        Form::new("Test", Request::default(), schema)
    }

    #[test]
    fn test_ok_submits_committed_record() {
        let ctx = context();
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let mut modal = BoundForm::new(amount_form(), move |r: Request, _| {
            *sink.borrow_mut() = Some(r.amount);
        });
        for key in [Key::Char('4'), Key::Char('2'), Key::Tab] {
            assert_eq!(modal.handle_key(&key, &ctx), ModalState::Open);
        }
        assert_eq!(modal.handle_key(&Key::Enter, &ctx), ModalState::Closed);
        assert_eq!(*seen.borrow(), Some(42));
        assert!(modal.form().is_none());
    }

    #[test]
    fn test_cancel_and_escape_do_not_submit() {
        let ctx = context();
        let calls = Rc::new(RefCell::new(0));

        let sink = calls.clone();
        let mut modal = BoundForm::new(amount_form(), move |_, _| *sink.borrow_mut() += 1);
        modal.handle_key(&Key::Tab, &ctx);
        modal.handle_key(&Key::Tab, &ctx);
        assert_eq!(modal.handle_key(&Key::Enter, &ctx), ModalState::Closed);

        let sink = calls.clone();
        let mut modal = BoundForm::new(amount_form(), move |_, _| *sink.borrow_mut() += 1);
        assert_eq!(modal.handle_key(&Key::Escape, &ctx), ModalState::Closed);

        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_key_labels() {
        assert_eq!(key_label(Key::Alt('c')), "Alt+C");
        assert_eq!(key_label(Key::F(5)), "F5");
        assert_eq!(key_label(Key::Enter), "Enter");
    }
}
