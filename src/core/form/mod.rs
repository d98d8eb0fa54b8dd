//! # Form Engine
//!
//! Builds an editable pop-up from a record and a declarative schema. The schema
//! lists fields in display order, each bound to a slot in the record:
//!
//! ```rust,ignore
//! FormSchema::new()
//!     .text("memo", "Memo", 30, |r: &mut NewInvoice| &mut r.memo)
//!     .integer("amt", "Amount (sat)", 12, |r| &mut r.amount)
//!     .boolean("private", "Private", |r| &mut r.private)
//! ```
//!
//! ## Focus ring
//!
//! ```text
//! field 0 → field 1 → … → field N-1 → OK → CANCEL ─┐
//!    ▲                                              │
//!    └──────────────────────────────────────────────┘
//! ```
//!
//! Tab walks forward, BackTab backward. Enter on OK or CANCEL completes the
//! form; Escape cancels from anywhere. The record is only touched by
//! [`Form::get_value`].

pub mod editors;

use crate::core::key::Key;
use editors::{BoolEditor, FieldEditor, IntEditor, TextEditor};

pub use editors::FieldValue;

/// Columns taken by borders, the `: ` separator and padding.
pub const WIDTH_CHROME: u16 = 5;
/// Rows taken by borders, the spacer and the button row.
pub const HEIGHT_CHROME: u16 = 4;

pub const OK_LABEL: &str = "OK";
pub const CANCEL_LABEL: &str = "Cancel";
const OK_OFFSET: u16 = 5;
const CANCEL_OFFSET: u16 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub content_width: u16,
    pub line_count: u16,
    pub readonly: bool,
}

enum Slot<T> {
    Bool(fn(&mut T) -> &mut bool),
    Int(fn(&mut T) -> &mut i64),
    Text(fn(&mut T) -> &mut String),
}

struct SchemaField<T> {
    descriptor: FieldDescriptor,
    slot: Slot<T>,
}

/// Field list for one record type.
pub struct FormSchema<T> {
    fields: Vec<SchemaField<T>>,
}

impl<T> Default for FormSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FormSchema<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    fn push(mut self, name: &'static str, label: &'static str, kind: FieldKind, width: u16, slot: Slot<T>) -> Self {
        self.fields.push(SchemaField {
            descriptor: FieldDescriptor {
                name,
                label,
                kind,
                content_width: width,
                line_count: 1,
                readonly: false,
            },
            slot,
        });
        self
    }

    pub fn text(self, name: &'static str, label: &'static str, width: u16, slot: fn(&mut T) -> &mut String) -> Self {
        self.push(name, label, FieldKind::Text, width, Slot::Text(slot))
    }

    pub fn integer(self, name: &'static str, label: &'static str, width: u16, slot: fn(&mut T) -> &mut i64) -> Self {
        self.push(name, label, FieldKind::Int, width, Slot::Int(slot))
    }

    pub fn boolean(self, name: &'static str, label: &'static str, slot: fn(&mut T) -> &mut bool) -> Self {
        self.push(name, label, FieldKind::Bool, 3, Slot::Bool(slot))
    }

    /// Make the last text field span `count` rows.
    pub fn lines(mut self, count: u16) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.descriptor.line_count = count.max(1);
        }
        self
    }

    /// Make the last field read-only. It stays a tab stop.
    pub fn readonly(mut self) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.descriptor.readonly = true;
        }
        self
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().map(|f| &f.descriptor)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(usize),
    Ok,
    Cancel,
}

/// A screen rectangle, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Area {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldArea {
    pub label: Area,
    pub content: Area,
}

/// Where everything goes for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
    pub area: Area,
    pub fields: Vec<FieldArea>,
    pub ok: (u16, u16),
    pub cancel: (u16, u16),
}

pub struct Form<T> {
    title: String,
    record: T,
    schema: FormSchema<T>,
    editors: Vec<Box<dyn FieldEditor>>,
    focus: Focus,
    min_width: u16,
}

impl<T> Form<T> {
    pub fn new(title: &str, record: T, schema: FormSchema<T>) -> Self {
        Self::with_min_size(title, record, schema, 0, 0)
    }

    /// Content widths grow to at least `min_width` and multi-line text fields
    /// to at least `min_height` rows.
    pub fn with_min_size(title: &str, mut record: T, schema: FormSchema<T>, min_width: u16, min_height: u16) -> Self {
        let editors = schema
            .fields
            .iter()
            .map(|field| build_editor(field, &mut record, min_width, min_height))
            .collect();
        let focus = if schema.is_empty() {
            Focus::Ok
        } else {
            Focus::Field(0)
        };
        Self {
            title: title.to_string(),
            record,
            schema,
            editors,
            focus,
            min_width,
        }
    }

    /// Start with OK selected, for forms that only show information.
    pub fn focus_ok(mut self) -> Self {
        self.focus = Focus::Ok;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schema.descriptors().map(|d| d.label)
    }

    pub fn editors(&self) -> &[Box<dyn FieldEditor>] {
        &self.editors
    }

    pub fn focus_next(&mut self) {
        let n = self.editors.len();
        self.focus = match self.focus {
            Focus::Field(i) if i + 1 < n => Focus::Field(i + 1),
            Focus::Field(_) => Focus::Ok,
            Focus::Ok => Focus::Cancel,
            Focus::Cancel if n > 0 => Focus::Field(0),
            Focus::Cancel => Focus::Ok,
        };
    }

    pub fn focus_prev(&mut self) {
        let n = self.editors.len();
        self.focus = match self.focus {
            Focus::Field(i) if i > 0 => Focus::Field(i - 1),
            Focus::Field(_) => Focus::Cancel,
            Focus::Ok if n > 0 => Focus::Field(n - 1),
            Focus::Ok => Focus::Cancel,
            Focus::Cancel => Focus::Ok,
        };
    }

    /// Feed a key to the form. `Some(valid)` means the form is complete.
    pub fn handle_key(&mut self, key: &Key) -> Option<bool> {
        match (key, self.focus) {
            (Key::Escape, _) => Some(false),
            (Key::Tab, _) => {
                self.focus_next();
                None
            }
            (Key::BackTab, _) => {
                self.focus_prev();
                None
            }
            (Key::Enter, Focus::Ok) => Some(true),
            (Key::Enter, Focus::Cancel) => Some(false),
            (_, Focus::Field(i)) => {
                if let Some(editor) = self.editors.get_mut(i) {
                    editor.handle_key(key);
                }
                None
            }
            _ => None,
        }
    }

    /// Write every editor's value into the record, in schema order.
    pub fn get_value(&mut self) -> &T {
        for (field, editor) in self.schema.fields.iter().zip(&self.editors) {
            let value = editor.value();
            match field.slot {
                Slot::Bool(slot) => *slot(&mut self.record) = value.as_bool(),
                Slot::Int(slot) => *slot(&mut self.record) = value.as_int(),
                Slot::Text(slot) => *slot(&mut self.record) = value.as_text(),
            }
        }
        &self.record
    }

    /// Commit and hand the record back.
    pub fn into_record(mut self) -> T {
        self.get_value();
        self.record
    }

    pub fn label_width(&self) -> u16 {
        self.schema
            .descriptors()
            .map(|d| unicode_width::UnicodeWidthStr::width(d.label) as u16)
            .max()
            .unwrap_or(0)
    }

    pub fn content_width(&self) -> u16 {
        self.editors.iter().map(|e| e.width()).max().unwrap_or(0)
    }

    pub fn width(&self) -> u16 {
        (self.label_width() + self.content_width() + WIDTH_CHROME)
            .max(self.min_width)
            .max(CANCEL_OFFSET + 2)
    }

    pub fn height(&self) -> u16 {
        self.editors.iter().map(|e| e.height()).sum::<u16>() + HEIGHT_CHROME
    }

    /// Centre the form on a `screen_width` × `screen_height` screen.
    pub fn layout(&self, screen_width: u16, screen_height: u16) -> FormLayout {
        let width = self.width().min(screen_width);
        let height = self.height().min(screen_height);
        let area = Area {
            x: (screen_width - width) / 2,
            y: (screen_height - height) / 2,
            width,
            height,
        };

        let label_width = self.label_width();
        let content_x = area.x + 1 + label_width + 2;
        let mut y = area.y + 1;
        let fields = self
            .editors
            .iter()
            .map(|editor| {
                let rows = editor.height();
                let field = FieldArea {
                    label: Area {
                        x: area.x + 1,
                        y,
                        width: label_width,
                        height: 1,
                    },
                    content: Area {
                        x: content_x,
                        y,
                        width: editor.width(),
                        height: rows,
                    },
                };
                y += rows;
                field
            })
            .collect();

        let button_y = (area.y + area.height).saturating_sub(2);
        let right = area.x + area.width;
        FormLayout {
            area,
            fields,
            ok: (right.saturating_sub(OK_OFFSET), button_y),
            cancel: (right.saturating_sub(CANCEL_OFFSET), button_y),
        }
    }
}

fn build_editor<T>(field: &SchemaField<T>, record: &mut T, min_width: u16, min_height: u16) -> Box<dyn FieldEditor> {
    let d = &field.descriptor;
    match field.slot {
        Slot::Bool(slot) => Box::new(BoolEditor::new(*slot(record))),
        Slot::Int(slot) => Box::new(IntEditor::new(*slot(record), d.content_width.max(min_width))),
        Slot::Text(slot) => {
            let lines = if d.line_count > 1 {
                d.line_count.max(min_height)
            } else {
                d.line_count
            };
            Box::new(TextEditor::new(
                slot(record),
                d.content_width.max(min_width),
                lines,
                d.readonly,
            ))
        }
    }
}

/// Plain record behind an information pop-up.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub text: String,
}

pub const MESSAGE_WIDTH: u16 = 48;
pub const MESSAGE_LINES: u16 = 8;

/// A read-only text form with OK focused.
pub fn message_form(title: &str, text: &str, min_width: u16, min_height: u16) -> Form<Message> {
    let schema = FormSchema::new()
        .text("text", "", MESSAGE_WIDTH, |m: &mut Message| &mut m.text)
        .lines(MESSAGE_LINES)
        .readonly();
    Form::with_min_size(
        title,
        Message {
            text: text.to_string(),
        },
        schema,
        min_width,
        min_height,
    )
    .focus_ok()
}
