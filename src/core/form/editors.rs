//! # Field Editors
//!
//! One editor per form field. Each owns its edit buffer and knows how to draw
//! itself as plain rows of text:
//!
//! ```text
//! BoolEditor   [X] / [ ]      Enter or Space toggles
//! IntEditor    -1234          digits, leading '-' only on an empty buffer
//! TextEditor   word-wrapped   input stops once the wrapped text would overflow, optionally read-only
//! ```

use super::FieldKind;
use crate::core::grid::fit;
use crate::core::key::Key;

/// A value read back out of an editor, coerced on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Text(_) => FieldKind::Text,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Int(i) => *i != 0,
            FieldValue::Text(s) => matches!(s.trim(), "true" | "yes" | "1" | "X" | "x"),
        }
    }

    /// Unparseable text coerces to 0.
    pub fn as_int(&self) -> i64 {
        match self {
            FieldValue::Bool(b) => i64::from(*b),
            FieldValue::Int(i) => *i,
            FieldValue::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

pub trait FieldEditor: Send {
    /// Rendered rows, each exactly `width()` cells wide.
    fn lines(&self) -> Vec<String>;

    /// Returns true when the key was consumed.
    fn handle_key(&mut self, key: &Key) -> bool;

    fn value(&self) -> FieldValue;

    fn width(&self) -> u16;

    fn height(&self) -> u16 {
        1
    }
}

pub struct BoolEditor {
    checked: bool,
}

impl BoolEditor {
    pub fn new(checked: bool) -> Self {
        Self { checked }
    }
}

impl FieldEditor for BoolEditor {
    fn lines(&self) -> Vec<String> {
        vec![if self.checked { "[X]" } else { "[ ]" }.to_string()]
    }

    fn handle_key(&mut self, key: &Key) -> bool {
        match key {
            Key::Enter | Key::Char(' ') => {
                self.checked = !self.checked;
                true
            }
            _ => false,
        }
    }

    fn value(&self) -> FieldValue {
        FieldValue::Bool(self.checked)
    }

    fn width(&self) -> u16 {
        3
    }
}

pub struct IntEditor {
    buffer: String,
    width: u16,
}

impl IntEditor {
    pub fn new(value: i64, width: u16) -> Self {
        let buffer = if value == 0 {
            String::new()
        } else {
            value.to_string()
        };
        Self { buffer, width }
    }
}

impl FieldEditor for IntEditor {
    fn lines(&self) -> Vec<String> {
        vec![fit(&self.buffer, self.width as usize)]
    }

    fn handle_key(&mut self, key: &Key) -> bool {
        match key {
            Key::Char(c) => {
                let accepted = c.is_ascii_digit() || (*c == '-' && self.buffer.is_empty());
                if accepted && self.buffer.len() < self.width as usize {
                    self.buffer.push(*c);
                    return true;
                }
                false
            }
            Key::Backspace => self.buffer.pop().is_some(),
            _ => false,
        }
    }

    fn value(&self) -> FieldValue {
        FieldValue::Int(self.buffer.parse().unwrap_or(0))
    }

    fn width(&self) -> u16 {
        self.width
    }
}

pub struct TextEditor {
    buffer: String,
    width: u16,
    line_count: u16,
    readonly: bool,
}

impl TextEditor {
    pub fn new(value: &str, width: u16, line_count: u16, readonly: bool) -> Self {
        Self {
            buffer: value.to_string(),
            width: width.max(1),
            line_count: line_count.max(1),
            readonly,
        }
    }

    fn capacity(&self) -> usize {
        self.width as usize * self.line_count as usize
    }

    fn wrap<'t>(&self, text: &'t str) -> Vec<std::borrow::Cow<'t, str>> {
        let options = textwrap::Options::new(self.width as usize).break_words(true);
        text.split('\n')
            .flat_map(|paragraph| textwrap::wrap(paragraph, &options))
            .collect()
    }

    /// Whether `text` still fits in the visible rows once wrapped.
    fn fits(&self, text: &str) -> bool {
        text.chars().count() <= self.capacity() && self.wrap(text).len() <= self.line_count as usize
    }
}

impl FieldEditor for TextEditor {
    fn lines(&self) -> Vec<String> {
        let width = self.width as usize;
        let mut rows: Vec<String> = self
            .wrap(&self.buffer)
            .into_iter()
            .take(self.line_count as usize)
            .map(|line| fit(&line, width))
            .collect();
        while rows.len() < self.line_count as usize {
            rows.push(" ".repeat(width));
        }
        rows
    }

    fn handle_key(&mut self, key: &Key) -> bool {
        if self.readonly {
            return false;
        }
        match key {
            Key::Char(c) if !c.is_control() => {
                let mut candidate = self.buffer.clone();
                candidate.push(*c);
                if self.fits(&candidate) {
                    self.buffer = candidate;
                    return true;
                }
                false
            }
            Key::Backspace => self.buffer.pop().is_some(),
            _ => false,
        }
    }

    fn value(&self) -> FieldValue {
        FieldValue::Text(self.buffer.clone())
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.line_count
    }
}
