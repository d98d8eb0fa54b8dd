//! # Grid Engine
//!
//! A virtualized table over a `Vec` of records. The grid knows nothing about
//! the terminal: it turns records, column descriptors and a viewport size into
//! exactly `height` rows of text, and keeps the selection inside the visible band.
//!
//! ```text
//! row 0            title
//! row 1            column headers
//! row 2 ..= h-1    records[start ..]          ← selection lives in this band
//! ```
//!
//! Column widths are balanced against the viewport: declared (non-zero) widths
//! are kept, and whatever is left is split evenly among the flexible (zero-width)
//! columns. The last flexible column absorbs the division remainder so that the
//! row width matches the viewport exactly.
//!
//! Every cell is cut or padded to `width - 1` display cells and closed with `│`.

use std::collections::HashSet;

use chrono::{Local, TimeZone};
use log::{debug, warn};
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

use crate::core::config::GridLayout;
use crate::core::record::{Record, Value};

pub const SEPARATOR: char = '│';

const TIMESTAMP_FORMAT: &str = "%d-%m-%y %H:%M:%S";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("column '{0}' not available")]
    UnknownColumn(String),
}

/// How a cell value is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    Text,
    Integer,
    Boolean,
    Timestamp,
    List,
}

/// A column a grid is able to show.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub key: String,
    pub accessor: String,
    /// 0 means flexible.
    pub width: u16,
    pub format: ColumnFormat,
}

impl ColumnDescriptor {
    pub fn new(key: &str, accessor: &str, width: u16, format: ColumnFormat) -> Self {
        Self {
            key: key.to_string(),
            accessor: accessor.to_string(),
            width,
            format,
        }
    }
}

#[derive(Debug, Clone)]
struct DisplayColumn {
    descriptor: ColumnDescriptor,
    header: String,
    declared_width: u16,
    width: u16,
}

/// Object-safe view of a grid, independent of its record type.
pub trait GridSurface {
    fn title(&self) -> &str;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn set_viewport(&mut self, width: u16, height: u16);
    fn move_selection_up(&mut self);
    fn move_selection_down(&mut self);
    fn page_up(&mut self);
    fn page_down(&mut self);
    fn home(&mut self);
    fn end(&mut self);
    fn render_rows(&self) -> Vec<String>;
    /// Index into `render_rows()` of the highlighted row.
    fn selected_row(&self) -> Option<usize>;
}

pub struct Grid<R: Record> {
    title: String,
    available: Vec<ColumnDescriptor>,
    columns: Vec<DisplayColumn>,
    items: Vec<R>,
    selected: usize,
    start: usize,
    width: u16,
    height: u16,
    reported: HashSet<String>,
}

impl<R: Record> Grid<R> {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            available: Vec::new(),
            columns: Vec::new(),
            items: Vec::new(),
            selected: 0,
            start: 0,
            width: 0,
            height: 0,
            reported: HashSet::new(),
        }
    }

    /// Declare a column the grid can show. Re-declaring a key replaces it.
    pub fn add_column(&mut self, descriptor: ColumnDescriptor) {
        if !R::accessors().contains(&descriptor.accessor) {
            warn!(
                "Column '{}' uses unknown accessor '{}', cells will be blank",
                descriptor.key, descriptor.accessor
            );
        }
        match self.available.iter_mut().find(|c| c.key == descriptor.key) {
            Some(existing) => *existing = descriptor,
            None => self.available.push(descriptor),
        }
    }

    pub fn with_column(mut self, key: &str, accessor: &str, width: u16, format: ColumnFormat) -> Self {
        self.add_column(ColumnDescriptor::new(key, accessor, width, format));
        self
    }

    /// Append a declared column to the displayed set.
    pub fn show_column(&mut self, key: &str, header: &str, width: u16) -> Result<(), GridError> {
        let descriptor = self
            .available
            .iter()
            .find(|c| c.key == key)
            .cloned()
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))?;
        self.columns.push(DisplayColumn {
            descriptor,
            header: header.to_string(),
            declared_width: width,
            width,
        });
        self.balance_widths();
        Ok(())
    }

    /// Replace the displayed columns with `layout`, or every declared column
    /// in declaration order when no layout is given.
    pub fn configure(&mut self, layout: Option<&GridLayout>) {
        self.columns.clear();
        let layout = layout.filter(|l| !l.columns.is_empty());
        match layout {
            Some(layout) => {
                if let Some(header) = &layout.header {
                    self.title = header.clone();
                }
                for column in &layout.columns {
                    let header = column.header.as_deref().unwrap_or(&column.key);
                    let width = column.width.unwrap_or_else(|| self.declared_width(&column.key));
                    if let Err(e) = self.show_column(&column.key, header, width) {
                        // Logged once per key for the life of the grid.
                        if self.reported.insert(column.key.clone()) {
                            warn!("Grid '{}': {}", self.title, e);
                        }
                    }
                }
            }
            None => {
                let declared: Vec<ColumnDescriptor> = self.available.clone();
                for descriptor in declared {
                    self.columns.push(DisplayColumn {
                        header: descriptor.key.clone(),
                        declared_width: descriptor.width,
                        width: descriptor.width,
                        descriptor,
                    });
                }
                self.balance_widths();
            }
        }
    }

    fn declared_width(&self, key: &str) -> u16 {
        self.available
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.width)
            .unwrap_or(0)
    }

    /// Replace the bound records wholesale.
    pub fn bind_items(&mut self, items: Vec<R>) {
        debug!("Grid '{}' bound {} records", self.title, items.len());
        self.items = items;
        self.clamp();
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Mutable access for in-place patches such as enrichment labels.
    pub fn items_mut(&mut self) -> &mut [R] {
        &mut self.items
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    pub fn viewport_start(&self) -> usize {
        self.start
    }

    pub fn selected_item(&self) -> Option<&R> {
        self.items.get(self.selected)
    }

    /// Rendered width of each displayed column, in display order.
    pub fn column_widths(&self) -> Vec<u16> {
        self.columns.iter().map(|c| c.width).collect()
    }

    fn visible_rows(&self) -> usize {
        (self.height as usize).saturating_sub(2).max(1)
    }

    fn balance_widths(&mut self) {
        let fixed: u32 = self
            .columns
            .iter()
            .filter(|c| c.declared_width > 0)
            .map(|c| u32::from(c.declared_width))
            .sum();
        let flexible = self.columns.iter().filter(|c| c.declared_width == 0).count() as u32;
        if flexible == 0 {
            for column in &mut self.columns {
                column.width = column.declared_width;
            }
            return;
        }
        let remaining = u32::from(self.width).saturating_sub(fixed);
        let share = remaining / flexible;
        let mut remainder = remaining % flexible;
        // Walk backwards so the last flexible column takes the remainder.
        for column in self.columns.iter_mut().rev() {
            if column.declared_width > 0 {
                column.width = column.declared_width;
            } else {
                column.width = (share + remainder) as u16;
                remainder = 0;
            }
        }
    }

    fn clamp(&mut self) {
        if self.items.is_empty() {
            self.selected = 0;
            self.start = 0;
            return;
        }
        let rows = self.visible_rows();
        self.selected = self.selected.min(self.items.len() - 1);
        if self.selected < self.start {
            self.start = self.selected;
        } else if self.selected >= self.start + rows {
            self.start = self.selected + 1 - rows;
        }
        self.start = self.start.min(self.items.len().saturating_sub(rows));
    }

    fn render_cell(&self, column: &DisplayColumn, record: &R) -> String {
        let value = R::accessors().resolve(record, &column.descriptor.accessor);
        let text = value
            .map(|v| format_value(&v, column.descriptor.format))
            .unwrap_or_default();
        cell(&text, column.width)
    }

    fn render_record(&self, record: &R) -> String {
        let row: String = self
            .columns
            .iter()
            .map(|column| self.render_cell(column, record))
            .collect();
        fit(&row, self.width as usize)
    }
}

impl<R: Record> GridSurface for Grid<R> {
    fn title(&self) -> &str {
        &self.title
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn set_viewport(&mut self, width: u16, height: u16) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.balance_widths();
        self.clamp();
    }

    fn move_selection_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.clamp();
    }

    fn move_selection_down(&mut self) {
        self.selected = self.selected.saturating_add(1);
        self.clamp();
    }

    fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.visible_rows());
        self.clamp();
    }

    fn page_down(&mut self) {
        self.selected = self.selected.saturating_add(self.visible_rows());
        self.clamp();
    }

    fn home(&mut self) {
        self.selected = 0;
        self.clamp();
    }

    fn end(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
        self.clamp();
    }

    fn render_rows(&self) -> Vec<String> {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut rows = Vec::with_capacity(height);

        rows.push(fit(&self.title, width));
        let headers: String = self
            .columns
            .iter()
            .map(|c| cell(&c.header, c.width))
            .collect();
        rows.push(fit(&headers, width));
        rows.extend(
            self.items
                .iter()
                .skip(self.start)
                .take(height.saturating_sub(2))
                .map(|record| self.render_record(record)),
        );
        while rows.len() < height {
            rows.push(" ".repeat(width));
        }
        rows.truncate(height);
        rows
    }

    fn selected_row(&self) -> Option<usize> {
        if self.items.is_empty() || self.height < 3 {
            return None;
        }
        Some(2 + self.selected - self.start)
    }
}

// ============================================================================
// Cell formatting
// ============================================================================

fn format_value(value: &Value, format: ColumnFormat) -> String {
    match format {
        ColumnFormat::Text => value.to_string(),
        ColumnFormat::Boolean => {
            if value.as_bool() {
                "X".to_string()
            } else {
                String::new()
            }
        }
        ColumnFormat::Integer => value
            .as_int()
            .map(group_thousands)
            .unwrap_or_else(|| value.to_string()),
        ColumnFormat::Timestamp => value.as_int().map(format_timestamp).unwrap_or_default(),
        ColumnFormat::List => match value {
            Value::List(items) => items.join(", "),
            other => other.to_string(),
        },
    }
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Local time as `dd-mm-yy HH:MM:SS`; non-positive timestamps are blank.
pub fn format_timestamp(secs: i64) -> String {
    if secs <= 0 {
        return String::new();
    }
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// One grid cell: `width - 1` display cells of text followed by the separator.
fn cell(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }
    let mut out = fit(text, width as usize - 1);
    out.push(SEPARATOR);
    out
}

/// Cut or pad `text` to exactly `width` display cells. Control characters
/// become spaces and wide characters are never split.
pub fn fit(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let ch = if ch.is_control() { ' ' } else { ch };
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}
