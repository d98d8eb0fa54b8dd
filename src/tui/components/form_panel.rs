//! # FormPanel Component
//!
//! Draws a [`Form`] as a centered pop-up over whatever is below it:
//!
//! ```text
//! ┌ Open channel ─────────────────────────┐
//! │ Node pubkey: 02ab…                    │
//! │ Local amount: 20000                   │
//! │ Private: [ ]                          │
//! │                                       │
//! │                        Cancel    OK   │
//! └───────────────────────────────────────┘
//! ```
//!
//! Geometry comes from [`Form::layout`]; this component only maps it onto the
//! frame and styles the focused element.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::core::form::{Area, CANCEL_LABEL, Focus, Form, OK_LABEL};
use crate::tui::component::Component;

pub struct FormPanel<'a, T> {
    form: &'a Form<T>,
}

impl<'a, T> FormPanel<'a, T> {
    pub fn new(form: &'a Form<T>) -> Self {
        Self { form }
    }
}

/// Translate a layout area into a frame rect, clipped to `bounds`.
fn to_rect(area: Area, origin: Rect) -> Rect {
    Rect::new(
        origin.x + area.x,
        origin.y + area.y,
        area.width,
        area.height,
    )
    .intersection(origin)
}

fn focused_style(focused: bool) -> Style {
    if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

impl<T> Component for FormPanel<'_, T> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let layout = self.form.layout(area.width, area.height);
        let outer = to_rect(layout.area, area);
        frame.render_widget(Clear, outer);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.form.title()));
        frame.render_widget(block, outer);

        let focus = self.form.focus();
        let fields = self.form.labels().zip(self.form.editors()).zip(&layout.fields);
        for (i, ((label, editor), field)) in fields.enumerate() {
            let label_rect = to_rect(field.label, area);
            if !label.is_empty() {
                let text = format!("{label:>width$}:", width = label_rect.width as usize);
                frame.render_widget(
                    Paragraph::new(text).style(Style::default().fg(Color::Gray)),
                    Rect {
                        width: label_rect.width + 1,
                        ..label_rect
                    }
                    .intersection(outer),
                );
            }
            let content_rect = to_rect(field.content, area).intersection(outer);
            let lines: Vec<Line> = editor.lines().into_iter().map(Line::from).collect();
            frame.render_widget(
                Paragraph::new(lines).style(focused_style(focus == Focus::Field(i))),
                content_rect,
            );
        }

        for (label, (x, y), focused) in [
            (CANCEL_LABEL, layout.cancel, focus == Focus::Cancel),
            (OK_LABEL, layout.ok, focus == Focus::Ok),
        ] {
            let rect = Rect::new(area.x + x, area.y + y, label.len() as u16, 1).intersection(outer);
            frame.render_widget(Paragraph::new(label).style(focused_style(focused)), rect);
        }
    }
}
