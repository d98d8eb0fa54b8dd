//! # MenuBar Component
//!
//! Single line at the top of the screen. The left side lists the views with
//! their Alt+digit keys, the active one highlighted; the right side lists the
//! active view's shortcuts:
//!
//! ```text
//! Alt+1 Channels  Alt+2 Peers  ...        Channels: Alt+C Close  Alt+O Open  F5 Refresh
//! ```
//!
//! Stateless: everything comes in as props.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::action::ViewId;
use crate::tui::component::Component;
use crate::tui::views::{Shortcut, key_label};

pub struct MenuBar<'a> {
    pub active: ViewId,
    pub header: &'a str,
    pub shortcuts: &'a [Shortcut],
}

impl<'a> MenuBar<'a> {
    pub fn new(active: ViewId, header: &'a str, shortcuts: &'a [Shortcut]) -> Self {
        Self {
            active,
            header,
            shortcuts,
        }
    }

    fn views_line(&self) -> Line<'static> {
        let key_style = Style::default().fg(Color::Yellow);
        let mut spans = Vec::new();
        for (i, view) in ViewId::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(format!("Alt+{}", i + 1), key_style));
            spans.push(Span::raw(" "));
            let style = if *view == self.active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default()
            };
            spans.push(Span::styled(view.title(), style));
        }
        Line::from(spans)
    }

    fn shortcuts_line(&self) -> Line<'static> {
        let key_style = Style::default().fg(Color::Yellow);
        let mut spans = vec![Span::styled(
            format!("{}:", self.header),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for shortcut in self.shortcuts {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(key_label(shortcut.key), key_style));
            spans.push(Span::raw(format!(" {}", shortcut.label)));
        }
        spans.push(Span::raw("  "));
        spans.push(Span::styled("F5", key_style));
        spans.push(Span::raw(" Refresh"));
        Line::from(spans).right_aligned()
    }
}

impl Component for MenuBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let right = self.shortcuts_line();
        let right_width = (right.width() as u16).min(area.width);
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(right_width)]).areas(area);
        frame.render_widget(Paragraph::new(self.views_line()), left_area);
        frame.render_widget(Paragraph::new(right), right_area);
    }
}
