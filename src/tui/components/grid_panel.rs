//! # GridPanel Component
//!
//! Paints the rows a grid produced. All text, truncation and scrolling come
//! from the grid engine; the panel only tells the grid how big it is and adds
//! styling: bold title, dimmed header, reversed selection.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::core::grid::GridSurface;
use crate::tui::component::Component;

/// Transient render wrapper around a view's grid.
pub struct GridPanel<'a> {
    grid: &'a mut dyn GridSurface,
}

impl<'a> GridPanel<'a> {
    pub fn new(grid: &'a mut dyn GridSurface) -> Self {
        Self { grid }
    }
}

impl Component for GridPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.grid.set_viewport(area.width, area.height);
        let selected = self.grid.selected_row();
        let lines: Vec<Line> = self
            .grid
            .render_rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let style = match i {
                    0 => Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                    1 => Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::UNDERLINED),
                    _ if Some(i) == selected => Style::default().add_modifier(Modifier::REVERSED),
                    _ => Style::default(),
                };
                Line::styled(row, style)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{ColumnFormat, Grid};
    use crate::lnd::types::Peer;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn peers(n: usize) -> Vec<Peer> {
        (0..n)
            .map(|i| Peer {
                pub_key: format!("key{i}"),
                address: format!("10.0.0.{i}:9735"),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_renders_grid_rows_and_sets_viewport() {
        let mut grid: Grid<Peer> = Grid::new("Peers")
            .with_column("pub_key", "pub_key", 10, ColumnFormat::Text)
            .with_column("address", "address", 0, ColumnFormat::Text);
        grid.configure(None);
        grid.bind_items(peers(10));

        let backend = TestBackend::new(40, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| GridPanel::new(&mut grid).render(f, f.area()))
            .unwrap();

        assert_eq!(grid.column_widths(), vec![10, 30]);
        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Peers"));
        assert!(content.contains("pub_key"));
        assert!(content.contains("key0"));
        assert!(content.contains("key3"));
        assert!(!content.contains("key4"));

        // Selection is drawn reversed on the first data row.
        let cell = &buffer[(0, 2)];
        assert!(cell.modifier.contains(Modifier::REVERSED));
    }
}
