//! Failed refreshes and commands, newest first. Read-only.

use crate::core::action::ViewId;
use crate::core::config::ResolvedConfig;
use crate::core::grid::{ColumnFormat, Grid, GridSurface};
use crate::core::logbook::LogEntry;

use super::{View, build_grid, shortcut_header};

pub struct LogsView {
    grid: Grid<LogEntry>,
    shortcut_header: String,
}

impl LogsView {
    pub fn new(config: &ResolvedConfig) -> Self {
        use ColumnFormat::*;
        let grid = build_grid(
            ViewId::Logs,
            config,
            &[
                ("level", 6, Text),
                ("timestamp", 18, Timestamp),
                ("message", 0, Text),
            ],
        );
        Self {
            grid,
            shortcut_header: shortcut_header(ViewId::Logs, config),
        }
    }

    pub fn set_entries(&mut self, entries: Vec<LogEntry>) {
        self.grid.bind_items(entries);
    }
}

impl View for LogsView {
    fn grid(&mut self) -> &mut dyn GridSurface {
        &mut self.grid
    }

    fn shortcut_header(&self) -> &str {
        &self.shortcut_header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, LnboardConfig, resolve};
    use crate::core::key::Key;
    use crate::core::logbook::{Level, Logbook};

    #[test]
    fn test_entries_render_newest_first() {
        let mut log = Logbook::default();
        log.push(Level::Warn, "Channels: lncli exited with 1");
        log.push(Level::Error, "Pay invoice: no route");

        let mut view = LogsView::new(&resolve(&LnboardConfig::default(), &CliOverrides::default()));
        view.set_entries(log.entries());
        view.grid().set_viewport(80, 5);
        let rows = view.grid().render_rows();
        assert!(rows[2].starts_with("ERROR"));
        assert!(rows[2].contains("Pay invoice: no route"));
        assert!(rows[3].starts_with("WARN"));
        assert!(view.handle_shortcut(&Key::Alt('c')).is_none());
    }
}
