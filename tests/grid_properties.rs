//! Property tests for the grid engine's selection and width invariants.

use lnboard::core::grid::{ColumnFormat, Grid, GridSurface};
use lnboard::lnd::types::Peer;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Nav {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Resize(u16),
}

fn nav() -> impl Strategy<Value = Nav> {
    prop_oneof![
        Just(Nav::Up),
        Just(Nav::Down),
        Just(Nav::PageUp),
        Just(Nav::PageDown),
        Just(Nav::Home),
        Just(Nav::End),
        (3u16..40).prop_map(Nav::Resize),
    ]
}

fn peers(n: usize) -> Vec<Peer> {
    (0..n)
        .map(|i| Peer {
            pub_key: format!("{i:066}"),
            address: format!("10.0.{}.{}:9735", i / 256, i % 256),
            ..Default::default()
        })
        .collect()
}

fn grid(widths: &[u16]) -> Grid<Peer> {
    let accessors = ["pub_key", "address", "alias", "bytes_sent", "ping_time"];
    let mut grid = Grid::new("Peers");
    for (i, width) in widths.iter().enumerate() {
        let accessor = accessors[i % accessors.len()];
        grid = grid.with_column(&format!("c{i}"), accessor, *width, ColumnFormat::Text);
    }
    grid.configure(None);
    grid
}

proptest! {
    #[test]
    fn selection_stays_in_viewport(
        n in 0usize..60,
        height in 3u16..40,
        moves in prop::collection::vec(nav(), 0..50),
    ) {
        let mut g = grid(&[12, 0]);
        g.bind_items(peers(n));
        g.set_viewport(50, height);
        let mut height = height;
        for step in moves {
            match step {
                Nav::Up => g.move_selection_up(),
                Nav::Down => g.move_selection_down(),
                Nav::PageUp => g.page_up(),
                Nav::PageDown => g.page_down(),
                Nav::Home => g.home(),
                Nav::End => g.end(),
                Nav::Resize(h) => {
                    height = h;
                    g.set_viewport(50, h);
                }
            }
            let rows = height as usize - 2;
            let start = g.viewport_start();
            match g.selected_index() {
                Some(selected) => {
                    prop_assert!(selected < n);
                    prop_assert!(start <= selected && selected < start + rows);
                    prop_assert!(start <= n.saturating_sub(rows));
                }
                None => {
                    prop_assert_eq!(n, 0);
                    prop_assert_eq!(start, 0);
                }
            }
            let rendered = g.render_rows();
            prop_assert_eq!(rendered.len(), height as usize);
            prop_assert!(rendered.iter().all(|r| r.chars().count() == 50));
        }
    }

    #[test]
    fn widths_fill_viewport_and_fixed_widths_hold(
        widths in prop::collection::vec(prop_oneof![Just(0u16), 1u16..20], 1..6),
        width in 0u16..200,
    ) {
        let mut g = grid(&widths);
        g.set_viewport(width, 10);
        let balanced = g.column_widths();
        prop_assert_eq!(balanced.len(), widths.len());

        for (declared, actual) in widths.iter().zip(&balanced) {
            if *declared > 0 {
                prop_assert_eq!(declared, actual);
            }
        }

        let fixed: u32 = widths.iter().map(|w| u32::from(*w)).sum();
        let has_flexible = widths.contains(&0);
        if has_flexible && fixed <= u32::from(width) {
            let total: u32 = balanced.iter().map(|w| u32::from(*w)).sum();
            prop_assert_eq!(total, u32::from(width));
        }
    }
}

#[test]
fn two_fixed_one_flexible_at_forty() {
    let mut g = grid(&[10, 10, 0]);
    g.set_viewport(40, 10);
    assert_eq!(g.column_widths(), vec![10, 10, 20]);
}

#[test]
fn four_downs_in_five_rows() {
    let mut g = grid(&[10, 0]);
    g.bind_items(peers(5));
    g.set_viewport(40, 5);
    for _ in 0..4 {
        g.move_selection_down();
    }
    assert_eq!(g.selected_index(), Some(4));
    assert_eq!(g.viewport_start(), 2);
}
