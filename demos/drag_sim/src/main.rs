//! Headless drag session: builds a reorderable list, scripts a long-press
//! drag into the bottom auto-scroll band, and prints the order before and
//! after. Runs on a test clock so the whole session is deterministic.

use anyhow::Result;
use log::info;
use resort_core::animation::{TestClock, set_clock};
use resort_list::{ItemId, ReorderableList};
use std::rc::Rc;
use web_time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    env_logger::init();

    let clock = TestClock::new();
    set_clock(Rc::new(clock.clone()));

    let rows = vec![
        (0u64, "Inbox", 48.0),
        (1, "Today", 64.0),
        (2, "Starred", 48.0),
        (3, "Projects", 80.0),
        (4, "Someday", 48.0),
        (5, "Reference", 64.0),
        (6, "Archive", 48.0),
        (7, "Trash", 48.0),
    ];

    let mut list = ReorderableList::new(
        rows.clone(),
        |row: &(u64, &str, f32)| ItemId(row.0),
        |row, dragging| {
            if dragging {
                format!("> {}", row.1)
            } else {
                format!("  {}", row.1)
            }
        },
    )
    .on_drag_start(|origin| info!("drag started from slot {origin}"))
    .on_drag_end(|from, to| info!("drag ended: {from} -> {to}"));

    list.set_viewport_extent(240.0);
    for &(id, _, height) in &rows {
        list.report_height(ItemId(id), height);
    }

    info!(
        "initial order: {:?}",
        list.current_data().iter().map(|r| r.1).collect::<Vec<_>>()
    );

    // Long-press the first row.
    list.pointer_down(ItemId(0), 24.0);
    clock.advance(Duration::from_millis(520));
    list.pump();

    // Drag it down into the bottom edge band and hold there while the
    // auto-scroller carries it the rest of the way.
    for step in 1..=12 {
        list.pointer_move(24.0 + step as f32 * 16.0);
        clock.advance(FRAME);
        list.pump();
    }
    for _ in 0..90 {
        clock.advance(FRAME);
        list.pump();
    }

    list.pointer_up();

    // Let the rows settle.
    loop {
        clock.advance(FRAME);
        if !list.pump() {
            break;
        }
    }

    info!("scroll offset after auto-scroll: {}", list.scroll_offset());
    info!(
        "final order: {:?}",
        list.current_data().iter().map(|r| r.1).collect::<Vec<_>>()
    );
    for index in 0..list.len() {
        if let Some(line) = list.render_row(index) {
            println!("{line}");
        }
    }

    Ok(())
}
