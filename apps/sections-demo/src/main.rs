use std::rc::Rc;

use anyhow::{ensure, Context, Result};
use tablekit_core::prelude::*;
use tablekit_core::{ScrollEvent, ScrollPoint, SurfaceDelegate};
use tablekit_testing::{list_section, ListContent, RecordingSurface, SurfaceCall};

/// Logs scroll events and selections that pass through the adapter.
struct ScrollLogger;

impl SurfaceDelegate for ScrollLogger {
    fn did_select_row(&self, path: IndexPath) -> bool {
        log::info!("delegate saw selection of {path}");
        false
    }

    fn scroll_event(&self, event: &mut ScrollEvent) {
        log::info!("scroll event: {event:?}");
    }
}

fn print_surface(label: &str, surface: &RecordingSurface, adapter: &SectionedAdapter) {
    let ids: Vec<String> = adapter
        .attached_section_ids()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("{label:<28} sections {ids:?} rows {:?}", surface.shown());
}

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== Section Reconciliation Demo ===");
    println!("Every command below is validated by a strict recording surface.");
    println!();

    let surface = RecordingSurface::offscreen();
    let adapter = SectionedAdapter::with_config(
        surface.clone(),
        AdapterConfig::new().with_estimated_row_size(64.0),
    );
    let delegate: Rc<dyn SurfaceDelegate> = Rc::new(ScrollLogger);
    adapter.set_forwarded_delegate(&delegate);

    let summary = list_section(
        ListContent::new("summary").with_footer(HeaderFooterStyle::Spacing),
        ["3 open orders"],
    );
    let orders = list_section(
        ListContent::new("orders")
            .with_header(HeaderFooterStyle::Spacing)
            .deletable(),
        ["#1001 coffee beans", "#1002 grinder"],
    );
    let empty_state = Rc::new(
        DataSection::with_data(
            ListContent::new("empty"),
            vec!["Nothing here yet".to_owned()],
        )
        .attached(false),
    );

    adapter
        .try_add_section(summary.clone())
        .context("adding summary section")?;
    adapter
        .try_add_section(orders.clone())
        .context("adding orders section")?;
    adapter
        .try_add_section(empty_state.clone())
        .context("adding empty-state section")?;
    ensure!(
        !adapter.add_section_if_absent(list_section(ListContent::new("orders"), ["dup"])),
        "duplicate section id was accepted"
    );
    print_surface("added while offscreen", &surface, &adapter);

    surface.set_live(true);
    print_surface("surface live", &surface, &adapter);

    orders.append_items(["#1003 filters".to_owned()], true);
    print_surface("appended an order", &surface, &adapter);

    orders.replace_item(0, "#1001 coffee beans (shipped)".to_owned(), true);
    let first = surface
        .row_text(IndexPath::new(1, 0))
        .context("orders row 0 has no view")?;
    println!("{:<28} {first}", "replaced first order");

    surface.display_row(IndexPath::new(1, 2), 58.0);
    println!(
        "{:<28} {:?}",
        "cached size of [1, 2]",
        adapter.cached_row_size(IndexPath::new(1, 2))
    );

    adapter.update_attached_sections([empty_state.id()]);
    print_surface("showing empty state only", &surface, &adapter);

    adapter.update_attached_sections([summary.id(), orders.id()]);
    print_surface("orders back", &surface, &adapter);

    empty_state.set_attached(true);
    print_surface("empty state attached", &surface, &adapter);

    surface.select_row(IndexPath::new(1, 1));
    let ended = surface.scroll(ScrollEvent::WillEndDragging {
        velocity: ScrollPoint::new(0.0, 1.5),
        target_offset: ScrollPoint::new(0.0, 420.0),
    });
    log::debug!("scroll ended at {ended:?}");

    let batches = surface.batch_count();
    let applies = surface
        .commands()
        .iter()
        .filter(|call| matches!(call, SurfaceCall::Apply(_)))
        .count();
    println!();
    println!("{batches} batches and {applies} single commands committed without inconsistency");
    Ok(())
}
