//! Collection browsing: cursor scroll, numbered pages and centered windows.

use eyre::Result;
use ledgerscope_gateway::HttpGateway;
use ledgerscope_primitives::{Block, Entry, Record};
use ledgerscope_sync::{CursorStore, PageConfig, PagedStore, WindowStore};
use tracing::{debug, warn};

use super::{Row, check};
use crate::cli::{BlocksArgs, KindArg, PageArgs, WindowArgs};
use crate::config::ExplorerConfig;

pub(super) async fn blocks(
    gateway: &HttpGateway,
    config: &ExplorerConfig,
    args: BlocksArgs,
) -> Result<()> {
    let cursor = config.cursor(args.sort);
    let store = CursorStore::<_, Block>::new(gateway, cursor);

    store.initialize(cursor.direction).await;
    for _ in 1..args.pages {
        let snapshot = store.snapshot();
        if snapshot.error.is_some() || !snapshot.meta.has_more() {
            break;
        }
        store.load_more().await;
    }

    let snapshot = store.snapshot();
    for block in &snapshot.records {
        println!("{}", block.row());
    }
    check(snapshot.error.as_ref(), "blocks")?;

    match snapshot.meta.next_cursor {
        Some(next) if snapshot.meta.has_more() => println!("-- more from index {next}"),
        _ => println!("-- end of chain"),
    }
    Ok(())
}

pub(super) async fn page(
    gateway: &HttpGateway,
    config: &ExplorerConfig,
    args: PageArgs,
) -> Result<()> {
    match args.kind {
        KindArg::Blocks => {
            if args.public_key.is_some() {
                warn!("--public-key only filters entries, ignoring it");
            }
            show_page::<Block>(gateway, config.page(None), args.page).await
        }
        KindArg::Entries => {
            show_page::<Entry>(gateway, config.page(args.public_key), args.page).await
        }
    }
}

async fn show_page<R: Record + Row>(
    gateway: &HttpGateway,
    config: PageConfig,
    page: u32,
) -> Result<()> {
    let store = PagedStore::<_, R>::new(gateway, config);
    store.go_to_page(page).await;

    let snapshot = store.snapshot();
    check(snapshot.error.as_ref(), "page")?;

    if snapshot.is_empty() {
        println!("(no records)");
    }
    for record in &snapshot.records {
        println!("{}", record.row());
    }

    let view = &snapshot.meta;
    println!(
        "-- page {} of {} ({} records)",
        view.page_number, view.total_pages, view.total_count
    );
    if let (Some(key), Some(net)) = (&view.queried_public_key, view.net_amount) {
        println!("-- net amount for {key}: {net}");
    }
    Ok(())
}

pub(super) async fn window(
    gateway: &HttpGateway,
    config: &ExplorerConfig,
    args: WindowArgs,
) -> Result<()> {
    let radius = args.radius.unwrap_or(config.browse.window_radius);
    let store = WindowStore::<_, Block>::new(gateway, config.browse.sort);
    store.center_on(args.center, radius).await;

    let snapshot = store.snapshot();
    check(snapshot.error.as_ref(), "window")?;

    let center = snapshot.center_position();
    debug!(records = snapshot.len(), ?center, "window loaded");
    for (position, block) in snapshot.records.iter().enumerate() {
        let marker = if Some(position) == center { '>' } else { ' ' };
        println!("{marker} {}", block.row());
    }
    if center.is_none() {
        println!("-- block {} is not in the ledger", args.center);
    }
    Ok(())
}
