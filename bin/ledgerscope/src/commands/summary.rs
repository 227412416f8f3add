//! Ledger-level summaries.

use eyre::Result;
use ledgerscope_gateway::HttpGateway;
use ledgerscope_primitives::{ChainIntegrity, ValidationCheck};
use ledgerscope_sync::{ChainSummaryStore, NodeDirectoryStore};

use super::check;

pub(super) async fn info(gateway: &HttpGateway) -> Result<()> {
    let store = ChainSummaryStore::new(gateway);
    store.refresh().await;

    let summary = store.snapshot();
    check(summary.info.error.as_ref(), "chain info")?;

    if let Some(info) = &summary.info.value {
        println!("chain:        {}", info.blockchain_name);
        println!("height:       {}", info.current_height);
        if let Some(born_on) = info.born_on {
            println!("born on:      {born_on}");
        }
        if let Some(difficulty) = info.difficulty {
            println!("difficulty:   {difficulty}");
        }
        if let Some(supply) = info.total_supply {
            println!("total supply: {supply}");
        }
    }

    // A missing verdict does not make the info itself wrong.
    match (&summary.integrity.value, &summary.integrity.error) {
        (_, Some(err)) => println!("integrity:    unavailable ({err})"),
        (Some(integrity), None) => print_integrity(integrity),
        (None, None) => {}
    }
    Ok(())
}

fn print_integrity(integrity: &ChainIntegrity) {
    println!(
        "integrity:    {}, {} blocks analyzed, {} passed, {} failed",
        if integrity.is_valid { "valid" } else { "INVALID" },
        integrity.block_count,
        integrity.passed_block_count(),
        integrity.failing_block_count(),
    );
    for check in ValidationCheck::ALL {
        let verdict = if integrity.passed(check) { "ok" } else { "FAILED" };
        println!("  {:<14} {verdict}", check.label());
        for error in integrity.errors_for(check) {
            println!(
                "    Block {} failed {} validation test",
                error.block_number, error.error_type
            );
        }
    }
}

pub(super) async fn nodes(gateway: &HttpGateway) -> Result<()> {
    let store = NodeDirectoryStore::new(gateway);
    store.refresh().await;

    let snapshot = store.snapshot();
    check(snapshot.error.as_ref(), "nodes")?;

    for node in snapshot.value.unwrap_or_default() {
        println!(
            "{}  {}  {}  {}",
            node.id,
            node.label,
            node.ip,
            node.web_service_url()
        );
    }
    Ok(())
}
