//! Single block and entry lookups.

use eyre::{Result, WrapErr, bail};
use ledgerscope_gateway::HttpGateway;
use ledgerscope_primitives::{Block, BlockId, Entry};
use ledgerscope_sync::DetailStore;

use super::check;

pub(super) async fn block(gateway: &HttpGateway, id: BlockId) -> Result<()> {
    let store = DetailStore::<_, Block>::new(gateway);
    store.select(id.clone()).await;

    let snapshot = store.snapshot();
    check(snapshot.error.as_ref(), &format!("block {id}"))?;
    let Some(block) = snapshot.value else {
        bail!("no such block {id}");
    };

    println!("index:          {}", block.index);
    println!("hash:           {}", block.hash);
    println!("previous hash:  {}", block.previous_hash);
    println!("timestamp:      {}", block.timestamp);
    if let Some(creator) = &block.block_creator {
        println!("creator:        {creator}");
    }
    if !block.data.is_null() {
        let data =
            serde_json::to_string_pretty(&block.data).wrap_err("failed to render block data")?;
        println!("data:\n{data}");
    }
    Ok(())
}

pub(super) async fn entry(gateway: &HttpGateway, id: String) -> Result<()> {
    let store = DetailStore::<_, Entry>::new(gateway);
    store.select(id.clone()).await;

    let snapshot = store.snapshot();
    check(snapshot.error.as_ref(), &format!("entry {id}"))?;
    let Some(entry) = snapshot.value else {
        bail!("no such entry {id}");
    };

    println!("entry:   {}", entry.entry_id);
    println!("block:   {}", entry.index);
    println!("from:    {}", entry.from);
    println!("to:      {}", entry.to);
    println!("amount:  {}", entry.amount);
    if let Some(timestamp) = entry.timestamp {
        println!("time:    {timestamp}");
    }
    if let Some(data) = &entry.data {
        println!("data:    {data}");
    }
    Ok(())
}
