//! Runs every venue concurrently and joins on completion.

use crate::config::VenueConfig;
use crate::lifecycle::TaskGroup;
use crate::observability::metrics;
use crate::trading::venue::simulate_trade;

/// Spawn one independent unit per venue and wait for all of them.
///
/// Units share nothing; each reports success or failure through logs only.
/// Returns the number of units that finished.
pub async fn run_all(venues: &[VenueConfig]) -> usize {
    let mut group = TaskGroup::new();

    for venue in venues.iter().cloned() {
        group.spawn(async move {
            match simulate_trade(&venue).await {
                Ok(trade) => {
                    metrics::record_trade_unit(&venue.name, true);
                    tracing::info!(
                        venue = %venue.name,
                        chain_id = %trade.chain_id,
                        sender = %trade.sender,
                        gas_price = trade.gas_price,
                        "{} trade successful",
                        venue.name
                    );
                }
                Err(e) => {
                    metrics::record_trade_unit(&venue.name, false);
                    tracing::error!(venue = %venue.name, "{} trade error: {}", venue.name, e);
                }
            }
        });
    }

    if group.is_empty() {
        tracing::warn!("No venues configured");
    }
    tracing::info!(units = group.len(), "Trade units started");
    let finished = group.join_all().await;
    tracing::info!(finished, "All trades attempted");
    finished
}
