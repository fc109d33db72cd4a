//! Adjusted-position reconciliation against a position source.
//!
//! The flow is all-or-nothing: the first market whose position cannot be
//! loaded aborts the whole call, so callers never see a partially adjusted
//! map they might mistake for a complete one.

use crate::datasource::{PositionSource, SourceError, TradingLogSource};
use crate::domain::{Account, Decimal, MarketId};
use crate::engine::adjust::{decrease_position, sell_adjustment};
use crate::engine::{share_totals, AdjustedPosition, ShareTotals};
use crate::logs::{DecodeError, TradingLogs};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("couldn't load position in {0}")]
    MissingPosition(MarketId),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

fn total_for(map: &BTreeMap<MarketId, Decimal>, market: &MarketId) -> Decimal {
    map.get(market).copied().unwrap_or_else(Decimal::zero)
}

/// Fetch each market's on-chain position and net its complete-set activity
/// out of every outcome balance.
pub async fn adjust_positions<S: PositionSource>(
    account: &Account,
    market_ids: &[MarketId],
    totals: &ShareTotals,
    source: &S,
) -> Result<BTreeMap<MarketId, AdjustedPosition>, PositionError> {
    let mut adjusted = BTreeMap::new();
    for market in market_ids {
        let position = match source.fetch_position(account, market).await? {
            Some(position) => position,
            None => {
                warn!(account = %account, market = %market, "position missing upstream");
                return Err(PositionError::MissingPosition(market.clone()));
            }
        };
        let adjustment = sell_adjustment(
            total_for(&totals.short_ask_buy_complete_sets, market),
            total_for(&totals.short_sell_buy_complete_sets, market),
            total_for(&totals.sell_complete_sets, market),
        );
        debug!(market = %market, adjustment = %adjustment, "netting complete sets");
        adjusted.insert(market.clone(), decrease_position(&position, adjustment));
    }
    Ok(adjusted)
}

/// Aggregate share totals from raw logs, then adjust every touched market.
pub async fn adjusted_positions<S: PositionSource>(
    account: &Account,
    logs: &TradingLogs,
    source: &S,
) -> Result<BTreeMap<MarketId, AdjustedPosition>, PositionError> {
    let totals = share_totals::share_totals(logs)?;
    let market_ids = totals.unique_market_ids();
    debug!(account = %account, markets = market_ids.len(), "adjusting positions");
    adjust_positions(account, &market_ids, &totals, source).await
}

/// Full reconciliation for one account: fetch its trading logs, then
/// compute adjusted positions for every market they touch.
pub async fn reconcile_account<S>(
    account: &Account,
    source: &S,
) -> Result<BTreeMap<MarketId, AdjustedPosition>, PositionError>
where
    S: PositionSource + TradingLogSource,
{
    let logs = source.fetch_trading_logs(account).await?;
    adjusted_positions(account, &logs, source).await
}
