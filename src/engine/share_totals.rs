//! Per-market share-total aggregation over raw trading logs.
//!
//! Totals are signed (buys positive, sells negative) and order-independent:
//! folding the same multiset of logs in any order yields the same maps.
//! Records whose data payload is empty are skipped; structurally malformed
//! records fail the whole batch.

use super::ShareTotals;
use crate::domain::{Decimal, MarketId, OutcomeId};
use crate::logs::{decode_complete_sets, decode_short_sell, DecodeError, LogRecord, TradingLogs};
use std::collections::BTreeMap;

/// Signed per-market sums over complete-set-shaped logs.
pub fn complete_sets_share_totals(
    logs: &[LogRecord],
) -> Result<BTreeMap<MarketId, Decimal>, DecodeError> {
    let mut totals: BTreeMap<MarketId, Decimal> = BTreeMap::new();
    for log in logs.iter().filter(|log| log.has_data()) {
        let fill = decode_complete_sets(log)?;
        let signed = fill.side.signed(fill.amount);
        let entry = totals.entry(fill.market).or_insert_with(Decimal::zero);
        *entry = *entry + signed;
    }
    Ok(totals)
}

/// Short-sell sums per (market, outcome).
pub fn short_sell_share_totals_by_outcome(
    logs: &[LogRecord],
) -> Result<BTreeMap<MarketId, BTreeMap<OutcomeId, Decimal>>, DecodeError> {
    let mut totals: BTreeMap<MarketId, BTreeMap<OutcomeId, Decimal>> = BTreeMap::new();
    for log in logs.iter().filter(|log| log.has_data()) {
        let fill = decode_short_sell(log)?;
        let entry = totals
            .entry(fill.market)
            .or_default()
            .entry(fill.outcome)
            .or_insert_with(Decimal::zero);
        *entry = *entry + fill.amount;
    }
    Ok(totals)
}

/// Per-market short-sell totals: the MAXIMUM single-outcome sum, which is
/// the number of complete sets the short-sell activity could have implied.
pub fn short_sell_share_totals(
    logs: &[LogRecord],
) -> Result<BTreeMap<MarketId, Decimal>, DecodeError> {
    let by_outcome = short_sell_share_totals_by_outcome(logs)?;
    Ok(by_outcome
        .into_iter()
        .map(|(market, outcomes)| {
            let max = outcomes
                .into_values()
                .fold(Decimal::zero(), |acc, v| if v > acc { v } else { acc });
            (market, max)
        })
        .collect())
}

/// Aggregate all three log kinds into one [`ShareTotals`].
pub fn share_totals(logs: &TradingLogs) -> Result<ShareTotals, DecodeError> {
    Ok(ShareTotals {
        short_ask_buy_complete_sets: complete_sets_share_totals(
            &logs.short_ask_buy_complete_sets,
        )?,
        short_sell_buy_complete_sets: short_sell_share_totals(
            &logs.short_sell_buy_complete_sets,
        )?,
        sell_complete_sets: complete_sets_share_totals(&logs.sell_complete_sets)?,
    })
}

/// Implied complete-set price per market: `1 / outcome_count`. Records
/// without the outcome-count word are skipped; a count of zero yields a
/// price of zero. Later records overwrite earlier ones for the same market.
pub fn complete_sets_effective_price(
    logs: &[LogRecord],
) -> Result<BTreeMap<MarketId, Decimal>, DecodeError> {
    let mut prices: BTreeMap<MarketId, Decimal> = BTreeMap::new();
    for log in logs.iter().filter(|log| log.has_data()) {
        let fill = decode_complete_sets(log)?;
        if let Some(count) = fill.outcome_count {
            prices.insert(fill.market, implied_price(count));
        }
    }
    Ok(prices)
}

/// Implied complete-set price per market for short-sell logs; the outcome
/// word doubles as the divisor.
pub fn short_sell_effective_price(
    logs: &[LogRecord],
) -> Result<BTreeMap<MarketId, Decimal>, DecodeError> {
    let mut prices: BTreeMap<MarketId, Decimal> = BTreeMap::new();
    for log in logs.iter().filter(|log| log.has_data()) {
        let fill = decode_short_sell(log)?;
        prices.insert(fill.market, implied_price(fill.outcome.0));
    }
    Ok(prices)
}

fn implied_price(divisor: u32) -> Decimal {
    Decimal::one().div_precise(Decimal::from(divisor))
}
