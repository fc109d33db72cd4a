//! Netting complete-set activity out of on-chain per-outcome balances.

use super::{AdjustedPosition, OnChainPosition};
use crate::domain::Decimal;

/// Subtract `adjustment` from every outcome balance.
///
/// A complete set contains one share of each outcome, so removing the
/// complete sets a trader effectively round-tripped means the same uniform
/// subtraction on all outcomes. An adjustment of zero is a no-op; a negative
/// adjustment adds shares back uniformly.
pub fn decrease_position(position: &OnChainPosition, adjustment: Decimal) -> AdjustedPosition {
    position
        .iter()
        .map(|(outcome, balance)| (*outcome, *balance - adjustment))
        .collect()
}

/// The number of complete sets to net out of a market's position.
///
/// Only sells explained by prior short-ask or short-sell buys are netted:
/// `clamp = short_ask + short_sell`; a sell total exceeding the clamp in
/// magnitude is truncated to `-clamp` before being offset against it.
pub fn sell_adjustment(short_ask: Decimal, short_sell: Decimal, sell_total: Decimal) -> Decimal {
    let clamp = short_ask + short_sell;
    let sell = if sell_total.abs() > clamp {
        -clamp
    } else {
        sell_total
    };
    clamp + sell
}
