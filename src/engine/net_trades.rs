//! Collapsing raw complete-set logs into per-market net-effective trades.
//!
//! Each log kind reduces to at most one trade per market: the absolute
//! share total priced at the implied complete-set price. These records feed
//! the profit/loss engine alongside ordinary market trades.

use super::share_totals::{
    complete_sets_effective_price, complete_sets_share_totals, short_sell_effective_price,
    short_sell_share_totals,
};
use crate::domain::{Decimal, MarketId, Side, TradeRecord};
use crate::logs::{DecodeError, LogRecord, TradingLogs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One collapsed complete-set trade for a market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveTrade {
    pub side: Side,
    pub price: Decimal,
    pub shares: Decimal,
}

impl From<&EffectiveTrade> for TradeRecord {
    fn from(trade: &EffectiveTrade) -> Self {
        TradeRecord::complete_set(trade.side, trade.shares, trade.price)
    }
}

/// Net-effective complete-set trades for one market, one slot per log kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetEffectiveTrades {
    pub short_ask_buy_complete_sets: Option<EffectiveTrade>,
    pub short_sell_buy_complete_sets: Option<EffectiveTrade>,
    pub sell_complete_sets: Option<EffectiveTrade>,
}

pub fn net_effective_trades(
    logs: &TradingLogs,
) -> Result<BTreeMap<MarketId, NetEffectiveTrades>, DecodeError> {
    let mut trades: BTreeMap<MarketId, NetEffectiveTrades> = BTreeMap::new();

    for (market, trade) in collapse_complete_sets(&logs.short_ask_buy_complete_sets, Side::Buy)? {
        trades.entry(market).or_default().short_ask_buy_complete_sets = Some(trade);
    }
    for (market, trade) in collapse_short_sells(&logs.short_sell_buy_complete_sets)? {
        trades.entry(market).or_default().short_sell_buy_complete_sets = Some(trade);
    }
    for (market, trade) in collapse_complete_sets(&logs.sell_complete_sets, Side::Sell)? {
        trades.entry(market).or_default().sell_complete_sets = Some(trade);
    }

    Ok(trades)
}

fn collapse_complete_sets(
    logs: &[LogRecord],
    side: Side,
) -> Result<Vec<(MarketId, EffectiveTrade)>, DecodeError> {
    let totals = complete_sets_share_totals(logs)?;
    let prices = complete_sets_effective_price(logs)?;
    Ok(totals
        .into_iter()
        .map(|(market, total)| {
            let price = prices.get(&market).copied().unwrap_or_else(Decimal::zero);
            let trade = EffectiveTrade {
                side,
                price,
                shares: total.abs(),
            };
            (market, trade)
        })
        .collect())
}

fn collapse_short_sells(
    logs: &[LogRecord],
) -> Result<Vec<(MarketId, EffectiveTrade)>, DecodeError> {
    let totals = short_sell_share_totals(logs)?;
    let prices = short_sell_effective_price(logs)?;
    Ok(totals
        .into_iter()
        .map(|(market, total)| {
            let price = prices.get(&market).copied().unwrap_or_else(Decimal::zero);
            let trade = EffectiveTrade {
                side: Side::Buy,
                price,
                shares: total.abs(),
            };
            (market, trade)
        })
        .collect())
}
