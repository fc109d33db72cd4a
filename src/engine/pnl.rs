//! Profit-and-loss accumulator over chronological trade records.
//!
//! Folding is sequential and stateful: callers feed trades in chronological
//! order and the accumulator tracks net position, mean open price, realized
//! profit, and a FIFO queue of short covers whose profit is deferred until
//! complete sets are sold. Re-applying a trade double-counts it; the fold is
//! deliberately not idempotent.

use crate::domain::{Decimal, Side, TradeRecord};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A short position covered by a buy whose profit is not yet realized.
/// Selling complete sets releases these lots front to back.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CoverLot {
    shares: Decimal,
    short_price: Decimal,
    cover_price: Decimal,
}

impl CoverLot {
    fn profit(&self) -> Decimal {
        self.shares * (self.short_price - self.cover_price)
    }
}

/// Running profit/loss state for one (market, outcome) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfitLoss {
    position: Decimal,
    mean_open_price: Decimal,
    realized: Decimal,
    queued_covers: VecDeque<CoverLot>,
}

/// Point-in-time snapshot at a given last trade price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitLossSummary {
    pub position: Decimal,
    pub mean_open_price: Decimal,
    pub realized: Decimal,
    pub unrealized: Decimal,
    pub queued: Decimal,
}

impl ProfitLoss {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Decimal {
        self.position
    }

    pub fn mean_open_price(&self) -> Decimal {
        self.mean_open_price
    }

    pub fn realized(&self) -> Decimal {
        self.realized
    }

    /// Deferred profit sitting in the cover queue.
    pub fn queued(&self) -> Decimal {
        self.queued_covers
            .iter()
            .fold(Decimal::zero(), |acc, lot| acc + lot.profit())
    }

    /// Fold one trade into the state. Trades must arrive in chronological
    /// order; maker and taker records are treated identically.
    pub fn apply(&mut self, trade: &TradeRecord) {
        match (trade.side, trade.complete_set) {
            (Side::Buy, _) => self.buy(trade.amount, trade.price),
            (Side::Sell, false) => self.sell(trade.amount, trade.price),
            (Side::Sell, true) => self.sell_complete_sets(trade.amount, trade.price),
        }
    }

    /// Snapshot the state against the market's last trade price.
    pub fn summarize(&self, last_price: Decimal) -> ProfitLossSummary {
        let queued = self.queued();
        ProfitLossSummary {
            position: self.position,
            mean_open_price: self.mean_open_price,
            realized: self.realized,
            unrealized: (last_price - self.mean_open_price) * self.position + queued,
            queued,
        }
    }

    fn buy(&mut self, amount: Decimal, price: Decimal) {
        if self.position.is_negative() {
            // Covering a short defers the profit instead of realizing it;
            // the lot is released when complete sets are sold.
            let covered = amount.min(self.position.abs());
            self.queued_covers.push_back(CoverLot {
                shares: covered,
                short_price: self.mean_open_price,
                cover_price: price,
            });
            self.position += covered;
            if self.position.is_zero() {
                self.mean_open_price = Decimal::zero();
            }
            let excess = amount - covered;
            if excess.is_positive() {
                self.position = excess;
                self.mean_open_price = price;
            }
        } else {
            let total = self.position + amount;
            self.mean_open_price =
                (self.position * self.mean_open_price + amount * price).div_precise(total);
            self.position = total;
        }
    }

    fn sell(&mut self, amount: Decimal, price: Decimal) {
        if self.position.is_positive() {
            let closed = amount.min(self.position);
            self.realized += (price - self.mean_open_price) * closed;
            self.position -= closed;
            if self.position.is_zero() {
                self.mean_open_price = Decimal::zero();
            }
            let excess = amount - closed;
            if excess.is_positive() {
                self.position = -excess;
                self.mean_open_price = price;
            }
        } else {
            let total_short = self.position.abs() + amount;
            self.mean_open_price = (self.position.abs() * self.mean_open_price + amount * price)
                .div_precise(total_short);
            self.position -= amount;
        }
    }

    /// Selling complete sets first releases queued cover lots FIFO, then
    /// closes any remaining long at the trade price. It never opens a short.
    fn sell_complete_sets(&mut self, amount: Decimal, price: Decimal) {
        let mut remaining = amount;
        while remaining.is_positive() {
            let Some(front) = self.queued_covers.front_mut() else {
                break;
            };
            let take = remaining.min(front.shares);
            self.realized += take * (front.short_price - front.cover_price);
            front.shares -= take;
            remaining -= take;
            if !front.shares.is_positive() {
                self.queued_covers.pop_front();
            }
        }
        if remaining.is_positive() && self.position.is_positive() {
            let closed = remaining.min(self.position);
            self.realized += (price - self.mean_open_price) * closed;
            self.position -= closed;
            if self.position.is_zero() {
                self.mean_open_price = Decimal::zero();
            }
        }
    }
}

/// Fold a chronological trade sequence and snapshot it at `last_price`.
pub fn calculate_profit_loss(trades: &[TradeRecord], last_price: Decimal) -> ProfitLossSummary {
    let mut state = ProfitLoss::new();
    for trade in trades {
        state.apply(trade);
    }
    state.summarize(last_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn buy(amount: &str, price: &str) -> TradeRecord {
        TradeRecord::new(Side::Buy, d(amount), d(price))
    }

    fn sell(amount: &str, price: &str) -> TradeRecord {
        TradeRecord::new(Side::Sell, d(amount), d(price))
    }

    fn cs_buy(amount: &str, price: &str) -> TradeRecord {
        TradeRecord::complete_set(Side::Buy, d(amount), d(price))
    }

    fn cs_sell(amount: &str, price: &str) -> TradeRecord {
        TradeRecord::complete_set(Side::Sell, d(amount), d(price))
    }

    fn summary(pos: &str, mop: &str, realized: &str, unrealized: &str, queued: &str) -> ProfitLossSummary {
        ProfitLossSummary {
            position: d(pos),
            mean_open_price: d(mop),
            realized: d(realized),
            unrealized: d(unrealized),
            queued: d(queued),
        }
    }

    #[test]
    fn test_no_trades() {
        assert_eq!(
            calculate_profit_loss(&[], d("0.5")),
            summary("0", "0", "0", "0", "0")
        );
    }

    #[test]
    fn test_single_buy_unrealized_gain() {
        assert_eq!(
            calculate_profit_loss(&[buy("10", "0.1")], d("0.2")),
            summary("10", "0.1", "0", "1", "0")
        );
    }

    #[test]
    fn test_buy_then_full_sell_realizes() {
        assert_eq!(
            calculate_profit_loss(&[buy("10", "0.1"), sell("10", "0.2")], d("0.2")),
            summary("0", "0", "1", "0", "0")
        );
    }

    #[test]
    fn test_partial_sell_keeps_mean_open_price() {
        assert_eq!(
            calculate_profit_loss(&[buy("10", "0.1"), sell("5", "0.2")], d("0.2")),
            summary("5", "0.1", "0.5", "0.5", "0")
        );
    }

    #[test]
    fn test_mean_open_price_weighted_on_add() {
        let trades = [buy("10", "0.4"), buy("10", "0.5")];
        let s = calculate_profit_loss(&trades, d("0.45"));
        assert_eq!(s.mean_open_price, d("0.45"));
        assert_eq!(s.position, d("20"));
    }

    #[test]
    fn test_twenty_digit_mean_open_price() {
        let trades = [
            buy("10", "0.1"),
            sell("5", "0.1"),
            buy("10", "0.2"),
            sell("5", "0.2"),
        ];
        let s = calculate_profit_loss(&trades, d("0.2"));
        assert_eq!(s.position, d("10"));
        assert_eq!(s.mean_open_price, d("0.16666666666666666667"));
        assert_eq!(s.realized, d("0.16666666666666666665"));
    }

    #[test]
    fn test_short_open_unrealized() {
        assert_eq!(
            calculate_profit_loss(&[sell("10", "0.1")], d("0.05")),
            summary("-10", "0.1", "0", "0.5", "0")
        );
    }

    #[test]
    fn test_short_add_weighted_mean() {
        let trades = [sell("10", "0.1"), sell("10", "0.3")];
        let s = calculate_profit_loss(&trades, d("0.2"));
        assert_eq!(s.position, d("-20"));
        assert_eq!(s.mean_open_price, d("0.2"));
        assert_eq!(s.unrealized, d("0"));
    }

    #[test]
    fn test_short_cover_is_queued_not_realized() {
        assert_eq!(
            calculate_profit_loss(&[sell("10", "0.1"), buy("10", "0.05")], d("0.05")),
            summary("0", "0", "0", "0.5", "0.5")
        );
    }

    #[test]
    fn test_partial_short_cover() {
        assert_eq!(
            calculate_profit_loss(&[sell("10", "0.1"), buy("5", "0.05")], d("0.05")),
            summary("-5", "0.1", "0", "0.5", "0.25")
        );
    }

    #[test]
    fn test_flip_long_to_short() {
        assert_eq!(
            calculate_profit_loss(&[buy("10", "0.5"), sell("20", "0.48")], d("0.48")),
            summary("-10", "0.48", "-0.2", "0", "0")
        );
    }

    #[test]
    fn test_flip_short_to_long() {
        let trades = [sell("10", "0.1"), buy("20", "0.15")];
        let s = calculate_profit_loss(&trades, d("0.15"));
        assert_eq!(s.position, d("10"));
        assert_eq!(s.mean_open_price, d("0.15"));
        assert_eq!(s.realized, d("0"));
        // the covered 10 shares wait in the queue at a 0.05 loss each
        assert_eq!(s.queued, d("-0.5"));
        assert_eq!(s.unrealized, d("-0.5"));
    }

    #[test]
    fn test_complete_set_sell_flushes_queue_fifo() {
        let trades = [sell("10", "0.1"), buy("10", "0.2"), cs_sell("5", "0.2")];
        let s = calculate_profit_loss(&trades, d("0.2"));
        assert_eq!(s.position, d("0"));
        assert_eq!(s.realized, d("-0.5"));
        assert_eq!(s.queued, d("-0.5"));
        assert_eq!(s.unrealized, d("-0.5"));
    }

    #[test]
    fn test_complete_set_sell_flushes_multiple_lots() {
        let trades = [
            sell("4", "0.3"),
            buy("4", "0.1"),
            sell("6", "0.4"),
            buy("6", "0.2"),
            cs_sell("10", "0.5"),
        ];
        let s = calculate_profit_loss(&trades, d("0.5"));
        // 4 x 0.2 + 6 x 0.2
        assert_eq!(s.realized, d("2"));
        assert_eq!(s.queued, d("0"));
        assert_eq!(s.position, d("0"));
    }

    #[test]
    fn test_complete_set_buy_acts_as_buy() {
        assert_eq!(
            calculate_profit_loss(&[cs_buy("5", "0.2")], d("0.3")),
            summary("5", "0.2", "0", "0.5", "0")
        );
    }

    #[test]
    fn test_complete_set_sell_closes_long_at_trade_price() {
        assert_eq!(
            calculate_profit_loss(&[cs_buy("5", "0.2"), cs_sell("5", "0.3")], d("0.3")),
            summary("0", "0", "0.5", "0", "0")
        );
    }

    #[test]
    fn test_complete_set_sell_never_opens_short() {
        let s = calculate_profit_loss(&[cs_buy("2", "0.5"), cs_sell("10", "0.5")], d("0.5"));
        assert_eq!(s.position, d("0"));
        assert_eq!(s.realized, d("0"));
    }

    #[test]
    fn test_maker_flag_does_not_change_accounting() {
        let taker = [buy("10", "0.1"), sell("10", "0.2")];
        let maker: Vec<TradeRecord> = taker.iter().cloned().map(TradeRecord::as_maker).collect();
        assert_eq!(
            calculate_profit_loss(&taker, d("0.2")),
            calculate_profit_loss(&maker, d("0.2"))
        );
    }

    #[test]
    fn test_mean_open_price_zero_iff_flat() {
        let mut state = ProfitLoss::new();
        state.apply(&buy("3", "0.4"));
        assert!(!state.mean_open_price().is_zero());
        state.apply(&sell("3", "0.4"));
        assert!(state.position().is_zero());
        assert!(state.mean_open_price().is_zero());
    }

    #[test]
    fn test_folding_is_not_idempotent() {
        let trade = buy("1", "0.5");
        let mut state = ProfitLoss::new();
        state.apply(&trade);
        state.apply(&trade);
        assert_eq!(state.position(), d("2"));
    }
}
