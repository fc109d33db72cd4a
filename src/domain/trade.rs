//! Chronological trade records consumed by the profit/loss engine.

use super::{Decimal, Side};
use serde::{Deserialize, Serialize};

/// One trade by the tracked account, from the account's own perspective.
///
/// `maker` is carried for reporting only; maker and taker records are
/// accounted for identically. `complete_set` marks trades that create or
/// destroy one share of every outcome at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub side: Side,
    pub amount: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub maker: bool,
    #[serde(default)]
    pub complete_set: bool,
}

impl TradeRecord {
    pub fn new(side: Side, amount: Decimal, price: Decimal) -> Self {
        TradeRecord {
            side,
            amount,
            price,
            maker: false,
            complete_set: false,
        }
    }

    pub fn complete_set(side: Side, amount: Decimal, price: Decimal) -> Self {
        TradeRecord {
            side,
            amount,
            price,
            maker: false,
            complete_set: true,
        }
    }

    pub fn as_maker(mut self) -> Self {
        self.maker = true;
        self
    }
}
