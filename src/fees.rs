//! Trading fee, gas, and liquidity math. Everything here is pure.

use crate::domain::{Decimal, Side};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Gas consumed by the first order of a trade and by each additional order.
#[derive(Debug, Clone, Copy)]
struct TradeGas {
    first: u64,
    additional: u64,
}

const TRADE_GAS_BUY: TradeGas = TradeGas {
    first: 787_421,
    additional: 665_196,
};

const TRADE_GAS_SELL: TradeGas = TradeGas {
    first: 756_374,
    additional: 615_817,
};

/// Gas cost assumed when sizing the cash a new market must hold.
pub const REQUIRED_MARKET_VALUE_GAS: u64 = 1_700_000;

fn trade_gas(side: Side) -> TradeGas {
    match side {
        Side::Buy => TRADE_GAS_BUY,
        Side::Sell => TRADE_GAS_SELL,
    }
}

/// Fee rate adjusted for where the price sits inside the market's range:
/// `base_fee * (1 - 4 * (price/range - 1/2)^2)`. Maximal at the midpoint,
/// zero at either extreme.
pub fn adjusted_trading_fee(base_fee: Decimal, price: Decimal, range: Decimal) -> Decimal {
    let half = Decimal::new(rust_decimal::Decimal::new(5, 1));
    let offset = price.div_precise(range) - half;
    let four = Decimal::from(4u32);
    base_fee * (Decimal::one() - four * offset * offset)
}

/// Cost breakdown of one trade at a given price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingCost {
    /// Total cash outlay: `amount * price + fee`.
    pub cost: Decimal,
    /// Absolute fee paid: `amount * price * percent_fee`.
    pub fee: Decimal,
    /// Price-adjusted fee rate.
    pub percent_fee: Decimal,
}

pub fn trading_cost(
    amount: Decimal,
    price: Decimal,
    base_fee: Decimal,
    range: Decimal,
) -> TradingCost {
    let percent_fee = adjusted_trading_fee(base_fee, price, range);
    let notional = amount * price;
    let fee = notional * percent_fee;
    TradingCost {
        cost: notional + fee,
        fee,
        percent_fee,
    }
}

/// How many orders a single trade transaction can fill inside `gas_limit`.
/// Always at least one; non-decreasing in the gas limit.
pub fn max_orders_per_trade(side: Side, gas_limit: u64) -> u64 {
    let gas = trade_gas(side);
    1 + gas_limit.saturating_sub(gas.first) / gas.additional
}

/// Total gas for a sequence of trades: the first pays its side's first-order
/// gas, every subsequent trade pays its side's additional-order gas.
pub fn sum_trade_gas(sides: &[Side]) -> u64 {
    sides
        .iter()
        .enumerate()
        .map(|(i, side)| {
            let gas = trade_gas(*side);
            if i == 0 {
                gas.first
            } else {
                gas.additional
            }
        })
        .sum()
}

/// Cash a newly created market must hold to cover trading gas, as a
/// 0x-prefixed hex integer string of `REQUIRED_MARKET_VALUE_GAS * gas_price`.
pub fn required_market_value(gas_price: Decimal) -> String {
    let value = Decimal::from(REQUIRED_MARKET_VALUE_GAS) * gas_price;
    let raw = value.inner().trunc().to_u128().unwrap_or(0);
    format!("0x{:x}", raw)
}

/// Price movement per share at the book's edge:
/// `sq * (max - min - half_width) / (liquidity - 2 * bsq)`.
/// Returns None when the denominator is not positive (the order sizes
/// exhaust the liquidity and depth is unbounded).
pub fn price_depth(
    liquidity: Decimal,
    starting_quantity: Decimal,
    best_starting_quantity: Decimal,
    half_price_width: Decimal,
    min_value: Decimal,
    max_value: Decimal,
) -> Option<Decimal> {
    let two = Decimal::from(2u32);
    let denominator = liquidity - two * best_starting_quantity;
    if !denominator.is_positive() {
        return None;
    }
    let numerator = starting_quantity * (max_value - min_value - half_price_width);
    Some(numerator.div_precise(denominator))
}
