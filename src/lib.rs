//! Client-side position and profit/loss reconstruction for prediction
//! markets.
//!
//! Given the raw complete-set trading logs of an account, this crate
//! rebuilds what the account actually holds and how it has performed:
//!
//! - [`logs`] decodes raw `{ topics, data }` event records into typed fills
//! - [`engine`] holds the pure math: signed share totals per market,
//!   position adjustment (netting complete sets out of per-outcome
//!   balances), net-effective complete-set trades, and the profit/loss fold
//! - [`fees`] prices trades: adjusted fee rates, trading cost, gas sizing
//! - [`datasource`] is the async fetch boundary, with a mock for tests
//! - [`orchestration`] wires fetching and adjustment into one flow
//!
//! All share and price arithmetic is decimal; nothing round-trips through
//! floats.

pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod fees;
pub mod logs;
pub mod orchestration;

pub use config::Config;
pub use datasource::{MockSource, PositionSource, SourceError, TradingLogSource};
pub use domain::{Account, Decimal, MarketId, OutcomeId, Side, TradeRecord};
pub use engine::{
    calculate_profit_loss, decrease_position, net_effective_trades, share_totals,
    AdjustedPosition, EffectiveTrade, NetEffectiveTrades, OnChainPosition, ProfitLoss,
    ProfitLossSummary, ShareTotals,
};
pub use logs::{DecodeError, LogRecord, TradingLogs, WordReader};
pub use orchestration::{adjust_positions, adjusted_positions, reconcile_account, PositionError};
