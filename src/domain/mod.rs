//! Domain types and determinism layer for position reconstruction.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Fixed-point (10^18) conversion for on-chain integer words
//! - Domain primitives: MarketId, OutcomeId, Account, Side
//! - TradeRecord with canonical JSON serialization

pub mod decimal;
pub mod fixedpoint;
pub mod primitives;
pub mod trade;

pub use decimal::Decimal;
pub use fixedpoint::FixedPointError;
pub use primitives::{Account, MarketId, OutcomeId, Side};
pub use trade::TradeRecord;
