//! Async boundary for fetching on-chain positions and trading logs.
//!
//! Implementations own their transport concerns (retries, batching, rate
//! limits); callers see single-shot request/response methods.

pub mod mock;

pub use mock::MockSource;

use crate::domain::{Account, MarketId};
use crate::engine::OnChainPosition;
use crate::logs::TradingLogs;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Read access to per-market on-chain share balances.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Fetch the per-outcome balances an account holds in one market, or
    /// `None` when the source knows of no position there.
    async fn fetch_position(
        &self,
        account: &Account,
        market: &MarketId,
    ) -> Result<Option<OnChainPosition>, SourceError>;
}

/// Read access to an account's complete-set trading logs.
#[async_trait]
pub trait TradingLogSource: Send + Sync {
    /// Fetch the three log kinds for an account. Records arrive unordered
    /// and may contain upstream placeholders with empty data.
    async fn fetch_trading_logs(&self, account: &Account) -> Result<TradingLogs, SourceError>;
}
