//! Mock data source for testing without network calls.

use super::{PositionSource, SourceError, TradingLogSource};
use crate::domain::{Account, MarketId};
use crate::engine::OnChainPosition;
use crate::logs::TradingLogs;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Mock source that serves predefined positions and logs.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    positions: BTreeMap<(Account, MarketId), OnChainPosition>,
    logs: BTreeMap<Account, TradingLogs>,
    position_error: Option<SourceError>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a position for (account, market).
    pub fn with_position(
        mut self,
        account: Account,
        market: MarketId,
        position: OnChainPosition,
    ) -> Self {
        self.positions.insert((account, market), position);
        self
    }

    /// Serve trading logs for an account.
    pub fn with_trading_logs(mut self, account: Account, logs: TradingLogs) -> Self {
        self.logs.insert(account, logs);
        self
    }

    /// Make every position fetch fail with the given error.
    pub fn with_position_error(mut self, error: SourceError) -> Self {
        self.position_error = Some(error);
        self
    }
}

#[async_trait]
impl PositionSource for MockSource {
    async fn fetch_position(
        &self,
        account: &Account,
        market: &MarketId,
    ) -> Result<Option<OnChainPosition>, SourceError> {
        if let Some(error) = &self.position_error {
            return Err(error.clone());
        }
        Ok(self
            .positions
            .get(&(account.clone(), market.clone()))
            .cloned())
    }
}

#[async_trait]
impl TradingLogSource for MockSource {
    async fn fetch_trading_logs(&self, account: &Account) -> Result<TradingLogs, SourceError> {
        Ok(self.logs.get(account).cloned().unwrap_or_default())
    }
}
