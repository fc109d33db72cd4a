//! Pure computation engines for deterministic position reconstruction.

use crate::domain::{Decimal, MarketId, OutcomeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod adjust;
pub mod net_trades;
pub mod pnl;
pub mod share_totals;

pub use adjust::decrease_position;
pub use net_trades::{net_effective_trades, EffectiveTrade, NetEffectiveTrades};
pub use pnl::{calculate_profit_loss, ProfitLoss, ProfitLossSummary};
pub use share_totals::share_totals;

/// Per-outcome share balances held on-chain (ground truth, never mutated).
pub type OnChainPosition = BTreeMap<OutcomeId, Decimal>;

/// Per-outcome share balances after netting out complete-set activity.
pub type AdjustedPosition = BTreeMap<OutcomeId, Decimal>;

/// Signed per-market complete-set share totals, one sub-map per log kind.
/// Buys accumulate positively, sells negatively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareTotals {
    pub short_ask_buy_complete_sets: BTreeMap<MarketId, Decimal>,
    pub short_sell_buy_complete_sets: BTreeMap<MarketId, Decimal>,
    pub sell_complete_sets: BTreeMap<MarketId, Decimal>,
}

impl ShareTotals {
    /// Every market touched by any of the three kinds, first-seen order
    /// (short ask, then short sell, then sell), deduplicated.
    pub fn unique_market_ids(&self) -> Vec<MarketId> {
        let mut ids: Vec<MarketId> = Vec::new();
        for id in self
            .short_ask_buy_complete_sets
            .keys()
            .chain(self.short_sell_buy_complete_sets.keys())
            .chain(self.sell_complete_sets.keys())
        {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}
