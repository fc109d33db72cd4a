//! Reconciliation flow: fetch on-chain state, net out complete-set
//! activity, and hand back adjusted per-market positions.

pub mod reconcile;

pub use reconcile::{adjust_positions, adjusted_positions, reconcile_account, PositionError};
