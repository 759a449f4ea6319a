//! Domain errors
//!
//! Only parse failures live here. Per-pair and per-cycle problems during a scan
//! are values (`RateIssue`, `Detection`, `CycleDefect`), never errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    #[error("invalid currency code {0:?} (expected 3 ASCII letters)")]
    InvalidCurrency(String),

    #[error("invalid pair code {0:?} (expected BASEQUOTE, e.g. USDEUR or USDEUR=X)")]
    InvalidPairCode(String),

    #[error("pair code {0:?} quotes a currency against itself")]
    SelfPair(String),
}
