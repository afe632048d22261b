//! Static PC tier catalog.
//!
//! Prices are whole XOF amounts. Nothing mutates them at runtime; reporting
//! paths that convert pooled money into PCs must go through
//! [`BASIC_PC_PRICE`] rather than repeating the literal.

use crate::types::PcTier;

/// Currency applied when a donation does not name one.
pub const DEFAULT_CURRENCY: &str = "XOF";

pub const BASIC_PC_PRICE: i64 = 150_000;
pub const STANDARD_PC_PRICE: i64 = 250_000;
pub const PREMIUM_PC_PRICE: i64 = 350_000;

impl PcTier {
    /// Price of one fully funded unit of this tier.
    pub fn base_price(&self) -> i64 {
        match self {
            Self::Basic => BASIC_PC_PRICE,
            Self::Standard => STANDARD_PC_PRICE,
            Self::Premium => PREMIUM_PC_PRICE,
        }
    }
}
