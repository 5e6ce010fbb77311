//! Fixed fees for feature purchases and printing

use realpic_album::Price;
use serde::{Deserialize, Serialize};

/// Prices that do not come from the film catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Plus mode
    pub plus_mode: Price,
    /// Pro mode when plus is off (buys both)
    pub pro_mode: Price,
    /// Pro mode when plus is already on
    pub pro_mode_with_plus: Price,
    /// Printing and delivery
    pub delivery: Price,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            plus_mode: Price::from_cents(99),
            pro_mode: Price::from_cents(299),
            pro_mode_with_plus: Price::from_dollars(2),
            delivery: Price::from_dollars(9),
        }
    }
}
