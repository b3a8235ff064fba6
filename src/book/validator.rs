// ============================================================================
// Registration Validator
// Pre-trade price-corridor check against the current quote
// ============================================================================

use crate::domain::settings::PRICE_TOLERANCE;
use crate::numeric::{NumericResult, Price};

/// Inclusive price band derived from a quote and a relative tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCorridor {
    pub floor: Price,
    pub ceiling: Price,
}

impl PriceCorridor {
    /// Whether a proposed price falls inside the corridor, bounds included.
    pub fn contains(&self, proposed: Price) -> bool {
        self.floor <= proposed && proposed <= self.ceiling
    }
}

/// Validates proposed limit prices against the ticker's current quote.
///
/// Orders without a proposed price pass: either the book rejects them later
/// for a missing price, or the engine has already synthesized one from the
/// quote itself.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationValidator {
    tolerance: Price,
}

impl RegistrationValidator {
    pub fn new(tolerance: Price) -> Self {
        Self { tolerance }
    }

    /// Corridor around a quote: `quote ± quote * tolerance`.
    pub fn price_corridor(&self, quote: Price) -> NumericResult<PriceCorridor> {
        let band = quote.checked_mul(self.tolerance)?;
        Ok(PriceCorridor {
            floor: quote.checked_sub(band)?,
            ceiling: quote.checked_add(band)?,
        })
    }

    pub fn is_order_registration_price_valid(
        &self,
        proposed: Option<Price>,
        quote: Price,
    ) -> NumericResult<bool> {
        match proposed {
            Some(price) => Ok(self.price_corridor(quote)?.contains(price)),
            None => Ok(true),
        }
    }
}

impl Default for RegistrationValidator {
    fn default() -> Self {
        Self::new(PRICE_TOLERANCE)
    }
}
