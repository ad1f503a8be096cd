//! Bulk Discount Tiers
//!
//! A vendor may carry a list of quantity thresholds, each with its own discount
//! (e.g. buy 10+ for 15% off, buy 50+ for 25% off). Only the single highest
//! threshold reached by the requested quantity applies.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::percent::DiscountPercent;

/// Errors raised when building a [`BulkTiers`] list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TierError {
    /// A tier was defined with a minimum quantity of zero.
    #[error("bulk tier minimum quantity must be at least 1")]
    ZeroQuantity,

    /// Two tiers share the same minimum quantity.
    #[error("more than one bulk tier starts at quantity {0}")]
    DuplicateThreshold(u32),
}

/// A single quantity threshold and the discount it unlocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkTier {
    /// Smallest quantity at which this tier applies.
    pub min_quantity: u32,

    /// Discount unlocked by reaching `min_quantity`.
    pub discount: DiscountPercent,
}

impl BulkTier {
    /// Create a new tier.
    pub const fn new(min_quantity: u32, discount: DiscountPercent) -> Self {
        Self {
            min_quantity,
            discount,
        }
    }
}

/// Bulk tiers kept in ascending `min_quantity` order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BulkTier>", into = "Vec<BulkTier>")]
pub struct BulkTiers {
    tiers: SmallVec<[BulkTier; 4]>,
}

impl BulkTiers {
    /// Build a tier list, sorting it by threshold.
    ///
    /// # Errors
    ///
    /// - [`TierError::ZeroQuantity`]: a tier has `min_quantity == 0`.
    /// - [`TierError::DuplicateThreshold`]: two tiers share a `min_quantity`.
    pub fn new<I>(tiers: I) -> Result<Self, TierError>
    where
        I: IntoIterator<Item = BulkTier>,
    {
        let mut tiers: SmallVec<[BulkTier; 4]> = tiers.into_iter().collect();

        if tiers.iter().any(|tier| tier.min_quantity == 0) {
            return Err(TierError::ZeroQuantity);
        }

        tiers.sort_by_key(|tier| tier.min_quantity);

        if let Some(pair) = tiers
            .windows(2)
            .find(|pair| matches!(pair, [a, b] if a.min_quantity == b.min_quantity))
            && let Some(first) = pair.first()
        {
            return Err(TierError::DuplicateThreshold(first.min_quantity));
        }

        Ok(Self { tiers })
    }

    /// Select the tier with the greatest `min_quantity` that does not exceed `quantity`.
    pub fn select(&self, quantity: u32) -> Option<&BulkTier> {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.min_quantity <= quantity)
    }

    /// The tier starting exactly at `min_quantity`, if any.
    pub fn at(&self, min_quantity: u32) -> Option<&BulkTier> {
        self.tiers
            .iter()
            .find(|tier| tier.min_quantity == min_quantity)
    }

    /// Iterate tiers in ascending threshold order.
    pub fn iter(&self) -> impl Iterator<Item = &BulkTier> {
        self.tiers.iter()
    }

    /// Returns true when no tiers are defined.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }
}

impl TryFrom<Vec<BulkTier>> for BulkTiers {
    type Error = TierError;

    fn try_from(value: Vec<BulkTier>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BulkTiers> for Vec<BulkTier> {
    fn from(value: BulkTiers) -> Self {
        value.tiers.into_vec()
    }
}
