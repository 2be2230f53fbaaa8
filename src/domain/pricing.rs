//! Bulk pricing transforms
//!
//! Recompute every value's price adjustment in one pass. Transforms return a
//! new list; the input is never mutated.

use serde::{Deserialize, Serialize};

use crate::domain::template::VariantTemplateValue;

/// Strategy applied to a whole value set at once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BulkPricing {
    /// Adjustment becomes `increment` times the zero-based position. This
    /// replaces the existing adjustment, so `Flat { increment: 0 }` is the
    /// reset action.
    Flat { increment: i64 },
    /// Adjustment becomes `round(old * (1 + percent / 100))`, ties away from
    /// zero. A zero adjustment stays zero.
    Percentage { percent: f64 },
}

/// Apply a bulk pricing strategy, yielding the recomputed value list.
pub fn apply_bulk(values: &[VariantTemplateValue], pricing: BulkPricing) -> Vec<VariantTemplateValue> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let mut v = v.clone();
            v.price_adjustment = match pricing {
                BulkPricing::Flat { increment } => increment * i as i64,
                BulkPricing::Percentage { percent } => {
                    // f64::round ties away from zero
                    (v.price_adjustment as f64 * (1.0 + percent / 100.0)).round() as i64
                }
            };
            v
        })
        .collect()
}
