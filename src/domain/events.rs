//! Domain events
//!
//! Published to the message bus when configured; consumers (storefront cache,
//! search indexer) react to variant changes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VariantEvent {
    Created {
        product_id: String,
        variant_name: String,
        variant_value: String,
    },
    Updated {
        variant_id: String,
    },
    Deleted {
        variant_id: String,
    },
}

impl VariantEvent {
    /// Message bus subject for this event.
    pub fn subject(&self) -> &'static str {
        match self {
            VariantEvent::Created { .. } => "variants.created",
            VariantEvent::Updated { .. } => "variants.updated",
            VariantEvent::Deleted { .. } => "variants.deleted",
        }
    }
}
