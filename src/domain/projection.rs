//! Variant projection
//!
//! Pure mapping from a template (or a wizard's working value list) into the
//! flat records handed to the persistence collaborator.

use serde::{Deserialize, Serialize};

use crate::domain::template::{VariantTemplate, VariantTemplateValue};

/// Persistable variant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVariant {
    /// Key of the externally-owned product; opaque here.
    pub product_id: String,
    /// Group name shared by all values of one wizard run, e.g. "Size".
    pub variant_name: String,
    pub variant_value: String,
    pub price_adjustment: i64,
    pub stock_quantity: i64,
    pub is_active: bool,
}

/// Project a template's default values into persistable records.
pub fn project(template: &VariantTemplate, product_id: &str, variant_name: &str) -> Vec<NewVariant> {
    project_values(&template.default_values, product_id, variant_name)
}

/// Project a value list into persistable records, preserving order.
///
/// `variant_value` carries the human-readable `label`, not the normalized
/// `value` code; downstream lookups keyed by code will not match these rows.
/// That is the stored convention and is kept as-is.
pub fn project_values(
    values: &[VariantTemplateValue],
    product_id: &str,
    variant_name: &str,
) -> Vec<NewVariant> {
    values
        .iter()
        .map(|v| NewVariant {
            product_id: product_id.to_string(),
            variant_name: variant_name.to_string(),
            variant_value: v.label.clone(),
            price_adjustment: v.price_adjustment,
            stock_quantity: v.stock_quantity,
            is_active: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::TemplateCatalog;

    #[test]
    fn test_projection_fidelity() {
        let catalog = TemplateCatalog::builtin();
        let template = catalog.get("topping-drink").unwrap();
        let records = project(template, "p42", "Topping");

        assert_eq!(records.len(), template.default_values.len());
        for (record, value) in records.iter().zip(&template.default_values) {
            assert_eq!(record.product_id, "p42");
            assert_eq!(record.variant_name, "Topping");
            assert_eq!(record.variant_value, value.label);
            assert_eq!(record.price_adjustment, value.price_adjustment);
            assert_eq!(record.stock_quantity, value.stock_quantity);
            assert!(record.is_active);
        }
    }

    #[test]
    fn test_projection_uses_label_not_code() {
        let catalog = TemplateCatalog::builtin();
        let template = catalog.get("color-basic").unwrap();
        let records = project(template, "p1", "Màu sắc");
        assert_eq!(records[0].variant_value, "Đen");
        assert_ne!(records[0].variant_value, "den");
    }
}
