//! Template draft validation
//!
//! Drafts arrive from the admin form, where numeric fields may be strings
//! ("5000") or garbage ("abc"), so they are carried as `serde_json::Value`
//! until validated. Every violation is collected; nothing short-circuits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A template-like payload before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub default_values: Option<Vec<ValueDraft>>,
}

/// One unvalidated value row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueDraft {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub price_adjustment: Option<Value>,
    #[serde(default)]
    pub stock_quantity: Option<Value>,
}

impl ValueDraft {
    /// Coerce into a typed value at the given order position.
    ///
    /// Intended for drafts that already passed [`validate_template`]: a blank
    /// `value` falls back to the slugified label, absent numerics to zero,
    /// and uncoercible numerics are treated as zero rather than rejected
    /// again.
    pub fn into_value(&self, order: i32) -> super::VariantTemplateValue {
        let label = self.label.clone().unwrap_or_default();
        let value = match self.value.as_deref() {
            Some(v) if !v.trim().is_empty() => v.to_string(),
            _ => super::slugify(&label),
        };
        super::VariantTemplateValue {
            label,
            value,
            price_adjustment: self.price_adjustment.as_ref().and_then(as_finite).unwrap_or(0.0).round() as i64,
            stock_quantity: self.stock_quantity.as_ref().and_then(as_finite).unwrap_or(0.0).round() as i64,
            order,
        }
    }
}

/// Validation outcome: `is_valid` iff `errors` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Structurally validate a template draft.
///
/// Rules are evaluated independently and all violations collected, in rule
/// order, with 1-based value positions in the messages.
pub fn validate_template(draft: &TemplateDraft) -> TemplateValidation {
    let mut errors = Vec::new();

    if draft.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        errors.push("template name is required".to_string());
    }

    match draft.default_values.as_deref() {
        None | Some([]) => errors.push("at least one variant value is required".to_string()),
        Some(values) => {
            for (i, v) in values.iter().enumerate() {
                let pos = i + 1;
                if v.label.as_deref().map_or(true, |l| l.trim().is_empty()) {
                    errors.push(format!("value {pos}: label is required"));
                }
                if v.value.as_deref().map_or(true, |c| c.trim().is_empty()) {
                    errors.push(format!("value {pos}: value code is required"));
                }
                if let Some(p) = &v.price_adjustment {
                    if as_finite(p).is_none() {
                        errors.push(format!("value {pos}: price adjustment must be a number"));
                    }
                }
                if let Some(s) = &v.stock_quantity {
                    if as_finite(s).map_or(true, |n| n < 0.0) {
                        errors.push(format!("value {pos}: stock quantity must be a non-negative number"));
                    }
                }
            }
        }
    }

    TemplateValidation { is_valid: errors.is_empty(), errors }
}

fn as_finite(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(v: serde_json::Value) -> TemplateDraft {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_empty_draft() {
        let result = validate_template(&TemplateDraft::default());
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            ["template name is required", "at least one variant value is required"]
        );
    }

    #[test]
    fn test_collects_all_value_errors() {
        let d = draft(json!({
            "name": "X",
            "default_values": [
                { "label": "", "value": "", "price_adjustment": "abc", "stock_quantity": -1 }
            ]
        }));
        let result = validate_template(&d);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 4);
        assert_eq!(result.errors[0], "value 1: label is required");
        assert_eq!(result.errors[1], "value 1: value code is required");
        assert_eq!(result.errors[2], "value 1: price adjustment must be a number");
        assert_eq!(result.errors[3], "value 1: stock quantity must be a non-negative number");
    }

    #[test]
    fn test_positions_are_one_based() {
        let d = draft(json!({
            "name": "Kích cỡ",
            "default_values": [
                { "label": "Size S", "value": "size_s" },
                { "label": "", "value": "size_m" }
            ]
        }));
        let result = validate_template(&d);
        assert_eq!(result.errors, ["value 2: label is required"]);
    }

    #[test]
    fn test_string_numerics_coerce() {
        let d = draft(json!({
            "name": "Kích cỡ",
            "default_values": [
                { "label": "Size S", "value": "size_s", "price_adjustment": "5000", "stock_quantity": "10" }
            ]
        }));
        assert!(validate_template(&d).is_valid);
    }

    #[test]
    fn test_absent_numerics_are_not_errors() {
        let d = draft(json!({
            "name": "Màu",
            "default_values": [ { "label": "Đen", "value": "den" } ]
        }));
        assert!(validate_template(&d).is_valid);
    }

    #[test]
    fn test_into_value_falls_back_to_slug() {
        let d: ValueDraft = serde_json::from_value(json!({
            "label": "Trân châu đen", "price_adjustment": "5000"
        }))
        .unwrap();
        let v = d.into_value(1);
        assert_eq!(v.value, "tran_chau_den");
        assert_eq!(v.price_adjustment, 5_000);
        assert_eq!(v.stock_quantity, 0);
    }
}
