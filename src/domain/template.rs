//! Variant templates
//!
//! A template is a reusable definition of one variant axis (size, color,
//! topping, ...) with an ordered set of default values. Templates are
//! read-only: the catalog is seeded once and exposes no mutation API.

use serde::{Deserialize, Serialize};

use crate::domain::slug::slugify;

/// Template classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Size,
    Color,
    Topping,
    Temperature,
    Custom,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Size => "size",
            TemplateCategory::Color => "color",
            TemplateCategory::Topping => "topping",
            TemplateCategory::Temperature => "temperature",
            TemplateCategory::Custom => "custom",
        }
    }
}

/// One option within a variant axis, carrying its own price delta and stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantTemplateValue {
    /// Display text, e.g. "Size L".
    pub label: String,
    /// Normalized machine key derived from the label unless overridden.
    pub value: String,
    /// Signed amount added to the base product price, in integer currency
    /// units. Negative is a discount.
    pub price_adjustment: i64,
    pub stock_quantity: i64,
    /// Display/processing sequence within the owning set. Unique per set at
    /// creation time; not re-validated after edits.
    pub order: i32,
}

impl VariantTemplateValue {
    /// Build a value whose code is derived from the label.
    pub fn new(label: impl Into<String>, price_adjustment: i64, stock_quantity: i64, order: i32) -> Self {
        let label = label.into();
        let value = slugify(&label);
        Self { label, value, price_adjustment, stock_quantity, order }
    }

    /// Empty row used to seed custom templates in the wizard.
    pub fn blank(order: i32) -> Self {
        Self { label: String::new(), value: String::new(), price_adjustment: 0, stock_quantity: 0, order }
    }
}

/// A named, reusable variant axis definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    /// Display glyph, opaque to the domain logic.
    pub icon: String,
    /// Non-empty; `order` fields are positional at construction time.
    pub default_values: Vec<VariantTemplateValue>,
}

/// Immutable template registry.
///
/// Seeded at construction and injected where needed, so tests can substitute
/// a fixture catalog. Lookup order is declaration order; no sorting.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<VariantTemplate>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<VariantTemplate>) -> Self {
        Self { templates }
    }

    /// The fixed production catalog.
    pub fn builtin() -> Self {
        Self::new(vec![
            VariantTemplate {
                id: "size-standard".into(),
                name: "Kích cỡ tiêu chuẩn".into(),
                description: "Các cỡ S, M, L, XL cho sản phẩm may mặc".into(),
                category: TemplateCategory::Size,
                icon: "📏".into(),
                default_values: vec![
                    VariantTemplateValue::new("Size S", 0, 100, 1),
                    VariantTemplateValue::new("Size M", 5_000, 100, 2),
                    VariantTemplateValue::new("Size L", 10_000, 100, 3),
                    VariantTemplateValue::new("Size XL", 15_000, 100, 4),
                ],
            },
            VariantTemplate {
                id: "size-drink".into(),
                name: "Kích cỡ đồ uống".into(),
                description: "Cỡ ly nhỏ, vừa, lớn cho đồ uống".into(),
                category: TemplateCategory::Size,
                icon: "🥤".into(),
                default_values: vec![
                    VariantTemplateValue::new("Nhỏ", 0, 50, 1),
                    VariantTemplateValue::new("Vừa", 6_000, 50, 2),
                    VariantTemplateValue::new("Lớn", 9_000, 50, 3),
                ],
            },
            VariantTemplate {
                id: "color-basic".into(),
                name: "Màu sắc cơ bản".into(),
                description: "Bảng màu cơ bản cho sản phẩm".into(),
                category: TemplateCategory::Color,
                icon: "🎨".into(),
                default_values: vec![
                    VariantTemplateValue::new("Đen", 0, 30, 1),
                    VariantTemplateValue::new("Trắng", 0, 30, 2),
                    VariantTemplateValue::new("Đỏ", 0, 30, 3),
                    VariantTemplateValue::new("Xanh dương", 0, 30, 4),
                ],
            },
            VariantTemplate {
                id: "topping-drink".into(),
                name: "Topping đồ uống".into(),
                description: "Topping thêm cho trà sữa và cà phê".into(),
                category: TemplateCategory::Topping,
                icon: "🧋".into(),
                default_values: vec![
                    VariantTemplateValue::new("Trân châu đen", 5_000, 100, 1),
                    VariantTemplateValue::new("Trân châu trắng", 7_000, 100, 2),
                    VariantTemplateValue::new("Thạch dừa", 5_000, 80, 3),
                    VariantTemplateValue::new("Pudding trứng", 8_000, 60, 4),
                    VariantTemplateValue::new("Kem cheese", 10_000, 50, 5),
                ],
            },
            VariantTemplate {
                id: "temperature-serving".into(),
                name: "Nhiệt độ phục vụ".into(),
                description: "Nóng, đá hoặc ít đá".into(),
                category: TemplateCategory::Temperature,
                icon: "🌡️".into(),
                default_values: vec![
                    VariantTemplateValue::new("Nóng", 0, 100, 1),
                    VariantTemplateValue::new("Đá", 0, 100, 2),
                    VariantTemplateValue::new("Ít đá", 0, 100, 3),
                ],
            },
        ])
    }

    pub fn get(&self, id: &str) -> Option<&VariantTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn by_category(&self, category: TemplateCategory) -> Vec<&VariantTemplate> {
        self.templates.iter().filter(|t| t.category == category).collect()
    }

    pub fn all(&self) -> &[VariantTemplate] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_code_derived_from_label() {
        let v = VariantTemplateValue::new("Trân châu đen", 5_000, 100, 1);
        assert_eq!(v.value, "tran_chau_den");
    }

    #[test]
    fn test_builtin_lookup() {
        let catalog = TemplateCatalog::builtin();
        let t = catalog.get("size-standard").unwrap();
        assert_eq!(t.name, "Kích cỡ tiêu chuẩn");
        assert_eq!(t.default_values.len(), 4);
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn test_by_category_keeps_declaration_order() {
        let catalog = TemplateCatalog::builtin();
        let sizes = catalog.by_category(TemplateCategory::Size);
        let ids: Vec<&str> = sizes.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["size-standard", "size-drink"]);
        assert!(catalog.by_category(TemplateCategory::Custom).is_empty());
    }

    #[test]
    fn test_builtin_integrity() {
        for t in TemplateCatalog::builtin().all() {
            assert!(!t.default_values.is_empty(), "{} has no values", t.id);
            for v in &t.default_values {
                assert_eq!(v.value, crate::domain::slug::slugify(&v.label));
                assert!(v.stock_quantity >= 0);
            }
            let mut orders: Vec<i32> = t.default_values.iter().map(|v| v.order).collect();
            orders.dedup();
            assert_eq!(orders.len(), t.default_values.len(), "{} orders not unique", t.id);
            assert_eq!(orders, (1..=orders.len() as i32).collect::<Vec<_>>());
        }
    }
}
