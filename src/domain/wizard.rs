//! Wizard controller
//!
//! The guided flow that turns a template (or custom input) into persisted
//! variant records for one product: template selection, value customization,
//! pricing/stock, confirmation. Forward movement is gated per step; going
//! back never re-validates. One session is exclusively owned by one admin
//! user and is never persisted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::{apply_bulk, BulkPricing};
use crate::domain::projection::{project_values, NewVariant};
use crate::domain::slug::slugify;
use crate::domain::template::{VariantTemplate, VariantTemplateValue};
use crate::{Error, Result};

/// Persistence collaborator: creates one variant record per call.
#[async_trait]
pub trait VariantWriter: Send + Sync {
    async fn create(&self, variant: &NewVariant) -> Result<()>;
}

/// Wizard position. Steps 1-4, plus the terminal state reached by cancel or
/// successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    SelectTemplate,
    CustomizeValues,
    PricingStock,
    Confirm,
    Closed,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::SelectTemplate => 1,
            WizardStep::CustomizeValues => 2,
            WizardStep::PricingStock => 3,
            WizardStep::Confirm => 4,
            WizardStep::Closed => 0,
        }
    }

    fn forward(&self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectTemplate => Some(WizardStep::CustomizeValues),
            WizardStep::CustomizeValues => Some(WizardStep::PricingStock),
            WizardStep::PricingStock => Some(WizardStep::Confirm),
            WizardStep::Confirm | WizardStep::Closed => None,
        }
    }

    fn backward(&self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectTemplate | WizardStep::Closed => None,
            WizardStep::CustomizeValues => Some(WizardStep::SelectTemplate),
            WizardStep::PricingStock => Some(WizardStep::CustomizeValues),
            WizardStep::Confirm => Some(WizardStep::PricingStock),
        }
    }
}

/// Outcome of one pending create in a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Created,
    Failed { message: String },
    /// Not attempted because an earlier create failed.
    Skipped,
}

/// One entry of the ordered submission queue.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStep {
    pub record: NewVariant,
    pub outcome: StepOutcome,
}

/// Result of walking the submission queue.
///
/// Creates run strictly in order and stop at the first failure; records
/// persisted before the failing call stay persisted. No rollback.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReport {
    pub steps: Vec<SubmissionStep>,
}

impl SubmissionReport {
    pub fn created(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome == StepOutcome::Created).count()
    }

    pub fn total(&self) -> usize {
        self.steps.len()
    }

    pub fn is_complete(&self) -> bool {
        self.created() == self.total()
    }

    /// Message of the failing create, if any.
    pub fn failure(&self) -> Option<&str> {
        self.steps.iter().find_map(|s| match &s.outcome {
            StepOutcome::Failed { message } => Some(message.as_str()),
            _ => None,
        })
    }
}

/// One wizard run. Created fresh each time the wizard opens, discarded on
/// close or successful submission.
#[derive(Debug, Clone)]
pub struct WizardSession {
    step: WizardStep,
    selected_template: Option<VariantTemplate>,
    custom_mode: bool,
    variant_name: String,
    values: Vec<VariantTemplateValue>,
    submitting: bool,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self {
            step: WizardStep::SelectTemplate,
            selected_template: None,
            custom_mode: false,
            variant_name: String::new(),
            values: Vec::new(),
            submitting: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn selected_template(&self) -> Option<&VariantTemplate> {
        self.selected_template.as_ref()
    }

    pub fn is_custom_mode(&self) -> bool {
        self.custom_mode
    }

    pub fn variant_name(&self) -> &str {
        &self.variant_name
    }

    pub fn values(&self) -> &[VariantTemplateValue] {
        &self.values
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Pick a catalog template: seeds the group name from the template name
    /// and deep-copies its default values into the working list.
    pub fn select_template(&mut self, template: &VariantTemplate) {
        self.custom_mode = false;
        self.variant_name = template.name.clone();
        self.values = template.default_values.clone();
        self.selected_template = Some(template.clone());
    }

    /// Switch to custom mode: no template, one blank value row to start from.
    pub fn enable_custom(&mut self) {
        self.selected_template = None;
        self.custom_mode = true;
        self.variant_name.clear();
        self.values = vec![VariantTemplateValue::blank(1)];
    }

    pub fn set_variant_name(&mut self, name: impl Into<String>) {
        self.variant_name = name.into();
    }

    /// Replace the whole working value list (bulk edit from the admin form).
    pub fn set_values(&mut self, values: Vec<VariantTemplateValue>) {
        self.values = values;
    }

    pub fn add_value(&mut self) {
        let order = self.values.len() as i32 + 1;
        self.values.push(VariantTemplateValue::blank(order));
    }

    pub fn remove_value(&mut self, index: usize) {
        if index < self.values.len() {
            self.values.remove(index);
        }
    }

    /// Rename a value's label, regenerating its code from the new label.
    ///
    /// The regeneration overwrites any manual edit made to the code via
    /// [`set_value_code`]: last writer on the label wins. Out-of-range
    /// indices are ignored.
    pub fn rename_value(&mut self, index: usize, label: impl Into<String>) {
        if let Some(v) = self.values.get_mut(index) {
            v.label = label.into();
            v.value = slugify(&v.label);
        }
    }

    /// Set a value's code directly. Does not touch the label.
    pub fn set_value_code(&mut self, index: usize, code: impl Into<String>) {
        if let Some(v) = self.values.get_mut(index) {
            v.value = code.into();
        }
    }

    pub fn set_price_adjustment(&mut self, index: usize, amount: i64) {
        if let Some(v) = self.values.get_mut(index) {
            v.price_adjustment = amount;
        }
    }

    pub fn set_stock_quantity(&mut self, index: usize, quantity: i64) {
        if let Some(v) = self.values.get_mut(index) {
            v.stock_quantity = quantity;
        }
    }

    /// Recompute all price adjustments with a bulk strategy.
    pub fn apply_bulk_pricing(&mut self, pricing: BulkPricing) {
        self.values = apply_bulk(&self.values, pricing);
    }

    /// Whether the given step's gate is satisfied by the current session.
    pub fn can_proceed(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::SelectTemplate => self.selected_template.is_some() || self.custom_mode,
            WizardStep::CustomizeValues => {
                !self.variant_name.trim().is_empty()
                    && !self.values.is_empty()
                    && self
                        .values
                        .iter()
                        .all(|v| !v.label.trim().is_empty() && !v.value.trim().is_empty())
            }
            WizardStep::PricingStock => self.values.iter().all(|v| v.stock_quantity >= 0),
            WizardStep::Confirm => true,
            WizardStep::Closed => false,
        }
    }

    /// Advance one step if the current gate allows it.
    pub fn next(&mut self) -> bool {
        match self.step.forward() {
            Some(next) if self.can_proceed(self.step) => {
                self.step = next;
                true
            }
            _ => false,
        }
    }

    /// Go back one step. Always allowed; the step being left is not
    /// re-validated.
    pub fn back(&mut self) -> bool {
        match self.step.backward() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    /// Cancel or finish: terminal, reachable from any step.
    pub fn close(&mut self) {
        self.step = WizardStep::Closed;
    }

    /// Persist the working values for `product_id`, one create per value, in
    /// order. The first failure aborts the rest of the queue; earlier creates
    /// stay persisted. On a fully successful run the session closes.
    pub async fn submit(&mut self, product_id: &str, writer: &dyn VariantWriter) -> Result<SubmissionReport> {
        if self.submitting {
            return Err(Error::SubmissionInProgress);
        }
        if self.step != WizardStep::Confirm {
            return Err(Error::NotReadyToSubmit);
        }
        self.submitting = true;

        let records = project_values(&self.values, product_id, &self.variant_name);
        let mut steps = Vec::with_capacity(records.len());
        let mut failed = false;
        for record in records {
            if failed {
                steps.push(SubmissionStep { record, outcome: StepOutcome::Skipped });
                continue;
            }
            match writer.create(&record).await {
                Ok(()) => steps.push(SubmissionStep { record, outcome: StepOutcome::Created }),
                Err(e) => {
                    failed = true;
                    steps.push(SubmissionStep {
                        record,
                        outcome: StepOutcome::Failed { message: e.to_string() },
                    });
                }
            }
        }

        self.submitting = false;
        let report = SubmissionReport { steps };
        if report.is_complete() {
            self.close();
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::{TemplateCatalog, TemplateCategory, VariantTemplate};
    use std::sync::Mutex;

    /// In-memory collaborator: records creates, optionally failing from a
    /// given position onward.
    struct RecordingWriter {
        created: Mutex<Vec<NewVariant>>,
        fail_from: Option<usize>,
    }

    impl RecordingWriter {
        fn new() -> Self {
            Self { created: Mutex::new(Vec::new()), fail_from: None }
        }

        fn failing_from(index: usize) -> Self {
            Self { created: Mutex::new(Vec::new()), fail_from: Some(index) }
        }

        fn created(&self) -> Vec<NewVariant> {
            self.created.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VariantWriter for RecordingWriter {
        async fn create(&self, variant: &NewVariant) -> Result<()> {
            let mut created = self.created.lock().unwrap();
            if self.fail_from.is_some_and(|n| created.len() >= n) {
                return Err(Error::Storage("connection reset".into()));
            }
            created.push(variant.clone());
            Ok(())
        }
    }

    fn fixture_template() -> VariantTemplate {
        VariantTemplate {
            id: "size-test".into(),
            name: "Kích cỡ".into(),
            description: String::new(),
            category: TemplateCategory::Size,
            icon: "📏".into(),
            default_values: vec![
                VariantTemplateValue::new("Size S", 0, 10, 1),
                VariantTemplateValue::new("Size M", 5_000, 10, 2),
                VariantTemplateValue::new("Size L", 10_000, 10, 3),
            ],
        }
    }

    #[test]
    fn test_step_one_gate() {
        let mut session = WizardSession::new();
        assert!(!session.can_proceed(WizardStep::SelectTemplate));
        assert!(!session.next());

        session.select_template(&fixture_template());
        assert!(session.can_proceed(WizardStep::SelectTemplate));
        assert!(session.next());
        assert_eq!(session.step(), WizardStep::CustomizeValues);
    }

    #[test]
    fn test_custom_mode_satisfies_step_one() {
        let mut session = WizardSession::new();
        session.enable_custom();
        assert!(session.can_proceed(WizardStep::SelectTemplate));
        // but step 2 still needs the blank row filled in
        assert!(!session.can_proceed(WizardStep::CustomizeValues));
        assert_eq!(session.values().len(), 1);
    }

    #[test]
    fn test_step_two_gate() {
        let mut session = WizardSession::new();
        session.enable_custom();
        session.set_variant_name("Độ ngọt");
        assert!(!session.can_proceed(WizardStep::CustomizeValues));

        session.rename_value(0, "Ít ngọt");
        assert!(session.can_proceed(WizardStep::CustomizeValues));

        session.add_value();
        assert!(!session.can_proceed(WizardStep::CustomizeValues));
        session.remove_value(1);
        assert!(session.can_proceed(WizardStep::CustomizeValues));

        session.set_variant_name("   ");
        assert!(!session.can_proceed(WizardStep::CustomizeValues));
    }

    #[test]
    fn test_step_three_gate_rejects_negative_stock() {
        let mut session = WizardSession::new();
        session.select_template(&fixture_template());
        assert!(session.can_proceed(WizardStep::PricingStock));
        session.set_stock_quantity(1, -1);
        assert!(!session.can_proceed(WizardStep::PricingStock));
    }

    #[test]
    fn test_template_values_are_deep_copied() {
        let template = fixture_template();
        let mut session = WizardSession::new();
        session.select_template(&template);
        assert_eq!(session.variant_name(), "Kích cỡ");

        session.rename_value(0, "Size XS");
        assert_eq!(session.values()[0].label, "Size XS");
        assert_eq!(template.default_values[0].label, "Size S");
    }

    #[test]
    fn test_label_edit_regenerates_code() {
        let mut session = WizardSession::new();
        session.select_template(&fixture_template());

        session.set_value_code(0, "manual_code");
        assert_eq!(session.values()[0].value, "manual_code");
        // code edit alone leaves the label as-is
        assert_eq!(session.values()[0].label, "Size S");

        // next label edit overwrites the manual code
        session.rename_value(0, "Cỡ nhỏ");
        assert_eq!(session.values()[0].value, "co_nho");
    }

    #[test]
    fn test_back_never_revalidates() {
        let mut session = WizardSession::new();
        session.select_template(&fixture_template());
        assert!(session.next());
        session.rename_value(0, ""); // break the step-2 gate
        assert!(session.back());
        assert_eq!(session.step(), WizardStep::SelectTemplate);
        assert!(!session.back());
    }

    #[test]
    fn test_bulk_pricing_on_session() {
        let mut session = WizardSession::new();
        session.select_template(&fixture_template());
        session.apply_bulk_pricing(BulkPricing::Flat { increment: 2_000 });
        let adjustments: Vec<i64> = session.values().iter().map(|v| v.price_adjustment).collect();
        assert_eq!(adjustments, [0, 2_000, 4_000]);
    }

    #[tokio::test]
    async fn test_submit_requires_confirm_step() {
        let mut session = WizardSession::new();
        session.select_template(&fixture_template());
        let writer = RecordingWriter::new();
        assert!(matches!(session.submit("p1", &writer).await, Err(Error::NotReadyToSubmit)));
        assert!(writer.created().is_empty());
    }

    #[tokio::test]
    async fn test_full_run_from_catalog_template() {
        let catalog = TemplateCatalog::builtin();
        let mut session = WizardSession::new();
        session.select_template(catalog.get("size-standard").unwrap());
        assert!(session.next());
        assert!(session.next());
        assert!(session.next());
        assert_eq!(session.step(), WizardStep::Confirm);

        let writer = RecordingWriter::new();
        let report = session.submit("p1", &writer).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.created(), 4);
        assert_eq!(session.step(), WizardStep::Closed);

        let created = writer.created();
        let labels: Vec<&str> = created.iter().map(|v| v.variant_value.as_str()).collect();
        assert_eq!(labels, ["Size S", "Size M", "Size L", "Size XL"]);
        let prices: Vec<i64> = created.iter().map(|v| v.price_adjustment).collect();
        assert_eq!(prices, [0, 5_000, 10_000, 15_000]);
        for v in &created {
            assert_eq!(v.product_id, "p1");
            assert_eq!(v.variant_name, "Kích cỡ tiêu chuẩn");
            assert_eq!(v.stock_quantity, 100);
            assert!(v.is_active);
        }
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_earlier_records() {
        let mut session = WizardSession::new();
        session.select_template(&fixture_template());
        session.next();
        session.next();
        session.next();

        let writer = RecordingWriter::failing_from(2);
        let report = session.submit("p9", &writer).await.unwrap();

        assert_eq!(report.created(), 2);
        assert!(!report.is_complete());
        assert_eq!(report.failure(), Some("storage error: connection reset"));
        assert_eq!(report.steps[2].record.variant_value, "Size L");
        assert!(matches!(report.steps[2].outcome, StepOutcome::Failed { .. }));

        // the two successful creates stay persisted, nothing was rolled back
        assert_eq!(writer.created().len(), 2);
        // session stays open at the confirm step for a retry
        assert_eq!(session.step(), WizardStep::Confirm);
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_failure_skips_remaining_queue() {
        let mut session = WizardSession::new();
        session.select_template(&fixture_template());
        session.next();
        session.next();
        session.next();

        let writer = RecordingWriter::failing_from(0);
        let report = session.submit("p9", &writer).await.unwrap();
        assert_eq!(report.created(), 0);
        assert!(matches!(report.steps[0].outcome, StepOutcome::Failed { .. }));
        assert_eq!(report.steps[1].outcome, StepOutcome::Skipped);
        assert_eq!(report.steps[2].outcome, StepOutcome::Skipped);
    }
}
