//! Domain module
pub mod events;
pub mod pricing;
pub mod projection;
pub mod slug;
pub mod template;
pub mod validate;
pub mod wizard;

pub use events::VariantEvent;
pub use pricing::{apply_bulk, BulkPricing};
pub use projection::{project, project_values, NewVariant};
pub use slug::slugify;
pub use template::{TemplateCatalog, TemplateCategory, VariantTemplate, VariantTemplateValue};
pub use validate::{validate_template, TemplateDraft, TemplateValidation, ValueDraft};
pub use wizard::{StepOutcome, SubmissionReport, SubmissionStep, VariantWriter, WizardSession, WizardStep};
