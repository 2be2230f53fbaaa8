//! Variant Studio
//!
//! Product variant administration for a self-hosted storefront.
//!
//! ## Features
//! - Predefined variant templates (size, color, topping, temperature)
//! - Guided wizard flow from template to persisted variant records
//! - Bulk pricing transforms (flat ramp, percentage scaling)
//! - Diacritic-folding value-code generation for Vietnamese labels

use thiserror::Error;

pub mod domain;
pub mod store;

#[derive(Error, Debug)]
pub enum Error {
    #[error("variant template not found: {0}")]
    TemplateNotFound(String),

    #[error("variant not found")]
    VariantNotFound,

    #[error("submission already in progress")]
    SubmissionInProgress,

    #[error("wizard is not at the confirmation step")]
    NotReadyToSubmit,

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
