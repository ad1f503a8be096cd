//! Input Validation
//!
//! Validation runs before any store access. Every problem found is reported, each
//! tagged with the input field it belongs to so callers can show it inline.
//!
//! Field rules are declared with [`validator::Validate`]; discount and tier checks
//! go through the engine's own constructors.

use std::{borrow::Cow, fmt};

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};
use vendora::{
    percent::DiscountPercent,
    tiers::{BulkTier, BulkTiers},
};

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Input field name. Nested fields are joined with `_`, e.g. `changed_by_name`.
    pub field: Cow<'static, str>,

    /// Human-readable message.
    pub message: String,
}

/// One or more invalid input fields.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// All rejected fields.
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Whether `field` was rejected.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl From<ValidationErrors> for ValidationError {
    fn from(errors: ValidationErrors) -> Self {
        let mut validator = Validator::new();
        validator.extend(None, &errors);

        Self {
            issues: validator.into_sorted_issues(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;

        for issue in &self.issues {
            if !first {
                f.write_str("; ")?;
            }

            write!(f, "{}: {}", issue.field, issue.message)?;
            first = false;
        }

        Ok(())
    }
}

/// Collects field issues, then converts to a `Result`.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, field: impl Into<Cow<'static, str>>, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Run `value`'s declared field rules.
    pub(crate) fn check(&mut self, value: &impl Validate) {
        if let Err(errors) = value.validate() {
            self.extend(None, &errors);
        }
    }

    /// Run `value`'s declared field rules, reporting fields as `{prefix}_{field}`.
    pub(crate) fn check_nested(&mut self, prefix: &str, value: &impl Validate) {
        if let Err(errors) = value.validate() {
            self.extend(Some(prefix), &errors);
        }
    }

    fn extend(&mut self, prefix: Option<&str>, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            let field = match prefix {
                Some(prefix) => format!("{prefix}_{field}"),
                None => field.to_string(),
            };

            match kind {
                ValidationErrorsKind::Field(field_errors) => {
                    for error in field_errors {
                        let message = error
                            .message
                            .as_ref()
                            .map_or_else(|| error.code.to_string(), ToString::to_string);

                        self.push(field.clone(), message);
                    }
                }
                ValidationErrorsKind::Struct(nested) => self.extend(Some(&field), nested),
                ValidationErrorsKind::List(items) => {
                    for (index, nested) in items {
                        self.extend(Some(&format!("{field}_{index}")), nested);
                    }
                }
            }
        }
    }

    pub(crate) fn percent(&mut self, field: &'static str, value: Decimal) -> DiscountPercent {
        DiscountPercent::new(value).unwrap_or_else(|error| {
            self.push(field, error.to_string());
            DiscountPercent::ZERO
        })
    }

    pub(crate) fn tiers(
        &mut self,
        field: &'static str,
        tiers: impl IntoIterator<Item = BulkTier>,
    ) -> BulkTiers {
        BulkTiers::new(tiers).unwrap_or_else(|error| {
            self.push(field, error.to_string());
            BulkTiers::default()
        })
    }

    fn into_sorted_issues(mut self) -> Vec<FieldIssue> {
        self.issues.sort_by(|a, b| a.field.cmp(&b.field));
        self.issues
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.into_sorted_issues(),
            })
        }
    }
}

/// Rejects empty and whitespace-only text.
pub(crate) fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required").with_message("is required".into()));
    }

    Ok(())
}

/// Accepts exactly ten ASCII digits.
pub(crate) fn ten_digit_phone(value: &str) -> Result<(), validator::ValidationError> {
    if value.len() != 10 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(
            validator::ValidationError::new("phone").with_message("must be exactly 10 digits".into())
        );
    }

    Ok(())
}
