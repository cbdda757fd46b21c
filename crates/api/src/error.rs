// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use erp_forms::CoreError;
use erp_forms_domain::{DomainError, ValidationErrors};
use std::collections::BTreeMap;

use crate::submit::SubmissionError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request does not fit the page's current state.
    InvalidState {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Field validation failed; the messages are keyed by field.
    ValidationFailed {
        /// Field key to message.
        errors: BTreeMap<String, String>,
    },
    /// The submission collaborator failed. The session is unchanged.
    SubmissionFailed {
        /// A human-readable description of the failure.
        message: String,
        /// Whether submitting again may succeed.
        retryable: bool,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidState { message } => write!(f, "Invalid state: {message}"),
            Self::ValidationFailed { errors } => {
                write!(f, "Validation failed for {} field(s)", errors.len())
            }
            Self::SubmissionFailed { message, retryable } => {
                if *retryable {
                    write!(f, "Submission failed: {message} (you can try again)")
                } else {
                    write!(f, "Submission failed: {message}")
                }
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        Self::SubmissionFailed {
            retryable: err.is_retryable(),
            message: err.to_string(),
        }
    }
}

fn validation_map(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .iter()
        .map(|(key, message)| (key.to_string(), message.to_string()))
        .collect()
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::UnknownFormKind(name) => ApiError::InvalidInput {
            field: String::from("form"),
            message: format!("Unknown form kind '{name}'"),
        },
        DomainError::UnknownField { form, key } => ApiError::InvalidInput {
            field: key.clone(),
            message: format!("The {form} form has no field '{key}'"),
        },
        DomainError::UnknownCollection { form, key } => ApiError::InvalidInput {
            field: key.clone(),
            message: format!("The {form} form has no collection '{key}'"),
        },
        DomainError::FieldNotInCollection { collection, field } => ApiError::InvalidInput {
            field: field.clone(),
            message: format!("'{field}' is not a field of {collection}"),
        },
        DomainError::FieldTypeMismatch { field, expected } => ApiError::InvalidInput {
            field,
            message: format!("Expected a {expected} value"),
        },
        DomainError::InvalidFieldValue { field, reason } => ApiError::InvalidInput {
            field,
            message: reason,
        },
        DomainError::ItemNotFound { collection, id } => ApiError::ResourceNotFound {
            resource_type: String::from("Item"),
            message: format!("No item '{id}' in {collection}"),
        },
        DomainError::LastItemRemoval { collection } => ApiError::DomainRuleViolation {
            rule: String::from("keep_one_item"),
            message: format!("At least one entry must remain in {collection}"),
        },
        DomainError::ReferenceNotFound { kind, key } => ApiError::ResourceNotFound {
            resource_type: kind.to_string(),
            message: format!("No {kind} with key '{key}'"),
        },
        DomainError::UnsupportedOperation(msg) => ApiError::InvalidInput {
            field: String::from("operation"),
            message: msg,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::AtFinalStep { .. } | CoreError::StepNotReached { .. } => {
            ApiError::InvalidState {
                message: err.to_string(),
            }
        }
        CoreError::NotOnFinalStep { .. } => ApiError::InvalidState {
            message: err.to_string(),
        },
        CoreError::SubmissionBlocked(errors) => ApiError::ValidationFailed {
            errors: validation_map(&errors),
        },
        CoreError::NotAcknowledged => ApiError::DomainRuleViolation {
            rule: String::from("acknowledgement_required"),
            message: err.to_string(),
        },
    }
}
