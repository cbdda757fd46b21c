// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use erp_forms_domain::{DomainError, ValidationErrors};

/// Errors that can occur during session transitions and submission gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// Advance was requested on the last step.
    AtFinalStep { step_count: usize },
    /// A jump targeted a step after the current one.
    StepNotReached { requested: usize, current: usize },
    /// Submission was attempted before reaching the last step.
    NotOnFinalStep { current: usize, step_count: usize },
    /// The last step's rules did not pass.
    SubmissionBlocked(ValidationErrors),
    /// The acknowledgement flag is not set.
    NotAcknowledged,
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::AtFinalStep { step_count } => {
                write!(f, "Already on the final step ({step_count} of {step_count})")
            }
            Self::StepNotReached { requested, current } => write!(
                f,
                "Cannot jump to step {} from step {}: it has not been reached",
                requested + 1,
                current + 1
            ),
            Self::NotOnFinalStep {
                current,
                step_count,
            } => write!(
                f,
                "Submission is only available on the final step (currently {} of {step_count})",
                current + 1
            ),
            Self::SubmissionBlocked(errors) => {
                write!(f, "Submission blocked by {} invalid field(s)", errors.len())
            }
            Self::NotAcknowledged => write!(f, "The final confirmation has not been accepted"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
