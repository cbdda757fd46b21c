// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The submission collaborator and its mock.

use async_trait::async_trait;
use erp_forms_domain::FormSchema;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

/// Submission failures reported by the collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// The receiving system refused the record.
    #[error("The record was rejected: {reason}")]
    Rejected { reason: String },

    /// The receiving system could not be reached.
    #[error("The submission service is unavailable: {0}")]
    Unavailable(String),

    /// No answer arrived within the submit timeout.
    #[error("No response from the submission service after {millis} ms")]
    Timeout { millis: u128 },
}

impl SubmissionError {
    /// Whether submitting the same record again may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}

/// Acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// The identifier the receiving system assigned.
    pub reference: String,
}

/// Accepts a complete form record.
#[async_trait]
pub trait Submitter<F: FormSchema>: Send + Sync {
    /// Hands the full form data to the receiving system.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is rejected or the service is unreachable.
    async fn submit(&self, fields: &F) -> Result<SubmissionReceipt, SubmissionError>;
}

/// A submitter that succeeds after a fixed delay unless told otherwise.
#[derive(Debug)]
pub struct MockSubmitter {
    delay: Duration,
    scripted: Mutex<VecDeque<SubmissionError>>,
    accepted: Mutex<u64>,
}

impl MockSubmitter {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            scripted: Mutex::new(VecDeque::new()),
            accepted: Mutex::new(0),
        }
    }

    /// Makes the next call fail with `error`. Queued failures are used in order.
    pub async fn fail_next(&self, error: SubmissionError) {
        self.scripted.lock().await.push_back(error);
    }

    /// Number of submissions accepted so far.
    pub async fn accepted(&self) -> u64 {
        *self.accepted.lock().await
    }
}

#[async_trait]
impl<F: FormSchema> Submitter<F> for MockSubmitter {
    async fn submit(&self, _fields: &F) -> Result<SubmissionReceipt, SubmissionError> {
        tokio::time::sleep(self.delay).await;

        let scripted: Option<SubmissionError> = self.scripted.lock().await.pop_front();
        if let Some(error) = scripted {
            return Err(error);
        }

        let count: u64 = {
            let mut accepted = self.accepted.lock().await;
            *accepted += 1;
            *accepted
        };
        let reference: String = format!("{}-{count:04}", F::KIND.name());
        info!(%reference, "Mock submission accepted");
        Ok(SubmissionReceipt { reference })
    }
}
