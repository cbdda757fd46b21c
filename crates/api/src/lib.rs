// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Page-level API for the ERP form wizards.
//!
//! `FormPage` is what a screen (or the CLI) talks to. It owns one
//! `FormSession`, routes string-keyed requests through the core `apply`,
//! keeps the audit journal, schedules draft saves and runs the submission
//! gate against a `Submitter`.
//!
//! Core and domain errors never cross this boundary directly; they are
//! translated into `ApiError`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod config;
mod error;
mod page;
mod request_response;
mod submit;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_SUBMIT_TIMEOUT, PageConfig};
pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use page::FormPage;
pub use request_response::{
    CancelOutcome, CommandRequest, DraftOfferView, Notice, NoticeLevel, OutcomeView, PageStatus,
    SessionView, StepView,
};
pub use submit::{MockSubmitter, SubmissionError, SubmissionReceipt, Submitter};
