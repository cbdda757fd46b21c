// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft persistence for the ERP form wizards.
//!
//! This crate stores in-progress form data so an interrupted session can be
//! offered back to the user. It is built on Diesel with a `SQLite` backend
//! and also provides an in-memory store.
//!
//! ## Draft slots
//!
//! Each form kind has exactly one draft slot, keyed by
//! `FormKind::draft_key()`. Starting a second record of the same kind
//! overwrites the first one's draft.
//!
//! ## Ordering
//!
//! Every snapshot carries its autosaver's writer token and a sequence
//! number. Stores ignore a save whose writer matches the stored draft and
//! whose sequence is not greater, so a late write can never replace a newer
//! draft from the same session. A save from another writer always replaces
//! the slot.
//!
//! ## Failure semantics
//!
//! Persistence is best effort. The autosaver logs storage failures and
//! carries on; the in-memory session stays the source of truth.
//!
//! ## Testing
//!
//! - `SQLite` tests use a unique shared-cache in-memory database per store
//! - Debounce tests run on a paused tokio clock

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod autosave;
mod backend;
mod codec;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use autosave::DraftAutosaver;
pub use codec::{decode_draft, encode_draft};
pub use data_models::{DraftRecord, SaveOutcome};
pub use error::PersistenceError;
pub use store::{DraftStore, MemoryDraftStore, SharedDraftStore, SqliteDraftStore, shared};
