// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Debounced background draft saving.
//!
//! A `DraftAutosaver` owns a tokio task that receives snapshots over an
//! unbounded channel and writes only the last one after the debounce window
//! passes with no newer snapshot (trailing edge). Each autosaver has its own
//! writer token and numbers its snapshots in scheduling order; the store
//! drops a save older than one it holds from the same writer. Another
//! session of the same form kind overwrites the slot.
//!
//! Storage failures are logged and swallowed. Editing never waits on a save.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use erp_forms_domain::FormSchema;
use time::OffsetDateTime;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::codec::encode_draft;
use crate::data_models::{DraftRecord, SaveOutcome};
use crate::error::PersistenceError;
use crate::store::SharedDraftStore;

/// Process-wide counter keeping writer tokens distinct within one process.
static WRITER_COUNTER: AtomicU64 = AtomicU64::new(0);

enum AutosaveMessage {
    Snapshot(DraftRecord),
    Flush(oneshot::Sender<()>),
    Cancel(oneshot::Sender<()>),
    Discard(oneshot::Sender<bool>),
}

/// Handle to the autosave task for one form kind.
///
/// Dropping the handle closes the channel; the task writes any pending
/// snapshot and exits.
pub struct DraftAutosaver<F: FormSchema> {
    tx: mpsc::UnboundedSender<AutosaveMessage>,
    task: JoinHandle<()>,
    writer: String,
    sequence: u64,
    _form: PhantomData<fn() -> F>,
}

impl<F: FormSchema> DraftAutosaver<F> {
    /// Spawns the autosave task on the current tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `store` - The store drafts are written to
    /// * `debounce` - Quiet period after the last snapshot before it is written
    /// * `last_sequence` - Where numbering starts, usually the sequence of the draft
    ///   already stored for this form, or 0
    #[must_use]
    pub fn spawn(store: SharedDraftStore, debounce: Duration, last_sequence: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<AutosaveMessage>();
        let task: JoinHandle<()> =
            tokio::spawn(run_autosave(store, F::KIND.draft_key(), debounce, rx));
        let writer: String = new_writer_token();
        debug!(
            form = %F::KIND,
            %writer,
            ?debounce,
            "Autosave task started"
        );
        Self {
            tx,
            task,
            writer,
            sequence: last_sequence,
            _form: PhantomData,
        }
    }

    /// The token stamped on every snapshot this autosaver writes.
    #[must_use]
    pub fn writer(&self) -> &str {
        &self.writer
    }

    /// The sequence number of the most recently scheduled snapshot.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Queues a snapshot, restarting the debounce window. Never blocks.
    pub fn schedule(&mut self, fields: &F) {
        self.sequence += 1;
        match encode_draft(
            fields,
            &self.writer,
            self.sequence,
            OffsetDateTime::now_utc(),
        ) {
            Ok(record) => {
                if self.tx.send(AutosaveMessage::Snapshot(record)).is_err() {
                    warn!(form = %F::KIND, "Autosave task has stopped; snapshot dropped");
                }
            }
            Err(e) => warn!(form = %F::KIND, error = %e, "Failed to encode draft snapshot"),
        }
    }

    /// Writes the pending snapshot now, if there is one.
    pub async fn flush(&self) {
        self.request(AutosaveMessage::Flush).await;
    }

    /// Drops the pending snapshot without writing it.
    pub async fn cancel(&self) {
        self.request(AutosaveMessage::Cancel).await;
    }

    /// Drops the pending snapshot and deletes the stored draft.
    ///
    /// # Returns
    ///
    /// * `true` if the store accepted the delete
    pub async fn discard(&self) -> bool {
        self.request(AutosaveMessage::Discard)
            .await
            .unwrap_or(false)
    }

    /// Closes the channel and waits for the task to write any pending snapshot.
    pub async fn shutdown(self) {
        let Self { tx, task, .. } = self;
        drop(tx);
        if let Err(e) = task.await {
            warn!(error = %e, "Autosave task ended abnormally");
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> AutosaveMessage,
    ) -> Option<T> {
        let (ack, done) = oneshot::channel::<T>();
        if self.tx.send(build(ack)).is_err() {
            warn!(form = %F::KIND, "Autosave task has stopped");
            return None;
        }
        done.await.ok()
    }
}

/// Process id, start time and a per-process counter.
fn new_writer_token() -> String {
    let started: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
    let count: u64 = WRITER_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{started:x}-{count}", std::process::id())
}

async fn run_autosave(
    store: SharedDraftStore,
    draft_key: &'static str,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<AutosaveMessage>,
) {
    let mut pending: Option<(DraftRecord, Instant)> = None;

    loop {
        let deadline: Option<Instant> = pending.as_ref().map(|(_, deadline)| *deadline);
        let message: Option<AutosaveMessage> = match deadline {
            Some(deadline) => {
                tokio::select! {
                    message = rx.recv() => message,
                    () = tokio::time::sleep_until(deadline) => {
                        if let Some((record, _)) = pending.take() {
                            write_draft(&store, &record).await;
                        }
                        continue;
                    }
                }
            }
            None => rx.recv().await,
        };

        match message {
            Some(AutosaveMessage::Snapshot(record)) => {
                pending = Some((record, Instant::now() + debounce));
            }
            Some(AutosaveMessage::Flush(ack)) => {
                if let Some((record, _)) = pending.take() {
                    write_draft(&store, &record).await;
                }
                let _ = ack.send(());
            }
            Some(AutosaveMessage::Cancel(ack)) => {
                pending = None;
                let _ = ack.send(());
            }
            Some(AutosaveMessage::Discard(ack)) => {
                pending = None;
                let discarded: bool = discard_draft(&store, draft_key).await;
                let _ = ack.send(discarded);
            }
            None => {
                if let Some((record, _)) = pending.take() {
                    write_draft(&store, &record).await;
                }
                break;
            }
        }
    }

    debug!(draft_key, "Autosave task stopped");
}

async fn write_draft(store: &SharedDraftStore, record: &DraftRecord) {
    let result: Result<SaveOutcome, PersistenceError> = store.lock().await.save(record);
    match result {
        Ok(SaveOutcome::Stored) => {
            debug!(draft_key = %record.key, sequence = record.sequence, "Draft saved");
        }
        Ok(SaveOutcome::Stale) => {
            debug!(
                draft_key = %record.key,
                sequence = record.sequence,
                "Stale draft skipped"
            );
        }
        Err(e) => {
            warn!(draft_key = %record.key, error = %e, "Draft save failed; continuing without it");
        }
    }
}

async fn discard_draft(store: &SharedDraftStore, draft_key: &str) -> bool {
    let result: Result<bool, PersistenceError> = store.lock().await.discard(draft_key);
    match result {
        Ok(existed) => {
            debug!(draft_key, existed, "Draft discarded");
            true
        }
        Err(e) => {
            warn!(draft_key, error = %e, "Draft discard failed");
            false
        }
    }
}
