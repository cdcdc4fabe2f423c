// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Debounced commits of drawing-surface edits into the store.

use super::{NotebookStore, PageChange};
use crate::util::debounce::Debouncer;
use std::time::{Duration, Instant};

/// An edit waiting for its quiet period, addressed to one page.
#[derive(Debug, Clone)]
struct PendingCommit {
    notebook_id: String,
    page_id: String,
    change: PageChange,
}

/// Coalesces rapid page edits into one store commit.
///
/// Each edit restarts the quiet period; only the latest edit is committed.
/// An edit for a different page first commits whatever is pending for the
/// previous one. Dropping the queue cancels any pending edit.
pub struct CommitQueue {
    debouncer: Debouncer<PendingCommit>,
}

impl CommitQueue {
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn enqueue(
        &mut self,
        store: &mut NotebookStore,
        notebook_id: &str,
        page_id: &str,
        change: PageChange,
        now: Instant,
    ) {
        let other_page = self
            .debouncer
            .pending()
            .is_some_and(|p| p.notebook_id != notebook_id || p.page_id != page_id);
        if other_page {
            self.flush(store);
        }
        self.debouncer.push(
            PendingCommit {
                notebook_id: notebook_id.to_string(),
                page_id: page_id.to_string(),
                change,
            },
            now,
        );
    }

    /// Commit the pending edit if its quiet period has elapsed. Returns
    /// `true` if the store changed.
    pub fn poll(&mut self, store: &mut NotebookStore, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(pending) => Self::commit(store, pending),
            None => false,
        }
    }

    /// Commit the pending edit now.
    pub fn flush(&mut self, store: &mut NotebookStore) -> bool {
        match self.debouncer.flush() {
            Some(pending) => Self::commit(store, pending),
            None => false,
        }
    }

    /// Discard the pending edit without committing it.
    pub fn cancel(&mut self) {
        if self.debouncer.cancel() {
            log::debug!("Cancelled pending page commit");
        }
    }

    /// Time until the pending edit is due, for scheduling a wake-up.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    fn commit(store: &mut NotebookStore, pending: PendingCommit) -> bool {
        store.commit_page(&pending.notebook_id, &pending.page_id, pending.change)
    }
}

impl Drop for CommitQueue {
    fn drop(&mut self) {
        self.cancel();
    }
}
