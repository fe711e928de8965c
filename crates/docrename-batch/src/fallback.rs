// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human fallback channel — a rendezvous between the orchestrator's worker
// thread and whoever reviews inconclusive files.
//
// The orchestrator side (`ReviewChannel`) publishes one request and blocks
// until a reviewer answers through a `ReviewHandle`, the batch is canceled, or
// the optional timeout expires. Only the worker blocks; the reviewing side
// never waits on the orchestrator.
//
// The cancellation flag lives in the same state as the outstanding request so
// that `cancel` both records the request to stop and wakes a pending wait.
// Once set it stays set.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use docrename_core::error::{DocrenameError, Result};
use docrename_core::{ReviewId, ReviewRequest, ReviewResponse};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    outstanding: Option<ReviewId>,
    answer: Option<String>,
    canceled: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<State>,
    ready: Condvar,
}

impl Shared {
    // A panic elsewhere cannot leave `State` half-updated, so a poisoned lock
    // is still usable.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Orchestrator side of the channel. Not cloneable; `request` takes
/// `&mut self`, so at most one request is ever outstanding.
#[derive(Debug, Default)]
pub struct ReviewChannel {
    shared: Arc<Shared>,
    timeout: Option<Duration>,
}

/// Reviewer side of the channel. Cheap to clone and safe to use from any
/// thread or task.
#[derive(Debug, Clone)]
pub struct ReviewHandle {
    shared: Arc<Shared>,
}

impl ReviewChannel {
    /// A channel that waits for the reviewer indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel whose waits give up after `timeout`, if set.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            shared: Arc::default(),
            timeout,
        }
    }

    pub fn handle(&self) -> ReviewHandle {
        ReviewHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.shared.lock().canceled
    }

    /// Stamp `request` with a fresh id, hand it to `publish`, then block until
    /// it is answered.
    ///
    /// The request is registered before `publish` runs, so a reviewer may
    /// answer from inside `publish` itself. Returns
    /// [`ReviewResponse::Canceled`] straight away if the batch is already
    /// canceled.
    pub fn request(&mut self, mut request: ReviewRequest, publish: impl FnOnce(&ReviewRequest)) -> ReviewResponse {
        {
            let mut state = self.shared.lock();
            if state.canceled {
                return ReviewResponse::Canceled;
            }
            state.next_id += 1;
            let id = ReviewId(state.next_id);
            state.outstanding = Some(id);
            state.answer = None;
            request.id = id;
        }

        info!(review = %request.id, file = %request.file_name, "waiting for reviewer");
        publish(&request);

        let pending = |state: &mut State| state.answer.is_none() && !state.canceled;
        let guard = self.shared.lock();
        let mut state = match self.timeout {
            None => self
                .shared
                .ready
                .wait_while(guard, pending)
                .unwrap_or_else(PoisonError::into_inner),
            Some(timeout) => {
                let (state, _) = self
                    .shared
                    .ready
                    .wait_timeout_while(guard, timeout, pending)
                    .unwrap_or_else(PoisonError::into_inner);
                state
            }
        };

        state.outstanding = None;
        let response = match state.answer.take() {
            Some(answer) => ReviewResponse::Answer(answer),
            None if state.canceled => ReviewResponse::Canceled,
            None => ReviewResponse::TimedOut,
        };
        debug!(review = %request.id, ?response, "review finished");
        response
    }
}

impl ReviewHandle {
    /// Deliver the reviewer's answer for request `id`. An empty string means
    /// "no identifier".
    ///
    /// Fails, without delivering anything, if `id` is not the outstanding
    /// request, if it was already answered, or if the batch was canceled.
    pub fn respond(&self, id: ReviewId, value: impl Into<String>) -> Result<()> {
        let mut state = self.shared.lock();
        let rejection = if state.canceled {
            Some(format!("{id} arrived after the batch was canceled"))
        } else if state.outstanding != Some(id) {
            Some(format!("{id} is not the outstanding request"))
        } else if state.answer.is_some() {
            Some(format!("{id} was already answered"))
        } else {
            None
        };

        if let Some(reason) = rejection {
            warn!(review = %id, %reason, "review response rejected");
            return Err(DocrenameError::Review(reason));
        }

        state.answer = Some(value.into());
        self.shared.ready.notify_all();
        Ok(())
    }

    /// Cancel the batch. Wakes an outstanding request and stops any further
    /// file from starting. Calling it again has no further effect.
    pub fn cancel(&self) {
        let mut state = self.shared.lock();
        if !state.canceled {
            info!(outstanding = ?state.outstanding, "batch cancellation requested");
        }
        state.canceled = true;
        self.shared.ready.notify_all();
    }

    pub fn is_canceled(&self) -> bool {
        self.shared.lock().canceled
    }

    /// The request currently awaiting an answer, if any.
    pub fn outstanding(&self) -> Option<ReviewId> {
        self.shared.lock().outstanding
    }
}
