//! Debounced drain scheduler.
//!
//! Buffered edits reach the backend in batched "drains". A drain starts only
//! after the board has been quiet for the debounce window, sends every
//! buffered entry concurrently, and puts failed entries back in the buffer
//! for a later cycle.
//!
//! # Architecture
//!
//! ```text
//!  mutate/focus ──▶ pending buffer ──▶ [quiet for debounce?] ──▶ drain N
//!        │                ▲                                        │
//!        │                │ restore on failure/cancel              ▼
//!        └── bumps ───────┴──────────────────────────── backend.update()
//!            timer_gen                                   (token of drain N)
//! ```
//!
//! Two monotonic counters in [`Shared`] replace explicit state machinery:
//!
//! - `timer_gen` identifies the newest debounce countdown. Every buffered
//!   edit bumps it and spawns a fresh timer task; a task that wakes to a
//!   newer value knows it was superseded and exits. The net effect is that
//!   only the countdown started by the *last* edit in a burst ever fires.
//!
//! - `drain_gen` identifies the newest drain. Starting a drain bumps it and
//!   cancels the previous drain's token, so at most one generation's writes
//!   are live at a time. When a drain's batch settles it re-checks the
//!   counter: the latest generation clears the in-flight slot and re-arms the
//!   timer if failures refilled the buffer; a superseded one only restores
//!   its failed entries and exits, leaving scheduling to its successor.
//!
//! Late results are harmless by construction: a cancelled update comes back
//! as an error, its entry is restored under anything newer, and the next
//! cycle re-sends the merged result. Restores are skipped for notes that no
//! longer exist locally, so a delete can never be undone by a stale retry.

use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use fusen_types::{NoteId, NotePatch};
use indexmap::IndexMap;

use crate::board::{Inner, Shared};
use crate::error::GatewayError;

/// One drain's worth of work, snapshotted under the lock.
struct DrainPlan {
    generation: u64,
    token: CancellationToken,
    entries: IndexMap<NoteId, NotePatch>,
}

/// Start a debounce countdown for timer generation `timer_gen`.
///
/// The spawned task sleeps for the debounce window, then drains the buffer
/// if no newer edit has restarted the countdown in the meantime. Dropping
/// the board wakes and silences it early.
pub(crate) fn arm_debounce(inner: &Arc<Inner>, timer_gen: u64) {
    let inner = Arc::clone(inner);
    tokio::spawn(async move {
        tokio::select! {
            _ = inner.lifecycle.cancelled() => return,
            _ = tokio::time::sleep(inner.debounce) => {}
        }
        fire_timer(&inner, timer_gen).await;
    });
}

/// Drain the buffer immediately, without waiting out the debounce window,
/// and wait for the batch to settle.
pub(crate) async fn flush_now(inner: &Arc<Inner>) {
    let plan = {
        let mut shared = inner.shared.lock();
        // Invalidate sleeping countdowns; this flush takes over their work.
        shared.timer_gen += 1;
        if shared.pending.is_empty() {
            return;
        }
        begin_generation(&mut shared)
    };
    run_generation(inner, plan).await;
}

async fn fire_timer(inner: &Arc<Inner>, timer_gen: u64) {
    let plan = {
        let mut shared = inner.shared.lock();
        if shared.timer_gen != timer_gen {
            // A newer edit restarted the countdown.
            return;
        }
        if inner.lifecycle.is_cancelled() || shared.pending.is_empty() {
            return;
        }
        begin_generation(&mut shared)
    };
    run_generation(inner, plan).await;
}

/// Open a new drain generation: cancel the previous one, take the buffer.
fn begin_generation(shared: &mut Shared) -> DrainPlan {
    if let Some(stale) = shared.inflight.take() {
        stale.cancel();
    }
    shared.drain_gen += 1;
    let token = CancellationToken::new();
    shared.inflight = Some(token.clone());
    DrainPlan {
        generation: shared.drain_gen,
        token,
        entries: shared.pending.drain_all(),
    }
}

/// Send one drain's entries and settle the outcome.
async fn run_generation(inner: &Arc<Inner>, plan: DrainPlan) {
    debug!(
        generation = plan.generation,
        notes = plan.entries.len(),
        "drain started"
    );

    let results = join_all(plan.entries.iter().map(|(id, patch)| {
        let backend = Arc::clone(&inner.backend);
        let token = plan.token.clone();
        async move { backend.update(*id, patch, token).await }
    }))
    .await;

    let rearm = {
        let mut shared = inner.shared.lock();
        let active = shared.drain_gen == plan.generation;

        let mut failed = 0usize;
        for ((id, patch), result) in plan.entries.into_iter().zip(results) {
            if let Err(err) = result {
                failed += 1;
                restore_entry(&mut shared, id, patch, &err);
            }
        }

        if !active {
            // A newer drain owns the in-flight slot and the schedule now.
            debug!(generation = plan.generation, failed, "superseded drain settled");
            None
        } else {
            debug!(generation = plan.generation, failed, "drain settled");
            shared.inflight = None;
            if !shared.pending.is_empty() && !inner.lifecycle.is_cancelled() {
                // Failures or mid-drain edits refilled the buffer. Give them
                // a full quiet period rather than retrying in a tight loop.
                shared.timer_gen += 1;
                Some(shared.timer_gen)
            } else {
                None
            }
        }
    };

    if let Some(timer_gen) = rearm {
        arm_debounce(inner, timer_gen);
    }
}

/// Put a failed entry back in the buffer, unless its note has been deleted
/// since the drain snapshotted it.
fn restore_entry(shared: &mut Shared, id: NoteId, patch: NotePatch, err: &GatewayError) {
    if !shared.store.contains(id) {
        debug!(id = %id.short(), "dropping failed update for deleted note");
        return;
    }
    match err {
        GatewayError::Cancelled => {
            debug!(id = %id.short(), "update cancelled, rebuffered");
        }
        GatewayError::Transport(msg) => {
            warn!(id = %id.short(), error = %msg, "update failed, rebuffered");
        }
    }
    shared.pending.restore(id, patch);
}

// ============================================================================
// Tests
// ============================================================================
