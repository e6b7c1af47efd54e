//! Periodic eviction of participants that stopped sending heartbeats.
//!
//! Every tick the reaper lists the room, and for each participant whose
//! last heartbeat is older than the inactivity timeout it deletes the
//! participant and posts a departure status message. One participant
//! failing does not stop the rest of the sweep; the failure is logged and
//! left for the next tick.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{
    sync::watch,
    time::{interval_at, Instant, MissedTickBehavior},
};

use crate::{
    clock::Clock,
    db::{Message, LEAVE_TEXT},
    store::{DynStore, StoreError, StoreResult},
};

/// What a single sweep did.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub evicted: Vec<String>,
    pub failed: Vec<(String, StoreError)>,
}

pub struct Reaper {
    store: DynStore,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    sweeping: AtomicBool,
}

/// Clears the re-entrancy flag when the sweep ends, however it ends.
struct SweepGuard<'a>(&'a AtomicBool);

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Reaper {
    pub fn new(store: DynStore, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            store,
            clock,
            timeout,
            sweeping: AtomicBool::new(false),
        }
    }

    /// Runs one sweep. Returns `Ok(None)` without doing anything if another
    /// sweep is still in progress, and `Err` only if the participant list
    /// itself could not be read.
    pub async fn sweep(&self) -> StoreResult<Option<SweepReport>> {
        if self.sweeping.swap(true, Ordering::AcqRel) {
            tracing::debug!("previous sweep still running, skipping");
            return Ok(None);
        }
        let _guard = SweepGuard(&self.sweeping);

        let now = self.clock.now_millis();
        let timeout = i64::try_from(self.timeout.as_millis()).unwrap_or(i64::MAX);
        let cutoff = now.saturating_sub(timeout);

        let mut report = SweepReport::default();
        for participant in self.store.list_participants().await? {
            if participant.last_status >= cutoff {
                continue;
            }

            match self.evict(&participant.name, cutoff).await {
                Ok(true) => report.evicted.push(participant.name),
                // heartbeat landed between the listing and the delete
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("failed to evict {}: {e}", participant.name);
                    report.failed.push((participant.name, e));
                }
            }
        }

        Ok(Some(report))
    }

    async fn evict(&self, name: &str, cutoff: i64) -> StoreResult<bool> {
        if !self.store.delete_participant_if_idle(name, cutoff).await? {
            return Ok(false);
        }

        let left = Message::status(name, LEAVE_TEXT, self.clock.now_time_of_day());
        self.store.insert_message(&left).await?;

        tracing::info!("{name} left (inactive)");
        Ok(true)
    }

    /// Sweeps every `period` until `shutdown` becomes true or its sender
    /// is dropped. The first sweep happens one period after start.
    pub async fn run(self: Arc<Self>, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            "reaper started: every {period:?}, timeout {:?}",
            self.timeout
        );

        loop {
            let stopping = *shutdown.borrow();
            if stopping {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => match self.sweep().await {
                    Ok(Some(report)) if !report.evicted.is_empty() || !report.failed.is_empty() => {
                        tracing::debug!(
                            "sweep evicted {} participant(s), {} failure(s)",
                            report.evicted.len(),
                            report.failed.len()
                        );
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!("sweep could not list participants: {e}"),
                },
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("reaper stopped");
    }
}
