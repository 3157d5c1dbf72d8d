//! Session-owned accrual task.
//!
//! One cancellable tokio task per user session. A fast interval applies accrual
//! ticks and publishes snapshots to a watch channel; on a slower cadence the
//! merged investment object is pushed to the row-store. Stopping the session
//! cancels the pending tick; nothing in-flight needs aborting since ticks are
//! synchronous.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::engine::{Engine, EngineSnapshot};
use crate::model::UserRecord;
use crate::store::{RowStore, UserPatch};

/// Tick cadences. Both are wall-clock intervals; the accrual formula recomputes
/// from absolute elapsed time, so skipped or coalesced ticks cause no drift.
#[derive(Debug, Clone, Copy)]
pub struct SessionTiming {
    /// Accrual recompute + snapshot publish.
    pub tick_interval: Duration,
    /// Remote persistence push.
    pub sync_interval: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
            sync_interval: Duration::from_secs(300),
        }
    }
}

/// Handle to a running accrual session.
///
/// The task ends on its own when the investment completes or when no valid
/// active investment exists; [`Session::shutdown`] ends it early. Dropping the
/// handle also stops the task.
pub struct Session {
    shutdown: watch::Sender<bool>,
    updates: watch::Receiver<EngineSnapshot>,
    handle: JoinHandle<UserRecord>,
}

impl Session {
    /// Spawn the accrual task for `user`.
    ///
    /// The first tick runs immediately; if the user has no valid active
    /// investment the task stops without touching the record or the store.
    pub fn spawn<S>(store: S, user: UserRecord, timing: SessionTiming) -> Self
    where
        S: RowStore + Send + Sync + 'static,
    {
        let engine = Engine::new(user);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (updates_tx, updates_rx) = watch::channel(engine.snapshot());
        let handle = tokio::spawn(run(store, engine, timing, updates_tx, shutdown_rx));

        Self {
            shutdown: shutdown_tx,
            updates: updates_rx,
            handle,
        }
    }

    /// Most recently published snapshot.
    pub fn latest(&self) -> EngineSnapshot {
        *self.updates.borrow()
    }

    /// Subscribe to snapshot updates.
    pub fn updates(&self) -> watch::Receiver<EngineSnapshot> {
        self.updates.clone()
    }

    /// Subscribe as an async stream (yields the current snapshot first).
    pub fn update_stream(&self) -> WatchStream<EngineSnapshot> {
        WatchStream::new(self.updates.clone())
    }

    /// Request the task to stop. Safe to call more than once.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Resolve once the task has stopped publishing, for any reason.
    pub async fn finished(&self) {
        let mut updates = self.updates.clone();
        while updates.changed().await.is_ok() {}
    }

    /// Wait for the task to end and take back the user record.
    pub async fn join(self) -> UserRecord {
        self.handle.await.expect("session task panicked")
    }

    /// Stop the task and take back the user record.
    pub async fn stop(self) -> UserRecord {
        self.shutdown();
        self.join().await
    }
}

async fn run<S: RowStore>(
    store: S,
    mut engine: Engine,
    timing: SessionTiming,
    updates: watch::Sender<EngineSnapshot>,
    mut shutdown: watch::Receiver<bool>,
) -> UserRecord {
    let user_id = engine.user().id.clone();
    info!(user = %user_id, "growth engine started");

    let mut ticker = time::interval(timing.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // None until the first push so a fresh session syncs right away.
    let mut last_sync: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now_ms = Utc::now().timestamp_millis();
                let Some(snapshot) = engine.tick(now_ms) else {
                    info!(user = %user_id, "no active investment, growth engine stopped");
                    break;
                };
                let _ = updates.send(snapshot);

                let sync_due = last_sync.is_none_or(|at| at.elapsed() >= timing.sync_interval);
                if snapshot.completed || sync_due {
                    last_sync = Some(Instant::now());
                    push_snapshot(&store, &user_id, engine.user()).await;
                }
                if snapshot.completed {
                    break;
                }
            }
            _ = shutdown.changed() => {
                info!(user = %user_id, "session stopped");
                break;
            }
        }
    }

    engine.into_user()
}

/// Best-effort push of the merged investment object. Failures are transient:
/// the in-memory value stands and the next scheduled push retries with fresher
/// data.
async fn push_snapshot<S: RowStore>(store: &S, user_id: &str, user: &UserRecord) {
    let patch = UserPatch::new().with_investment(user.investment);
    match store.update_user(user_id, &patch).await {
        Ok(_) => debug!(
            user = %user_id,
            profit = %user.investment.profit,
            "snapshot pushed to row-store"
        ),
        Err(err) => warn!(
            user = %user_id,
            reason = %err,
            "snapshot push failed, keeping in-memory values"
        ),
    }
}
