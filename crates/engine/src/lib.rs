//! Reconciliation engine: periodic passes that converge the externally
//! visible side of every event (summary message, discussion space, roster)
//! onto the database state, plus the draft persistence service.

pub mod draft;
pub mod passes;
pub mod summary;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;
use muster_core::presence::Presence;
use muster_core::store::Store;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Timing knobs for the reconciliation passes. The defaults match the
/// documented cadence; tests shrink them to milliseconds.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub thread_interval: StdDuration,
    pub self_heal_interval: StdDuration,
    pub membership_interval: StdDuration,
    pub tentative_interval: StdDuration,
    pub recurrence_interval: StdDuration,
    pub retention_interval: StdDuration,
    /// Minimum time between recreation checks of the same origin event.
    pub recreation_recheck: chrono::Duration,
    /// How long after an event's end the cleanup pass waits before removing
    /// its summary and discussion space.
    pub cleanup_grace: chrono::Duration,
    /// How long soft-deleted events are kept before the hard delete.
    pub purge_retention: chrono::Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            thread_interval: StdDuration::from_secs(60),
            self_heal_interval: StdDuration::from_secs(300),
            membership_interval: StdDuration::from_secs(300),
            tentative_interval: StdDuration::from_secs(300),
            recurrence_interval: StdDuration::from_secs(300),
            retention_interval: StdDuration::from_secs(600),
            recreation_recheck: chrono::Duration::hours(1),
            cleanup_grace: chrono::Duration::hours(1),
            purge_retention: chrono::Duration::days(30),
        }
    }
}

/// Owns the six reconciliation passes. Each pass runs as its own tokio task
/// on a fixed interval and stops when the shutdown signal flips; there is no
/// cross-pass lock, the passes are individually idempotent.
pub struct Scheduler {
    store: Arc<dyn Store>,
    presence: Arc<dyn Presence>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(store: Arc<dyn Store>, presence: Arc<dyn Presence>, config: SchedulerConfig) -> Self {
        Self {
            store,
            presence,
            config,
        }
    }

    /// Spawns all six passes and returns their handles.
    pub fn spawn(&self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        info!("Starting reconciliation scheduler");

        let mut handles = Vec::new();

        {
            let store = self.store.clone();
            let presence = self.presence.clone();
            handles.push(spawn_pass(
                "thread_lifecycle",
                self.config.thread_interval,
                shutdown.clone(),
                move || passes::threads::run(store.clone(), presence.clone(), Utc::now()),
            ));
        }

        {
            let store = self.store.clone();
            let presence = self.presence.clone();
            handles.push(spawn_pass(
                "summary_self_heal",
                self.config.self_heal_interval,
                shutdown.clone(),
                move || passes::self_heal::run(store.clone(), presence.clone(), Utc::now()),
            ));
        }

        {
            let store = self.store.clone();
            let presence = self.presence.clone();
            handles.push(spawn_pass(
                "membership_sync",
                self.config.membership_interval,
                shutdown.clone(),
                move || passes::membership::run(store.clone(), presence.clone(), Utc::now()),
            ));
        }

        {
            let store = self.store.clone();
            handles.push(spawn_pass(
                "tentative_aging",
                self.config.tentative_interval,
                shutdown.clone(),
                move || passes::tentative::run(store.clone(), Utc::now()),
            ));
        }

        {
            let store = self.store.clone();
            let presence = self.presence.clone();
            let recheck = self.config.recreation_recheck;
            handles.push(spawn_pass(
                "recurrence_advancement",
                self.config.recurrence_interval,
                shutdown.clone(),
                move || {
                    passes::recurrence::run(store.clone(), presence.clone(), Utc::now(), recheck)
                },
            ));
        }

        {
            let store = self.store.clone();
            let presence = self.presence.clone();
            let grace = self.config.cleanup_grace;
            let retention = self.config.purge_retention;
            handles.push(spawn_pass(
                "retention_purge",
                self.config.retention_interval,
                shutdown,
                move || {
                    passes::retention::run(
                        store.clone(),
                        presence.clone(),
                        Utc::now(),
                        grace,
                        retention,
                    )
                },
            ));
        }

        handles
    }
}

fn spawn_pass<F, Fut>(
    name: &'static str,
    period: StdDuration,
    mut shutdown: watch::Receiver<bool>,
    run: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = eyre::Result<()>> + Send,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = run().await {
                        error!("Pass {} failed: {:?}", name, e);
                    }
                }
                _ = shutdown.changed() => {
                    info!("Pass {} stopping", name);
                    break;
                }
            }
        }
    })
}
