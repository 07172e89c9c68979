//! The scheduler — three independent periodic tasks over one engine.
//!
//! Monitor, resolve, and metrics ticks run on their own tokio timers; none
//! blocks another, and a failure inside one tick is contained by the
//! engine's per-item error handling, so the loops themselves only stop on
//! shutdown. All state lives in the engine — the tasks are stateless
//! drivers, which is what makes dropping them safe.

use crate::engine::ConsistencyEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Handle owning the three periodic tasks.
///
/// `start` spawns them; `shutdown` stops all three cleanly and waits for
/// them to finish. Dropping the handle without calling `shutdown` aborts
/// the tasks at the next await point without losing engine state.
pub struct Scheduler {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawns the monitor, resolve, and metrics tasks at the intervals in
    /// the engine's configuration. Must be called from within a tokio
    /// runtime.
    #[must_use]
    pub fn start(engine: Arc<ConsistencyEngine>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let config = engine.config();

        let handles = vec![
            spawn_tick("monitor", config.monitor_interval, shutdown_rx.clone(), {
                let engine = Arc::clone(&engine);
                move || {
                    engine.run_monitor();
                }
            }),
            spawn_tick("resolve", config.resolve_interval, shutdown_rx.clone(), {
                let engine = Arc::clone(&engine);
                move || {
                    engine.resolve_pending();
                }
            }),
            spawn_tick("metrics", config.metrics_interval, shutdown_rx, {
                let engine = Arc::clone(&engine);
                move || {
                    engine.snapshot_metrics();
                }
            }),
        ];

        info!("scheduler started");
        Self {
            shutdown_tx,
            handles,
        }
    }

    /// Signals all tasks to stop and waits for them to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles.drain(..) {
            let _ = handle.await;
        }
        info!("scheduler stopped");
    }
}

/// One periodic task: run `tick` every `period` until shutdown.
///
/// The first interval tick fires immediately; it is consumed before the
/// loop so work starts one full period after startup.
fn spawn_tick(
    name: &'static str,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
    mut tick: impl FnMut() + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer.tick().await;

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    tick();
                    debug!(task = name, "tick complete");
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        debug!(task = name, "stopped");
    })
}
