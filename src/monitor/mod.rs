//! The monitoring core: tick distribution, per-target poll loops, and the
//! queryable stats map.
//!
//! One long-lived task per target plus the dispatch loop in [`Monitor::run`].
//! All signal delivery is non-blocking and coalescing: the per-target poll
//! slot and the shared render slot each hold at most one pending signal, and
//! a send that finds the slot full is dropped. Ticks are a rate ceiling, not
//! a guaranteed-delivery queue.

mod query;

pub use query::{Pagination, RequestEntry, StatsPage, PAGE_SIZE};

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, Semaphore};
use tokio::time::MissedTickBehavior;

use crate::config::MonitorConfig;
use crate::probe;
use crate::stats::{Stats, StatsMap};

/// The monitor service: owns the target set, their aggregators, and the
/// dispatch loop.
pub struct Monitor {
    config: MonitorConfig,
    stats: StatsMap,
}

impl Monitor {
    /// Build the monitor and its per-target aggregators. The stats map is
    /// never structurally mutated after this point.
    pub fn new(config: MonitorConfig) -> Self {
        let stats = config
            .targets
            .iter()
            .map(|url| (url.clone(), Arc::new(Stats::default())))
            .collect();

        Self { config, stats }
    }

    /// Run the monitor until a stop signal arrives.
    ///
    /// Spawns one poll loop per target, then multiplexes the tick timer, the
    /// render-request slot, and the stop signal. On stop, waits for every
    /// poll loop (including any in-flight fetch) before issuing one final
    /// render. Individual fetch failures are statistics, never errors, so
    /// this only ever returns via the stop signal.
    pub async fn run(&self, mut stop_rx: broadcast::Receiver<()>) {
        let (render_tx, mut render_rx) = mpsc::channel::<()>(1);

        let mut poll_txs = Vec::with_capacity(self.stats.len());
        let mut handles = Vec::with_capacity(self.stats.len());

        tracing::info!(targets = self.stats.len(), "starting monitor");

        for (url, stats) in &self.stats {
            let (poll_tx, poll_rx) = mpsc::channel::<()>(1);
            poll_txs.push(poll_tx);
            handles.push(tokio::spawn(run_poll_loop(
                url.clone(),
                Arc::clone(stats),
                self.config.client.clone(),
                poll_rx,
                render_tx.clone(),
                stop_rx.resubscribe(),
            )));
        }

        let mut interval = tokio::time::interval(self.config.tick_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // The first tick completes immediately and doubles as the
                // startup poll.
                _ = interval.tick() => {
                    for poll_tx in &poll_txs {
                        let _ = poll_tx.try_send(());
                    }
                }
                Some(()) = render_rx.recv() => {
                    (self.config.renderer)(self.snapshot());
                }
                _ = stop_rx.recv() => break,
            }
        }

        drop(poll_txs);
        for handle in handles {
            let _ = handle.await;
        }

        tracing::info!("monitor stopped");
        (self.config.renderer)(self.snapshot());
    }

    /// The live stats map. Records keep changing underneath while pollers
    /// run; readers must not assume a consistent cross-target view.
    pub fn snapshot(&self) -> &StatsMap {
        &self.stats
    }

    /// One page of a target's history, or `None` for an unknown target.
    ///
    /// `page` is the raw query-string value; anything that is not a positive
    /// integer falls back to page 1.
    pub fn query_page(&self, target: &str, page: Option<&str>) -> Option<StatsPage> {
        let stats = self.stats.get(target)?;

        let page = query::parse_page(page);
        let (results, total) = stats.page_of(page, query::PAGE_SIZE);

        Some(query::build_page(page, results, total))
    }
}

/// Poll loop for a single target.
///
/// Consumes poll signals and runs each fetch as its own task while holding
/// the single busy permit, so a slow fetch never blocks this loop or any
/// other target. A signal arriving while the permit is taken is dropped.
async fn run_poll_loop(
    url: String,
    stats: Arc<Stats>,
    client: reqwest::Client,
    mut poll_rx: mpsc::Receiver<()>,
    render_tx: mpsc::Sender<()>,
    mut stop_rx: broadcast::Receiver<()>,
) {
    // Single permit: at most one fetch in flight per target.
    let busy = Arc::new(Semaphore::new(1));

    loop {
        tokio::select! {
            _ = stop_rx.recv() => break,
            signal = poll_rx.recv() => {
                if signal.is_none() {
                    break;
                }

                let permit = match busy.clone().try_acquire_owned() {
                    Ok(permit) => permit,
                    Err(_) => {
                        tracing::debug!(%url, "fetch still in flight, dropping poll signal");
                        continue;
                    }
                };

                let url = url.clone();
                let stats = Arc::clone(&stats);
                let client = client.clone();
                let render_tx = render_tx.clone();

                tokio::spawn(async move {
                    let _permit = permit;

                    let result = probe::fetch_once(&client, &url).await;
                    stats.record(result);

                    // Coalescing render request: dropped if one is pending.
                    let _ = render_tx.try_send(());
                });
            }
        }
    }

    // An in-flight fetch still records its result; wait for its permit to
    // come back before this target counts as stopped.
    let _ = busy.acquire().await;
}
