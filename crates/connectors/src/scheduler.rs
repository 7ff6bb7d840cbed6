//! Interval scheduler for polling inputs
//!
//! Each due input runs its cycle in its own tokio task, so a slow repository
//! doesn't hold up the others. Overlap is prevented by the poller's
//! per-input lock: an input whose previous cycle is still running is skipped
//! until the next tick.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::error::ConnectorError;
use crate::poller::{Input, InvocationSummary, Poller};
use crate::traits::RecordSource;

/// Default check interval for due inputs
const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Longest accepted interval (one year)
const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// How often an input runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    /// `-1`: once per process start
    Once,
    /// `0`: again on the next tick after a cycle
    Continuous,
    /// `N`: every N seconds
    Every(Duration),
}

impl FromStr for Interval {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "-1" {
            return Ok(Self::Once);
        }
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConnectorError::ConfigError(format!(
                "interval must be -1 or a non-negative number of seconds, got '{}'",
                s
            )));
        }
        let secs: u64 = s
            .parse()
            .map_err(|e| ConnectorError::ConfigError(format!("interval '{}': {}", s, e)))?;
        if secs > MAX_INTERVAL_SECS {
            return Err(ConnectorError::ConfigError(format!(
                "interval must be at most {} seconds, got '{}'",
                MAX_INTERVAL_SECS, s
            )));
        }
        Ok(match secs {
            0 => Self::Continuous,
            n => Self::Every(Duration::from_secs(n)),
        })
    }
}

/// An input with its schedule
pub struct ScheduledInput<R> {
    input: Arc<Input<R>>,
    interval: Interval,
    /// `None` once a run-once input has been started
    next_run: Option<Instant>,
}

impl<R> ScheduledInput<R> {
    /// Schedule `input`, due immediately
    pub fn new(input: Input<R>, interval: Interval) -> Self {
        Self {
            input: Arc::new(input),
            interval,
            next_run: Some(Instant::now()),
        }
    }

    pub fn name(&self) -> &str {
        self.input.instance.name()
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn next_run(&self) -> Option<Instant> {
        self.next_run
    }

    fn should_run(&self, now: Instant) -> bool {
        self.next_run.is_some_and(|next| now >= next)
    }

    /// Compute the next run after a cycle was started at `now`
    ///
    /// A period past the clock's range parks the input instead of panicking
    /// the scheduler loop.
    fn advance(&mut self, now: Instant) {
        self.next_run = match self.interval {
            Interval::Once => None,
            Interval::Continuous => Some(now),
            Interval::Every(period) => {
                let next = now.checked_add(period);
                if next.is_none() {
                    warn!(
                        input = %self.name(),
                        interval = ?period,
                        "interval out of range, input will not run again"
                    );
                }
                next
            }
        };
    }
}

/// Runs inputs on their intervals until cancelled
pub struct InputScheduler<R> {
    poller: Arc<Poller>,
    inputs: Vec<ScheduledInput<R>>,
    check_interval: Duration,
}

impl<R> InputScheduler<R>
where
    R: RecordSource + 'static,
{
    pub fn new(poller: Arc<Poller>) -> Self {
        Self {
            poller,
            inputs: Vec::new(),
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    /// Set the check interval for due inputs
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Add a scheduled input
    pub fn add(&mut self, input: ScheduledInput<R>) {
        info!(
            input = %input.name(),
            interval = ?input.interval,
            "registered input"
        );
        self.inputs.push(input);
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Run the scheduler loop
    ///
    /// Returns when `shutdown` is cancelled (after in-flight cycles finish)
    /// or when every input is run-once and has completed.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            inputs = self.inputs.len(),
            check_interval = ?self.check_interval,
            "starting input scheduler"
        );

        let mut tasks = JoinSet::new();

        loop {
            let now = Instant::now();

            for scheduled in &mut self.inputs {
                if !scheduled.should_run(now) {
                    continue;
                }

                let key = self.poller.collection_key(&scheduled.input.instance);
                if self.poller.locks().is_held(&key) {
                    warn!(
                        input = %scheduled.name(),
                        "skipping scheduled run - previous cycle still in progress"
                    );
                    continue;
                }

                debug!(input = %scheduled.name(), "spawning cycle task");

                let poller = Arc::clone(&self.poller);
                let input = Arc::clone(&scheduled.input);
                let span = info_span!("input", input = %scheduled.name());

                tasks.spawn(
                    async move {
                        match poller.run_cycle(&input.instance, &input.source).await {
                            Ok(report) => debug!(
                                records = report.records,
                                checkpoint = ?report.checkpoint,
                                "cycle complete"
                            ),
                            Err(ConnectorError::CycleInProgress(_)) => {
                                warn!("skipping cycle - previous cycle still in progress")
                            }
                            Err(e) => error!(
                                account = %input.instance.account,
                                repo = %input.instance.repo,
                                error = %e,
                                details = ?e,
                                "failed to ingest workflow runs"
                            ),
                        }
                    }
                    .instrument(span),
                );

                scheduled.advance(now);
            }

            // Reap finished tasks so panics surface promptly
            while let Some(joined) = tasks.try_join_next() {
                if let Err(e) = joined {
                    error!(error = %e, "cycle task panicked");
                }
            }

            if tasks.is_empty() && self.inputs.iter().all(|i| i.next_run.is_none()) {
                info!("all run-once inputs finished");
                break;
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(in_flight = tasks.len(), "scheduler shutting down");
                    break;
                }
                _ = tokio::time::sleep(self.check_interval) => {}
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "cycle task panicked");
            }
        }
    }

    /// Run every input once, in order (single invocation mode)
    pub async fn run_once(&self) -> InvocationSummary {
        self.poller
            .run_all(self.inputs.iter().map(|s| s.input.as_ref()))
            .await
    }
}
