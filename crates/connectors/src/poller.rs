//! Checkpointed incremental polling
//!
//! One cycle per input:
//!
//! 1. read the checkpoint (or synthesize `now - lookback` when absent)
//! 2. build the "created after" boundary
//! 3. resolve the credential and fetch every matching record
//! 4. convert each record to an event and hand it to the sink, in API order
//! 5. advance the checkpoint to the newest record time, or to "now" when
//!    nothing new arrived
//!
//! The checkpoint write is the last step, so a failure anywhere earlier
//! leaves the stored value untouched. [`Poller::run_all`] wraps every input
//! in its own failure boundary: one input failing never stops the others.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::checkpoint::{collection_key, normalize_input_name};
use crate::config::PollerConfig;
use crate::error::ConnectorError;
use crate::lifecycle;
use crate::record::{Event, Record, SOURCETYPE};
use crate::time::{default_boundary, epoch_seconds, format_checkpoint, parse_timestamp};
use crate::traits::{CheckpointStore, CredentialResolver, EventSink, RecordSource};

/// One configured polling job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputInstance {
    /// Input identifier, possibly qualified (`scheme://name`)
    pub id: String,
    /// Owning user or organization
    pub account: String,
    /// Repository
    pub repo: String,
    /// Credential reference
    pub credential: String,
    /// Destination index for emitted events
    pub index: String,
    /// Move the checkpoint to "now" when a cycle finds nothing
    pub advance_on_empty: bool,
}

impl InputInstance {
    /// Name with any path-style qualifier stripped
    pub fn name(&self) -> &str {
        normalize_input_name(&self.id)
    }
}

/// An input paired with the source it polls
pub struct Input<R> {
    pub instance: InputInstance,
    pub source: R,
}

impl<R> Input<R> {
    pub fn new(instance: InputInstance, source: R) -> Self {
        Self { instance, source }
    }
}

/// Result of one successful cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Normalized input name
    pub input: String,
    /// Records fetched (and events emitted)
    pub records: usize,
    /// Checkpoint the cycle started from
    pub previous: String,
    /// Whether `previous` was synthesized because none was stored
    pub used_default: bool,
    /// Checkpoint written at the end of the cycle, if any
    pub checkpoint: Option<String>,
    /// False when the checkpoint write failed (events were still emitted)
    pub checkpoint_saved: bool,
}

/// What happened to one input during an invocation
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    Completed(CycleReport),
    /// Another cycle for the same input was still running
    Skipped,
    Failed(String),
}

/// Per-input outcomes of [`Poller::run_all`], in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationSummary {
    pub outcomes: Vec<(String, InputOutcome)>,
}

impl InvocationSummary {
    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, InputOutcome::Completed(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, InputOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, InputOutcome::Skipped))
    }

    /// Outcome for a normalized input name
    pub fn get(&self, input: &str) -> Option<&InputOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == input)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, pred: impl Fn(&InputOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// In-process single-flight guard keyed by checkpoint key
#[derive(Debug, Clone, Default)]
pub struct InstanceLocks {
    held: Arc<Mutex<HashSet<String>>>,
}

impl InstanceLocks {
    /// Take the lock for `key`, or `None` if it is already held
    pub fn try_acquire(&self, key: &str) -> Option<InstanceGuard> {
        if !self.held.lock().insert(key.to_string()) {
            return None;
        }
        Some(InstanceGuard {
            key: key.to_string(),
            held: Arc::clone(&self.held),
        })
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.lock().contains(key)
    }
}

/// Releases its key on drop
#[derive(Debug)]
pub struct InstanceGuard {
    key: String,
    held: Arc<Mutex<HashSet<String>>>,
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        self.held.lock().remove(&self.key);
    }
}

/// Checkpoint the cycle starts from
struct StartingPoint {
    value: String,
    parsed: Option<DateTime<Utc>>,
    used_default: bool,
}

/// Polling engine
pub struct Poller {
    store: Arc<dyn CheckpointStore>,
    sink: Arc<dyn EventSink>,
    credentials: Arc<dyn CredentialResolver>,
    config: PollerConfig,
    locks: InstanceLocks,
}

impl Poller {
    pub fn new(
        store: Arc<dyn CheckpointStore>,
        sink: Arc<dyn EventSink>,
        credentials: Arc<dyn CredentialResolver>,
        config: PollerConfig,
    ) -> Self {
        Self {
            store,
            sink,
            credentials,
            config,
            locks: InstanceLocks::default(),
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    pub fn locks(&self) -> &InstanceLocks {
        &self.locks
    }

    /// Checkpoint key for an input
    pub fn collection_key(&self, instance: &InputInstance) -> String {
        collection_key(&self.config.collection_prefix, &instance.id)
    }

    /// Stored checkpoint for an input, if any
    pub async fn checkpoint(&self, instance: &InputInstance) -> Result<Option<String>, ConnectorError> {
        self.store.get(&self.collection_key(instance)).await
    }

    /// Run one cycle for every input, isolating failures
    pub async fn run_all<'a, R: RecordSource + 'a>(
        &self,
        inputs: impl IntoIterator<Item = &'a Input<R>>,
    ) -> InvocationSummary {
        let mut summary = InvocationSummary::default();

        for input in inputs {
            let name = input.instance.name().to_string();
            let span = info_span!("input", input = %name);

            let outcome = async {
                match self.run_cycle(&input.instance, &input.source).await {
                    Ok(report) => InputOutcome::Completed(report),
                    Err(ConnectorError::CycleInProgress(key)) => {
                        warn!(key = %key, "skipping cycle - previous cycle still in progress");
                        InputOutcome::Skipped
                    }
                    Err(e) => {
                        error!(
                            account = %input.instance.account,
                            repo = %input.instance.repo,
                            error = %e,
                            details = ?e,
                            "failed to ingest workflow runs"
                        );
                        InputOutcome::Failed(e.to_string())
                    }
                }
            }
            .instrument(span)
            .await;

            summary.outcomes.push((name, outcome));
        }

        info!(
            inputs = summary.outcomes.len(),
            completed = summary.completed(),
            failed = summary.failed(),
            skipped = summary.skipped(),
            "invocation complete"
        );
        summary
    }

    /// Run one checkpointed cycle for a single input
    ///
    /// # Errors
    ///
    /// Any fetch, credential, record or sink failure aborts the cycle before
    /// the checkpoint is touched. A failed checkpoint *write* does not: it
    /// is logged and reported through [`CycleReport::checkpoint_saved`].
    pub async fn run_cycle<R: RecordSource>(
        &self,
        instance: &InputInstance,
        source: &R,
    ) -> Result<CycleReport, ConnectorError> {
        let key = self.collection_key(instance);
        let _guard = self
            .locks
            .try_acquire(&key)
            .ok_or_else(|| ConnectorError::CycleInProgress(key.clone()))?;

        let start = self.starting_point(&key).await;
        let boundary = source.boundary(&start.value);

        let token = self.credentials.resolve(&instance.credential).await?;

        info!(
            source = source.name(),
            account = %instance.account,
            repo = %instance.repo,
            boundary = %boundary,
            "getting workflow runs"
        );
        let records = source
            .fetch_since(&instance.account, &instance.repo, &token, &boundary)
            .await?;

        // Convert everything first so a bad record cannot leave a partial emission
        let (events, newest) = self.build_events(instance, &records)?;

        info!(records = records.len(), "got workflow runs");
        for event in events {
            let time = event.time;
            self.sink.write(event).await?;
            debug!(sink = self.sink.name(), time, "event written");
        }

        let next = match newest {
            Some((newest_at, raw)) => {
                if start.parsed.is_some_and(|prev| newest_at < prev) {
                    warn!(
                        previous = %start.value,
                        newest = raw,
                        "newest record is older than the checkpoint, keeping checkpoint"
                    );
                    Some(start.value.clone())
                } else {
                    Some(raw.to_string())
                }
            }
            None if instance.advance_on_empty => {
                let now = Utc::now();
                let now = start.parsed.map_or(now, |prev| prev.max(now));
                Some(format_checkpoint(now))
            }
            None => None,
        };

        let checkpoint_saved = match &next {
            Some(value) => self.save_checkpoint(&key, value).await,
            None => false,
        };

        Ok(CycleReport {
            input: instance.name().to_string(),
            records: records.len(),
            previous: start.value,
            used_default: start.used_default,
            checkpoint: next,
            checkpoint_saved,
        })
    }

    /// Delete the checkpoint of a removed input (never fails)
    pub async fn remove_input(&self, input_id: &str) -> bool {
        lifecycle::delete_checkpoint(
            self.store.as_ref(),
            &self.config.collection_prefix,
            input_id,
        )
        .await
    }

    /// Stored checkpoint, or the default lookback boundary
    ///
    /// A read failure is treated like a missing checkpoint.
    async fn starting_point(&self, key: &str) -> StartingPoint {
        let stored = match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    store = self.store.name(),
                    error = %e,
                    "failed to read checkpoint, falling back to default"
                );
                None
            }
        };

        match stored {
            Some(value) => {
                info!(checkpoint = %value, "stored checkpoint");
                let parsed = parse_timestamp(&value).ok();
                StartingPoint {
                    value,
                    parsed,
                    used_default: false,
                }
            }
            None => {
                let value = default_boundary(Utc::now(), self.config.lookback());
                info!(checkpoint = %value, "created checkpoint");
                // Never persisted, so it must not hold back older records
                StartingPoint {
                    value,
                    parsed: None,
                    used_default: true,
                }
            }
        }
    }

    /// Events in record order plus the newest record time (and its raw string)
    fn build_events<'a>(
        &self,
        instance: &InputInstance,
        records: &'a [Record],
    ) -> Result<(Vec<Event>, Option<(DateTime<Utc>, &'a str)>), ConnectorError> {
        let mut events = Vec::with_capacity(records.len());
        let mut newest: Option<(DateTime<Utc>, &'a str)> = None;

        for record in records {
            let raw = record.created_at()?;
            let at = parse_timestamp(raw)?;

            events.push(Event {
                data: record.to_json()?,
                time: epoch_seconds(&at),
                index: instance.index.clone(),
                sourcetype: SOURCETYPE.to_string(),
            });

            if newest.is_none_or(|(current, _)| at > current) {
                newest = Some((at, raw));
            }
        }

        Ok((events, newest))
    }

    /// Write the checkpoint, logging instead of failing
    async fn save_checkpoint(&self, key: &str, value: &str) -> bool {
        match self.store.set(key, value).await {
            Ok(()) => {
                info!(checkpoint = %value, "saved checkpoint");
                true
            }
            Err(e) => {
                error!(
                    store = self.store.name(),
                    checkpoint = %value,
                    error = %e,
                    "failed to save checkpoint"
                );
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;
