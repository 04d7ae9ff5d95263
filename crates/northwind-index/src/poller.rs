//! Waiting for asynchronous index builds.
//!
//! Creating an index returns before the store has finished indexing the
//! existing documents of its collection. Until the index reports `active`,
//! queries against it may miss documents. [`IndexReadinessPoller`] checks the
//! flag at a fixed interval within a bounded total wait:
//!
//! ```text
//! cycle 0: check cancel -> get(index) -> active? -> sleep(interval)
//! cycle 1: check cancel -> get(index) -> active? -> sleep(interval)
//! ...
//! cycle floor(max_wait / interval) - 1: check cancel -> get(index) -> active?
//! ```
//!
//! The first active report ends the poll. Running out of cycles is a normal
//! outcome, reported as [`PollOutcome::TimedOut`].

use std::time::Duration;

use northwind_core::{Error, Expr, QueryService, Result, ValueExt};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_POLLER;

/// Default total wait for an index build: two minutes.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(120);

/// Default interval between status checks: five seconds.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Bounds of a readiness poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Upper bound on the total time spent waiting.
    pub max_wait: Duration,
    /// Time between two consecutive status checks.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_MAX_WAIT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl PollConfig {
    /// Create a new poll configuration.
    pub fn new(max_wait: Duration, interval: Duration) -> Self {
        Self { max_wait, interval }
    }

    /// Set the total wait.
    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Set the interval between checks.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Number of status checks the poll may perform: `floor(max_wait / interval)`.
    pub fn max_cycles(&self) -> u64 {
        if self.interval.is_zero() {
            return 0;
        }
        let cycles = self.max_wait.as_nanos() / self.interval.as_nanos();
        u64::try_from(cycles).unwrap_or(u64::MAX)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_wait.is_zero() {
            return Err(Error::invalid_input("max wait must be positive"));
        }
        if self.interval.is_zero() {
            return Err(Error::invalid_input("poll interval must be positive"));
        }
        if self.interval > self.max_wait {
            return Err(Error::invalid_input(format!(
                "poll interval ({:?}) cannot exceed max wait ({:?})",
                self.interval, self.max_wait
            )));
        }
        Ok(())
    }
}

/// Result of a readiness poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum PollOutcome {
    /// The index reported `active = true`.
    Active,
    /// Every cycle ran without the index becoming active.
    TimedOut,
    /// The cancellation token fired before the index became active.
    Cancelled,
}

impl PollOutcome {
    /// Returns `true` if the index is ready to be queried.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Progress of a single poll invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PollState {
    /// Index being waited for.
    index_name: String,
    /// Time accounted to completed cycles.
    elapsed: Duration,
    /// Time between two consecutive status checks.
    interval: Duration,
    /// Total wait budget.
    deadline: Duration,
    /// Last reported activation status.
    active: bool,
}

impl PollState {
    fn new(index_name: &str, config: &PollConfig) -> Self {
        Self {
            index_name: index_name.to_owned(),
            elapsed: Duration::ZERO,
            interval: config.interval,
            deadline: config.max_wait,
            active: false,
        }
    }

    fn advance(&mut self) {
        self.elapsed = self.elapsed.saturating_add(self.interval);
    }
}

/// Polls the store until an index build completes.
#[derive(Debug, Clone)]
pub struct IndexReadinessPoller {
    service: QueryService,
}

impl IndexReadinessPoller {
    /// Creates a poller issuing its status queries through `service`.
    pub fn new(service: QueryService) -> Self {
        Self { service }
    }

    /// Waits for `index_name` to become active.
    ///
    /// Performs at most `floor(max_wait / interval)` status queries, sleeping
    /// `interval` between them, and returns as soon as one reports the index
    /// active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the durations are not positive or
    /// `interval > max_wait`. Any failed status query is returned as is; it is
    /// not retried.
    pub async fn await_active(
        &self,
        index_name: &str,
        max_wait: Duration,
        interval: Duration,
    ) -> Result<PollOutcome> {
        let config = PollConfig::new(max_wait, interval);
        self.await_active_with_cancel(index_name, &config, &CancellationToken::new())
            .await
    }

    /// Waits for `index_name` to become active, or for `cancel` to fire.
    ///
    /// Cancellation is checked before every cycle and also interrupts the
    /// sleep between cycles.
    pub async fn await_active_with_cancel(
        &self,
        index_name: &str,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome> {
        config.validate()?;
        if index_name.trim().is_empty() {
            return Err(Error::invalid_input("index name cannot be empty"));
        }

        let max_cycles = config.max_cycles();
        let mut state = PollState::new(index_name, config);

        tracing::info!(
            target: TRACING_TARGET_POLLER,
            index = %state.index_name,
            max_wait_ms = state.deadline.as_millis(),
            interval_ms = state.interval.as_millis(),
            max_cycles,
            "Waiting for index to become active"
        );

        for cycle in 0..max_cycles {
            if cancel.is_cancelled() {
                tracing::info!(
                    target: TRACING_TARGET_POLLER,
                    index = %state.index_name,
                    cycle,
                    elapsed_ms = state.elapsed.as_millis(),
                    "Index wait cancelled"
                );
                return Ok(PollOutcome::Cancelled);
            }

            state.active = self.is_active(index_name).await?;

            tracing::debug!(
                target: TRACING_TARGET_POLLER,
                index = %state.index_name,
                cycle,
                active = state.active,
                elapsed_ms = state.elapsed.as_millis(),
                "Index status checked"
            );

            if state.active {
                tracing::info!(
                    target: TRACING_TARGET_POLLER,
                    index = %state.index_name,
                    cycle,
                    elapsed_ms = state.elapsed.as_millis(),
                    "Index is active"
                );
                return Ok(PollOutcome::Active);
            }

            if cycle + 1 < max_cycles {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {}
                    () = tokio::time::sleep(state.interval) => {}
                }
                state.advance();
            }
        }

        tracing::warn!(
            target: TRACING_TARGET_POLLER,
            index = %state.index_name,
            elapsed_ms = state.elapsed.as_millis(),
            "Index did not become active within the wait budget"
        );

        Ok(PollOutcome::TimedOut)
    }

    /// Performs a single status query for `index_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the index document has no
    /// boolean `active` field.
    pub async fn is_active(&self, index_name: &str) -> Result<bool> {
        let expr = Expr::get(Expr::index(index_name));
        let response = self.service.query(&expr).await?;
        response.require_bool("active")
    }
}
