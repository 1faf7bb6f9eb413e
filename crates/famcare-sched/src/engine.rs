//! Scheduler engine
//!
//! One instance per process, constructed at startup and shared by
//! reference. Owns the registry and the timing loop; dispatch work is
//! handed to spawned tasks so a slow notification never delays other due
//! jobs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use famcare_core::{Reminder, ReminderStore};
use famcare_notify::{DispatchContext, Dispatcher};

use crate::recurrence::FireSchedule;
use crate::registry::{JobEntry, JobRegistry};
use crate::types::{RehydrateReport, Result, ScheduleOutcome, SchedulerError};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Timing-loop wake interval in seconds
    pub check_interval_secs: u64,
    /// Log each fire at info level
    pub logging_enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 30,
            logging_enabled: true,
        }
    }
}

impl SchedulerConfig {
    /// Create a new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timing-loop wake interval
    pub fn with_check_interval(mut self, secs: u64) -> Self {
        self.check_interval_secs = secs.max(1);
        self
    }

    /// Enable or disable per-fire logging
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }
}

/// Reminder scheduling engine
pub struct ReminderScheduler {
    registry: JobRegistry,
    store: Arc<dyn ReminderStore>,
    dispatcher: Arc<Dispatcher>,
    config: SchedulerConfig,
}

impl ReminderScheduler {
    /// Create a new engine over the given store and dispatcher
    pub fn new(
        store: Arc<dyn ReminderStore>,
        dispatcher: Arc<Dispatcher>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            registry: JobRegistry::new(),
            store,
            dispatcher,
            config,
        }
    }

    /// Register (or replace) the job for a reminder.
    ///
    /// Resolver failures are returned to the caller and leave the reminder
    /// unscheduled. Scheduling an existing id replaces its job; there is
    /// never more than one live job per reminder.
    pub async fn schedule(&self, reminder: &Reminder) -> Result<ScheduleOutcome> {
        self.schedule_at(reminder, Utc::now()).await
    }

    async fn schedule_at(
        &self,
        reminder: &Reminder,
        now: DateTime<Utc>,
    ) -> Result<ScheduleOutcome> {
        if !reminder.is_active {
            if self.registry.remove(reminder.id).await {
                info!(reminder_id = reminder.id, "descheduled inactive reminder");
            }
            return Ok(ScheduleOutcome::Inactive);
        }

        let schedule =
            FireSchedule::resolve(reminder).map_err(SchedulerError::InvalidReminder)?;

        let Some(next_fire_at) = schedule.next_after(now) else {
            // a replacement edit may have moved the reminder into the past;
            // its old job must still go away
            self.registry.remove(reminder.id).await;
            debug!(
                reminder_id = reminder.id,
                "no future occurrence, not scheduling"
            );
            return Ok(ScheduleOutcome::SkippedPast);
        };

        self.registry
            .put(JobEntry {
                reminder_id: reminder.id,
                schedule,
                next_fire_at,
                context: DispatchContext {
                    reminder_id: reminder.id,
                    subject_id: reminder.subject_id,
                    title: reminder.title.clone(),
                    notes: reminder.notes.clone(),
                },
            })
            .await;

        info!(
            reminder_id = reminder.id,
            frequency = %reminder.frequency,
            %next_fire_at,
            "reminder scheduled"
        );
        Ok(ScheduleOutcome::Scheduled { next_fire_at })
    }

    /// Remove the job for a reminder, if one is live
    pub async fn cancel(&self, reminder_id: i64) {
        if self.registry.remove(reminder_id).await {
            info!(reminder_id, "reminder cancelled");
        }
    }

    /// Rebuild schedule state from the store at process start.
    ///
    /// Runs once, before the API layer starts accepting scheduling calls.
    /// A reminder that fails to resolve is logged and skipped; it never
    /// aborts the rest of the batch. Store unavailability does abort, since
    /// nothing could be rehydrated.
    pub async fn rehydrate(&self) -> Result<RehydrateReport> {
        let reminders = self
            .store
            .active_reminders()
            .await
            .map_err(SchedulerError::Store)?;

        let mut report = RehydrateReport::default();
        for reminder in &reminders {
            match self.schedule(reminder).await {
                Ok(ScheduleOutcome::Scheduled { .. }) => report.scheduled += 1,
                Ok(_) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    error!(
                        reminder_id = reminder.id,
                        error = %e,
                        "skipping reminder during rehydration"
                    );
                }
            }
        }

        info!(
            scheduled = report.scheduled,
            skipped = report.skipped,
            failed = report.failed,
            "rehydration complete"
        );
        Ok(report)
    }

    /// Spawn the timing loop; the returned handle stops it
    pub fn start(self: Arc<Self>) -> SchedulerHandle {
        let token = CancellationToken::new();
        let loop_token = token.clone();
        let join = tokio::spawn(async move { self.run(loop_token).await });
        SchedulerHandle { token, join }
    }

    /// Run the timing loop until the token is cancelled
    pub async fn run(&self, shutdown: CancellationToken) {
        info!("reminder scheduler starting");
        let interval = Duration::from_secs(self.config.check_interval_secs.max(1));

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    self.fire_due(Utc::now()).await;
                }
                _ = shutdown.cancelled() => {
                    info!("reminder scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// Fire every job due at `now`; returns how many fired.
    ///
    /// Dispatch runs on spawned tasks. A dispatch failure is logged there
    /// and never touches the job's re-arming, which already happened when
    /// the entry was taken.
    async fn fire_due(&self, now: DateTime<Utc>) -> usize {
        let fired = self.registry.advance_due(now).await;
        let count = fired.len();

        for entry in fired {
            if self.config.logging_enabled {
                info!(reminder_id = entry.reminder_id, "reminder fired");
            }
            let dispatcher = Arc::clone(&self.dispatcher);
            let ctx = entry.context;
            tokio::spawn(async move {
                match dispatcher.dispatch(&ctx).await {
                    Ok(report) if report.failed > 0 => {
                        warn!(
                            reminder_id = ctx.reminder_id,
                            attempted = report.attempted,
                            failed = report.failed,
                            "dispatch finished with failures"
                        );
                    }
                    Ok(report) => {
                        debug!(
                            reminder_id = ctx.reminder_id,
                            attempted = report.attempted,
                            "dispatch finished"
                        );
                    }
                    Err(e) => {
                        error!(reminder_id = ctx.reminder_id, error = %e, "dispatch failed");
                    }
                }
            });
        }

        count
    }

    /// Number of live jobs
    pub async fn job_count(&self) -> usize {
        self.registry.len().await
    }

    /// Next fire instant for a reminder's live job, if any
    pub async fn next_fire_at(&self, reminder_id: i64) -> Option<DateTime<Utc>> {
        self.registry.get(reminder_id).await.map(|e| e.next_fire_at)
    }
}

/// Handle to a running timing loop
pub struct SchedulerHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the loop and wait for it to finish
    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.join.await {
            error!(error = %e, "scheduler loop join failed");
        }
    }
}

#[cfg(test)]
mod tests;
