//! Job registry - the process-wide table of live reminder jobs.
//!
//! One entry per reminder id. All mutation happens under a single coarse
//! lock; reminder volume in a household deployment is low enough that
//! finer-grained locking buys nothing. An entry's captured dispatch context
//! is cloned out before a fire runs, so a fire already in flight can never
//! be attributed to a replacement entry.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use famcare_notify::DispatchContext;

use crate::recurrence::FireSchedule;

/// A live scheduled job for one reminder
#[derive(Debug, Clone)]
pub struct JobEntry {
    /// Reminder id; the registry key
    pub reminder_id: i64,
    /// Resolved recurrence, used to re-arm after each fire
    pub schedule: FireSchedule,
    /// Next instant this job is due
    pub next_fire_at: DateTime<Utc>,
    /// Everything dispatch needs at fire time
    pub context: DispatchContext,
}

/// Table of live jobs, keyed by reminder id
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<i64, JobEntry>>,
}

impl JobRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a job, replacing any existing entry for the same reminder
    pub async fn put(&self, entry: JobEntry) {
        self.jobs.write().await.insert(entry.reminder_id, entry);
    }

    /// Remove a job if present; returns whether one existed
    pub async fn remove(&self, reminder_id: i64) -> bool {
        self.jobs.write().await.remove(&reminder_id).is_some()
    }

    /// Snapshot of one entry, for inspection
    pub async fn get(&self, reminder_id: i64) -> Option<JobEntry> {
        self.jobs.read().await.get(&reminder_id).cloned()
    }

    /// Number of live jobs
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether no jobs are live
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Take every entry due at `now`, re-arming recurring ones in place and
    /// dropping exhausted ones, all under one lock acquisition.
    ///
    /// Returns the fired entries as they were when they came due.
    pub(crate) async fn advance_due(&self, now: DateTime<Utc>) -> Vec<JobEntry> {
        let mut jobs = self.jobs.write().await;
        let mut fired = Vec::new();

        jobs.retain(|_, entry| {
            if entry.next_fire_at > now {
                return true;
            }
            fired.push(entry.clone());
            match entry.schedule.next_after(now) {
                Some(next) => {
                    entry.next_fire_at = next;
                    true
                }
                None => false,
            }
        });

        fired
    }
}
