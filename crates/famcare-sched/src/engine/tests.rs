
use super::*;

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Timelike};

use famcare_core::error::Result as CoreResult;
use famcare_core::{ContactAddresses, TimeOfDay};
use famcare_notify::{NotificationTransport, Result as NotifyResult};

struct StubStore {
    reminders: Vec<Reminder>,
    contacts: Option<ContactAddresses>,
}

#[async_trait]
impl ReminderStore for StubStore {
    async fn active_reminders(&self) -> CoreResult<Vec<Reminder>> {
        Ok(self.reminders.clone())
    }

    async fn reminder(&self, id: i64) -> CoreResult<Option<Reminder>> {
        Ok(self.reminders.iter().find(|r| r.id == id).cloned())
    }

    async fn contacts(&self, _subject_id: i64) -> CoreResult<Option<ContactAddresses>> {
        Ok(self.contacts.clone())
    }
}

struct FailingStore;

#[async_trait]
impl ReminderStore for FailingStore {
    async fn active_reminders(&self) -> CoreResult<Vec<Reminder>> {
        Err(famcare_core::Error::Store("connection refused".to_string()))
    }

    async fn reminder(&self, _id: i64) -> CoreResult<Option<Reminder>> {
        Err(famcare_core::Error::Store("connection refused".to_string()))
    }

    async fn contacts(&self, _subject_id: i64) -> CoreResult<Option<ContactAddresses>> {
        Err(famcare_core::Error::Store("connection refused".to_string()))
    }
}

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> NotifyResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }
}

struct TestRig {
    engine: Arc<ReminderScheduler>,
    transport: Arc<RecordingTransport>,
}

fn rig_with(reminders: Vec<Reminder>) -> TestRig {
    let store = Arc::new(StubStore {
        reminders,
        contacts: Some(ContactAddresses {
            subject_email: Some("kid@example.com".to_string()),
            guardian_email: None,
        }),
    });
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = Arc::new(Dispatcher::new(store.clone(), transport.clone()));
    let engine = Arc::new(ReminderScheduler::new(
        store,
        dispatcher,
        SchedulerConfig::new().with_check_interval(1),
    ));
    TestRig { engine, transport }
}

fn rig() -> TestRig {
    rig_with(Vec::new())
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, mo, d).unwrap()
}

fn reminder(id: i64, frequency: &str, start: NaiveDate, time: (u32, u32, u32)) -> Reminder {
    Reminder::new(
        id,
        3,
        "Medication",
        start,
        TimeOfDay::from_hms(time.0, time.1, time.2).unwrap(),
        frequency,
    )
}

async fn wait_for_sends(transport: &RecordingTransport, n: usize) {
    for _ in 0..100 {
        if transport.sent.lock().unwrap().len() >= n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("timed out waiting for {n} sends");
}

#[tokio::test]
async fn test_past_once_reminder_is_never_registered() {
    let rig = rig();
    let r = reminder(1, "Once", date(2026, 3, 2), (8, 0, 0));

    let outcome = rig
        .engine
        .schedule_at(&r, utc(2026, 3, 2, 9, 0, 0))
        .await
        .unwrap();

    assert_eq!(outcome, ScheduleOutcome::SkippedPast);
    assert_eq!(rig.engine.job_count().await, 0);
}

#[tokio::test]
async fn test_future_once_reminder_is_scheduled() {
    let rig = rig();
    let r = reminder(1, "Once", date(2026, 3, 2), (8, 0, 0));

    let outcome = rig
        .engine
        .schedule_at(&r, utc(2026, 3, 2, 7, 0, 0))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ScheduleOutcome::Scheduled {
            next_fire_at: utc(2026, 3, 2, 8, 0, 0)
        }
    );
    assert_eq!(rig.engine.job_count().await, 1);
}

#[tokio::test]
async fn test_schedule_is_idempotent() {
    let rig = rig();
    let r = reminder(1, "Daily", date(2026, 3, 2), (8, 0, 0));
    let now = utc(2026, 3, 2, 9, 0, 0);

    rig.engine.schedule_at(&r, now).await.unwrap();
    rig.engine.schedule_at(&r, now).await.unwrap();

    assert_eq!(rig.engine.job_count().await, 1);
    assert_eq!(
        rig.engine.next_fire_at(1).await,
        Some(utc(2026, 3, 3, 8, 0, 0))
    );
}

#[tokio::test]
async fn test_schedule_replaces_on_changed_time() {
    let rig = rig();
    let now = utc(2026, 3, 2, 9, 0, 0);

    let r = reminder(1, "Daily", date(2026, 3, 2), (8, 0, 0));
    rig.engine.schedule_at(&r, now).await.unwrap();

    let edited = reminder(1, "Daily", date(2026, 3, 2), (20, 0, 0));
    rig.engine.schedule_at(&edited, now).await.unwrap();

    // exactly one job, and only the new time remains observable
    assert_eq!(rig.engine.job_count().await, 1);
    assert_eq!(
        rig.engine.next_fire_at(1).await,
        Some(utc(2026, 3, 2, 20, 0, 0))
    );
}

#[tokio::test]
async fn test_schedule_rejects_unknown_frequency() {
    let rig = rig();
    let r = reminder(1, "hourly", date(2026, 3, 2), (8, 0, 0));

    let err = rig.engine.schedule(&r).await.unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidReminder(_)));
    assert_eq!(rig.engine.job_count().await, 0);
}

#[tokio::test]
async fn test_scheduling_inactive_reminder_removes_its_job() {
    let rig = rig();
    let now = utc(2026, 3, 2, 7, 0, 0);

    let r = reminder(1, "Daily", date(2026, 3, 2), (8, 0, 0));
    rig.engine.schedule_at(&r, now).await.unwrap();
    assert_eq!(rig.engine.job_count().await, 1);

    let outcome = rig
        .engine
        .schedule_at(&r.clone().with_active(false), now)
        .await
        .unwrap();

    assert_eq!(outcome, ScheduleOutcome::Inactive);
    assert_eq!(rig.engine.job_count().await, 0);
}

#[tokio::test]
async fn test_cancel_removes_the_job() {
    let rig = rig();
    let r = reminder(1, "Daily", date(2026, 3, 2), (8, 0, 0));
    rig.engine
        .schedule_at(&r, utc(2026, 3, 2, 7, 0, 0))
        .await
        .unwrap();

    rig.engine.cancel(1).await;
    assert_eq!(rig.engine.job_count().await, 0);

    // cancelling an unknown id is a no-op
    rig.engine.cancel(99).await;
}

#[tokio::test]
async fn test_daily_fire_rearms_for_the_next_day() {
    let rig = rig();
    let r = reminder(1, "Daily", date(2026, 3, 2), (8, 0, 0));
    rig.engine
        .schedule_at(&r, utc(2026, 3, 2, 9, 0, 0))
        .await
        .unwrap();
    assert_eq!(
        rig.engine.next_fire_at(1).await,
        Some(utc(2026, 3, 3, 8, 0, 0))
    );

    let fired = rig.engine.fire_due(utc(2026, 3, 3, 8, 0, 0)).await;
    assert_eq!(fired, 1);
    assert_eq!(
        rig.engine.next_fire_at(1).await,
        Some(utc(2026, 3, 4, 8, 0, 0))
    );

    wait_for_sends(&rig.transport, 1).await;
    let sent = rig.transport.sent.lock().unwrap().clone();
    assert_eq!(
        sent,
        vec![(
            "kid@example.com".to_string(),
            "Reminder: Medication".to_string()
        )]
    );
}

#[tokio::test]
async fn test_once_job_is_removed_after_firing() {
    let rig = rig();
    let r = reminder(1, "Once", date(2026, 3, 2), (8, 0, 0));
    rig.engine
        .schedule_at(&r, utc(2026, 3, 2, 7, 0, 0))
        .await
        .unwrap();

    let fired = rig.engine.fire_due(utc(2026, 3, 2, 8, 0, 0)).await;
    assert_eq!(fired, 1);
    assert_eq!(rig.engine.job_count().await, 0);

    // nothing left to fire later
    assert_eq!(rig.engine.fire_due(utc(2026, 3, 3, 8, 0, 0)).await, 0);
}

#[tokio::test]
async fn test_recurring_job_is_removed_past_its_end_date() {
    let rig = rig();
    let r = reminder(1, "Daily", date(2026, 3, 2), (8, 0, 0)).with_end_date(date(2026, 3, 3));
    rig.engine
        .schedule_at(&r, utc(2026, 3, 2, 9, 0, 0))
        .await
        .unwrap();

    let fired = rig.engine.fire_due(utc(2026, 3, 3, 8, 0, 0)).await;
    assert_eq!(fired, 1);
    assert_eq!(rig.engine.job_count().await, 0);
}

#[tokio::test]
async fn test_rehydrate_skips_unresolvable_reminders() {
    let good = reminder(1, "Daily", date(2026, 3, 2), (8, 0, 0));
    let bad = reminder(2, "every-full-moon", date(2026, 3, 2), (8, 0, 0));
    let rig = rig_with(vec![good, bad]);

    let report = rig.engine.rehydrate().await.unwrap();

    assert_eq!(report.scheduled, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(rig.engine.job_count().await, 1);
    assert!(rig.engine.next_fire_at(1).await.is_some());
}

#[tokio::test]
async fn test_rehydrate_counts_past_once_reminders_as_skipped() {
    // start date well in the past; the one-shot must not fire retroactively
    let past = reminder(1, "Once", date(2020, 1, 1), (8, 0, 0));
    let rig = rig_with(vec![past]);

    let report = rig.engine.rehydrate().await.unwrap();

    assert_eq!(report.scheduled, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(rig.engine.job_count().await, 0);
}

#[tokio::test]
async fn test_rehydrate_propagates_store_unavailability() {
    let store = Arc::new(FailingStore);
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = Arc::new(Dispatcher::new(store.clone(), transport));
    let engine = ReminderScheduler::new(store, dispatcher, SchedulerConfig::default());

    let err = engine.rehydrate().await.unwrap_err();
    assert!(matches!(err, SchedulerError::Store(_)));
}

#[tokio::test]
async fn test_loop_fires_and_stops() {
    let rig = rig();

    // a one-shot two seconds out, built against the real clock
    let target = Utc::now() + chrono::Duration::seconds(2);
    let r = Reminder::new(
        9,
        3,
        "Evening walk",
        target.date_naive(),
        TimeOfDay::from_hms(target.hour(), target.minute(), target.second()).unwrap(),
        "Once",
    );
    let outcome = rig.engine.schedule(&r).await.unwrap();
    assert!(matches!(outcome, ScheduleOutcome::Scheduled { .. }));

    let handle = rig.engine.clone().start();
    wait_for_sends(&rig.transport, 1).await;
    handle.stop().await;

    // the one-shot cleaned itself up
    assert_eq!(rig.engine.job_count().await, 0);
}
