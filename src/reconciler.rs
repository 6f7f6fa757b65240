use std::sync::Arc;

use chrono::{ DateTime, Utc };

use crate::db::ScheduleStore;
use crate::enums::{ Interval, ScheduleKind };
use crate::error::Result;
use crate::scheduler::Scheduler;

/// Counts reported by a reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub rearmed: usize,
    pub removed: usize,
}

/// Rebuilds in-memory timers from durable records after a restart.
///
/// Runs exactly once, before the dispatch loop starts and before any
/// dialogue input is accepted, so a record can never be double-armed.
pub struct Reconciler<S> {
    store: Arc<S>,
    scheduler: Scheduler,
}

impl<S: ScheduleStore> Reconciler<S> {
    pub fn new(store: Arc<S>, scheduler: Scheduler) -> Self {
        Self { store, scheduler }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> Result<ReconcileReport> {
        tracing::info!("Reconciling persisted schedules");

        let mut report = ReconcileReport::default();

        for record in self.store.all().await? {
            let kind = match record.kind.parse::<ScheduleKind>() {
                Ok(kind) => kind,
                Err(_) => {
                    tracing::warn!("Schedule {} has unknown kind {:?}, removing", record.id, record.kind);
                    self.store.delete(record.id).await?;
                    report.removed += 1;
                    continue;
                }
            };

            match kind {
                ScheduleKind::OneShot => {
                    match record.fire_at {
                        Some(fire_at) if fire_at > now => {
                            match self.scheduler.arm_once(record.id, fire_at) {
                                Ok(()) => {
                                    report.rearmed += 1;
                                }
                                // Slipped past while reconciling; treat as elapsed
                                Err(_) => {
                                    self.store.delete(record.id).await?;
                                    report.removed += 1;
                                }
                            }
                        }
                        // A missed one-shot send is not retried
                        _ => {
                            self.store.delete(record.id).await?;
                            report.removed += 1;
                        }
                    }
                }
                ScheduleKind::Recurring => {
                    // Negative counters cannot fire; anything else still has
                    // sends remaining (0 = unbounded)
                    let sends_remaining = record.repetitions_remaining.map_or(true, |n| n >= 0);

                    let timing = record.start_at.zip(
                        record.interval.as_ref().and_then(|i| i.parse::<Interval>().ok())
                    );

                    match timing {
                        Some((start_at, every)) if sends_remaining => {
                            // The stored start is used verbatim; a past start
                            // fires immediately once the loop ticks
                            self.scheduler.arm_recurring(record.id, start_at, every);
                            report.rearmed += 1;
                        }
                        _ => {
                            tracing::warn!("Schedule {} has no usable timing, removing", record.id);
                            self.store.delete(record.id).await?;
                            report.removed += 1;
                        }
                    }
                }
            }
        }

        tracing::info!(
            "Reconciliation finished: {} re-armed, {} removed",
            report.rearmed,
            report.removed
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ recurring_record, one_shot_record, MemoryStore };
    use chrono::Duration;

    #[tokio::test]
    async fn test_future_one_shot_is_rearmed() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = Scheduler::new();
        let now = Utc::now();

        let record = one_shot_record(now + Duration::hours(1));
        let id = record.id;
        store.put(record);

        let report = Reconciler::new(store.clone(), scheduler.clone()).run(now).await.unwrap();

        assert_eq!(report, ReconcileReport { rearmed: 1, removed: 0 });
        assert!(scheduler.is_armed(id));
        assert!(store.record(id).is_some());
    }

    #[tokio::test]
    async fn test_elapsed_one_shot_is_deleted_without_sending() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = Scheduler::new();
        let now = Utc::now();

        let record = one_shot_record(now - Duration::hours(1));
        let id = record.id;
        store.put(record);

        let report = Reconciler::new(store.clone(), scheduler.clone()).run(now).await.unwrap();

        // Counted among removed, never re-armed; no dispatcher was involved
        assert_eq!(report, ReconcileReport { rearmed: 0, removed: 1 });
        assert!(!scheduler.is_armed(id));
        assert!(store.record(id).is_none());
    }

    #[tokio::test]
    async fn test_recurring_rearmed_with_stored_start_verbatim() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = Scheduler::new();
        let now = Utc::now();

        // Past start and bounded count: still re-armed as stored
        let bounded = recurring_record(now - Duration::days(1), "30m", 2);
        let bounded_id = bounded.id;
        store.put(bounded);

        // Unbounded recurring
        let unbounded = recurring_record(now + Duration::hours(1), "1d", 0);
        let unbounded_id = unbounded.id;
        store.put(unbounded);

        let report = Reconciler::new(store.clone(), scheduler.clone()).run(now).await.unwrap();

        assert_eq!(report, ReconcileReport { rearmed: 2, removed: 0 });
        assert!(scheduler.is_armed(bounded_id));
        assert!(scheduler.is_armed(unbounded_id));
    }

    #[tokio::test]
    async fn test_recurring_with_broken_interval_is_removed() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = Scheduler::new();
        let now = Utc::now();

        let mut record = recurring_record(now, "30m", 2);
        record.interval = Some("soon".to_string());
        let id = record.id;
        store.put(record);

        let report = Reconciler::new(store.clone(), scheduler.clone()).run(now).await.unwrap();

        assert_eq!(report, ReconcileReport { rearmed: 0, removed: 1 });
        assert!(store.record(id).is_none());
    }

    #[tokio::test]
    async fn test_reconciliation_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = Scheduler::new();
        let now = Utc::now();

        store.put(one_shot_record(now + Duration::hours(1)));
        store.put(one_shot_record(now - Duration::hours(1)));
        store.put(recurring_record(now, "1h", 0));

        let reconciler = Reconciler::new(store.clone(), scheduler.clone());

        let first = reconciler.run(now).await.unwrap();
        assert_eq!(first, ReconcileReport { rearmed: 2, removed: 1 });
        assert_eq!(scheduler.armed_count(), 2);

        // Re-running arms the same set and deletes nothing further
        let second = reconciler.run(now).await.unwrap();
        assert_eq!(second, ReconcileReport { rearmed: 2, removed: 0 });
        assert_eq!(scheduler.armed_count(), 2);
        assert_eq!(store.len(), 2);
    }
}
