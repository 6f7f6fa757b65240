use std::cmp::Ordering;
use std::collections::{ BinaryHeap, HashMap };
use std::sync::{ Arc, Mutex, MutexGuard };

use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use tokio::time::{ interval, Duration };
use uuid::Uuid;

use crate::enums::Interval;
use crate::error::{ AppError, Result };

/// What a fired dispatch observed about the underlying record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// The record was found; delivery and bookkeeping ran.
    Completed,
    /// The record no longer exists; the timer has nothing left to serve.
    RecordGone,
}

/// Invoked by the scheduler whenever an armed timer comes due.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, schedule_id: Uuid) -> FireOutcome;
}

struct TimerEntry {
    due: DateTime<Utc>,
    seq: u64,
    id: Uuid,
    generation: u64,
    repeat: Option<chrono::Duration>,
}

// BinaryHeap is a max-heap; order entries so the earliest due time pops first.
impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.due.cmp(&self.due).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

#[derive(Default)]
struct Registry {
    heap: BinaryHeap<TimerEntry>,
    /// Live generation per armed id; heap entries with a stale generation
    /// (disarmed or re-armed ids) are skipped lazily when they surface.
    live: HashMap<Uuid, u64>,
    next_seq: u64,
    next_generation: u64,
}

/// In-memory timer registry mapping schedule id to an armed timer.
///
/// All timers are evaluated by a single cooperative dispatch loop; the timer
/// itself carries no repetition count — remaining-send bookkeeping lives in
/// the record.
#[derive(Clone, Default)]
pub struct Scheduler {
    registry: Arc<Mutex<Registry>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn arm(&self, id: Uuid, due: DateTime<Utc>, repeat: Option<chrono::Duration>) {
        let mut registry = self.lock();

        registry.next_generation += 1;
        registry.next_seq += 1;
        let generation = registry.next_generation;
        let seq = registry.next_seq;

        registry.live.insert(id, generation);
        registry.heap.push(TimerEntry { due, seq, id, generation, repeat });
    }

    /// Register a single-fire timer. Errors if `fire_at` is not in the future.
    pub fn arm_once(&self, id: Uuid, fire_at: DateTime<Utc>) -> Result<()> {
        if fire_at <= Utc::now() {
            return Err(
                AppError::InvalidInput(format!("Fire time {} is not in the future", fire_at))
            );
        }

        self.arm(id, fire_at, None);
        Ok(())
    }

    /// Register a repeating timer. The first fire happens at `start_at` even
    /// if that is already past; later fires come every `every` after the
    /// previous fire, independent of dispatch duration.
    pub fn arm_recurring(&self, id: Uuid, start_at: DateTime<Utc>, every: Interval) {
        self.arm(id, start_at, Some(every.to_duration()));
    }

    /// Remove a timer. Disarming an unknown id is a no-op.
    pub fn disarm(&self, id: Uuid) {
        self.lock().live.remove(&id);
    }

    pub fn is_armed(&self, id: Uuid) -> bool {
        self.lock().live.contains_key(&id)
    }

    pub fn armed_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Fire every timer due at or before `now`, invoking the dispatcher
    /// synchronously, then reschedule recurring timers.
    pub async fn tick<D: Dispatch>(&self, now: DateTime<Utc>, dispatcher: &D) {
        loop {
            let entry = {
                let mut registry = self.lock();
                let due = registry.heap.peek().map_or(false, |entry| entry.due <= now);
                if due { registry.heap.pop() } else { None }
            };
            let Some(entry) = entry else {
                break;
            };

            {
                let registry = self.lock();
                if registry.live.get(&entry.id) != Some(&entry.generation) {
                    continue; // stale entry
                }
            }

            let outcome = dispatcher.dispatch(entry.id).await;

            let mut registry = self.lock();
            if registry.live.get(&entry.id) != Some(&entry.generation) {
                continue; // re-armed or disarmed while dispatching
            }

            match entry.repeat {
                // Single fire only
                None => {
                    registry.live.remove(&entry.id);
                }
                Some(step) => {
                    if outcome == FireOutcome::RecordGone {
                        registry.live.remove(&entry.id);
                    } else {
                        // The interval counts from this fire, not from the
                        // end of the dispatch.
                        registry.next_seq += 1;
                        let seq = registry.next_seq;
                        registry.heap.push(TimerEntry {
                            due: now + step,
                            seq,
                            id: entry.id,
                            generation: entry.generation,
                            repeat: Some(step),
                        });
                    }
                }
            }
        }
    }

    /// Single cooperative timer-dispatch loop; runs until the process exits.
    pub async fn run<D: Dispatch>(self, dispatcher: D) {
        let mut ticker = interval(Duration::from_secs(1));

        loop {
            ticker.tick().await;
            self.tick(Utc::now(), &dispatcher).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct RecordingDispatch {
        fired: StdMutex<Vec<Uuid>>,
        outcome: FireOutcome,
    }

    impl RecordingDispatch {
        fn new(outcome: FireOutcome) -> Self {
            Self { fired: StdMutex::new(Vec::new()), outcome }
        }

        fn fired(&self) -> Vec<Uuid> {
            self.fired.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Dispatch for RecordingDispatch {
        async fn dispatch(&self, schedule_id: Uuid) -> FireOutcome {
            self.fired.lock().unwrap().push(schedule_id);
            self.outcome
        }
    }

    fn minutes(value: u32) -> Interval {
        Interval { value, unit: crate::enums::IntervalUnit::Minutes }
    }

    #[test]
    fn test_arm_once_rejects_past_fire_time() {
        let scheduler = Scheduler::new();
        let id = Uuid::new_v4();

        let result = scheduler.arm_once(id, Utc::now() - chrono::Duration::seconds(1));
        assert!(result.is_err());
        assert!(!scheduler.is_armed(id));
    }

    #[tokio::test]
    async fn test_one_shot_fires_once_then_disarms() {
        let scheduler = Scheduler::new();
        let dispatcher = RecordingDispatch::new(FireOutcome::Completed);
        let id = Uuid::new_v4();

        let fire_at = Utc::now() + chrono::Duration::minutes(5);
        scheduler.arm_once(id, fire_at).unwrap();

        // Not yet due
        scheduler.tick(fire_at - chrono::Duration::seconds(1), &dispatcher).await;
        assert!(dispatcher.fired().is_empty());
        assert!(scheduler.is_armed(id));

        scheduler.tick(fire_at, &dispatcher).await;
        assert_eq!(dispatcher.fired(), vec![id]);
        assert!(!scheduler.is_armed(id));

        // A later tick does not fire it again
        scheduler.tick(fire_at + chrono::Duration::minutes(10), &dispatcher).await;
        assert_eq!(dispatcher.fired().len(), 1);
    }

    #[tokio::test]
    async fn test_recurring_past_start_fires_immediately_then_keeps_cadence() {
        let scheduler = Scheduler::new();
        let dispatcher = RecordingDispatch::new(FireOutcome::Completed);
        let id = Uuid::new_v4();

        let now = Utc::now();
        scheduler.arm_recurring(id, now - chrono::Duration::hours(2), minutes(30));

        // One catch-up fire, not one per missed occurrence
        scheduler.tick(now, &dispatcher).await;
        assert_eq!(dispatcher.fired().len(), 1);

        scheduler.tick(now + chrono::Duration::minutes(29), &dispatcher).await;
        assert_eq!(dispatcher.fired().len(), 1);

        scheduler.tick(now + chrono::Duration::minutes(30), &dispatcher).await;
        assert_eq!(dispatcher.fired().len(), 2);
        assert!(scheduler.is_armed(id));
    }

    #[tokio::test]
    async fn test_recurring_dropped_when_record_gone() {
        let scheduler = Scheduler::new();
        let dispatcher = RecordingDispatch::new(FireOutcome::RecordGone);
        let id = Uuid::new_v4();

        let now = Utc::now();
        scheduler.arm_recurring(id, now, minutes(1));

        scheduler.tick(now, &dispatcher).await;
        assert_eq!(dispatcher.fired().len(), 1);
        assert!(!scheduler.is_armed(id));

        scheduler.tick(now + chrono::Duration::minutes(5), &dispatcher).await;
        assert_eq!(dispatcher.fired().len(), 1);
    }

    #[tokio::test]
    async fn test_disarm_is_idempotent() {
        let scheduler = Scheduler::new();
        let dispatcher = RecordingDispatch::new(FireOutcome::Completed);
        let id = Uuid::new_v4();

        scheduler.disarm(id); // unknown id is a no-op

        let now = Utc::now();
        scheduler.arm_recurring(id, now, minutes(1));
        scheduler.disarm(id);
        scheduler.disarm(id);
        assert!(!scheduler.is_armed(id));

        scheduler.tick(now + chrono::Duration::minutes(2), &dispatcher).await;
        assert!(dispatcher.fired().is_empty());
    }

    #[tokio::test]
    async fn test_rearm_replaces_previous_timer() {
        let scheduler = Scheduler::new();
        let dispatcher = RecordingDispatch::new(FireOutcome::Completed);
        let id = Uuid::new_v4();

        let first = Utc::now() + chrono::Duration::minutes(1);
        let second = Utc::now() + chrono::Duration::minutes(2);
        scheduler.arm_once(id, first).unwrap();
        scheduler.arm_once(id, second).unwrap();
        assert_eq!(scheduler.armed_count(), 1);

        scheduler.tick(second + chrono::Duration::seconds(1), &dispatcher).await;
        // The stale first entry is skipped; only the replacement fires
        assert_eq!(dispatcher.fired(), vec![id]);
    }

    #[tokio::test]
    async fn test_due_timers_fire_in_order() {
        let scheduler = Scheduler::new();
        let dispatcher = RecordingDispatch::new(FireOutcome::Completed);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let now = Utc::now();
        scheduler
            .arm_once(second, now + chrono::Duration::minutes(2))
            .unwrap();
        scheduler
            .arm_once(first, now + chrono::Duration::minutes(1))
            .unwrap();

        scheduler.tick(now + chrono::Duration::minutes(3), &dispatcher).await;
        assert_eq!(dispatcher.fired(), vec![first, second]);
    }
}
