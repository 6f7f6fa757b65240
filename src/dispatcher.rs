use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::{ entity::schedule, ScheduleStore };
use crate::enums::{ MediaKind, ScheduleKind };
use crate::error::Result;
use crate::scheduler::{ Dispatch, FireOutcome };
use crate::transport::Transport;

/// Loads a fired schedule, delivers it, and applies post-send bookkeeping.
pub struct Dispatcher<S, T> {
    store: Arc<S>,
    transport: Arc<T>,
}

impl<S: ScheduleStore, T: Transport> Dispatcher<S, T> {
    pub fn new(store: Arc<S>, transport: Arc<T>) -> Self {
        Self { store, transport }
    }

    async fn deliver(&self, record: &schedule::Model) -> Result<()> {
        let buttons = &record.buttons.0;

        let media = match (&record.media_kind, &record.media_ref) {
            (Some(kind), Some(reference)) => Some((kind.parse::<MediaKind>()?, reference.as_str())),
            _ => None,
        };

        let sent = match media {
            Some((MediaKind::Photo, reference)) => {
                self.transport.send_photo(&record.target, reference, &record.text, buttons).await?
            }
            Some((MediaKind::Video, reference)) => {
                self.transport.send_video(&record.target, reference, &record.text, buttons).await?
            }
            None => self.transport.send_text(&record.target, &record.text, buttons).await?,
        };

        if record.pin_after_send {
            if let Err(e) = self.transport.pin(&record.target, sent).await {
                tracing::warn!("Failed to pin message for schedule {}: {}", record.id, e);
            }
        }

        Ok(())
    }

    async fn apply_post_send(&self, record: &schedule::Model) -> Result<()> {
        match record.kind.parse::<ScheduleKind>()? {
            ScheduleKind::OneShot => self.store.delete(record.id).await,
            ScheduleKind::Recurring => {
                match record.repetitions_remaining {
                    // This was the last permitted send
                    Some(1) => self.store.delete(record.id).await,
                    Some(n) if n > 1 => self.store.decrement_repetitions(record.id).await,
                    // 0 means unbounded: the record is left untouched
                    Some(_) => Ok(()),
                    None => {
                        tracing::warn!(
                            "Recurring schedule {} has no repetition counter",
                            record.id
                        );
                        Ok(())
                    }
                }
            }
        }
    }
}

#[async_trait]
impl<S: ScheduleStore, T: Transport> Dispatch for Dispatcher<S, T> {
    async fn dispatch(&self, schedule_id: Uuid) -> FireOutcome {
        let record = match self.store.get(schedule_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!("Schedule {} no longer exists, dropping its timer", schedule_id);
                return FireOutcome::RecordGone;
            }
            Err(e) => {
                tracing::error!("Failed to load schedule {}: {}", schedule_id, e);
                return FireOutcome::Completed;
            }
        };

        match self.deliver(&record).await {
            Ok(()) => {
                tracing::info!("Delivered schedule {} to {}", record.id, record.target);
                if let Err(e) = self.apply_post_send(&record).await {
                    tracing::error!("Post-send bookkeeping failed for schedule {}: {}", record.id, e);
                }
            }
            // Delivery failures are logged and never retried; the record stays
            Err(e) => {
                tracing::error!("Failed to deliver schedule {}: {}", record.id, e);
            }
        }

        FireOutcome::Completed
    }
}
