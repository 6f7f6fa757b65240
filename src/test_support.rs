//! In-memory fakes shared by the scheduler, dispatcher, and reconciler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use uuid::Uuid;

use crate::db::entity::schedule;
use crate::db::{ ButtonRow, NewSchedule, ScheduleStore };
use crate::error::{ AppError, Result };
use crate::transport::{ MessageRef, Transport };

// ─── MemoryStore ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Uuid, schedule::Model>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, record: schedule::Model) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    pub fn record(&self, id: Uuid) -> Option<schedule::Model> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn create(&self, new: NewSchedule) -> Result<schedule::Model> {
        let record = schedule::Model {
            id: Uuid::new_v4(),
            kind: new.kind.to_string(),
            owner_id: new.owner_id,
            target: new.target,
            text: new.text,
            media_kind: new.media.as_ref().map(|(kind, _)| kind.to_string()),
            media_ref: new.media.map(|(_, reference)| reference),
            buttons: ButtonRow(new.buttons),
            pin_after_send: new.pin_after_send,
            fire_at: new.fire_at,
            start_at: new.start_at,
            interval: new.interval.map(|i| i.to_string()),
            repetitions_remaining: new.repetitions_remaining,
            created_at: Utc::now(),
        };

        self.put(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<schedule::Model>> {
        Ok(self.record(id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.records.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn decrement_repetitions(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).ok_or(AppError::ScheduleNotFound)?;
        record.repetitions_remaining = record.repetitions_remaining.map(|n| n - 1);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<schedule::Model>> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn by_owner(&self, owner_id: i64) -> Result<Vec<schedule::Model>> {
        let mut records: Vec<schedule::Model> = self.records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

// ─── RecordingTransport ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        target: String,
        text: String,
        buttons: usize,
    },
    Photo {
        target: String,
        reference: String,
        buttons: usize,
    },
    Video {
        target: String,
        reference: String,
        buttons: usize,
    },
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    pinned: Mutex<Vec<(String, MessageRef)>>,
    fail_sends: Mutex<bool>,
    fail_pins: Mutex<bool>,
    next_message_id: Mutex<i32>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn pinned(&self) -> Vec<(String, MessageRef)> {
        self.pinned.lock().unwrap().clone()
    }

    pub fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().unwrap() = fail;
    }

    pub fn fail_pins(&self, fail: bool) {
        *self.fail_pins.lock().unwrap() = fail;
    }

    fn record_send(&self, sent: Sent) -> Result<MessageRef> {
        if *self.fail_sends.lock().unwrap() {
            return Err(AppError::Internal("send failed".to_string()));
        }

        self.sent.lock().unwrap().push(sent);

        let mut next = self.next_message_id.lock().unwrap();
        *next += 1;
        Ok(MessageRef(*next))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(
        &self,
        target: &str,
        text: &str,
        buttons: &[crate::db::LinkButton]
    ) -> Result<MessageRef> {
        self.record_send(Sent::Text {
            target: target.to_string(),
            text: text.to_string(),
            buttons: buttons.len(),
        })
    }

    async fn send_photo(
        &self,
        target: &str,
        photo_ref: &str,
        _caption: &str,
        buttons: &[crate::db::LinkButton]
    ) -> Result<MessageRef> {
        self.record_send(Sent::Photo {
            target: target.to_string(),
            reference: photo_ref.to_string(),
            buttons: buttons.len(),
        })
    }

    async fn send_video(
        &self,
        target: &str,
        video_ref: &str,
        _caption: &str,
        buttons: &[crate::db::LinkButton]
    ) -> Result<MessageRef> {
        self.record_send(Sent::Video {
            target: target.to_string(),
            reference: video_ref.to_string(),
            buttons: buttons.len(),
        })
    }

    async fn pin(&self, target: &str, message: MessageRef) -> Result<()> {
        if *self.fail_pins.lock().unwrap() {
            return Err(AppError::Internal("pin failed".to_string()));
        }

        self.pinned.lock().unwrap().push((target.to_string(), message));
        Ok(())
    }
}

// ─── Record builders ─────────────────────────────────────────────────

pub fn one_shot_record(fire_at: DateTime<Utc>) -> schedule::Model {
    schedule::Model {
        id: Uuid::new_v4(),
        kind: "one_shot".to_string(),
        owner_id: 42,
        target: "@channel".to_string(),
        text: "hello".to_string(),
        media_kind: None,
        media_ref: None,
        buttons: ButtonRow::default(),
        pin_after_send: false,
        fire_at: Some(fire_at),
        start_at: None,
        interval: None,
        repetitions_remaining: None,
        created_at: Utc::now(),
    }
}

pub fn recurring_record(
    start_at: DateTime<Utc>,
    interval: &str,
    repetitions: i32
) -> schedule::Model {
    schedule::Model {
        id: Uuid::new_v4(),
        kind: "recurring".to_string(),
        owner_id: 42,
        target: "@channel".to_string(),
        text: "hello".to_string(),
        media_kind: None,
        media_ref: None,
        buttons: ButtonRow::default(),
        pin_after_send: false,
        fire_at: None,
        start_at: Some(start_at),
        interval: Some(interval.to_string()),
        repetitions_remaining: Some(repetitions),
        created_at: Utc::now(),
    }
}
