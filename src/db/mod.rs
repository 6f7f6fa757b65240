use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
};
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::enums::{ Interval, MediaKind, ScheduleKind };
use crate::error::Result;

pub mod entity;
pub use entity::schedule::{ ButtonRow, LinkButton };

/// A finished schedule specification, ready to be persisted.
///
/// The store assigns the id and the creation timestamp.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub kind: ScheduleKind,
    pub owner_id: i64,
    pub target: String,
    pub text: String,
    pub media: Option<(MediaKind, String)>,
    pub buttons: Vec<LinkButton>,
    pub pin_after_send: bool,
    pub fire_at: Option<DateTime<Utc>>,
    pub start_at: Option<DateTime<Utc>>,
    pub interval: Option<Interval>,
    pub repetitions_remaining: Option<i32>,
}

/// Durable CRUD plus atomic counter decrement over schedule records.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn create(&self, new: NewSchedule) -> Result<entity::schedule::Model>;
    async fn get(&self, id: Uuid) -> Result<Option<entity::schedule::Model>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// Decrement `repetitions_remaining` by one, atomically at the store.
    async fn decrement_repetitions(&self, id: Uuid) -> Result<()>;
    async fn all(&self) -> Result<Vec<entity::schedule::Model>>;
    /// An operator's records, newest first.
    async fn by_owner(&self, owner_id: i64) -> Result<Vec<entity::schedule::Model>>;
}

pub struct ScheduleRepository {
    db: DatabaseConnection,
}

impl ScheduleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScheduleStore for ScheduleRepository {
    async fn create(&self, new: NewSchedule) -> Result<entity::schedule::Model> {
        let schedule = entity::schedule::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(new.kind.to_string()),
            owner_id: Set(new.owner_id),
            target: Set(new.target),
            text: Set(new.text),
            media_kind: Set(new.media.as_ref().map(|(kind, _)| kind.to_string())),
            media_ref: Set(new.media.map(|(_, reference)| reference)),
            buttons: Set(ButtonRow(new.buttons)),
            pin_after_send: Set(new.pin_after_send),
            fire_at: Set(new.fire_at),
            start_at: Set(new.start_at),
            interval: Set(new.interval.map(|i| i.to_string())),
            repetitions_remaining: Set(new.repetitions_remaining),
            created_at: Set(Utc::now()),
        };

        let schedule = schedule.insert(&self.db).await?;
        Ok(schedule)
    }

    async fn get(&self, id: Uuid) -> Result<Option<entity::schedule::Model>> {
        let schedule = entity::schedule::Entity::find_by_id(id).one(&self.db).await?;
        Ok(schedule)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        entity::schedule::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn decrement_repetitions(&self, id: Uuid) -> Result<()> {
        entity::schedule::Entity
            ::update_many()
            .col_expr(
                entity::schedule::Column::RepetitionsRemaining,
                Expr::col(entity::schedule::Column::RepetitionsRemaining).sub(1)
            )
            .filter(entity::schedule::Column::Id.eq(id))
            .exec(&self.db).await?;

        Ok(())
    }

    async fn all(&self) -> Result<Vec<entity::schedule::Model>> {
        let schedules = entity::schedule::Entity::find().all(&self.db).await?;
        Ok(schedules)
    }

    async fn by_owner(&self, owner_id: i64) -> Result<Vec<entity::schedule::Model>> {
        let schedules = entity::schedule::Entity
            ::find()
            .filter(entity::schedule::Column::OwnerId.eq(owner_id))
            .order_by_desc(entity::schedule::Column::CreatedAt)
            .all(&self.db).await?;

        Ok(schedules)
    }
}
