use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{ Deserialize, Serialize };

/// One inline URL button rendered below a delivered post.
///
/// The URL is stored exactly as the operator typed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

/// Ordered button row, persisted as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ButtonRow(pub Vec<LinkButton>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: String, // "one_shot" or "recurring"
    pub owner_id: i64,
    pub target: String,
    pub text: String,
    pub media_kind: Option<String>, // "photo", "video", or null
    pub media_ref: Option<String>,
    pub buttons: ButtonRow,
    pub pin_after_send: bool,
    pub fire_at: Option<DateTimeUtc>,     // one-shot only
    pub start_at: Option<DateTimeUtc>,    // recurring only
    pub interval: Option<String>,         // recurring only, e.g. "30m", "12h", "1d"
    pub repetitions_remaining: Option<i32>, // recurring only, 0 = unbounded
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
