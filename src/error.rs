use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")] Database(#[from] sea_orm::DbErr),

    #[error("Telegram error: {0}")] Telegram(#[from] teloxide::RequestError),

    #[error("Invalid input: {0}")] InvalidInput(String),

    #[error("Schedule not found")]
    ScheduleNotFound,

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
