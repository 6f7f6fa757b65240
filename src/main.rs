use std::sync::Arc;

use migration::MigratorTrait;
use postbot::db::ScheduleRepository;
use postbot::dispatcher::Dispatcher;
use postbot::reconciler::Reconciler;
use postbot::scheduler::Scheduler;
use postbot::transport::TelegramTransport;
use postbot::{ Config, Result };
use teloxide::Bot;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "postbot=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| postbot::AppError::Config(e.to_string()))?;
    let config = Arc::new(config);

    tracing::info!(
        "Starting postbot with timezone {} and {} operator(s)",
        config.timezone,
        config.admin_ids.len()
    );

    // Initialize database connection
    let db = sea_orm::Database::connect(&config.database_url).await?;

    tracing::info!("Database connected successfully");

    // Run migrations
    migration::Migrator::up(&db, None).await?;

    tracing::info!("Migrations completed successfully");

    let store = Arc::new(ScheduleRepository::new(db));
    let scheduler = Scheduler::new();

    let bot = Bot::new(config.telegram_bot_token.clone());
    let transport = Arc::new(TelegramTransport::new(bot));
    let dispatcher = Dispatcher::new(store.clone(), transport);

    // Rebuild timers from persisted records before accepting any input
    let reconciler = Reconciler::new(store.clone(), scheduler.clone());
    reconciler.run(chrono::Utc::now()).await?;

    // Single cooperative timer-dispatch loop
    tokio::spawn(scheduler.clone().run(dispatcher));

    postbot::bot::run_bot(
        config.telegram_bot_token.clone(),
        store,
        scheduler,
        config,
    ).await;

    Ok(())
}
