pub mod handlers;
pub mod commands;
pub mod constants;
pub mod keyboards;
mod callbacks;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use teloxide::prelude::*;
use teloxide::dispatching::{ UpdateHandler, UpdateFilterExt };
use teloxide::utils::command::BotCommands;

use crate::config::Config;
use crate::db::ScheduleRepository;
use crate::draft::DraftFlow;
use crate::scheduler::Scheduler;

/// One in-flight dialogue per operator, keyed by Telegram user id.
pub type DialogueStorage = Arc<RwLock<HashMap<i64, DraftFlow>>>;

#[derive(Clone)]
pub struct BotState {
    pub store: Arc<ScheduleRepository>,
    pub scheduler: Scheduler,
    pub config: Arc<Config>,
    pub dialogue_storage: DialogueStorage,
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let command_handler = Update::filter_message()
        .filter_command::<commands::Command>()
        .endpoint(handlers::handle_command_dispatch);

    let callback_handler = Update::filter_callback_query()
        .endpoint(callbacks::handle_callback);

    // Plain text and media messages feed the active dialogue flow
    let message_handler = Update::filter_message()
        .filter(|msg: Message| {
            let is_command = msg.text().map(|t| t.starts_with('/')).unwrap_or(false);
            !is_command && (msg.text().is_some() || msg.photo().is_some() || msg.video().is_some())
        })
        .endpoint(callbacks::handle_flow_message);

    teloxide::dptree::entry()
        .branch(command_handler)
        .branch(callback_handler)
        .branch(message_handler)
}

pub async fn run_bot(
    bot_token: String,
    store: Arc<ScheduleRepository>,
    scheduler: Scheduler,
    config: Arc<Config>,
) {
    tracing::info!("Starting Telegram bot...");

    let bot = Bot::new(bot_token);

    // Set bot commands for slash menu
    if let Err(e) = bot.set_my_commands(commands::Command::bot_commands()).await {
        tracing::warn!("Failed to set bot commands: {}", e);
    }

    let dialogue_storage: DialogueStorage = Arc::new(RwLock::new(HashMap::new()));

    let state = Arc::new(BotState {
        store,
        scheduler,
        config,
        dialogue_storage,
    });

    Dispatcher::builder(bot, schema())
        .dependencies(teloxide::dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
