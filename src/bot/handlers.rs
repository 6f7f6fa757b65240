use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::{ BotState, commands::Command, keyboards };
use crate::draft::{ DraftEvent, DraftStep };
use super::callbacks;
use super::constants::messages;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

// Handler for dispatcher-based command handling
pub async fn handle_command_dispatch(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> HandlerResult {
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0);

    // Allow-list guard runs before any dialogue state is touched
    if !state.config.is_admin(user_id) {
        bot.send_message(msg.chat.id, messages::ACCESS_DENIED).await?;
        return Ok(());
    }

    match cmd {
        Command::Start => handle_start(bot, msg).await,
        Command::Skip => handle_skip(bot, msg, user_id, state).await,
        Command::Cancel => handle_cancel(bot, msg, user_id, state).await,
    }
}

async fn handle_start(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, messages::WELCOME_TEXT)
        .parse_mode(ParseMode::Markdown)
        .await?;

    bot.send_message(msg.chat.id, messages::MENU_TITLE)
        .reply_markup(keyboards::main_menu())
        .await?;

    Ok(())
}

async fn handle_skip(
    bot: Bot,
    msg: Message,
    user_id: i64,
    state: Arc<BotState>,
) -> HandlerResult {
    let awaiting_media = {
        let storage = state.dialogue_storage.read().await;
        storage
            .get(&user_id)
            .map(|flow| flow.step == DraftStep::AwaitingMedia)
            .unwrap_or(false)
    };

    if !awaiting_media {
        bot.send_message(msg.chat.id, messages::NOTHING_TO_SKIP).await?;
        return Ok(());
    }

    callbacks::drive_flow(&bot, msg.chat.id, user_id, DraftEvent::SkipMedia, &state).await
}

async fn handle_cancel(
    bot: Bot,
    msg: Message,
    user_id: i64,
    state: Arc<BotState>,
) -> HandlerResult {
    let had_flow = {
        let mut storage = state.dialogue_storage.write().await;
        storage.remove(&user_id).is_some()
    };

    let reply = if had_flow { messages::CANCELLED } else { messages::NOTHING_TO_CANCEL };
    bot.send_message(msg.chat.id, reply)
        .reply_markup(keyboards::remove_reply_keyboard())
        .await?;

    bot.send_message(msg.chat.id, messages::MENU_TITLE)
        .reply_markup(keyboards::main_menu())
        .await?;

    Ok(())
}
