use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use chrono_tz::Tz;

use crate::db::entity::schedule;
use crate::db::ScheduleStore;
use crate::draft::{ self, Draft, DraftEvent, DraftFlow, Outcome, Reply };
use crate::enums::{ Interval, MediaKind, ScheduleKind };
use super::{ BotState, keyboards };
use super::constants::messages;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<BotState>,
) -> HandlerResult {
    let user_id = q.from.id.0 as i64;

    if !state.config.is_admin(user_id) {
        bot.answer_callback_query(q.id.clone())
            .text(messages::ACCESS_DENIED)
            .show_alert(true)
            .await?;
        return Ok(());
    }

    // Answer callback to remove loading state
    bot.answer_callback_query(q.id.clone()).await?;

    let data = match q.data {
        Some(ref d) => d.as_str(),
        None => return Ok(()),
    };

    let chat_id = match q.message {
        Some(ref m) => m.chat().id,
        None => return Ok(()),
    };

    let message_id = match q.message {
        Some(ref m) => m.id(),
        None => return Ok(()),
    };

    match data {
        "schedule:once" => {
            start_flow(bot, chat_id, message_id, user_id, ScheduleKind::OneShot, state).await
        }
        "schedule:recurring" => {
            start_flow(bot, chat_id, message_id, user_id, ScheduleKind::Recurring, state).await
        }
        "menu:list" => show_schedules(bot, chat_id, message_id, user_id, state).await,
        "menu:main" => {
            bot.edit_message_text(chat_id, message_id, messages::MENU_TITLE)
                .reply_markup(keyboards::main_menu())
                .await?;
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn start_flow(
    bot: Bot,
    chat_id: ChatId,
    message_id: teloxide::types::MessageId,
    user_id: i64,
    kind: ScheduleKind,
    state: Arc<BotState>,
) -> HandlerResult {
    // A fresh flow supersedes any unfinished one from the same operator
    {
        let mut storage = state.dialogue_storage.write().await;
        storage.insert(user_id, DraftFlow::new(kind));
    }

    bot.edit_message_text(chat_id, message_id, messages::PROMPT_TARGET).await?;
    Ok(())
}

async fn show_schedules(
    bot: Bot,
    chat_id: ChatId,
    message_id: teloxide::types::MessageId,
    user_id: i64,
    state: Arc<BotState>,
) -> HandlerResult {
    let records = match state.store.by_owner(user_id).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list schedules for {}: {}", user_id, e);
            bot.edit_message_text(chat_id, message_id, messages::ERR_LIST_FAILED)
                .reply_markup(keyboards::back_to_menu())
                .await?;
            return Ok(());
        }
    };

    if records.is_empty() {
        bot.edit_message_text(chat_id, message_id, messages::LIST_EMPTY)
            .reply_markup(keyboards::back_to_menu())
            .await?;
        return Ok(());
    }

    let tz = state.config.timezone;
    let mut message = String::from(messages::LIST_HEADER);
    for record in &records {
        message.push_str(&format_schedule(record, tz));
    }

    bot.edit_message_text(chat_id, message_id, message)
        .parse_mode(ParseMode::Markdown)
        .reply_markup(keyboards::back_to_menu())
        .await?;

    Ok(())
}

fn format_schedule(record: &schedule::Model, tz: Tz) -> String {
    let mut item = format!("🆔 `{}`\n", record.id);
    item.push_str(&format!("▪️ Target: {}\n", record.target));

    match record.kind.parse::<ScheduleKind>() {
        Ok(ScheduleKind::OneShot) => {
            if let Some(at) = record.fire_at {
                item.push_str(&format!(
                    "🗓 Scheduled for: {}\n",
                    at.with_timezone(&tz).format(draft::TIME_FORMAT)
                ));
            }
        }
        Ok(ScheduleKind::Recurring) => {
            if let Some(at) = record.start_at {
                item.push_str(&format!(
                    "▶️ Starts at: {}\n",
                    at.with_timezone(&tz).format(draft::TIME_FORMAT)
                ));
            }
            if let Some(every) = &record.interval {
                item.push_str(&format!("⏳ Interval: every {}\n", every));
            }
            match record.repetitions_remaining {
                Some(0) => item.push_str("🔁 Repetitions left: unlimited\n"),
                Some(n) => item.push_str(&format!("🔁 Repetitions left: {}\n", n)),
                None => {}
            }
        }
        Err(_) => {}
    }

    item.push('\n');
    item
}

/// Handle plain text and media messages for the dialogue flow
pub async fn handle_flow_message(
    bot: Bot,
    msg: Message,
    state: Arc<BotState>,
) -> HandlerResult {
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0);

    if !state.config.is_admin(user_id) {
        bot.send_message(msg.chat.id, messages::ACCESS_DENIED).await?;
        return Ok(());
    }

    let Some(event) = extract_event(&msg) else {
        return Ok(());
    };

    drive_flow(&bot, msg.chat.id, user_id, event, &state).await
}

fn extract_event(msg: &Message) -> Option<DraftEvent> {
    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        return Some(DraftEvent::Media {
            kind: MediaKind::Photo,
            reference: photo.file.id.0.clone(),
        });
    }

    if let Some(video) = msg.video() {
        return Some(DraftEvent::Media {
            kind: MediaKind::Video,
            reference: video.file.id.0.clone(),
        });
    }

    msg.text().map(|t| DraftEvent::Text(t.to_string()))
}

/// Feed one event into the operator's flow and render the outcome.
pub(super) async fn drive_flow(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    event: DraftEvent,
    state: &Arc<BotState>,
) -> HandlerResult {
    let flow = {
        let mut storage = state.dialogue_storage.write().await;
        match storage.remove(&user_id) {
            Some(flow) => flow,
            // No active dialogue - ignore the message
            None => return Ok(()),
        }
    };

    match draft::advance(flow, event, state.config.timezone) {
        Outcome::Continue { flow, reply } => {
            let summary = matches!(reply, Reply::AskConfirmation)
                .then(|| flow.draft.summary(state.config.timezone));

            {
                let mut storage = state.dialogue_storage.write().await;
                storage.insert(user_id, flow);
            }

            send_reply(bot, chat_id, reply, summary).await
        }
        Outcome::Committed(draft) => commit_draft(bot, chat_id, user_id, draft, state).await,
        Outcome::Cancelled => {
            bot.send_message(chat_id, messages::CANCELLED)
                .reply_markup(keyboards::remove_reply_keyboard())
                .await?;
            bot.send_message(chat_id, messages::MENU_TITLE)
                .reply_markup(keyboards::main_menu())
                .await?;
            Ok(())
        }
    }
}

async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    reply: Reply,
    summary: Option<String>,
) -> HandlerResult {
    match reply {
        Reply::AskTarget => {
            bot.send_message(chat_id, messages::PROMPT_TARGET).await?;
        }
        Reply::AskMedia => {
            bot.send_message(chat_id, messages::PROMPT_MEDIA).await?;
        }
        Reply::AskText => {
            bot.send_message(chat_id, messages::PROMPT_TEXT)
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        Reply::AskButtonDecision => {
            bot.send_message(chat_id, messages::PROMPT_BUTTON_DECISION)
                .reply_markup(keyboards::yes_no())
                .await?;
        }
        Reply::AskButtonLabel => {
            bot.send_message(chat_id, messages::PROMPT_BUTTON_LABEL)
                .reply_markup(keyboards::remove_reply_keyboard())
                .await?;
        }
        Reply::AskButtonUrl => {
            bot.send_message(chat_id, messages::PROMPT_BUTTON_URL).await?;
        }
        Reply::AskPinDecision => {
            bot.send_message(chat_id, messages::PROMPT_PIN_DECISION)
                .reply_markup(keyboards::yes_no())
                .await?;
        }
        Reply::AskFireTime => {
            bot.send_message(chat_id, messages::PROMPT_FIRE_TIME)
                .reply_markup(keyboards::remove_reply_keyboard())
                .await?;
        }
        Reply::AskInterval => {
            bot.send_message(chat_id, messages::PROMPT_INTERVAL)
                .reply_markup(keyboards::remove_reply_keyboard())
                .await?;
        }
        Reply::AskRepetitions => {
            bot.send_message(chat_id, messages::PROMPT_REPETITIONS).await?;
        }
        Reply::AskStartTime => {
            bot.send_message(chat_id, messages::PROMPT_START_TIME).await?;
        }
        Reply::AskConfirmation => {
            if let Some(summary) = summary {
                bot.send_message(chat_id, summary).parse_mode(ParseMode::Markdown).await?;
            }
            bot.send_message(chat_id, messages::PROMPT_CONFIRMATION)
                .reply_markup(keyboards::confirm_cancel())
                .await?;
        }
        Reply::InvalidTime => {
            bot.send_message(chat_id, messages::ERR_INVALID_TIME).await?;
        }
        Reply::InvalidInterval => {
            bot.send_message(chat_id, messages::ERR_INVALID_INTERVAL).await?;
        }
        Reply::InvalidRepetitions => {
            bot.send_message(chat_id, messages::ERR_INVALID_REPETITIONS).await?;
        }
        Reply::ExpectedYesNo => {
            bot.send_message(chat_id, messages::ERR_EXPECTED_YES_NO)
                .reply_markup(keyboards::yes_no())
                .await?;
        }
        Reply::ExpectedConfirmation => {
            bot.send_message(chat_id, messages::ERR_EXPECTED_CONFIRMATION)
                .reply_markup(keyboards::confirm_cancel())
                .await?;
        }
    }

    Ok(())
}

/// Persist a confirmed draft and arm its timer.
///
/// The flow entry was already removed from the dialogue storage, so the
/// draft is discarded whether or not the store accepts it.
async fn commit_draft(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    draft: Draft,
    state: &Arc<BotState>,
) -> HandlerResult {
    let new = match draft.finish(user_id) {
        Ok(new) => new,
        Err(e) => {
            tracing::error!("Draft for {} was incomplete: {}", user_id, e);
            bot.send_message(chat_id, messages::ERR_SAVE_FAILED)
                .reply_markup(keyboards::remove_reply_keyboard())
                .await?;
            return Ok(());
        }
    };

    let record = match state.store.create(new).await {
        Ok(record) => record,
        Err(e) => {
            // No partial state is left behind; the operator recreates the schedule
            tracing::error!("Failed to save schedule for {}: {}", user_id, e);
            bot.send_message(chat_id, messages::ERR_SAVE_FAILED)
                .reply_markup(keyboards::remove_reply_keyboard())
                .await?;
            bot.send_message(chat_id, messages::MENU_TITLE)
                .reply_markup(keyboards::main_menu())
                .await?;
            return Ok(());
        }
    };

    match record.kind.parse::<ScheduleKind>() {
        Ok(ScheduleKind::OneShot) => {
            if let Some(fire_at) = record.fire_at {
                if let Err(e) = state.scheduler.arm_once(record.id, fire_at) {
                    // Already-elapsed fire times are swept at the next reconciliation
                    tracing::warn!("Could not arm schedule {}: {}", record.id, e);
                }
            }
        }
        Ok(ScheduleKind::Recurring) => {
            let every = record.interval.as_ref().and_then(|i| i.parse::<Interval>().ok());
            if let (Some(start_at), Some(every)) = (record.start_at, every) {
                state.scheduler.arm_recurring(record.id, start_at, every);
            }
        }
        Err(e) => {
            tracing::error!("Stored schedule {} has invalid kind: {}", record.id, e);
        }
    }

    bot.send_message(chat_id, messages::SUCCESS_CREATED)
        .reply_markup(keyboards::remove_reply_keyboard())
        .await?;
    bot.send_message(chat_id, messages::MENU_TITLE)
        .reply_markup(keyboards::main_menu())
        .await?;

    Ok(())
}
