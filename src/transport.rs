use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId,
    FileId,
    InlineKeyboardButton,
    InlineKeyboardMarkup,
    InputFile,
    MessageId,
    ParseMode,
    Recipient,
};

use crate::db::LinkButton;
use crate::error::{ AppError, Result };

/// Reference to a delivered message, needed to pin it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef(pub i32);

/// Outbound delivery seam between the dispatcher and Telegram.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(
        &self,
        target: &str,
        text: &str,
        buttons: &[LinkButton]
    ) -> Result<MessageRef>;

    async fn send_photo(
        &self,
        target: &str,
        photo_ref: &str,
        caption: &str,
        buttons: &[LinkButton]
    ) -> Result<MessageRef>;

    async fn send_video(
        &self,
        target: &str,
        video_ref: &str,
        caption: &str,
        buttons: &[LinkButton]
    ) -> Result<MessageRef>;

    async fn pin(&self, target: &str, message: MessageRef) -> Result<()>;
}

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Resolve an opaque target string to a Telegram recipient.
/// `@username` addresses a public channel, anything numeric a chat id.
fn resolve_target(target: &str) -> Result<Recipient> {
    let target = target.trim();

    if target.starts_with('@') {
        return Ok(Recipient::ChannelUsername(target.to_string()));
    }

    target
        .parse::<i64>()
        .map(|id| Recipient::Id(ChatId(id)))
        .map_err(|_| AppError::InvalidInput(format!("Invalid target chat: {}", target)))
}

/// Build the inline button row, one button per line.
fn button_markup(buttons: &[LinkButton]) -> Result<Option<InlineKeyboardMarkup>> {
    if buttons.is_empty() {
        return Ok(None);
    }

    let mut rows = Vec::with_capacity(buttons.len());
    for button in buttons {
        let url = reqwest::Url
            ::parse(&button.url)
            .map_err(|e| AppError::InvalidInput(format!("Invalid button URL {}: {}", button.url, e)))?;
        rows.push(vec![InlineKeyboardButton::url(button.label.clone(), url)]);
    }

    Ok(Some(InlineKeyboardMarkup::new(rows)))
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(
        &self,
        target: &str,
        text: &str,
        buttons: &[LinkButton]
    ) -> Result<MessageRef> {
        let recipient = resolve_target(target)?;

        let mut request = self.bot.send_message(recipient, text).parse_mode(ParseMode::Markdown);
        if let Some(markup) = button_markup(buttons)? {
            request = request.reply_markup(markup);
        }

        let sent = request.await?;
        Ok(MessageRef(sent.id.0))
    }

    async fn send_photo(
        &self,
        target: &str,
        photo_ref: &str,
        caption: &str,
        buttons: &[LinkButton]
    ) -> Result<MessageRef> {
        let recipient = resolve_target(target)?;

        let mut request = self.bot
            .send_photo(recipient, InputFile::file_id(FileId(photo_ref.to_string())))
            .caption(caption)
            .parse_mode(ParseMode::Markdown);
        if let Some(markup) = button_markup(buttons)? {
            request = request.reply_markup(markup);
        }

        let sent = request.await?;
        Ok(MessageRef(sent.id.0))
    }

    async fn send_video(
        &self,
        target: &str,
        video_ref: &str,
        caption: &str,
        buttons: &[LinkButton]
    ) -> Result<MessageRef> {
        let recipient = resolve_target(target)?;

        let mut request = self.bot
            .send_video(recipient, InputFile::file_id(FileId(video_ref.to_string())))
            .caption(caption)
            .parse_mode(ParseMode::Markdown);
        if let Some(markup) = button_markup(buttons)? {
            request = request.reply_markup(markup);
        }

        let sent = request.await?;
        Ok(MessageRef(sent.id.0))
    }

    async fn pin(&self, target: &str, message: MessageRef) -> Result<()> {
        let recipient = resolve_target(target)?;

        self.bot
            .pin_chat_message(recipient, MessageId(message.0))
            .disable_notification(true)
            .await?;

        Ok(())
    }
}
