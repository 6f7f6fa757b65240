use teloxide::types::{
    InlineKeyboardButton,
    InlineKeyboardMarkup,
    KeyboardButton,
    KeyboardMarkup,
    KeyboardRemove,
};

use crate::draft::{ CANCEL_TOKEN, CONFIRM_TOKEN, NO_TOKEN, YES_TOKEN };

// Main menu keyboard
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("🆕 Schedule Post", "schedule:once")],
        vec![InlineKeyboardButton::callback("🔁 Schedule Recurring", "schedule:recurring")],
        vec![InlineKeyboardButton::callback("📋 My Schedules", "menu:list")],
    ])
}

// Back to main menu button
pub fn back_to_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("⬅️ Back to Menu", "menu:main")],
    ])
}

// Reply keyboard for the yes/no decisions
pub fn yes_no() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(YES_TOKEN)],
        vec![KeyboardButton::new(NO_TOKEN)],
    ])
}

// Reply keyboard offered with the draft summary
pub fn confirm_cancel() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(CONFIRM_TOKEN)],
        vec![KeyboardButton::new(CANCEL_TOKEN)],
    ])
}

pub fn remove_reply_keyboard() -> KeyboardRemove {
    KeyboardRemove::new()
}
