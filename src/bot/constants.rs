// Bot messages
pub mod messages {
    // Welcome / menu
    pub const WELCOME_TEXT: &str =
        "📣 *Post Scheduler Bot*\n\n\
        I deliver posts to your channels: once at a chosen time, or \
        repeatedly on a fixed interval.\n\n\
        Use the menu below to create a schedule or review the ones you have.";
    pub const MENU_TITLE: &str = "👇 Choose an option:";

    // Dialogue prompts
    pub const PROMPT_TARGET: &str =
        "Ok, let's create a schedule.\n\nFirst, send the id or @username of the destination channel.";
    pub const PROMPT_MEDIA: &str =
        "Target saved.\n\nNow send the photo or video. For a text-only post, use /skip.";
    pub const PROMPT_TEXT: &str =
        "Now type the text of the post. *Markdown* formatting is supported.";
    pub const PROMPT_BUTTON_DECISION: &str = "Text saved.\n\nDo you want to add a URL button?";
    pub const PROMPT_BUTTON_LABEL: &str = "Ok, send the label for the button.";
    pub const PROMPT_BUTTON_URL: &str =
        "Label saved.\n\nNow send the full URL (e.g. https://example.com).";
    pub const PROMPT_PIN_DECISION: &str = "Should this post be pinned in the channel?";
    pub const PROMPT_FIRE_TIME: &str =
        "Now send the date and time of the post in the format: DD/MM/YYYY HH:MM";
    pub const PROMPT_INTERVAL: &str =
        "Now set the interval. E.g. 30m, 12h, 1d (minutes, hours, days).";
    pub const PROMPT_REPETITIONS: &str =
        "Interval saved.\n\nHow many times should it repeat? (Type 0 for unlimited)";
    pub const PROMPT_START_TIME: &str =
        "Repetitions saved.\n\nWhat date and time should it start? (DD/MM/YYYY HH:MM)";
    pub const PROMPT_CONFIRMATION: &str = "Confirm the schedule?";

    // Format hints reissued on invalid input
    pub const ERR_INVALID_TIME: &str = "Invalid format. Try again: DD/MM/YYYY HH:MM";
    pub const ERR_INVALID_INTERVAL: &str =
        "Invalid interval. Use <number><unit>, e.g. 30m, 12h, 1d.";
    pub const ERR_INVALID_REPETITIONS: &str =
        "Invalid number. Send a non-negative integer (0 = unlimited).";
    pub const ERR_EXPECTED_YES_NO: &str = "Please answer with the keyboard: Yes or No.";
    pub const ERR_EXPECTED_CONFIRMATION: &str =
        "Please use the keyboard: ✅ Confirm or ❌ Cancel.";

    // Outcomes
    pub const SUCCESS_CREATED: &str = "✅ Schedule created successfully!";
    pub const ERR_SAVE_FAILED: &str = "❌ Something went wrong while saving. Please try again.";
    pub const ERR_LIST_FAILED: &str = "⚠️ Failed to load your schedules.";
    pub const CANCELLED: &str = "Operation cancelled.";
    pub const ACCESS_DENIED: &str = "🔒 Access denied!";
    pub const NOTHING_TO_SKIP: &str = "There is nothing to skip right now.";
    pub const NOTHING_TO_CANCEL: &str = "There is no schedule being composed.";

    // Listing
    pub const LIST_HEADER: &str = "📅 *Your Scheduled Posts*\n\n";
    pub const LIST_EMPTY: &str = "You don't have any scheduled posts yet.";
}
