use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Post Scheduler Bot Commands:")]
pub enum Command {
    #[command(description = "Start the bot and open the main menu")]
    Start,

    #[command(description = "Skip the media step while composing a post")]
    Skip,

    #[command(description = "Cancel the schedule you are composing")]
    Cancel,
}
