use std::env;

use chrono_tz::Tz;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub admin_ids: Vec<i64>,
    pub timezone: Tz,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN")?;
        let database_url = env::var("DATABASE_URL")?;

        let admin_ids = Self::parse_admin_ids(&env::var("ADMIN_IDS")?)?;

        // All civil-time input from operators is interpreted in this timezone
        let timezone = env::var("TIMEZONE")
            .unwrap_or_else(|_| "America/Sao_Paulo".to_string())
            .parse::<Tz>()
            .map_err(|_| "TIMEZONE must be a valid IANA timezone name")?;

        Ok(Config {
            telegram_bot_token,
            database_url,
            admin_ids,
            timezone,
        })
    }

    fn parse_admin_ids(ids_str: &str) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
        let ids: Vec<i64> = ids_str
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<i64>())
            .collect::<Result<_, _>>()
            .map_err(|_| "ADMIN_IDS must be a comma-separated list of Telegram user ids")?;

        if ids.is_empty() {
            return Err("ADMIN_IDS cannot be empty".into());
        }

        Ok(ids)
    }

    /// Whether the given Telegram user is on the operator allow-list.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}
