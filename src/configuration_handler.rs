use crate::{
    configuration::Configuration,
    error::BookingError,
    types::{TimeWindowConfig, DEFAULT_GRANULARITY_MINUTES},
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Books time slots and forwards them to a webhook")]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: String,

    /// Password expected in the x-admin-password header of admin requests
    #[arg(long, env = "ADMIN_PASSWORD")]
    password: String,

    #[arg(long, env = "MORNING_START", default_value = "08:00")]
    morning_start: String,

    #[arg(long, env = "MORNING_END", default_value = "12:00")]
    morning_end: String,

    #[arg(long, env = "AFTERNOON_START", default_value = "13:30")]
    afternoon_start: String,

    #[arg(long, env = "AFTERNOON_END", default_value = "18:00")]
    afternoon_end: String,

    /// Minutes between two consecutive slots, has to divide 60
    #[arg(short, long, env = "GRANULARITY", default_value_t = DEFAULT_GRANULARITY_MINUTES)]
    granularity: u32,

    /// Initial webhook URL, used until another one is saved
    #[arg(long, env = "WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Keep settings in this JSON file instead of in memory
    #[arg(long, env = "SETTINGS_PATH")]
    settings_path: Option<PathBuf>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn password(&self) -> String {
        self.password.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn time_windows(&self) -> Result<TimeWindowConfig, BookingError> {
        TimeWindowConfig::parse(
            &self.morning_start,
            &self.morning_end,
            &self.afternoon_start,
            &self.afternoon_end,
        )
    }

    fn granularity_minutes(&self) -> u32 {
        self.granularity
    }

    fn webhook_url(&self) -> Option<String> {
        self.webhook_url.clone()
    }

    fn settings_path(&self) -> Option<PathBuf> {
        self.settings_path.clone()
    }
}
