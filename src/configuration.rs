use crate::{error::BookingError, types::TimeWindowConfig};
use std::path::PathBuf;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn password(&self) -> String;
    fn port(&self) -> String;
    fn time_windows(&self) -> Result<TimeWindowConfig, BookingError>;
    fn granularity_minutes(&self) -> u32;
    fn webhook_url(&self) -> Option<String>;
    fn settings_path(&self) -> Option<PathBuf>;
}
