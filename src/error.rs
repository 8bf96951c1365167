use crate::types::Slot;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    /// Time windows or granularity can't produce a consistent slot list
    #[error("Invalid time window configuration: {0}")]
    InvalidConfig(String),

    #[error("Not a valid HH:MM time of day: {0}")]
    InvalidTime(String),

    #[error("Booking is incomplete: {0}")]
    IncompleteBooking(String),

    #[error("Date {0} can't be booked")]
    DateNotBookable(NaiveDate),

    #[error("Timeslot {time} on {date} is not available")]
    SlotUnavailable { date: NaiveDate, time: Slot },

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("No webhook URL configured")]
    NotConfigured,

    #[error("Webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The webhook answered, but not with a success status
    #[error("Webhook rejected the notification (Status: {status})")]
    Rejected { status: u16 },
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Not a valid webhook URL: {0}")]
    InvalidWebhookUrl(String),

    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize settings: {0}")]
    Serialization(#[from] serde_json::Error),
}
