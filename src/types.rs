use crate::error::BookingError;
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

/// Format of the booking date inside webhook payloads.
pub const NOTIFICATION_DATE_FORMAT: &str = "%d/%m/%Y";

/// A bookable time of day with minute precision, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot(u16);

impl Slot {
    const MINUTES_PER_DAY: u32 = 24 * 60;

    /// Slot at a fixed time of day, meant for literals. Use `from_minutes`
    /// or `parse` for values that aren't known to be in range.
    pub const fn at(hour: u16, minute: u16) -> Self {
        assert!(hour < 24 && minute < 60, "time of day out of range");
        Self(hour * 60 + minute)
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes < Self::MINUTES_PER_DAY {
            Some(Self(minutes as u16))
        } else {
            None
        }
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.0.into()
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for Slot {
    type Err = BookingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map_err(|err| BookingError::InvalidTime(format!("{value:?} ({err})")))?;
        let minutes = time.num_seconds_from_midnight() / 60;
        Self::from_minutes(minutes).ok_or_else(|| BookingError::InvalidTime(value.into()))
    }
}

impl TryFrom<String> for Slot {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

/// Span of the day slots are generated from. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Slot,
    pub end: Slot,
}

impl TimeWindow {
    pub fn new(start: Slot, end: Slot) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindowConfig {
    pub morning: TimeWindow,
    pub afternoon: TimeWindow,
}

impl TimeWindowConfig {
    /// Builds the configuration from four `HH:MM` boundaries.
    pub fn parse(
        morning_start: &str,
        morning_end: &str,
        afternoon_start: &str,
        afternoon_end: &str,
    ) -> Result<Self, BookingError> {
        let parse = |value: &str| {
            value
                .parse::<Slot>()
                .map_err(|err| BookingError::InvalidConfig(err.to_string()))
        };

        Ok(Self {
            morning: TimeWindow::new(parse(morning_start)?, parse(morning_end)?),
            afternoon: TimeWindow::new(parse(afternoon_start)?, parse(afternoon_end)?),
        })
    }
}

impl Default for TimeWindowConfig {
    fn default() -> Self {
        Self {
            morning: TimeWindow::new(Slot::at(8, 0), Slot::at(12, 0)),
            afternoon: TimeWindow::new(Slot::at(13, 30), Slot::at(18, 0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: Slot,
    pub name: String,
}

impl Booking {
    pub fn new(date: NaiveDate, time: Slot, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            time,
            name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    #[validate(required(message = "a date has to be selected"))]
    pub date: Option<NaiveDate>,
    #[validate(required(message = "a time has to be selected"))]
    pub time: Option<Slot>,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("a name has to be entered".into());
        return Err(err);
    }
    Ok(())
}

/// Payload posted to the webhook for every confirmed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingNotification {
    pub name: String,
    pub date: String,
    pub time: String,
}

impl From<&Booking> for BookingNotification {
    fn from(booking: &Booking) -> Self {
        Self {
            name: booking.name.clone(),
            date: booking.date.format(NOTIFICATION_DATE_FORMAT).to_string(),
            time: booking.time.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTestNotification {
    pub test: bool,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl WebhookTestNotification {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            test: true,
            timestamp,
            message: "Test notification sent by slot_booker".into(),
        }
    }
}
