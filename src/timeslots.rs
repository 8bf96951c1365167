use crate::{
    error::BookingError,
    types::{Slot, TimeWindow, TimeWindowConfig},
};
use std::collections::HashSet;

/// Generates the bookable slots of a day, morning window first.
///
/// Each window yields `start`, `start + granularity`, ... as long as the slot
/// lies strictly before the window's end. A window with `start == end`
/// contributes nothing.
pub fn generate_timeslots(
    config: &TimeWindowConfig,
    granularity_minutes: u32,
) -> Result<Vec<Slot>, BookingError> {
    validate_config(config, granularity_minutes)?;

    let mut timeslots = window_timeslots(&config.morning, granularity_minutes);
    timeslots.extend(window_timeslots(&config.afternoon, granularity_minutes));
    Ok(timeslots)
}

/// Returns `all` without the slots in `booked`, keeping the original order.
pub fn available_timeslots(all: &[Slot], booked: &HashSet<Slot>) -> Vec<Slot> {
    all.iter()
        .filter(|slot| !booked.contains(slot))
        .copied()
        .collect()
}

fn window_timeslots(window: &TimeWindow, granularity_minutes: u32) -> Vec<Slot> {
    let end = window.end.minutes_since_midnight();
    (window.start.minutes_since_midnight()..end)
        .step_by(granularity_minutes as usize)
        .filter_map(Slot::from_minutes)
        .collect()
}

fn validate_config(config: &TimeWindowConfig, granularity_minutes: u32) -> Result<(), BookingError> {
    if granularity_minutes == 0 || 60 % granularity_minutes != 0 {
        return Err(BookingError::InvalidConfig(format!(
            "granularity of {granularity_minutes} minutes does not divide an hour"
        )));
    }

    for (name, window) in [("morning", &config.morning), ("afternoon", &config.afternoon)] {
        if window.end < window.start {
            return Err(BookingError::InvalidConfig(format!(
                "{name} window ends ({}) before it starts ({})",
                window.end, window.start
            )));
        }
    }

    if config.afternoon.start < config.morning.end {
        return Err(BookingError::InvalidConfig(format!(
            "afternoon window starts ({}) before the morning window ends ({})",
            config.afternoon.start, config.morning.end
        )));
    }
    Ok(())
}
