use crate::{
    backend::BookingBackend,
    error::BookingError,
    types::{Booking, Slot},
};
use chrono::NaiveDate;
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};
use tracing::{error, info};

/// Bookings held for the lifetime of the process. Nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct LocalBookings {
    bookings: Arc<Mutex<Vec<Booking>>>,
}

impl BookingBackend for LocalBookings {
    fn bookings(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }

    fn booked_timeslots(&self, date: NaiveDate) -> HashSet<Slot> {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|booking| booking.date == date)
            .map(|booking| booking.time)
            .collect()
    }

    fn add_booking(&self, booking: Booking) -> Result<(), BookingError> {
        let mut bookings = self.bookings.lock().unwrap();
        if bookings
            .iter()
            .any(|existing| existing.date == booking.date && existing.time == booking.time)
        {
            let err = BookingError::SlotUnavailable {
                date: booking.date,
                time: booking.time,
            };
            error!(%err, "Timeslot was already booked");
            return Err(err);
        }

        info!(id = %booking.id, date = %booking.date, time = %booking.time, "Booking recorded");
        bookings.push(booking);
        Ok(())
    }
}
