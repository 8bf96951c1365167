use crate::error::BookingError;
use crate::types::{Booking, Slot};
use chrono::NaiveDate;
use std::collections::HashSet;

pub trait BookingBackend: Clone + Send + Sync + 'static {
    /// All recorded bookings in the order they were made.
    fn bookings(&self) -> Vec<Booking>;
    fn booked_timeslots(&self, date: NaiveDate) -> HashSet<Slot>;
    fn add_booking(&self, booking: Booking) -> Result<(), BookingError>;
}
