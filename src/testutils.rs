use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use chrono::NaiveDate;

use crate::{
    backend::BookingBackend,
    configuration_handler::ConfigurationHandler,
    error::BookingError,
    types::{Booking, Slot},
};

pub const TEST_PASSWORD: &str = "123";

pub struct MockBookingBackendInner {
    pub success: AtomicBool,
    pub calls_to_bookings: AtomicU64,
    pub calls_to_booked_timeslots: AtomicU64,
    pub calls_to_add_booking: AtomicU64,
    pub bookings: Mutex<Vec<Booking>>,
}

#[derive(Clone)]
pub struct MockBookingBackend(pub Arc<MockBookingBackendInner>);

impl MockBookingBackendInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_bookings: AtomicU64::default(),
            calls_to_booked_timeslots: AtomicU64::default(),
            calls_to_add_booking: AtomicU64::default(),
            bookings: Mutex::default(),
        }
    }
}

impl MockBookingBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockBookingBackendInner::new()))
    }
}

impl BookingBackend for MockBookingBackend {
    fn bookings(&self) -> Vec<Booking> {
        self.0.calls_to_bookings.fetch_add(1, Ordering::SeqCst);
        self.0.bookings.lock().unwrap().clone()
    }

    fn booked_timeslots(&self, date: NaiveDate) -> HashSet<Slot> {
        self.0
            .calls_to_booked_timeslots
            .fetch_add(1, Ordering::SeqCst);
        self.0
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|booking| booking.date == date)
            .map(|booking| booking.time)
            .collect()
    }

    fn add_booking(&self, booking: Booking) -> Result<(), BookingError> {
        self.0.calls_to_add_booking.fetch_add(1, Ordering::SeqCst);
        match self.0.success.load(Ordering::SeqCst) {
            true => {
                self.0.bookings.lock().unwrap().push(booking);
                Ok(())
            }
            false => Err(BookingError::SlotUnavailable {
                date: booking.date,
                time: booking.time,
            }),
        }
    }
}

/// Every option the app reads is passed explicitly, so environment
/// fallbacks can't leak into tests.
pub fn test_configuration() -> ConfigurationHandler {
    use clap::Parser;
    ConfigurationHandler::try_parse_from([
        "slot_booker",
        "--password",
        TEST_PASSWORD,
        "--morning-start",
        "08:00",
        "--morning-end",
        "12:00",
        "--afternoon-start",
        "13:30",
        "--afternoon-end",
        "18:00",
        "--granularity",
        "30",
        "--port",
        "3000",
    ])
    .unwrap()
}
