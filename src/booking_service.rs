use crate::{
    backend::BookingBackend,
    error::BookingError,
    notifier::BookingNotifier,
    timeslots::{available_timeslots, generate_timeslots},
    types::{Booking, BookingNotification, BookingRequest, Slot, TimeWindowConfig},
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info, warn};
use validator::Validate;

/// Runs a submission through the booking flow: date, then time, then name.
#[derive(Clone)]
pub struct BookingService<T: BookingBackend> {
    time_windows: TimeWindowConfig,
    granularity_minutes: u32,
    timeslots: Arc<Vec<Slot>>,
    backend: T,
    notifier: Arc<dyn BookingNotifier>,
}

impl<T: BookingBackend> BookingService<T> {
    /// Fails if the windows can't produce a consistent list of slots.
    pub fn new(
        time_windows: TimeWindowConfig,
        granularity_minutes: u32,
        backend: T,
        notifier: Arc<dyn BookingNotifier>,
    ) -> Result<Self, BookingError> {
        let timeslots = generate_timeslots(&time_windows, granularity_minutes)?;
        info!(count = timeslots.len(), granularity_minutes, "Generated timeslots");

        Ok(Self {
            time_windows,
            granularity_minutes,
            timeslots: Arc::new(timeslots),
            backend,
            notifier,
        })
    }

    pub fn time_windows(&self) -> TimeWindowConfig {
        self.time_windows
    }

    pub fn granularity_minutes(&self) -> u32 {
        self.granularity_minutes
    }

    pub fn timeslots(&self) -> Vec<Slot> {
        self.timeslots.to_vec()
    }

    pub fn available_timeslots(&self, date: NaiveDate) -> Vec<Slot> {
        available_timeslots(&self.timeslots, &self.backend.booked_timeslots(date))
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.backend.bookings()
    }

    /// Books a slot on a day after `today`.
    ///
    /// The webhook is notified before the booking is recorded. If the
    /// notification fails nothing is recorded and the error is returned.
    pub async fn submit(
        &self,
        request: BookingRequest,
        today: NaiveDate,
    ) -> Result<Booking, BookingError> {
        request.validate().map_err(|err| {
            warn!(%err, "Incomplete booking request");
            BookingError::IncompleteBooking(err.to_string())
        })?;

        let (Some(date), Some(time)) = (request.date, request.time) else {
            return Err(BookingError::IncompleteBooking(
                "date and time have to be selected".into(),
            ));
        };

        if date <= today {
            warn!(%date, "Booking for a past day or today requested");
            return Err(BookingError::DateNotBookable(date));
        }

        if !self.available_timeslots(date).contains(&time) {
            warn!(%date, %time, "Requested timeslot is not available");
            return Err(BookingError::SlotUnavailable { date, time });
        }

        let booking = Booking::new(date, time, request.name.trim().to_string());
        if let Err(err) = self
            .notifier
            .notify(&BookingNotification::from(&booking))
            .await
        {
            error!(%err, id = %booking.id, "Booking notification failed");
            return Err(err.into());
        }

        self.backend.add_booking(booking.clone())?;
        Ok(booking)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::NotificationError,
        local_bookings::LocalBookings,
        notifier::MockBookingNotifier,
    };
    use std::collections::HashSet;
    use test_case::test_case;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 3, 1).unwrap()
    }

    fn tomorrow() -> NaiveDate {
        today().succ_opt().unwrap()
    }

    fn request(date: NaiveDate, time: &str, name: &str) -> BookingRequest {
        BookingRequest {
            date: Some(date),
            time: Some(time.parse().unwrap()),
            name: name.into(),
        }
    }

    fn service(notifier: MockBookingNotifier) -> (BookingService<LocalBookings>, LocalBookings) {
        let backend = LocalBookings::default();
        let service = BookingService::new(
            TimeWindowConfig::default(),
            30,
            backend.clone(),
            Arc::new(notifier),
        )
        .unwrap();
        (service, backend)
    }

    fn succeeding_notifier(times: usize) -> MockBookingNotifier {
        let mut notifier = MockBookingNotifier::new();
        notifier.expect_notify().times(times).returning(|_| Ok(()));
        notifier
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let config = TimeWindowConfig::parse("12:00", "08:00", "13:30", "18:00").unwrap();
        let result = BookingService::new(
            config,
            30,
            LocalBookings::default(),
            Arc::new(MockBookingNotifier::new()),
        );
        assert!(matches!(result, Err(BookingError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_submit_booking() {
        let mut notifier = MockBookingNotifier::new();
        notifier
            .expect_notify()
            .withf(|notification| {
                notification.name == "Stefan"
                    && notification.date == "02/03/2030"
                    && notification.time == "14:00"
            })
            .times(1)
            .returning(|_| Ok(()));
        let (service, backend) = service(notifier);

        let booking = service
            .submit(request(tomorrow(), "14:00", "  Stefan "), today())
            .await
            .unwrap();

        assert_eq!(booking.name, "Stefan");
        assert_eq!(backend.bookings(), vec![booking]);
        assert_eq!(
            backend.booked_timeslots(tomorrow()),
            HashSet::from([Slot::at(14, 0)])
        );
    }

    #[tokio::test]
    async fn test_booked_timeslots_are_no_longer_available() {
        let (service, _) = service(succeeding_notifier(2));
        assert_eq!(service.available_timeslots(tomorrow()).len(), 17);

        service
            .submit(request(tomorrow(), "14:00", "Stefan"), today())
            .await
            .unwrap();
        service
            .submit(request(tomorrow(), "16:30", "Peter"), today())
            .await
            .unwrap();

        let available = service.available_timeslots(tomorrow());
        assert_eq!(available.len(), 15);
        assert!(!available.contains(&Slot::at(14, 0)));
        assert!(!available.contains(&Slot::at(16, 30)));

        let other_day = tomorrow().succ_opt().unwrap();
        assert_eq!(service.available_timeslots(other_day), service.timeslots());
    }

    #[tokio::test]
    async fn test_double_booking_is_rejected() {
        let (service, backend) = service(succeeding_notifier(1));

        service
            .submit(request(tomorrow(), "09:00", "Stefan"), today())
            .await
            .unwrap();
        let err = service
            .submit(request(tomorrow(), "09:00", "Peter"), today())
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::SlotUnavailable { .. }));
        assert_eq!(backend.bookings().len(), 1);
    }

    #[test_case("12:00" ; "end of morning window")]
    #[test_case("08:15" ; "between slots")]
    #[test_case("20:00" ; "outside of windows")]
    #[tokio::test]
    async fn test_unknown_timeslot_is_rejected(time: &str) {
        let (service, _) = service(succeeding_notifier(0));
        let err = service
            .submit(request(tomorrow(), time, "Stefan"), today())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::SlotUnavailable { .. }));
    }

    #[test_case(0 ; "today")]
    #[test_case(-1 ; "yesterday")]
    #[tokio::test]
    async fn test_past_dates_are_rejected(offset_days: i64) {
        let (service, _) = service(succeeding_notifier(0));
        let date = today() + chrono::Duration::days(offset_days);
        let err = service
            .submit(request(date, "09:00", "Stefan"), today())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::DateNotBookable(_)));
    }

    #[test_case(BookingRequest { date: None, time: Some(Slot::at(9, 0)), name: "Stefan".into() } ; "missing date")]
    #[test_case(BookingRequest { date: Some(tomorrow()), time: None, name: "Stefan".into() } ; "missing time")]
    #[test_case(BookingRequest { date: Some(tomorrow()), time: Some(Slot::at(9, 0)), name: " ".into() } ; "blank name")]
    #[tokio::test]
    async fn test_incomplete_requests_are_rejected(request: BookingRequest) {
        let (service, backend) = service(succeeding_notifier(0));
        let err = service.submit(request, today()).await.unwrap_err();
        assert!(matches!(err, BookingError::IncompleteBooking(_)));
        assert!(backend.bookings().is_empty());
    }

    #[tokio::test]
    async fn test_failed_notification_records_nothing() {
        let mut notifier = MockBookingNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_| Err(NotificationError::Rejected { status: 500 }));
        let (service, backend) = service(notifier);

        let err = service
            .submit(request(tomorrow(), "10:00", "Stefan"), today())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BookingError::Notification(NotificationError::Rejected { status: 500 })
        ));
        assert!(backend.bookings().is_empty());
        assert_eq!(service.available_timeslots(tomorrow()).len(), 17);
    }
}
