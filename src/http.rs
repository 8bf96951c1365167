use crate::backend::BookingBackend;
use crate::booking_service::BookingService;
use crate::configuration::Configuration;
use crate::error::{BookingError, NotificationError, SettingsError};
use crate::notifier::BookingNotifier;
use crate::settings::{Settings, SettingsRepository};
use crate::types::{Booking, BookingRequest, Slot, TimeWindowConfig, WebhookTestNotification};
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::{
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState<T: BookingBackend, C: Configuration> {
    booking_service: BookingService<T>,
    settings: Arc<dyn SettingsRepository>,
    notifier: Arc<dyn BookingNotifier>,
    configuration: C,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TimeslotsQuery {
    date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TimeWindowsResponse {
    time_windows: TimeWindowConfig,
    granularity_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WebhookSettingsRequest {
    webhook_url: String,
}

pub fn create_app<T: BookingBackend, C: Configuration>(
    backend: T,
    configuration: C,
    settings: Arc<dyn SettingsRepository>,
    notifier: Arc<dyn BookingNotifier>,
) -> Result<Router, BookingError> {
    let booking_service = BookingService::new(
        configuration.time_windows()?,
        configuration.granularity_minutes(),
        backend,
        notifier.clone(),
    )?;
    let state = AppState {
        booking_service,
        settings,
        notifier,
        configuration,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public: Router<AppState<T, C>> = Router::new()
        .route("/timeslots", get(get_timeslots::<T, C>))
        .route("/time_windows", get(get_time_windows::<T, C>))
        .route("/book", post(book_timeslot::<T, C>));

    let admin: Router<AppState<T, C>> = Router::new()
        .route("/bookings", get(get_bookings::<T, C>))
        .route("/settings/webhook", get(get_webhook::<T, C>).post(set_webhook::<T, C>))
        .route("/settings/webhook/test", post(test_webhook::<T, C>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth::<T, C>,
        ));

    Ok(Router::new()
        .merge(public)
        .merge(admin)
        .with_state(state)
        .layer(cors))
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BookingError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::InvalidTime(_)
            | BookingError::IncompleteBooking(_)
            | BookingError::DateNotBookable(_) => StatusCode::BAD_REQUEST,
            BookingError::SlotUnavailable { .. } => StatusCode::CONFLICT,
            BookingError::Notification(NotificationError::NotConfigured) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            BookingError::Notification(_) => StatusCode::BAD_GATEWAY,
            BookingError::Settings(SettingsError::InvalidWebhookUrl(_)) => StatusCode::BAD_REQUEST,
            BookingError::Settings(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

async fn admin_auth<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let Some(password) = request.headers().get("x-admin-password") else {
        return Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string()));
    };
    if password.as_bytes() != state.configuration.password().as_bytes() {
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()));
    }
    Ok(next.run(request).await)
}

/// All slots of a day, or only the free ones if a date is given.
async fn get_timeslots<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Query(query): Query<TimeslotsQuery>,
) -> Json<Vec<Slot>> {
    let timeslots = match query.date {
        Some(date) => state.booking_service.available_timeslots(date),
        None => state.booking_service.timeslots(),
    };
    Json(timeslots)
}

async fn get_time_windows<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> Json<TimeWindowsResponse> {
    Json(TimeWindowsResponse {
        time_windows: state.booking_service.time_windows(),
        granularity_minutes: state.booking_service.granularity_minutes(),
    })
}

async fn book_timeslot<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    request: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<Booking>, BookingError> {
    let Json(request) = request.map_err(|rejection| {
        warn!(%rejection, "Malformed booking request");
        BookingError::IncompleteBooking(rejection.body_text())
    })?;
    let today = Local::now().date_naive();
    let booking = state.booking_service.submit(request, today).await?;
    info!(id = %booking.id, "Timeslot booked successfully");
    Ok(Json(booking))
}

async fn get_bookings<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> Json<Vec<Booking>> {
    Json(state.booking_service.bookings())
}

async fn get_webhook<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> Json<Settings> {
    Json(Settings {
        webhook_url: state.settings.webhook_url(),
    })
}

async fn set_webhook<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Json(request): Json<WebhookSettingsRequest>,
) -> Result<(StatusCode, String), BookingError> {
    state
        .settings
        .set_webhook_url(request.webhook_url)
        .map_err(|err| {
            error!(%err, "Webhook URL not saved");
            BookingError::from(err)
        })?;
    Ok((StatusCode::OK, "Webhook URL saved".to_string()))
}

async fn test_webhook<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> Result<(StatusCode, String), BookingError> {
    state
        .notifier
        .send_test(&WebhookTestNotification::new(Utc::now()))
        .await?;
    Ok((StatusCode::OK, "Test notification sent".to_string()))
}
