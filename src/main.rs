use std::{process::ExitCode, sync::Arc};

use crate::{
    configuration::Configuration,
    configuration_handler::ConfigurationHandler,
    http::create_app,
    local_bookings::LocalBookings,
    notifier::{BookingNotifier, WebhookNotifier},
    settings::{FileSettings, LocalSettings, SettingsRepository},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod backend;
mod booking_service;
mod configuration;
mod configuration_handler;
mod error;
mod http;
mod local_bookings;
mod notifier;
mod settings;
#[cfg(test)]
mod testutils;
mod timeslots;
mod types;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("###############");
    println!("# Slot Booker #");
    println!("###############");

    let configuration = ConfigurationHandler::parse_arguments();

    let settings: Arc<dyn SettingsRepository> = match configuration.settings_path() {
        Some(path) => match FileSettings::open(&path, configuration.webhook_url()) {
            Ok(settings) => {
                info!(path = %path.display(), "Using persistent settings");
                Arc::new(settings)
            }
            Err(err) => {
                error!(%err, "Failed to open settings file");
                return ExitCode::FAILURE;
            }
        },
        None => Arc::new(LocalSettings::new(configuration.webhook_url())),
    };
    if settings.webhook_url().is_none() {
        warn!("No webhook URL configured yet. Bookings fail until one is saved.");
    }

    let notifier: Arc<dyn BookingNotifier> = Arc::new(WebhookNotifier::new(settings.clone()));
    let backend = LocalBookings::default();

    let app = match create_app(backend, configuration.clone(), settings, notifier) {
        Ok(app) => app,
        Err(err) => {
            error!(%err, "Failed to set up booking service");
            return ExitCode::FAILURE;
        }
    };

    let address = format!("0.0.0.0:{}", configuration.port());
    println!("Accessible at:\n{}", address.clone());
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(?err, "Failed to bind {address}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = axum::serve(listener, app).await {
        error!(?err, "Server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
