use crate::backend::BookingBackend;
use crate::calendar::{Calendar, CalendarStore};
use crate::configuration::Configuration;
use crate::configuration_handler::ConfigurationHandler;
use crate::engine::BookingEngine;
use crate::http::start_server;
use clap::Parser;

mod backend;
mod calendar;
mod configuration;
mod configuration_handler;
mod engine;
mod filters;
mod http;
mod loader;
mod session;
#[cfg(test)]
mod testutils;
mod types;

#[derive(Clone)]
pub struct AppState<T: BookingBackend> {
    pub backend: T,
    pub admin_password: String,
    pub window_days: u32,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ConfigurationHandler::parse();
    let schedule_path = config.schedule_path();

    let calendar = if schedule_path.exists() {
        match loader::load_schedule(&schedule_path) {
            Ok(calendar) => calendar,
            Err(err) => {
                tracing::error!(%err, path = %schedule_path.display(), "cannot load schedule");
                std::process::exit(1);
            }
        }
    } else {
        tracing::info!(
            year = config.seed_year(),
            "schedule file missing, seeding a fresh year"
        );
        Calendar::seed(config.seed_year())
    };

    let engine = BookingEngine::new(CalendarStore::new(calendar));
    let state = AppState {
        backend: engine.clone(),
        admin_password: config.admin_password(),
        window_days: config.window_days(),
    };

    let server = tokio::spawn(start_server(state, config.bind_address()));

    tokio::signal::ctrl_c().await.unwrap();
    // snapshot the live calendar back to the file before exiting
    if let Err(err) = loader::save_schedule(&schedule_path, &engine.calendar().snapshot()) {
        tracing::error!(%err, "cannot save schedule");
    }
    server.abort();
}
