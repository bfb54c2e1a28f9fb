//! Service entry point: loads settings, mounts the form, and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use intake::domain::ports::{ChartSurface, SavedRecordRepository};
use intake::domain::{FormController, FormControllerConfig, FormControllerPorts};
use intake::inbound::http::health::HealthState;
use intake::outbound::geocoding::NominatimGeocoder;
use intake::outbound::memory::InMemorySavedRecordRepository;
use intake::outbound::postal_directory::ViaCepDirectory;
use intake::outbound::surfaces::{TracingChartSurface, TracingMapSurface};
use intake::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let lookup_timeout = settings.lookup_timeout().map_err(std::io::Error::other)?;

    let directory = ViaCepDirectory::new(
        settings.directory_base_url().map_err(std::io::Error::other)?,
        lookup_timeout,
        settings.user_agent(),
    )
    .map_err(std::io::Error::other)?;
    let geocoder = NominatimGeocoder::new(
        settings.geocoder_base_url().map_err(std::io::Error::other)?,
        lookup_timeout,
        settings.user_agent(),
    )
    .map_err(std::io::Error::other)?;

    let saved_records: Arc<dyn SavedRecordRepository> =
        Arc::new(InMemorySavedRecordRepository::default());
    let charts: Arc<dyn ChartSurface> = Arc::new(TracingChartSurface);
    let form = FormController::mount(
        FormControllerPorts {
            directory: Arc::new(directory),
            geocoder: Arc::new(geocoder),
            map_surface: Arc::new(TracingMapSurface),
            saved_records: saved_records.clone(),
        },
        FormControllerConfig { lookup_timeout },
    )
    .await
    .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, form, saved_records, charts);
    info!(%bind_addr, "starting intake server");
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
