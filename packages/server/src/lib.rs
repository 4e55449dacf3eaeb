#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the deprivation map dashboard.
//!
//! Loads the geographic store once at startup and serves the domain
//! lists, the current selection, rendered figures, summary statistics,
//! and the mismatch table as JSON. There is a single selection state for
//! the whole process; every client sees and changes the same one.

mod handlers;
pub mod selection;

#[cfg(test)]
mod fixtures;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use depriv_map_domains::DomainRegistry;
use depriv_map_geography::loader::{self, DataPaths};
use depriv_map_geography::{GeoError, GeoStore};
use depriv_map_index_models::SelectionState;
use thiserror::Error;

/// Errors that can stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The data files could not be loaded.
    #[error("Failed to load data: {0}")]
    Geo(#[from] GeoError),

    /// Binding or running the HTTP server failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where to find the data and where to listen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Directory holding the two boundary files and the comparison CSV.
    pub data_dir: PathBuf,
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
}

/// Shared application state.
pub struct AppState {
    /// Immutable geographic tables.
    pub store: Arc<GeoStore>,
    /// Immutable domain tables.
    pub registry: Arc<DomainRegistry>,
    /// The one selection state, replaced whole by each event.
    pub selection: Mutex<SelectionState>,
}

impl AppState {
    /// State with the default selection.
    #[must_use]
    pub fn new(store: Arc<GeoStore>, registry: Arc<DomainRegistry>) -> Self {
        Self {
            store,
            registry,
            selection: Mutex::new(SelectionState::default()),
        }
    }

    /// Locks the selection state.
    ///
    /// Events swap in a fully built state, so a poisoned lock still holds
    /// a consistent value and is recovered.
    pub fn selection(&self) -> MutexGuard<'_, SelectionState> {
        self.selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the current selection, taken without holding the lock
    /// while rendering.
    #[must_use]
    pub fn snapshot(&self) -> SelectionState {
        self.selection().clone()
    }
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/domains", web::get().to(handlers::domains))
            .route("/domains/compare", web::get().to(handlers::compare_domains))
            .route("/selection", web::get().to(handlers::get_selection))
            .route("/selection", web::post().to(handlers::post_selection))
            .route("/map", web::get().to(handlers::map))
            .route("/compare", web::get().to(handlers::compare))
            .route("/stats", web::get().to(handlers::stats))
            .route("/mismatch", web::get().to(handlers::mismatch))
            .route("/mismatch/districts", web::get().to(handlers::mismatch_districts)),
    );
}

/// Loads the data and starts the HTTP server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError::Geo`] if the data files cannot be loaded and
/// [`ServerError::Io`] if the server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let registry = DomainRegistry::embedded();

    log::info!("Loading data from {}", config.data_dir.display());
    let store = loader::load(&DataPaths::in_dir(&config.data_dir), &registry)?;

    let state = web::Data::new(AppState::new(Arc::new(store), Arc::new(registry)));

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}
