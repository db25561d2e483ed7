// src/main.rs
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};
use std::sync::Arc;

use wos_directory::config::Config;
use wos_directory::fetch::Fetcher;
use wos_directory::handlers::{self, RefreshLimiter, ServerListLimiter};
use wos_directory::remote::fetch_remote_master;
use wos_directory::scheduler::run_periodic;
use wos_directory::storage::memory::MemoryStore;
use wos_directory::storage::DirectoryStore;

fn io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io_error(e)
    })?;

    let store = match &config.directory_path {
        Some(path) => MemoryStore::open(path).map_err(|e| {
            error!("Failed to open directory at {}: {}", path, e);
            io_error(e)
        })?,
        None => MemoryStore::new(),
    };
    let store = Arc::new(store);

    seed_masters(&store, &config).await?;

    let fetcher: Arc<Fetcher<dyn DirectoryStore>> =
        Arc::new(Fetcher::new(store.clone() as Arc<dyn DirectoryStore>, config.fetch.clone()));

    let scheduler = tokio::spawn(run_periodic(Arc::clone(&fetcher)));

    let fetcher_data = web::Data::from(fetcher);
    let server_list_limiter = web::Data::new(ServerListLimiter::new(config.server_list_quota()));
    let refresh_limiter = web::Data::new(RefreshLimiter::new(config.refresh_quota()));

    let bind = config.bind();
    info!("Starting server on {}", bind);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(fetcher_data.clone())
            .app_data(server_list_limiter.clone())
            .app_data(refresh_limiter.clone())
            .route("/server/", web::get().to(handlers::servers::get_servers))
            .route("/server/refresh", web::post().to(handlers::refresh::refresh_servers))
    })
    .bind(&bind)?
    .run();

    let result = server.await;
    scheduler.abort();
    result
}

/// Adds configured masters the store does not know yet, then the remote one.
async fn seed_masters(store: &MemoryStore, config: &Config) -> std::io::Result<()> {
    if store.snapshot().refresh_interval.is_none() {
        store.set_refresh_interval(config.refresh_interval_secs).map_err(io_error)?;
    }

    for master in &config.master_servers {
        if store.has_master(master.ip, master.port) {
            continue;
        }
        info!("Adding configured master server {}", master);
        store.add_master(master.clone()).map_err(io_error)?;
    }

    if let Some(url) = &config.master_config_url {
        let priority = store.masters().iter().map(|m| m.priority).max().unwrap_or(0) + 1;
        match fetch_remote_master(url, priority).await {
            Ok(Some(master)) if !store.has_master(master.ip, master.port) => {
                info!("Adding remote master server {}", master);
                store.add_master(master).map_err(io_error)?;
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to fetch master server config: {}", e),
        }
    }

    if store.active_masters().is_empty() {
        warn!("No active master server configured; fetch cycles will fail until one is added");
    }
    Ok(())
}
