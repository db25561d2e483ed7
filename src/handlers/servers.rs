// src/handlers/servers.rs
use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;
use serde::Serialize;

use crate::fetch::Fetcher;
use crate::handlers::ServerListLimiter;
use crate::models::server::ServerRecord;
use crate::storage::DirectoryStore;
use crate::utils::{check_rate_limit, peer_ip, RequestError};

#[derive(Serialize)]
pub struct ServerListResponse {
    pub last_fetched: Option<u64>,
    pub servers: Vec<ServerRecord>,
}

pub async fn get_servers(
    fetcher: web::Data<Fetcher<dyn DirectoryStore>>,
    rate_limiter: web::Data<ServerListLimiter>,
    req: HttpRequest,
) -> Result<HttpResponse, RequestError> {
    let ip = peer_ip(&req)?;
    check_rate_limit(&rate_limiter.0, ip, "server list")?;

    let store = fetcher.store();
    let mut servers = store.servers();
    servers.sort_by(|a, b| a.name.cmp(&b.name).then(a.key().cmp(&b.key())));

    debug!("Building server list response with {} servers", servers.len());

    Ok(HttpResponse::Ok().json(ServerListResponse {
        last_fetched: store.fetch_log().last_fetched,
        servers,
    }))
}
