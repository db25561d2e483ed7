// src/handlers/refresh.rs
use actix_web::{web, HttpRequest, HttpResponse};
use log::info;

use crate::fetch::Fetcher;
use crate::handlers::RefreshLimiter;
use crate::storage::DirectoryStore;
use crate::utils::{check_rate_limit, peer_ip, RequestError};

/// Runs one fetch cycle on demand and returns its summary.
pub async fn refresh_servers(
    fetcher: web::Data<Fetcher<dyn DirectoryStore>>,
    rate_limiter: web::Data<RefreshLimiter>,
    req: HttpRequest,
) -> Result<HttpResponse, RequestError> {
    let ip = peer_ip(&req)?;
    check_rate_limit(&rate_limiter.0, ip, "refresh")?;

    info!("On-demand refresh requested by {}", ip);
    let summary = fetcher.run_fetch_cycle().await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, FetchConfig};
    use crate::handlers::servers::get_servers;
    use crate::handlers::ServerListLimiter;
    use crate::models::server::{DiscoveredCandidate, ServerRecord};
    use crate::storage::memory::MemoryStore;
    use actix_web::{http::StatusCode, test, App};
    use std::net::{Ipv4Addr, SocketAddr};
    use std::sync::Arc;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[actix_web::test]
    async fn refresh_without_masters_is_unavailable_and_rate_limited() {
        let store: Arc<dyn DirectoryStore> = Arc::new(MemoryStore::new());
        let fetcher = web::Data::from(Arc::new(Fetcher::new(store, FetchConfig::default())));
        let limiter = web::Data::new(RefreshLimiter::new(Config::default().refresh_quota()));

        let app = test::init_service(
            App::new()
                .app_data(fetcher)
                .app_data(limiter)
                .route("/server/refresh", web::post().to(refresh_servers)),
        )
        .await;

        let req = test::TestRequest::post().uri("/server/refresh").peer_addr(peer()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let req = test::TestRequest::post().uri("/server/refresh").peer_addr(peer()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn server_list_returns_directory() {
        let memory = Arc::new(MemoryStore::new());
        let candidate = DiscoveredCandidate { ip: Ipv4Addr::new(10, 0, 0, 1), port: 2000, players: 4 };
        memory.commit_sweep(vec![ServerRecord::placeholder(&candidate, None)], 77).unwrap();

        let store: Arc<dyn DirectoryStore> = memory;
        let fetcher = web::Data::from(Arc::new(Fetcher::new(store, FetchConfig::default())));
        let limiter = web::Data::new(ServerListLimiter::new(Config::default().server_list_quota()));

        let app = test::init_service(
            App::new()
                .app_data(fetcher)
                .app_data(limiter)
                .route("/server/", web::get().to(get_servers)),
        )
        .await;

        let req = test::TestRequest::get().uri("/server/").peer_addr(peer()).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["last_fetched"], 77);
        assert_eq!(body["servers"][0]["ip"], "10.0.0.1");
        assert_eq!(body["servers"][0]["players"], 4);
        assert_eq!(body["servers"][0]["name"], "Awaiting response");
        assert_eq!(body["servers"][0]["server_type"], "Mix");
    }
}
