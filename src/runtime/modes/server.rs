//! Server mode
//!
//! 组装路由与中间件并启动 HTTP 服务。

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::constants::JSON_BODY_LIMIT;
use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware, UserAuth};
use crate::api::services::{AppStartTime, health_routes, public_card_routes, v1_routes};
use crate::runtime::lifetime;

/// 按 `server.cors_origins` 构建 CORS
///
/// 空列表为同源，`*` 为任意来源，否则逐个放行。
pub fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec!["Content-Type", "Authorization", "Accept", "X-Request-Id"])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let config = crate::config::get_config();
    let cors_origins = config.server.cors_origins.clone();
    if cors_origins.is_empty() {
        warn!("CORS: no origins configured, cross-origin requests are rejected");
    }

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let db_for_shutdown = startup.storage.get_db().clone();

    let storage = startup.storage.clone();
    let user_service = startup.user_service.clone();
    let card_service = startup.card_service.clone();
    let contact_service = startup.contact_service.clone();
    let analytics_service = startup.analytics_service.clone();
    let sharing_service = startup.sharing_service.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TimingMiddleware) // 最外层，记录请求延迟
            .wrap(RequestIdMiddleware)
            .wrap(build_cors(&cors_origins))
            .wrap(Compress::default())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(card_service.clone()))
            .app_data(web::Data::new(contact_service.clone()))
            .app_data(web::Data::new(analytics_service.clone()))
            .app_data(web::Data::new(sharing_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::JsonConfig::default().limit(JSON_BODY_LIMIT))
            .service(health_routes())
            .service(public_card_routes())
            .service(v1_routes().wrap(UserAuth))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
