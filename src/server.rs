//! HTTP server: JSON render API, WebSocket endpoint and the dashboard page

use actix_web::{middleware, web, App, Error, HttpRequest, HttpResponse, HttpServer};
use actix_web_actors::ws;
use log::{info, warn};
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::controls::RenderRequest;
use crate::dataset::Dataset;
use crate::messages::ServerMessage;
use crate::websocket::{AppState, DashboardWebSocket};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// WebSocket endpoint handler
async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let resp = ws::start(DashboardWebSocket::new(state), &req, stream)?;
    Ok(resp)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "records": state.dataset.len()
    }))
}

/// Platforms, year bounds and their defaults
async fn controls(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.controls)
}

/// Render the dashboard for a filter selection
async fn render_dashboard(state: web::Data<AppState>, request: web::Json<RenderRequest>) -> HttpResponse {
    match state.render(&request) {
        Ok(dashboard) => HttpResponse::Ok().json(dashboard),
        Err(e) => {
            warn!("Rejected render request {:?}: {}", request, e);
            HttpResponse::BadRequest().json(ServerMessage::Error { message: e.to_string() })
        }
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

/// Register all routes. `AppState` must be supplied as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .route("/api/controls", web::get().to(controls))
        .route("/api/render", web::post().to(render_dashboard))
        .route("/ws", web::get().to(ws_index));
}

/// Start the HTTP server over an already loaded dataset
pub async fn run_server(config: &ServerConfig, dataset: Arc<Dataset>) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(dataset));
    let (host, port) = (config.host.as_str(), config.port);

    info!(
        "Serving {} records from {} on http://{}:{}",
        state.dataset.len(),
        config.data_path.display(),
        host,
        port
    );
    info!("WebSocket: ws://{}:{}/ws", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            // CORS for development
            .wrap(
                actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await
}
