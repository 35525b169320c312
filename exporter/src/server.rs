//! Preview server for the api-files tree.
//!
//! Serves written artifacts with the same URL layout as the public file API,
//! so a build can be checked before the tree is uploaded.
//!
//! # API Endpoints
//!
//! | Method | Path                         | Description            |
//! |--------|------------------------------|------------------------|
//! | GET    | `/health`                    | Health check           |
//! | GET    | `/v1/files/<year>/events/…`  | Event artifacts        |
//! | GET    | `/v1/files/<year>/races/…`   | Race artifacts         |

use axum::{
    http::{header, Method},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::{net::SocketAddr, path::PathBuf};
use tower_http::{cors::CorsLayer, services::ServeDir};

/// Mount point of the api-files tree.
pub const FILES_PREFIX: &str = "/v1/files";

/// Routes for a given api-files root.
pub fn router(root: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .nest_service(FILES_PREFIX, ServeDir::new(root))
        .layer(cors)
}

/// Start the preview server.
pub async fn start_server(root: PathBuf, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 api-files preview running on http://localhost:{}", port);
    println!("   GET  {}/  - {}", FILES_PREFIX, root.display());
    println!("   GET  /health     - Health check");
    println!();

    let app = router(root);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "api-files",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "files": format!("GET {}/", FILES_PREFIX)
        }
    }))
}
