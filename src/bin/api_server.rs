// src/bin/api_server.rs

use pet_shelter::infra::{config, logging};
use pet_shelter::transport;
use pet_shelter::ShelterService;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_env();
    logging::init();

    // --- Service Initialization ---
    let clear = config::clear_db();
    println!("> Connecting to database (CLEAR_DB={})...", clear);
    let (service, report) = ShelterService::connect(&config::database_url(), clear).await?;
    if !report.is_clean() {
        eprintln!(
            "> Schema setup finished with {} failed statement(s); continuing.",
            report.failures.len()
        );
    }
    let app_state = transport::http::AppState::new(service);
    println!("> ShelterService initialized successfully.");

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state.clone())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let bind_addr = config::bind_addr();
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            app_state.service.lock().await.close().await;
            return Err(e.into());
        }
    };
    println!("> API server listening on http://{}", bind_addr);
    println!("> Swagger UI available at http://{}/swagger-ui", bind_addr);

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n> Shutdown signal received (Ctrl+C)...");
        }
    };
    let served = transport::http::serve_until(listener, app, &app_state, shutdown).await;
    println!("> Database connection closed. Goodbye.");
    served?;
    Ok(())
}
