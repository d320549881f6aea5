use crate::transport::http::handlers::{adopters, adoptions, execute, health, pets};
use crate::transport::http::types::{
    ActionDescriptor, AddAdopterRequest, AddPetRequest, AdoptPetRequest, ApiResponse,
    ExecuteRequest, FieldDescriptor, UpdatePetNameRequest,
};
use axum::routing::{delete, get, post, put};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        execute::list_actions_handler,
        execute::execute_handler,
        pets::list_pets_handler,
        pets::search_pets_handler,
        pets::available_count_handler,
        pets::add_pet_handler,
        pets::update_pet_name_handler,
        pets::delete_pet_handler,
        adopters::list_adopters_handler,
        adopters::add_adopter_handler,
        adoptions::adopt_pet_handler,
        adoptions::adopted_report_handler
    ),
    components(schemas(
        ApiResponse,
        ExecuteRequest,
        ActionDescriptor,
        FieldDescriptor,
        AddPetRequest,
        UpdatePetNameRequest,
        AddAdopterRequest,
        AdoptPetRequest
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/actions", get(execute::list_actions_handler))
        .route("/api/execute", post(execute::execute_handler))
        .route(
            "/api/pets",
            get(pets::list_pets_handler).post(pets::add_pet_handler),
        )
        .route("/api/pets/search", get(pets::search_pets_handler))
        .route("/api/pets/available-count", get(pets::available_count_handler))
        .route("/api/pets/:pet_id", delete(pets::delete_pet_handler))
        .route("/api/pets/:pet_id/name", put(pets::update_pet_name_handler))
        .route(
            "/api/adopters",
            get(adopters::list_adopters_handler).post(adopters::add_adopter_handler),
        )
        .route("/api/adoptions", post(adoptions::adopt_pet_handler))
        .route("/api/reports/adopted", get(adoptions::adopted_report_handler))
        .with_state(app_state)
}

/// Serves `app` until `shutdown` resolves or serving fails, then closes the
/// shared session. A serve error is returned after the session is closed.
pub async fn serve_until<F>(
    listener: tokio::net::TcpListener,
    app: Router,
    state: &crate::transport::http::types::AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()>,
{
    let served = tokio::select! {
        result = axum::serve(listener, app) => result,
        _ = shutdown => Ok(()),
    };
    if let Err(e) = &served {
        tracing::error!(error = %e, "HTTP server stopped with an error");
    }
    state.service.lock().await.close().await;
    served
}
