use crate::domain::command::{Action, Command};
use crate::transport::http::handlers::common::{
    error_response, form_from_body, mismatched, ok_response,
};
use crate::transport::http::types::{json_422, AddAdopterRequest, ApiResponse, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/adopters",
    responses(
        (status = 200, description = "All adopters ordered by id", body = ApiResponse)
    )
)]
pub async fn list_adopters_handler(State(state): State<AppState>) -> Response {
    let service = state.service.lock().await;
    match service.list_adopters().await {
        Ok(adopters) => ok_response(&adopters),
        Err(e) => error_response(Action::ViewAdopters, &e),
    }
}

#[utoipa::path(
    post,
    path = "/api/adopters",
    request_body = AddAdopterRequest,
    responses(
        (status = 200, description = "Adopter added; `data.adopter_id` is the new id", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn add_adopter_handler(
    State(state): State<AppState>,
    request: Result<Json<AddAdopterRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"name\", \"phone\", \"city\"}").into_response(),
    };
    let adopter = match form_from_body(&request)
        .and_then(|form| Command::parse(Action::AddAdopter, &form))
    {
        Ok(Command::AddAdopter(a)) => a,
        Ok(_) => return mismatched(Action::AddAdopter),
        Err(e) => return error_response(Action::AddAdopter, &e),
    };

    let service = state.service.lock().await;
    match service.add_adopter(&adopter).await {
        Ok(adopter_id) => ok_response(&serde_json::json!({
            "adopter_id": adopter_id,
            "message": "Adopter added successfully!"
        })),
        Err(e) => error_response(Action::AddAdopter, &e),
    }
}
