use crate::domain::command::{Action, FormInput};
use crate::transport::http::handlers::common::{error_response, run_action};
use crate::transport::http::types::{
    json_422, ActionDescriptor, ApiResponse, AppState, ExecuteRequest, FieldDescriptor,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/actions",
    responses(
        (status = 200, description = "Menu of actions and their form fields", body = [ActionDescriptor])
    )
)]
pub async fn list_actions_handler() -> impl IntoResponse {
    let actions: Vec<ActionDescriptor> = Action::ALL
        .iter()
        .map(|a| ActionDescriptor {
            key: a.key().to_string(),
            number: a.number(),
            label: a.label().to_string(),
            read_only: a.is_read_only(),
            fields: a
                .fields()
                .iter()
                .map(|f| FieldDescriptor {
                    key: f.key.to_string(),
                    label: f.label.to_string(),
                })
                .collect(),
        })
        .collect();
    Json(actions)
}

#[utoipa::path(
    post,
    path = "/api/execute",
    request_body = ExecuteRequest,
    responses(
        (status = 200, description = "Action executed; `data` holds the outcome", body = ApiResponse),
        (status = 400, description = "Unknown action or invalid input", body = ApiResponse),
        (status = 404, description = "Pet or adopter not found", body = ApiResponse),
        (status = 409, description = "Pet already adopted", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn execute_handler(
    State(state): State<AppState>,
    request: Result<Json<ExecuteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"action\": \"...\", \"fields\": {...}}").into_response();
        }
    };

    let Some(action) = Action::from_key(&request.action) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::err(format!("Unknown action '{}'", request.action))),
        )
            .into_response();
    };

    let form = match request.fields.as_ref() {
        Some(fields) => match FormInput::from_json(fields) {
            Ok(f) => f,
            Err(e) => return error_response(action, &e),
        },
        None => FormInput::new(),
    };

    run_action(&state, action, &form).await
}
