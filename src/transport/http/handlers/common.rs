use crate::app::outcome::Notice;
use crate::app::shelter_service::failure_title;
use crate::domain::command::{Action, Command, FormInput};
use crate::domain::error::ShelterError;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub fn status_for(err: &ShelterError) -> StatusCode {
    match err {
        ShelterError::Validation(_) => StatusCode::BAD_REQUEST,
        ShelterError::PetNotFound(_) | ShelterError::AdopterNotFound(_) => StatusCode::NOT_FOUND,
        ShelterError::AlreadyAdopted(_) => StatusCode::CONFLICT,
        ShelterError::ConnectionUnavailable | ShelterError::Connect(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ShelterError::Statement(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error body: the message in `error`, the titled notice in `data`.
pub fn error_response(action: Action, err: &ShelterError) -> Response {
    let notice = Notice::from_error(failure_title(action, err), err);
    (
        status_for(err),
        Json(ApiResponse {
            success: false,
            data: serde_json::to_value(notice).ok(),
            error: Some(err.to_string()),
        }),
    )
        .into_response()
}

pub fn ok_response<T: Serialize>(data: &T) -> Response {
    match serde_json::to_value(data) {
        Ok(v) => (StatusCode::OK, Json(ApiResponse::ok(v))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::err(format!("Failed to serialize response: {}", e))),
        )
            .into_response(),
    }
}

/// Re-reads a typed request body as raw form fields.
pub fn form_from_body<T: Serialize>(body: &T) -> Result<FormInput, ShelterError> {
    let value = serde_json::to_value(body)
        .map_err(|e| ShelterError::validation(format!("Invalid request body: {}", e)))?;
    FormInput::from_json(&value)
}

/// Response for a command that parsed into a different action's variant.
pub fn mismatched(action: Action) -> Response {
    error_response(
        action,
        &ShelterError::validation(format!("Unexpected command for '{}'", action.key())),
    )
}

/// Parses `form` for `action`; on failure returns the ready-made 400 response.
pub fn parse_command(action: Action, form: &FormInput) -> Result<Command, Response> {
    Command::parse(action, form).map_err(|e| error_response(action, &e))
}

/// Parses and executes an action, returning its `Outcome` as `data`.
pub async fn run_action(state: &AppState, action: Action, form: &FormInput) -> Response {
    if action == Action::Exit {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::err("The exit action is not available over HTTP")),
        )
            .into_response();
    }
    let command = match parse_command(action, form) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let service = state.service.lock().await;
    match service.try_execute(command).await {
        Ok(outcome) => ok_response(&outcome),
        Err(e) => error_response(action, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(status_for(&ShelterError::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&ShelterError::PetNotFound(1)), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&ShelterError::AlreadyAdopted(1)), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&ShelterError::ConnectionUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
