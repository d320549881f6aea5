use crate::domain::command::{Action, Command};
use crate::transport::http::handlers::common::{
    error_response, form_from_body, mismatched, ok_response,
};
use crate::transport::http::types::{json_422, AdoptPetRequest, ApiResponse, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/adoptions",
    request_body = AdoptPetRequest,
    responses(
        (status = 200, description = "Adoption registered; the pet is now Adopted", body = ApiResponse),
        (status = 400, description = "Non-integer ids", body = ApiResponse),
        (status = 404, description = "Pet or adopter not found", body = ApiResponse),
        (status = 409, description = "Pet already adopted", body = ApiResponse)
    )
)]
pub async fn adopt_pet_handler(
    State(state): State<AppState>,
    request: Result<Json<AdoptPetRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"pet_id\", \"adopter_id\"}").into_response(),
    };
    let (pet_id, adopter_id) = match form_from_body(&request)
        .and_then(|form| Command::parse(Action::AdoptPet, &form))
    {
        Ok(Command::AdoptPet { pet_id, adopter_id }) => (pet_id, adopter_id),
        Ok(_) => return mismatched(Action::AdoptPet),
        Err(e) => return error_response(Action::AdoptPet, &e),
    };

    let service = state.service.lock().await;
    match service.adopt_pet(pet_id, adopter_id).await {
        Ok(adoption) => ok_response(&adoption),
        Err(e) => error_response(Action::AdoptPet, &e),
    }
}

#[utoipa::path(
    get,
    path = "/api/reports/adopted",
    responses(
        (status = 200, description = "One row per adoption: pet, breed, adopter, city, date", body = ApiResponse)
    )
)]
pub async fn adopted_report_handler(State(state): State<AppState>) -> Response {
    let service = state.service.lock().await;
    match service.adopted_report().await {
        Ok(rows) => ok_response(&rows),
        Err(e) => error_response(Action::AdoptedReport, &e),
    }
}
