use crate::domain::command::{Action, Command, FormInput};
use crate::transport::http::handlers::common::{
    error_response, form_from_body, mismatched, ok_response, parse_command,
};
use crate::transport::http::types::{
    json_422, AddPetRequest, ApiResponse, AppState, SearchQuery, UpdatePetNameRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/pets",
    responses(
        (status = 200, description = "All pets ordered by id", body = ApiResponse),
        (status = 503, description = "Database unavailable", body = ApiResponse)
    )
)]
pub async fn list_pets_handler(State(state): State<AppState>) -> Response {
    let service = state.service.lock().await;
    match service.list_pets().await {
        Ok(pets) => ok_response(&pets),
        Err(e) => error_response(Action::ViewPets, &e),
    }
}

#[utoipa::path(
    get,
    path = "/api/pets/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Pets whose name contains the fragment", body = ApiResponse),
        (status = 400, description = "Empty search fragment", body = ApiResponse)
    )
)]
pub async fn search_pets_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let form = FormInput::new().with("name", query.name);
    let fragment = match parse_command(Action::SearchPets, &form) {
        Ok(Command::SearchPets { fragment }) => fragment,
        Ok(_) => return mismatched(Action::SearchPets),
        Err(resp) => return resp,
    };
    let service = state.service.lock().await;
    match service.search_pets(&fragment).await {
        Ok(pets) => ok_response(&pets),
        Err(e) => error_response(Action::SearchPets, &e),
    }
}

#[utoipa::path(
    get,
    path = "/api/pets/available-count",
    responses(
        (status = 200, description = "Number of pets currently available", body = ApiResponse)
    )
)]
pub async fn available_count_handler(State(state): State<AppState>) -> Response {
    let service = state.service.lock().await;
    match service.available_count().await {
        Ok(count) => ok_response(&serde_json::json!({ "available": count })),
        Err(e) => error_response(Action::AvailableCount, &e),
    }
}

#[utoipa::path(
    post,
    path = "/api/pets",
    request_body = AddPetRequest,
    responses(
        (status = 200, description = "Pet added; `data.pet_id` is the new id", body = ApiResponse),
        (status = 400, description = "Invalid age", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn add_pet_handler(
    State(state): State<AppState>,
    request: Result<Json<AddPetRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"name\", \"breed\", \"age\", \"gender\"}").into_response()
        }
    };
    let new_pet = match form_from_body(&request)
        .and_then(|form| Command::parse(Action::AddPet, &form))
    {
        Ok(Command::AddPet(p)) => p,
        Ok(_) => return mismatched(Action::AddPet),
        Err(e) => return error_response(Action::AddPet, &e),
    };

    let service = state.service.lock().await;
    match service.add_pet(&new_pet).await {
        Ok(pet_id) => ok_response(&serde_json::json!({
            "pet_id": pet_id,
            "message": "Pet added successfully!"
        })),
        Err(e) => error_response(Action::AddPet, &e),
    }
}

#[utoipa::path(
    put,
    path = "/api/pets/{pet_id}/name",
    params(
        ("pet_id" = i64, Path, description = "Pet id")
    ),
    request_body = UpdatePetNameRequest,
    responses(
        (status = 200, description = "Name updated", body = ApiResponse),
        (status = 404, description = "No such pet", body = ApiResponse)
    )
)]
pub async fn update_pet_name_handler(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
    request: Result<Json<UpdatePetNameRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"new_name\": \"...\"}").into_response(),
    };
    let form = FormInput::new()
        .with("pet_id", pet_id)
        .with("new_name", request.new_name);
    let command = match parse_command(Action::UpdatePetName, &form) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let service = state.service.lock().await;
    match service.try_execute(command).await {
        Ok(outcome) => ok_response(&outcome),
        Err(e) => error_response(Action::UpdatePetName, &e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/pets/{pet_id}",
    params(
        ("pet_id" = i64, Path, description = "Pet id; its adoption records are removed too")
    ),
    responses(
        (status = 200, description = "Pet deleted", body = ApiResponse),
        (status = 404, description = "No such pet", body = ApiResponse)
    )
)]
pub async fn delete_pet_handler(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
) -> Response {
    let form = FormInput::new().with("pet_id", pet_id);
    let command = match parse_command(Action::DeletePet, &form) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let service = state.service.lock().await;
    match service.try_execute(command).await {
        Ok(outcome) => ok_response(&outcome),
        Err(e) => error_response(Action::DeletePet, &e),
    }
}
