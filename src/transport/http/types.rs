use crate::app::shelter_service::ShelterService;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Mutex<ShelterService>>,
}

impl AppState {
    pub fn new(service: ShelterService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Generic command request: one of the menu actions plus its raw fields.
#[derive(Deserialize, Debug, ToSchema)]
pub struct ExecuteRequest {
    /// Action key, e.g. `add_pet`, `adopt_pet`, `view_pets`.
    pub action: String,
    /// Field values keyed by field key. Strings, numbers and bools are accepted.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: Option<JsonValue>,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct AddPetRequest {
    pub name: String,
    pub breed: String,
    /// Non-negative integer (numeric strings are coerced).
    #[schema(value_type = u32)]
    pub age: JsonValue,
    pub gender: String,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct UpdatePetNameRequest {
    pub new_name: String,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct AddAdopterRequest {
    pub name: String,
    pub phone: String,
    pub city: String,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct AdoptPetRequest {
    #[schema(value_type = i64)]
    pub pet_id: JsonValue,
    #[schema(value_type = i64)]
    pub adopter_id: JsonValue,
}

#[derive(Deserialize, Debug, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring of the pet name.
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ActionDescriptor {
    pub key: String,
    pub number: usize,
    pub label: String,
    pub read_only: bool,
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::err(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}
