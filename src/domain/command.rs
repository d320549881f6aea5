//! The action catalogue and typed commands.
//!
//! Every presentation layer (console menu, HTTP) collects raw string fields
//! into a [`FormInput`] and calls [`Command::parse`]; the coercion rules live
//! here and nowhere else.

use crate::domain::error::ShelterError;
use crate::domain::model::{NewAdopter, NewPet};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// One labelled text field of an action's form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
}

const fn field(key: &'static str, label: &'static str) -> FormField {
    FormField { key, label }
}

const ADD_PET_FIELDS: &[FormField] = &[
    field("name", "Pet Name"),
    field("breed", "Breed"),
    field("age", "Age (INT)"),
    field("gender", "Gender"),
];
const UPDATE_PET_NAME_FIELDS: &[FormField] =
    &[field("pet_id", "Pet ID (INT)"), field("new_name", "New Name")];
const DELETE_PET_FIELDS: &[FormField] = &[field("pet_id", "Pet ID (INT)")];
const SEARCH_PETS_FIELDS: &[FormField] = &[field("name", "Pet Name (Partial)")];
const ADD_ADOPTER_FIELDS: &[FormField] = &[
    field("name", "Adopter Name"),
    field("phone", "Phone"),
    field("city", "City"),
];
const ADOPT_PET_FIELDS: &[FormField] = &[
    field("pet_id", "Pet ID (INT)"),
    field("adopter_id", "Adopter ID (INT)"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AddPet,
    ViewPets,
    UpdatePetName,
    DeletePet,
    SearchPets,
    AddAdopter,
    ViewAdopters,
    AdoptPet,
    AdoptedReport,
    AvailableCount,
    Exit,
}

impl Action {
    /// Menu order.
    pub const ALL: [Action; 11] = [
        Action::AddPet,
        Action::ViewPets,
        Action::UpdatePetName,
        Action::DeletePet,
        Action::SearchPets,
        Action::AddAdopter,
        Action::ViewAdopters,
        Action::AdoptPet,
        Action::AdoptedReport,
        Action::AvailableCount,
        Action::Exit,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Action::AddPet => "add_pet",
            Action::ViewPets => "view_pets",
            Action::UpdatePetName => "update_pet_name",
            Action::DeletePet => "delete_pet",
            Action::SearchPets => "search_pets",
            Action::AddAdopter => "add_adopter",
            Action::ViewAdopters => "view_adopters",
            Action::AdoptPet => "adopt_pet",
            Action::AdoptedReport => "adopted_report",
            Action::AvailableCount => "available_count",
            Action::Exit => "exit",
        }
    }

    pub fn from_key(key: &str) -> Option<Action> {
        let key = key.trim().to_lowercase();
        Action::ALL.into_iter().find(|a| a.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::AddPet => "Add New Pet",
            Action::ViewPets => "View All Pets",
            Action::UpdatePetName => "Update Pet Name",
            Action::DeletePet => "Delete Pet",
            Action::SearchPets => "Search Pet by Name",
            Action::AddAdopter => "Add Adopter",
            Action::ViewAdopters => "View All Adopters",
            Action::AdoptPet => "Adopt a Pet",
            Action::AdoptedReport => "View Adopted Pets Report",
            Action::AvailableCount => "Show Available Pets Count",
            Action::Exit => "Exit",
        }
    }

    /// 1-based position in the menu.
    pub fn number(&self) -> usize {
        Action::ALL
            .iter()
            .position(|a| a == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }

    pub fn from_number(n: usize) -> Option<Action> {
        n.checked_sub(1).and_then(|i| Action::ALL.get(i).copied())
    }

    pub fn fields(&self) -> &'static [FormField] {
        match self {
            Action::AddPet => ADD_PET_FIELDS,
            Action::UpdatePetName => UPDATE_PET_NAME_FIELDS,
            Action::DeletePet => DELETE_PET_FIELDS,
            Action::SearchPets => SEARCH_PETS_FIELDS,
            Action::AddAdopter => ADD_ADOPTER_FIELDS,
            Action::AdoptPet => ADOPT_PET_FIELDS,
            Action::ViewPets
            | Action::ViewAdopters
            | Action::AdoptedReport
            | Action::AvailableCount
            | Action::Exit => &[],
        }
    }

    /// Read-only actions render a table or a single figure and take no input.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Action::ViewPets | Action::ViewAdopters | Action::AdoptedReport | Action::AvailableCount
        )
    }
}

/// Raw field values keyed by [`FormField::key`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    values: HashMap<String, String>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Missing fields read as empty, like an untouched text box.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    /// Builds a form from a JSON object; scalars are stringified, nulls dropped.
    pub fn from_json(value: &JsonValue) -> Result<Self, ShelterError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ShelterError::validation("fields must be a JSON object"))?;
        let mut form = FormInput::new();
        for (k, v) in obj {
            match v {
                JsonValue::Null => {}
                JsonValue::String(s) => form.insert(k, s.clone()),
                JsonValue::Number(_) | JsonValue::Bool(_) => form.insert(k, v.to_string()),
                _ => {
                    return Err(ShelterError::validation(format!(
                        "field '{}' must be a scalar value",
                        k
                    )))
                }
            }
        }
        Ok(form)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for FormInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormInput::new();
        for (k, v) in iter {
            form.insert(k.as_ref(), v);
        }
        form
    }
}

/// A validated request for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPet(NewPet),
    ViewPets,
    UpdatePetName { pet_id: i64, new_name: String },
    DeletePet { pet_id: i64 },
    SearchPets { fragment: String },
    AddAdopter(NewAdopter),
    ViewAdopters,
    AdoptPet { pet_id: i64, adopter_id: i64 },
    AdoptedReport,
    AvailableCount,
    Exit,
}

impl Command {
    pub fn parse(action: Action, form: &FormInput) -> Result<Command, ShelterError> {
        let command = match action {
            Action::AddPet => Command::AddPet(NewPet {
                name: form.get("name").to_string(),
                breed: form.get("breed").to_string(),
                age: parse_age(form.get("age"))?,
                gender: form.get("gender").to_string(),
            }),
            Action::ViewPets => Command::ViewPets,
            Action::UpdatePetName => Command::UpdatePetName {
                pet_id: parse_id(form.get("pet_id"), "Pet ID must be an integer.")?,
                new_name: form.get("new_name").to_string(),
            },
            Action::DeletePet => Command::DeletePet {
                pet_id: parse_id(form.get("pet_id"), "Pet ID must be an integer.")?,
            },
            Action::SearchPets => {
                let fragment = form.get("name");
                if fragment.is_empty() {
                    return Err(ShelterError::validation("Please enter a pet name."));
                }
                Command::SearchPets {
                    fragment: fragment.to_string(),
                }
            }
            Action::AddAdopter => Command::AddAdopter(NewAdopter {
                name: form.get("name").to_string(),
                phone: form.get("phone").to_string(),
                city: form.get("city").to_string(),
            }),
            Action::ViewAdopters => Command::ViewAdopters,
            Action::AdoptPet => Command::AdoptPet {
                pet_id: parse_id(form.get("pet_id"), "IDs must be integers.")?,
                adopter_id: parse_id(form.get("adopter_id"), "IDs must be integers.")?,
            },
            Action::AdoptedReport => Command::AdoptedReport,
            Action::AvailableCount => Command::AvailableCount,
            Action::Exit => Command::Exit,
        };
        Ok(command)
    }

    pub fn action(&self) -> Action {
        match self {
            Command::AddPet(_) => Action::AddPet,
            Command::ViewPets => Action::ViewPets,
            Command::UpdatePetName { .. } => Action::UpdatePetName,
            Command::DeletePet { .. } => Action::DeletePet,
            Command::SearchPets { .. } => Action::SearchPets,
            Command::AddAdopter(_) => Action::AddAdopter,
            Command::ViewAdopters => Action::ViewAdopters,
            Command::AdoptPet { .. } => Action::AdoptPet,
            Command::AdoptedReport => Action::AdoptedReport,
            Command::AvailableCount => Action::AvailableCount,
            Command::Exit => Action::Exit,
        }
    }
}

fn parse_id(raw: &str, message: &str) -> Result<i64, ShelterError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ShelterError::validation(message))
}

fn parse_age(raw: &str) -> Result<u32, ShelterError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ShelterError::validation("Age must be a non-negative integer."))
}
