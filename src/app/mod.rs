pub mod outcome;
pub mod shelter_service;
