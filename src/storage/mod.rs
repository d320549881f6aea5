pub mod executor;
pub mod schema;
