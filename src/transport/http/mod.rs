pub mod router;
pub mod types;
pub mod handlers {
    pub mod adopters;
    pub mod adoptions;
    pub mod common;
    pub mod execute;
    pub mod health;
    pub mod pets;
}

pub use router::{create_router, serve_until, ApiDoc};
pub use types::AppState;
