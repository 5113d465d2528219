//! Web layer for the reservation server.
//!
//! JSON endpoints under `/api` for the frontend, plus the built frontend
//! itself.

mod dto;
mod extract;
mod routes;
mod state;

pub use dto::*;
pub use extract::FormOrJson;
pub use routes::{AppError, create_router};
pub use state::AppState;
