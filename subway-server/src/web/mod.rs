//! Web layer for the subway network.
//!
//! Provides JSON endpoints for managing stations and lines, editing a line's
//! sections, and quoting fares.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
