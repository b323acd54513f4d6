use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod memory;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod validation;

pub use memory::MemoryUserStore;
pub use repo::{PgUserStore, StoreError, UserStore};

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
