use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod gate;
pub mod handlers;
pub mod jwt;
pub mod password;

pub use claims::{Claims, TokenKind};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
