pub mod client;
pub mod config;
pub mod endpoints;
mod error;
pub mod repositories;
pub mod request;
pub mod store;

pub use crate::client::{Client, HandlerError, SessionHandler};
pub use crate::config::{ClientConfig, Environment};
pub use crate::error::{ApiError, ErrorBody};
pub use crate::store::{MemoryStorage, StoreError, TokenStorage};
use repositories::*;

pub struct Request;

impl Request {
    pub fn auth() -> AuthRepository {
        AuthRepository::new()
    }

    pub fn users() -> UserRepository {
        UserRepository::new()
    }

    pub fn posts() -> PostRepository {
        PostRepository::new()
    }

    pub fn health() -> endpoints::health::HealthCheck {
        endpoints::health::HealthCheck
    }
}
