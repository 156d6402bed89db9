// Service exports
pub mod auth;
pub mod postgres;

pub use auth::{AuthError, Claims, JwtService, PasswordHasher};
pub use postgres::{PostgresClient, PostgresError};
