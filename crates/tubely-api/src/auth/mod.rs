//! Bearer token authentication

pub mod jwt;
pub mod models;

pub use jwt::{JwtError, JwtService};
pub use models::{AuthUser, JwtClaims};
