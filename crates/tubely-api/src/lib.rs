//! Tubely API Library
//!
//! This crate provides the HTTP handlers, authentication, and application setup.

// Module declarations
mod handlers;
pub mod setup;
mod telemetry;

// Public modules
pub mod auth;
pub mod constants;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
