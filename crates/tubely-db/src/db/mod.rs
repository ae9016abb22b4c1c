//! Video repositories
//
// Trait shared by every record store
pub mod repository;
//
// Postgres-backed store
pub mod postgres;
//
// Process-local store
pub mod memory;

pub use memory::InMemoryVideoRepository;
pub use postgres::{PgVideoRepository, MIGRATOR};
pub use repository::VideoRepository;
