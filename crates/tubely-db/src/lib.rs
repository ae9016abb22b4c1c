//! Tubely record store
//!
//! The video record store is reached only through [`VideoRepository`], so the
//! upload pipeline can run against Postgres in production and an in-memory
//! store in tests and local development.

pub mod db;

pub use db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository, MIGRATOR};
