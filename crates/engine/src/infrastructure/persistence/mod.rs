//! SQLite persistence adapters

mod profile_repository;

pub use profile_repository::SqliteProfileRepo;
