//! Repositories for database operations

pub mod documents;

pub use documents::DocumentRepository;
