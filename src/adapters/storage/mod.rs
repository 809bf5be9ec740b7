//! Storage Adapters
//!
//! Implementations of the BiographyRepository port.
//!
//! ## Available Adapters
//!
//! - **FileBiographyRepository** - One JSON record per user on disk
//! - **InMemoryBiographyRepository** - Records in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileBiographyRepository, InMemoryBiographyRepository};
//!
//! // Persistent: file-based storage
//! let repo = FileBiographyRepository::new("./data");
//!
//! // Testing: in-memory storage
//! let repo = InMemoryBiographyRepository::new();
//! ```

mod file_biography_repository;
mod in_memory_biography_repository;

pub use file_biography_repository::FileBiographyRepository;
pub use in_memory_biography_repository::InMemoryBiographyRepository;
