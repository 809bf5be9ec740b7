//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (write) take a `CommandMetadata`; queries (read) carry the
//! identity they look up.

pub mod handlers;

pub use handlers::{
    // Biography handlers
    GetBiographyHandler, GetBiographyQuery, GetPublicBiographyHandler, GetPublicBiographyQuery,
    SetVisibilityCommand, SetVisibilityHandler, UpdateBiographyCommand, UpdateBiographyHandler,
    UpdateTimelineCommand, UpdateTimelineHandler,
    // Narrative handlers
    ExportDocumentHandler, ExportDocumentQuery, GenerateStoryCommand, GenerateStoryHandler,
    GenerateStoryResult, GenerationSettings,
};
