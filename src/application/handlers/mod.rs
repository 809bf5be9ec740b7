//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Every
//! handler starts from the repository's find-or-create, so a user's first
//! request of any kind materializes their biography.

pub mod biography;
pub mod narrative;

pub use biography::{
    GetBiographyHandler, GetBiographyQuery, GetPublicBiographyHandler, GetPublicBiographyQuery,
    SetVisibilityCommand, SetVisibilityHandler, UpdateBiographyCommand, UpdateBiographyHandler,
    UpdateTimelineCommand, UpdateTimelineHandler,
};
pub use narrative::{
    ExportDocumentHandler, ExportDocumentQuery, GenerateStoryCommand, GenerateStoryHandler,
    GenerateStoryResult, GenerationSettings,
};
