//! Narrative generation and export handlers.

mod export_document;
mod generate_story;

pub use export_document::{ExportDocumentHandler, ExportDocumentQuery};
pub use generate_story::{
    GenerateStoryCommand, GenerateStoryHandler, GenerateStoryResult, GenerationSettings,
};
