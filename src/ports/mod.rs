//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - the story-generation collaborator
//! - `BiographyRepository` - per-user aggregate storage with atomic find-or-create
//! - `DocumentRenderer` - token stream to PDF/DOCX bytes

mod ai_provider;
mod biography_repository;
mod document_renderer;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestMetadata, TokenUsage,
};
pub use biography_repository::{BiographyMutation, BiographyRepository};
pub use document_renderer::{DocumentRenderer, ExportFormat, ExportedDocument, RenderError};
