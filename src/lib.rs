//! Biography Builder - life-story documents and narrative rendering.
//!
//! A user assembles personal details, six life sections and a timeline into
//! one biography. From it this crate builds generation prompts, composes a
//! fallback narrative, renders PDF and DOCX exports and projects a public
//! read-only view for sharing.
//!
//! Layout follows ports and adapters: `domain` is pure, `ports` declares
//! the collaborators, `adapters` implements them, `application` holds one
//! handler per operation.

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
