//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `biography` - The per-user aggregate, its normalizer and public projection
//! - `narrative` - Markup tokenizer, fallback composer and prompt builder

pub mod biography;
pub mod foundation;
pub mod narrative;
