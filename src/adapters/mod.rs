//! Adapters - Implementations of the ports.
//!
//! - `ai` - Text generation providers
//! - `document` - PDF and DOCX renderers
//! - `storage` - Biography repositories

pub mod ai;
pub mod document;
pub mod storage;
