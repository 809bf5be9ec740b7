//! Document Renderer Port - turns narrative tokens into a binary document.
//!
//! Renderers consume the token stream produced by
//! [`tokenize`](crate::domain::narrative::tokenize) plus a display title.
//! They never look at the aggregate, so every format renders the same
//! content.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::narrative::Token;

/// Port for rendering narrative tokens into one document format.
///
/// # Contract
///
/// Implementations must:
/// - Be pure: the same tokens and title give equivalent output
/// - Accept an empty token slice and produce a valid document holding only the title
/// - Return the complete artifact; no partial output is observable
///
/// # Usage
///
/// ```rust,ignore
/// let renderer: &dyn DocumentRenderer = registry.get(ExportFormat::Pdf)?;
/// let bytes = renderer.render(&tokenize(&markup), "My Life")?;
/// ```
pub trait DocumentRenderer: Send + Sync {
    /// The format this renderer produces.
    fn format(&self) -> ExportFormat;

    /// Renders tokens into a complete document.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` only on internal serialization failure.
    fn render(&self, tokens: &[Token], title: &str) -> Result<Vec<u8>, RenderError>;
}

/// Document formats that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Paginated print-flow document.
    Pdf,
    /// Word-processor document (Office Open XML).
    Docx,
}

impl ExportFormat {
    /// Returns all supported formats.
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Pdf, ExportFormat::Docx]
    }

    /// Get the MIME content type for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" | "word" => Ok(ExportFormat::Docx),
            _ => Err(RenderError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Exported document with content and metadata.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// The exported content as bytes.
    pub content: Vec<u8>,
    /// The MIME content type.
    pub content_type: String,
    /// Suggested filename for download.
    pub filename: String,
    /// The format that was used.
    pub format: ExportFormat,
}

impl ExportedDocument {
    /// Create a new exported document.
    pub fn new(content: Vec<u8>, format: ExportFormat, base_filename: &str) -> Self {
        Self {
            content,
            content_type: format.content_type().to_string(),
            filename: format!("{}.{}", base_filename, format.extension()),
            format,
        }
    }

    /// Size of the document in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the document has no bytes.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Errors that can occur while rendering.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// Unsupported export format requested.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// No renderer registered for the format.
    #[error("No renderer available for {0}")]
    RendererUnavailable(ExportFormat),

    /// Building the PDF failed.
    #[error("PDF rendering failed: {0}")]
    PdfFailed(String),

    /// Building the DOCX package failed.
    #[error("DOCX rendering failed: {0}")]
    DocxFailed(String),
}

impl RenderError {
    /// Create a PDF rendering error.
    pub fn pdf_failed(reason: impl Into<String>) -> Self {
        Self::PdfFailed(reason.into())
    }

    /// Create a DOCX rendering error.
    pub fn docx_failed(reason: impl Into<String>) -> Self {
        Self::DocxFailed(reason.into())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    // ───────────────────────────────────────────────────────────────
    // ExportFormat tests
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn export_format_content_types_are_correct() {
        assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
        assert_eq!(
            ExportFormat::Docx.content_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[test]
    fn export_format_parses_from_string() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("docx".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
    }

    #[test]
    fn export_format_parse_rejects_unknown_format() {
        let result = "html".parse::<ExportFormat>();
        assert!(matches!(result, Err(RenderError::UnsupportedFormat(f)) if f == "html"));
    }

    // ───────────────────────────────────────────────────────────────
    // ExportedDocument tests
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn exported_document_builds_filename_from_base() {
        let doc = ExportedDocument::new(vec![1, 2, 3], ExportFormat::Docx, "my_life");
        assert_eq!(doc.filename, "my_life.docx");
        assert_eq!(doc.content_type, ExportFormat::Docx.content_type());
        assert_eq!(doc.len(), 3);
    }
}
