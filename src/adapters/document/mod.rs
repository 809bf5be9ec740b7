//! Document adapters - Implementations of the DocumentRenderer port.
//!
//! - `PdfRenderer` - Paginated PDF output
//! - `DocxRenderer` - Word-processor (Office Open XML) output

mod docx_renderer;
mod pdf_renderer;

use std::sync::Arc;

pub use docx_renderer::DocxRenderer;
pub use pdf_renderer::PdfRenderer;

use crate::ports::DocumentRenderer;

/// One renderer per supported export format.
pub fn default_renderers() -> Vec<Arc<dyn DocumentRenderer>> {
    vec![Arc::new(PdfRenderer::new()), Arc::new(DocxRenderer::new())]
}
