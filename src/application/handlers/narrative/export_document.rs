//! ExportDocumentHandler - Query handler rendering a biography to a file.
//!
//! Content precedence: an explicit story in the command, then the stored
//! draft, then the composed fallback. Exporting never modifies the
//! biography.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::biography::BiographyAggregate;
use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};
use crate::domain::narrative::{filename_base, narrative_markup, tokenize};
use crate::ports::{BiographyRepository, DocumentRenderer, ExportFormat, ExportedDocument, RenderError};

/// Export request.
#[derive(Debug, Clone)]
pub struct ExportDocumentQuery {
    pub user_id: UserId,
    /// Format identifier ("pdf", "docx").
    pub format: String,
    /// Markup to render instead of the stored narrative.
    pub story: Option<String>,
    /// Title to use instead of the customization title.
    pub title: Option<String>,
}

/// Handler rendering exports with the renderer registered for each format.
pub struct ExportDocumentHandler {
    repository: Arc<dyn BiographyRepository>,
    renderers: HashMap<ExportFormat, Arc<dyn DocumentRenderer>>,
}

impl ExportDocumentHandler {
    pub fn new(
        repository: Arc<dyn BiographyRepository>,
        renderers: Vec<Arc<dyn DocumentRenderer>>,
    ) -> Self {
        let renderers = renderers
            .into_iter()
            .map(|renderer| (renderer.format(), renderer))
            .collect();
        Self {
            repository,
            renderers,
        }
    }

    /// Formats this handler can produce, in declaration order.
    pub fn formats(&self) -> Vec<ExportFormat> {
        ExportFormat::all()
            .iter()
            .copied()
            .filter(|format| self.renderers.contains_key(format))
            .collect()
    }

    pub async fn handle(&self, query: ExportDocumentQuery) -> Result<ExportedDocument, DomainError> {
        let format = query.format.parse::<ExportFormat>().map_err(export_failure)?;
        let renderer = self
            .renderers
            .get(&format)
            .ok_or_else(|| export_failure(RenderError::RendererUnavailable(format)))?;

        let biography = self
            .repository
            .find_by_user(&query.user_id)
            .await?
            .unwrap_or_else(|| BiographyAggregate::new(query.user_id.clone()));

        let title = query
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| biography.display_title().to_string());
        let markup = match query.story.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(story) => Cow::Borrowed(story),
            None => narrative_markup(&biography),
        };

        let tokens = tokenize(&markup);
        let content = renderer.render(&tokens, &title).map_err(|err| {
            tracing::error!(user_id = %query.user_id, format = %format, error = %err, "Export failed");
            export_failure(err)
        })?;

        let document = ExportedDocument::new(content, format, &filename_base(&title));
        tracing::info!(
            user_id = %query.user_id,
            format = %format,
            tokens = tokens.len(),
            bytes = document.len(),
            filename = %document.filename,
            "Document exported"
        );
        Ok(document)
    }
}

fn export_failure(err: RenderError) -> DomainError {
    match err {
        RenderError::UnsupportedFormat(format) => {
            ValidationError::unsupported_value("format", format).into()
        }
        other => DomainError::new(ErrorCode::ExportFailed, format!("Failed to export: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::document::default_renderers;
    use crate::adapters::storage::InMemoryBiographyRepository;
    use crate::domain::biography::{Customization, Voice};
    use crate::domain::narrative::Token;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records what it was asked to render.
    #[derive(Default)]
    struct RecordingRenderer {
        seen: Mutex<Vec<(Vec<Token>, String)>>,
        fail: bool,
    }

    impl DocumentRenderer for RecordingRenderer {
        fn format(&self) -> ExportFormat {
            ExportFormat::Pdf
        }

        fn render(&self, tokens: &[Token], title: &str) -> Result<Vec<u8>, RenderError> {
            if self.fail {
                return Err(RenderError::pdf_failed("boom"));
            }
            self.seen.lock().unwrap().push((tokens.to_vec(), title.to_string()));
            Ok(b"%PDF".to_vec())
        }
    }

    fn user() -> UserId {
        UserId::new("writer").unwrap()
    }

    fn query(format: &str) -> ExportDocumentQuery {
        ExportDocumentQuery {
            user_id: user(),
            format: format.to_string(),
            story: None,
            title: None,
        }
    }

    fn recording() -> (Arc<InMemoryBiographyRepository>, Arc<RecordingRenderer>, ExportDocumentHandler) {
        let repo = Arc::new(InMemoryBiographyRepository::new());
        let renderer = Arc::new(RecordingRenderer::default());
        let handler = ExportDocumentHandler::new(repo.clone(), vec![renderer.clone() as Arc<dyn DocumentRenderer>]);
        (repo, renderer, handler)
    }

    // ───────────────────────────────────────────────────────────────
    // Content selection
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn composes_fallback_without_draft() {
        let (_, renderer, handler) = recording();

        let doc = handler.handle(query("pdf")).await.unwrap();

        assert_eq!(doc.filename, "autobiography.pdf");
        assert_eq!(doc.content_type, "application/pdf");
        let seen = renderer.seen.lock().unwrap();
        let (tokens, title) = &seen[0];
        assert_eq!(title, "Autobiography");
        assert_eq!(tokens[0], Token::Heading1("Autobiography".to_string()));
    }

    #[tokio::test]
    async fn explicit_story_beats_stored_draft() {
        let (repo, renderer, handler) = recording();
        let mut bio = repo.find_or_create(&user()).await.unwrap();
        bio.record_generated_story("# Stored", Voice::Simple);
        bio.set_customization(Customization {
            title: "My Sea Years".to_string(),
            ..Default::default()
        });
        repo.save(&bio).await.unwrap();

        let doc = handler.handle(query("pdf")).await.unwrap();
        assert_eq!(doc.filename, "my_sea_years.pdf");

        let mut with_story = query("pdf");
        with_story.story = Some("# Override".to_string());
        with_story.title = Some("Other Title".to_string());
        let doc = handler.handle(with_story).await.unwrap();
        assert_eq!(doc.filename, "other_title.pdf");

        let seen = renderer.seen.lock().unwrap();
        assert_eq!(seen[0].0, vec![Token::Heading1("Stored".to_string())]);
        assert_eq!(seen[1].0, vec![Token::Heading1("Override".to_string())]);
        assert_eq!(seen[1].1, "Other Title");
    }

    #[tokio::test]
    async fn export_does_not_modify_biography() {
        let (repo, _, handler) = recording();
        repo.find_or_create(&user()).await.unwrap();
        let before = repo.raw_record(&user()).await.unwrap();

        handler.handle(query("pdf")).await.unwrap();

        assert_eq!(repo.raw_record(&user()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn export_for_unknown_user_creates_no_record() {
        let (repo, _, handler) = recording();

        handler.handle(query("pdf")).await.unwrap();

        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn export_leaves_legacy_record_as_stored() {
        let (repo, renderer, handler) = recording();
        let legacy = json!({ "careerAchievements": { "summary": "Pilot" } });
        repo.seed_raw(user(), legacy.clone()).await;

        handler.handle(query("pdf")).await.unwrap();

        assert_eq!(repo.raw_record(&user()).await.unwrap(), legacy);
        let seen = renderer.seen.lock().unwrap();
        assert!(seen[0].0.contains(&Token::Paragraph("Pilot".to_string())));
    }

    // ───────────────────────────────────────────────────────────────
    // Formats and failures
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn renders_both_built_in_formats() {
        let repo = Arc::new(InMemoryBiographyRepository::new());
        let handler = ExportDocumentHandler::new(repo, default_renderers());
        assert_eq!(handler.formats(), ExportFormat::all().to_vec());

        let pdf = handler.handle(query("pdf")).await.unwrap();
        assert!(pdf.content.starts_with(b"%PDF-"));

        let docx = handler.handle(query("docx")).await.unwrap();
        assert!(docx.content.starts_with(b"PK"));
        assert_eq!(docx.filename, "autobiography.docx");
    }

    #[tokio::test]
    async fn unknown_format_is_a_validation_error() {
        let (_, _, handler) = recording();
        let err = handler.handle(query("html")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn missing_renderer_is_an_export_failure() {
        let (_, _, handler) = recording();
        let err = handler.handle(query("docx")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ExportFailed);
    }

    #[tokio::test]
    async fn renderer_error_is_an_export_failure() {
        let repo = Arc::new(InMemoryBiographyRepository::new());
        let renderer = Arc::new(RecordingRenderer {
            fail: true,
            ..Default::default()
        });
        let handler = ExportDocumentHandler::new(repo, vec![renderer as Arc<dyn DocumentRenderer>]);

        let err = handler.handle(query("pdf")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ExportFailed);
        assert!(err.message.contains("boom"));
    }
}
