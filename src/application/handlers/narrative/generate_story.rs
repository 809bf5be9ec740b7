//! GenerateStoryHandler - Command handler producing a narrative draft.
//!
//! Builds the prompt from the stored biography, makes exactly one call to
//! the text-generation provider and stores the trimmed reply as the new
//! draft. Provider failures are reported as-is; nothing is retried and the
//! biography is not written unless generation succeeded.
//!
//! The draft is written through [`BiographyRepository::update`] once the
//! provider has answered, so edits made while the call was in flight are
//! kept.

use std::sync::Arc;

use crate::domain::biography::{BiographyAggregate, Voice};
use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode};
use crate::domain::narrative::build_prompt;
use crate::ports::{
    AIError, AIProvider, BiographyRepository, CompletionRequest, RequestMetadata, TokenUsage,
};

/// Command to generate a story in the requested voice.
#[derive(Debug, Clone)]
pub struct GenerateStoryCommand {
    /// Voice identifier, e.g. "poetic". Unknown values are rejected.
    pub voice: String,
}

/// Request limits passed to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub max_output_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_output_tokens: 4096,
            temperature: None,
        }
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct GenerateStoryResult {
    pub story: String,
    pub voice: Voice,
    pub model: String,
    pub usage: TokenUsage,
    /// The provider stopped before the story ended, e.g. at the token limit.
    pub truncated: bool,
    pub biography: BiographyAggregate,
}

/// Handler for story generation.
pub struct GenerateStoryHandler {
    repository: Arc<dyn BiographyRepository>,
    provider: Arc<dyn AIProvider>,
    settings: GenerationSettings,
}

impl GenerateStoryHandler {
    pub fn new(
        repository: Arc<dyn BiographyRepository>,
        provider: Arc<dyn AIProvider>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            repository,
            provider,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateStoryCommand,
        metadata: CommandMetadata,
    ) -> Result<GenerateStoryResult, DomainError> {
        let voice: Voice = cmd.voice.parse()?;

        let snapshot = self.repository.find_or_create(&metadata.user_id).await?;

        let mut request = CompletionRequest::new(
            build_prompt(&snapshot, voice),
            self.settings.max_output_tokens,
            RequestMetadata::new(metadata.user_id.clone(), metadata.correlation_id()),
        );
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }

        let provider = self.provider.provider_info();
        tracing::info!(
            user_id = %metadata.user_id,
            correlation_id = metadata.correlation_id(),
            provider = %provider.name,
            model = %provider.model,
            voice = voice.as_str(),
            "Generating story"
        );

        let response = self.provider.complete(request).await.map_err(|err| {
            tracing::warn!(
                user_id = %metadata.user_id,
                correlation_id = metadata.correlation_id(),
                error = %err,
                "Story generation failed"
            );
            upstream_failure(err)
        })?;

        let story = response.content.trim().to_string();
        if story.is_empty() {
            return Err(upstream_failure(AIError::EmptyResponse));
        }

        let truncated = response.finish_reason.is_truncated();
        if truncated {
            tracing::warn!(
                user_id = %metadata.user_id,
                correlation_id = metadata.correlation_id(),
                finish_reason = ?response.finish_reason,
                max_output_tokens = self.settings.max_output_tokens,
                "Story was cut off before it ended"
            );
        }

        let draft = story.clone();
        let biography = self
            .repository
            .update(
                &metadata.user_id,
                Box::new(move |biography: &mut BiographyAggregate| {
                    biography.record_generated_story(draft, voice);
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(
            user_id = %metadata.user_id,
            model = %response.model,
            completion_tokens = response.usage.completion_tokens,
            chars = story.len(),
            truncated,
            "Story generated"
        );

        Ok(GenerateStoryResult {
            story,
            voice,
            model: response.model,
            usage: response.usage,
            truncated,
            biography,
        })
    }
}

fn upstream_failure(err: AIError) -> DomainError {
    DomainError::new(
        ErrorCode::UpstreamGenerationFailed,
        format!("Failed to generate story: {}", err),
    )
    .with_detail("retryable", err.is_retryable().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::storage::InMemoryBiographyRepository;
    use crate::application::handlers::biography::{SetVisibilityCommand, SetVisibilityHandler};
    use crate::domain::biography::LifeSectionKind;
    use serde_json::json;
    use std::time::Duration;

    struct Fixture {
        repo: Arc<InMemoryBiographyRepository>,
        provider: Arc<MockAIProvider>,
        handler: GenerateStoryHandler,
    }

    fn fixture(provider: MockAIProvider) -> Fixture {
        let repo = Arc::new(InMemoryBiographyRepository::new());
        let provider = Arc::new(provider);
        let handler = GenerateStoryHandler::new(
            repo.clone(),
            provider.clone(),
            GenerationSettings {
                max_output_tokens: 2048,
                temperature: Some(0.7),
            },
        );
        Fixture {
            repo,
            provider,
            handler,
        }
    }

    async fn generate(f: &Fixture, voice: &str) -> Result<GenerateStoryResult, DomainError> {
        f.handler
            .handle(
                GenerateStoryCommand {
                    voice: voice.to_string(),
                },
                CommandMetadata::test_fixture(),
            )
            .await
    }

    // ───────────────────────────────────────────────────────────────
    // Success cases
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn stores_trimmed_story_and_voice() {
        let f = fixture(MockAIProvider::new().with_response("\n  # Tides\n\nA life at sea.  \n"));

        let result = generate(&f, "poetic").await.unwrap();

        assert_eq!(result.story, "# Tides\n\nA life at sea.");
        assert_eq!(result.voice, Voice::Poetic);
        assert!(!result.truncated);
        assert_eq!(result.biography.narrative_draft(), Some("# Tides\n\nA life at sea."));
        assert!(result.biography.last_generated_at().is_some());

        let user = CommandMetadata::test_fixture().user_id;
        let stored = f.repo.find_by_user(&user).await.unwrap().unwrap();
        assert_eq!(stored.narrative_draft(), Some("# Tides\n\nA life at sea."));
        assert_eq!(stored.voice(), Voice::Poetic);
    }

    #[tokio::test]
    async fn sends_single_prompt_message_with_limits() {
        let f = fixture(MockAIProvider::new().with_response("# Story"));
        let user = CommandMetadata::test_fixture().user_id;
        let mut bio = f.repo.find_or_create(&user).await.unwrap();
        bio.set_section_summary(LifeSectionKind::Family, "Three sisters");
        f.repo.save(&bio).await.unwrap();

        generate(&f, "professional").await.unwrap();

        let request = f.provider.last_call().unwrap();
        assert!(request.prompt.contains("PROFESSIONAL"));
        assert!(request.prompt.contains("Three sisters"));
        assert_eq!(request.max_tokens, 2048);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.metadata.trace_id, "test-correlation-id");
    }

    #[tokio::test]
    async fn truncated_story_is_kept_and_flagged() {
        let f = fixture(MockAIProvider::new().with_truncated_response("# Tides

It began by the"));

        let result = generate(&f, "simple").await.unwrap();

        assert!(result.truncated);
        assert_eq!(result.biography.narrative_draft(), Some("# Tides

It began by the"));
    }

    #[tokio::test]
    async fn publishing_during_generation_survives_the_draft_write() {
        let f = fixture(
            MockAIProvider::new()
                .with_response("# Tides")
                .with_delay(Duration::from_millis(200)),
        );
        let publisher = SetVisibilityHandler::new(f.repo.clone());

        let publish = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            publisher
                .handle(
                    SetVisibilityCommand {
                        payload: json!({ "isPublic": true }),
                    },
                    CommandMetadata::test_fixture(),
                )
                .await
        };
        let (generated, published) = tokio::join!(generate(&f, "poetic"), publish);
        let public_id = published.unwrap().public_id().cloned().unwrap();
        let generated = generated.unwrap();

        assert_eq!(generated.biography.public_id(), Some(&public_id));
        let user = CommandMetadata::test_fixture().user_id;
        let stored = f.repo.find_by_user(&user).await.unwrap().unwrap();
        assert!(stored.is_public());
        assert_eq!(stored.public_id(), Some(&public_id));
        assert_eq!(stored.narrative_draft(), Some("# Tides"));
    }

    #[tokio::test]
    async fn section_edit_during_generation_is_kept() {
        let f = fixture(
            MockAIProvider::new()
                .with_response("# Tides")
                .with_delay(Duration::from_millis(200)),
        );
        let user = CommandMetadata::test_fixture().user_id;

        let edit = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            f.repo
                .update(
                    &user,
                    Box::new(|biography: &mut BiographyAggregate| {
                        biography.set_section_summary(LifeSectionKind::Career, "Lighthouse keeper");
                        Ok(())
                    }),
                )
                .await
        };
        let (generated, edited) = tokio::join!(generate(&f, "poetic"), edit);
        generated.unwrap();
        edited.unwrap();

        let stored = f.repo.find_by_user(&user).await.unwrap().unwrap();
        assert_eq!(stored.section(LifeSectionKind::Career).summary, "Lighthouse keeper");
        assert_eq!(stored.narrative_draft(), Some("# Tides"));
    }

    // ───────────────────────────────────────────────────────────────
    // Failure cases
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn unknown_voice_is_rejected_before_calling_provider() {
        let f = fixture(MockAIProvider::new());

        let err = generate(&f, "sarcastic").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(f.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_error_leaves_biography_untouched() {
        let f = fixture(MockAIProvider::new().with_error(MockError::Unavailable {
            message: "overloaded".to_string(),
        }));
        let user = CommandMetadata::test_fixture().user_id;
        let mut bio = f.repo.find_or_create(&user).await.unwrap();
        bio.edit_story_draft("# Earlier draft");
        f.repo.save(&bio).await.unwrap();
        let before = f.repo.raw_record(&user).await.unwrap();

        let err = generate(&f, "simple").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::UpstreamGenerationFailed);
        assert_eq!(err.details.get("retryable").map(String::as_str), Some("true"));
        assert_eq!(f.provider.call_count(), 1);
        assert_eq!(f.repo.raw_record(&user).await.unwrap(), before);
    }

    #[tokio::test]
    async fn blank_response_is_an_upstream_failure() {
        let f = fixture(MockAIProvider::new().with_response("   \n  "));

        let err = generate(&f, "emotional").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::UpstreamGenerationFailed);
        let user = CommandMetadata::test_fixture().user_id;
        let stored = f.repo.find_by_user(&user).await.unwrap().unwrap();
        assert!(stored.narrative_draft().is_none());
    }

    #[tokio::test]
    async fn dropping_the_call_cancels_generation() {
        let f = fixture(MockAIProvider::new().with_delay(Duration::from_secs(30)));

        let outcome = tokio::time::timeout(Duration::from_millis(20), generate(&f, "simple")).await;

        assert!(outcome.is_err());
        let user = CommandMetadata::test_fixture().user_id;
        let stored = f.repo.find_by_user(&user).await.unwrap().unwrap();
        assert!(stored.narrative_draft().is_none());
    }
}
