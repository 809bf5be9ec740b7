//! Command dispatch: wires adapters from configuration into the handlers.

use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use super::args::{Cli, Commands, ExportArgs};
use super::error::CliError;
use crate::adapters::ai::{
    AnthropicConfig, AnthropicProvider, GeminiConfig, GeminiProvider, MockAIProvider,
};
use crate::adapters::document::default_renderers;
use crate::adapters::storage::{FileBiographyRepository, InMemoryBiographyRepository};
use crate::application::{
    ExportDocumentHandler, ExportDocumentQuery, GenerateStoryCommand, GenerateStoryHandler,
    GenerationSettings, GetBiographyHandler, GetBiographyQuery, GetPublicBiographyHandler,
    GetPublicBiographyQuery, SetVisibilityCommand, SetVisibilityHandler, UpdateBiographyCommand,
    UpdateBiographyHandler, UpdateTimelineCommand, UpdateTimelineHandler,
};
use crate::config::{AiConfig, AiProvider, AppConfig};
use crate::domain::biography::{catalog, Voice};
use crate::domain::foundation::{CommandMetadata, DomainError, UserId};
use crate::domain::narrative::{build_prompt, compose};
use crate::ports::{AIProvider, BiographyRepository};

/// Builds the repository selected by configuration.
pub fn build_repository(config: &AppConfig) -> Arc<dyn BiographyRepository> {
    match &config.storage.data_dir {
        Some(dir) => Arc::new(FileBiographyRepository::new(dir.clone())),
        None => Arc::new(InMemoryBiographyRepository::new()),
    }
}

/// Builds the text-generation provider selected by configuration.
///
/// # Errors
///
/// Fails when the provider's API key is missing or its HTTP client
/// cannot be built.
pub fn build_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, CliError> {
    let api_key = config.api_key()?.unwrap_or_default();
    let provider: Arc<dyn AIProvider> = match config.provider {
        AiProvider::Gemini => {
            let mut settings = GeminiConfig::new(api_key).with_timeout(config.timeout());
            if let Some(model) = &config.model {
                settings = settings.with_model(model.clone());
            }
            Arc::new(GeminiProvider::new(settings)?)
        }
        AiProvider::Anthropic => {
            let mut settings = AnthropicConfig::new(api_key).with_timeout(config.timeout());
            if let Some(model) = &config.model {
                settings = settings.with_model(model.clone());
            }
            Arc::new(AnthropicProvider::new(settings)?)
        }
        AiProvider::Mock => Arc::new(MockAIProvider::new()),
    };
    Ok(provider)
}

/// Runs one CLI command, writing its output to `out`.
pub async fn dispatch(cli: Cli, mut config: AppConfig, out: &mut dyn Write) -> Result<(), CliError> {
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }
    config.validate()?;

    let repository = build_repository(&config);
    let user = cli.user;
    let user_id = || -> Result<UserId, CliError> {
        let raw = user.as_deref().ok_or(CliError::MissingUser)?;
        Ok(UserId::new(raw).map_err(DomainError::from)?)
    };

    match cli.command {
        Commands::Show => {
            let biography = GetBiographyHandler::new(repository)
                .handle(GetBiographyQuery { user_id: user_id()? })
                .await?;
            emit(out, &serde_json::to_string_pretty(&biography)?)
        }

        Commands::Compose => {
            let biography = repository.find_or_create(&user_id()?).await?;
            emit(out, &compose(&biography))
        }

        Commands::Prompt { voice } => {
            let voice: Voice = voice.parse().map_err(DomainError::from)?;
            let biography = repository.find_or_create(&user_id()?).await?;
            emit(out, &build_prompt(&biography, voice))
        }

        Commands::Generate { voice } => {
            let provider = build_provider(&config.ai)?;
            let settings = GenerationSettings {
                max_output_tokens: config.ai.max_output_tokens,
                temperature: config.ai.temperature,
            };
            let result = GenerateStoryHandler::new(repository, provider, settings)
                .handle(GenerateStoryCommand { voice }, metadata(user_id()?))
                .await?;
            emit(out, &result.story)
        }

        Commands::Export(args) => {
            let out_dir = args
                .out
                .clone()
                .unwrap_or_else(|| config.export.output_dir.clone());
            let path = export(repository, user_id()?, args, &out_dir).await?;
            emit(out, &path)
        }

        Commands::Publish { public } => {
            let biography = SetVisibilityHandler::new(repository)
                .handle(
                    SetVisibilityCommand {
                        payload: json!({ "isPublic": public }),
                    },
                    metadata(user_id()?),
                )
                .await?;
            let line = match (biography.is_public(), biography.public_id()) {
                (true, Some(id)) => format!("public {}", id),
                _ => "private".to_string(),
            };
            emit(out, &line)
        }

        Commands::Share { public_id } => {
            let view = GetPublicBiographyHandler::new(repository)
                .handle(GetPublicBiographyQuery { public_id })
                .await?;
            emit(out, &serde_json::to_string_pretty(&view)?)
        }

        Commands::Catalog => emit(out, &serde_json::to_string_pretty(&catalog())?),

        Commands::Import { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .map_err(|e| CliError::io(format!("Failed to read {}", file.display()), e))?;
            let payload: Value = serde_json::from_str(&text)?;
            let biography = import(repository, user_id()?, payload).await?;
            emit(out, &serde_json::to_string_pretty(&biography)?)
        }
    }
}

fn metadata(user_id: UserId) -> CommandMetadata {
    CommandMetadata::new(user_id).with_source("cli")
}

fn emit(out: &mut dyn Write, text: &str) -> Result<(), CliError> {
    writeln!(out, "{}", text).map_err(|e| CliError::io("Failed to write output", e))
}

async fn export(
    repository: Arc<dyn BiographyRepository>,
    user_id: UserId,
    args: ExportArgs,
    out_dir: &Path,
) -> Result<String, CliError> {
    let story = match &args.story {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| CliError::io(format!("Failed to read {}", path.display()), e))?,
        ),
        None => None,
    };

    let document = ExportDocumentHandler::new(repository, default_renderers())
        .handle(ExportDocumentQuery {
            user_id,
            format: args.format,
            story,
            title: args.title,
        })
        .await?;

    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|e| CliError::io(format!("Failed to create {}", out_dir.display()), e))?;
    let path = out_dir.join(&document.filename);
    tokio::fs::write(&path, &document.content)
        .await
        .map_err(|e| CliError::io(format!("Failed to write {}", path.display()), e))?;

    Ok(path.display().to_string())
}

/// Applies an import file: its `timeline` replaces the timeline, every
/// other field is applied as a patch.
async fn import(
    repository: Arc<dyn BiographyRepository>,
    user_id: UserId,
    payload: Value,
) -> Result<crate::domain::biography::BiographyAggregate, CliError> {
    let mut fields = match payload {
        Value::Object(map) => map,
        _ => return Err(DomainError::validation("import", "expected a JSON object").into()),
    };
    let timeline = fields.remove("timeline");

    let mut biography = UpdateBiographyHandler::new(repository.clone())
        .handle(
            UpdateBiographyCommand {
                patch: Value::Object(fields),
            },
            metadata(user_id.clone()),
        )
        .await?;

    if let Some(timeline) = timeline {
        biography = UpdateTimelineHandler::new(repository)
            .handle(
                UpdateTimelineCommand {
                    payload: json!({ "timeline": timeline }),
                },
                metadata(user_id),
            )
            .await?;
    }

    Ok(biography)
}
