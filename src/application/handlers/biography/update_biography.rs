//! UpdateBiographyHandler - Command handler for partial biography edits.
//!
//! The payload is a JSON object naming only the fields to change. It is
//! parsed and validated completely before the biography is touched, so a
//! rejected patch never reaches storage.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::biography::{BiographyAggregate, FontFamily, LifeSectionKind, Voice};
use crate::domain::foundation::{CommandMetadata, DomainError, ValidationError};
use crate::ports::BiographyRepository;

/// Command carrying a raw JSON patch.
#[derive(Debug, Clone)]
pub struct UpdateBiographyCommand {
    pub patch: Value,
}

/// Handler applying partial updates.
pub struct UpdateBiographyHandler {
    repository: Arc<dyn BiographyRepository>,
}

impl UpdateBiographyHandler {
    pub fn new(repository: Arc<dyn BiographyRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateBiographyCommand,
        metadata: CommandMetadata,
    ) -> Result<BiographyAggregate, DomainError> {
        let patch = BiographyPatch::parse(cmd.patch)?;

        let biography = self
            .repository
            .update(
                &metadata.user_id,
                Box::new(move |biography: &mut BiographyAggregate| {
                    patch.apply(biography);
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(
            user_id = %metadata.user_id,
            correlation_id = metadata.correlation_id(),
            "Biography updated"
        );
        Ok(biography)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Patch payload
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonalInformationPatch {
    name: Option<String>,
    date_of_birth: Option<String>,
    birthplace: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SectionPatch {
    summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomizationPatch {
    title: Option<String>,
    subtitle: Option<String>,
    cover_image: Option<String>,
    font: Option<String>,
    favorite_quote: Option<String>,
}

/// Fields a client may change. Absent or null fields are left as they are.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPatch {
    personal_information: Option<PersonalInformationPatch>,
    #[serde(alias = "childhoodMemories")]
    childhood: Option<SectionPatch>,
    #[serde(alias = "educationJourney")]
    education: Option<SectionPatch>,
    #[serde(alias = "careerAchievements")]
    career: Option<SectionPatch>,
    #[serde(alias = "familyRelationships")]
    family: Option<SectionPatch>,
    #[serde(alias = "challengesLessons")]
    challenges: Option<SectionPatch>,
    #[serde(alias = "dreamsBeliefs")]
    dreams: Option<SectionPatch>,
    customization: Option<CustomizationPatch>,
    #[serde(alias = "storyDraft")]
    narrative_draft: Option<String>,
    #[serde(alias = "style")]
    voice: Option<String>,
}

/// A validated patch; enum-valued fields are already parsed.
#[derive(Debug)]
struct BiographyPatch {
    raw: RawPatch,
    font: Option<FontFamily>,
    voice: Option<Voice>,
}

impl BiographyPatch {
    fn parse(payload: Value) -> Result<Self, ValidationError> {
        if !payload.is_object() {
            return Err(ValidationError::invalid_format("patch", "expected a JSON object"));
        }
        let raw: RawPatch = serde_json::from_value(payload)
            .map_err(|e| ValidationError::invalid_format("patch", e.to_string()))?;

        let font = raw
            .customization
            .as_ref()
            .and_then(|c| c.font.as_deref())
            .map(str::parse::<FontFamily>)
            .transpose()?;
        let voice = raw.voice.as_deref().map(str::parse::<Voice>).transpose()?;

        Ok(Self { raw, font, voice })
    }

    fn apply(self, biography: &mut BiographyAggregate) {
        let raw = self.raw;

        if let Some(patch) = raw.personal_information {
            let mut info = biography.personal_information().clone();
            replace(&mut info.name, patch.name);
            replace(&mut info.date_of_birth, patch.date_of_birth);
            replace(&mut info.birthplace, patch.birthplace);
            replace(&mut info.background, patch.background);
            biography.set_personal_information(info);
        }

        let sections = [
            (LifeSectionKind::Childhood, raw.childhood),
            (LifeSectionKind::Education, raw.education),
            (LifeSectionKind::Career, raw.career),
            (LifeSectionKind::Family, raw.family),
            (LifeSectionKind::Challenges, raw.challenges),
            (LifeSectionKind::Dreams, raw.dreams),
        ];
        for (kind, patch) in sections {
            if let Some(summary) = patch.and_then(|p| p.summary) {
                biography.set_section_summary(kind, summary);
            }
        }

        if let Some(patch) = raw.customization {
            let mut customization = biography.customization().clone();
            replace(&mut customization.title, patch.title);
            replace_optional(&mut customization.subtitle, patch.subtitle);
            replace_optional(&mut customization.cover_image, patch.cover_image);
            replace_optional(&mut customization.favorite_quote, patch.favorite_quote);
            if let Some(font) = self.font {
                customization.font = font;
            }
            biography.set_customization(customization);
        }

        if let Some(draft) = raw.narrative_draft {
            biography.edit_story_draft(draft);
        }
        if let Some(voice) = self.voice {
            biography.set_voice(voice);
        }
    }
}

fn replace(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Blank text clears an optional field.
fn replace_optional(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *field = if value.trim().is_empty() { None } else { Some(value) };
    }
}
