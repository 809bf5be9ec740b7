//! BiographyAggregate - the single per-user life-story document.
//!
//! Holds personal details, six life sections, the timeline, an optional
//! narrative draft and presentation/sharing settings. Every instance is
//! complete: stored records enter through [`BiographyNormalizer`], which
//! fills any gap with a deterministic default.
//!
//! [`BiographyNormalizer`]: super::BiographyNormalizer

use serde::Serialize;
use std::collections::HashSet;

use crate::domain::foundation::{PublicId, Timestamp, UserId, ValidationError};

use super::{
    Customization, LifeSection, LifeSectionKind, PersonalInformation, TimelineEvent, Visibility,
    Voice,
};

/// Title used wherever the customization title is blank.
pub const DEFAULT_TITLE: &str = "Autobiography";

/// The BiographyAggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiographyAggregate {
    pub(super) user_id: UserId,
    pub(super) personal_information: PersonalInformation,

    pub(super) childhood: LifeSection,
    pub(super) education: LifeSection,
    pub(super) career: LifeSection,
    pub(super) family: LifeSection,
    pub(super) challenges: LifeSection,
    pub(super) dreams: LifeSection,

    pub(super) timeline: Vec<TimelineEvent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) narrative_draft: Option<String>,
    pub(super) voice: Voice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) last_generated_at: Option<Timestamp>,

    pub(super) customization: Customization,
    pub(super) visibility: Visibility,

    pub(super) created_at: Timestamp,
    pub(super) updated_at: Timestamp,
}

impl BiographyAggregate {
    // ════════════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════════════

    /// Creates a fresh biography with every default applied.
    pub fn new(user_id: UserId) -> Self {
        let now = Timestamp::now();
        Self {
            user_id,
            personal_information: PersonalInformation::default(),
            childhood: LifeSection::default(),
            education: LifeSection::default(),
            career: LifeSection::default(),
            family: LifeSection::default(),
            challenges: LifeSection::default(),
            dreams: LifeSection::default(),
            timeline: Vec::new(),
            narrative_draft: None,
            voice: Voice::default(),
            last_generated_at: None,
            customization: Customization::default(),
            visibility: Visibility::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Serializes the aggregate into its stored JSON record.
    pub fn to_record(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════════════

    /// Returns the owning user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn personal_information(&self) -> &PersonalInformation {
        &self.personal_information
    }

    /// Returns the section of the given kind.
    pub fn section(&self, kind: LifeSectionKind) -> &LifeSection {
        match kind {
            LifeSectionKind::Childhood => &self.childhood,
            LifeSectionKind::Education => &self.education,
            LifeSectionKind::Career => &self.career,
            LifeSectionKind::Family => &self.family,
            LifeSectionKind::Challenges => &self.challenges,
            LifeSectionKind::Dreams => &self.dreams,
        }
    }

    fn section_mut(&mut self, kind: LifeSectionKind) -> &mut LifeSection {
        match kind {
            LifeSectionKind::Childhood => &mut self.childhood,
            LifeSectionKind::Education => &mut self.education,
            LifeSectionKind::Career => &mut self.career,
            LifeSectionKind::Family => &mut self.family,
            LifeSectionKind::Challenges => &mut self.challenges,
            LifeSectionKind::Dreams => &mut self.dreams,
        }
    }

    /// Returns the sections in display order.
    pub fn sections(&self) -> impl Iterator<Item = (LifeSectionKind, &LifeSection)> {
        LifeSectionKind::all()
            .iter()
            .map(move |kind| (*kind, self.section(*kind)))
    }

    /// Returns timeline events in display order.
    pub fn timeline(&self) -> &[TimelineEvent] {
        &self.timeline
    }

    /// Returns the narrative draft, if one exists.
    pub fn narrative_draft(&self) -> Option<&str> {
        self.narrative_draft.as_deref()
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn last_generated_at(&self) -> Option<Timestamp> {
        self.last_generated_at
    }

    pub fn customization(&self) -> &Customization {
        &self.customization
    }

    /// Returns the customization title, or [`DEFAULT_TITLE`] when blank.
    pub fn display_title(&self) -> &str {
        let title = self.customization.title.trim();
        if title.is_empty() {
            DEFAULT_TITLE
        } else {
            title
        }
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Returns true when the biography is currently shared.
    pub fn is_public(&self) -> bool {
        self.visibility.is_public
    }

    /// Returns the share token, present once the biography was ever published.
    pub fn public_id(&self) -> Option<&PublicId> {
        self.visibility.public_id.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Mutations
    // ════════════════════════════════════════════════════════════════════════════════

    /// Replaces the personal information.
    pub fn set_personal_information(&mut self, info: PersonalInformation) {
        self.personal_information = info;
        self.touch();
    }

    /// Replaces one section's summary.
    pub fn set_section_summary(&mut self, kind: LifeSectionKind, summary: impl Into<String>) {
        self.section_mut(kind).summary = summary.into();
        self.touch();
    }

    /// Replaces the whole timeline, keeping the supplied order.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::DuplicateId` if two events share an identifier.
    pub fn replace_timeline(&mut self, events: Vec<TimelineEvent>) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for event in &events {
            if !seen.insert(event.id.as_str()) {
                return Err(ValidationError::duplicate_id("timeline", event.id.as_str()));
            }
        }
        self.timeline = events;
        self.touch();
        Ok(())
    }

    /// Replaces the customization settings.
    pub fn set_customization(&mut self, customization: Customization) {
        self.customization = customization;
        self.touch();
    }

    /// Sets the preferred voice without generating anything.
    pub fn set_voice(&mut self, voice: Voice) {
        self.voice = voice;
        self.touch();
    }

    /// Stores freshly generated narrative text.
    pub fn record_generated_story(&mut self, story: impl Into<String>, voice: Voice) {
        let now = Timestamp::now();
        self.narrative_draft = non_blank(story.into());
        self.voice = voice;
        self.last_generated_at = Some(now);
        self.touch();
    }

    /// Applies a manual edit to the draft. Blank text clears the draft.
    pub fn edit_story_draft(&mut self, draft: impl Into<String>) {
        self.narrative_draft = non_blank(draft.into());
        self.touch();
    }

    /// Publishes or hides the biography.
    ///
    /// The share token is minted on first publish and kept forever after.
    pub fn set_visibility(&mut self, is_public: bool) {
        if is_public && self.visibility.public_id.is_none() {
            self.visibility.public_id = Some(PublicId::generate());
        }
        self.visibility.is_public = is_public;
        self.touch();
    }

    fn touch(&mut self) {
        let now = Timestamp::now();
        if now.is_after(&self.updated_at) {
            self.updated_at = now;
        }
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
