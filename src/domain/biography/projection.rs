//! Public read-only view of a shared biography.

use serde::Serialize;

use crate::domain::foundation::{DomainError, PublicId, Timestamp};
use crate::domain::narrative::narrative_markup;

use super::{BiographyAggregate, Customization, PersonalInformation, TimelineEvent};

/// Where the narrative in a public view came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    /// The stored draft (generated or manually edited).
    Draft,
    /// Composed on the fly from the section summaries.
    Composed,
}

/// What a visitor with the share link may see.
///
/// Carries no owner identity and no unpublished settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBiographyView {
    pub public_id: PublicId,
    pub title: String,
    pub customization: Customization,
    pub personal_information: PersonalInformation,
    pub timeline: Vec<TimelineEvent>,
    pub narrative: String,
    pub narrative_source: NarrativeSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_generated_at: Option<Timestamp>,
}

/// Projects a biography into its public view.
///
/// # Errors
///
/// Returns `NotFound` unless the biography is public. A hidden biography
/// is indistinguishable from one that never existed.
pub fn project(aggregate: &BiographyAggregate) -> Result<PublicBiographyView, DomainError> {
    let public_id = match (aggregate.is_public(), aggregate.public_id()) {
        (true, Some(id)) => id.clone(),
        _ => return Err(DomainError::not_found("Biography not found")),
    };

    let narrative_source = if aggregate.narrative_draft().is_some() {
        NarrativeSource::Draft
    } else {
        NarrativeSource::Composed
    };

    Ok(PublicBiographyView {
        public_id,
        title: aggregate.display_title().to_string(),
        customization: aggregate.customization().clone(),
        personal_information: aggregate.personal_information().clone(),
        timeline: aggregate.timeline().to_vec(),
        narrative: narrative_markup(aggregate).into_owned(),
        narrative_source,
        last_generated_at: aggregate.last_generated_at(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::biography::{LifeSectionKind, Voice};
    use crate::domain::foundation::{ErrorCode, UserId};

    fn biography() -> BiographyAggregate {
        BiographyAggregate::new(UserId::new("owner-42").unwrap())
    }

    #[test]
    fn private_biography_is_not_found() {
        let err = project(&biography()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn hidden_after_publish_is_not_found() {
        let mut bio = biography();
        bio.set_visibility(true);
        bio.set_visibility(false);
        assert_eq!(project(&bio).unwrap_err().code, ErrorCode::NotFound);
    }

    #[test]
    fn public_view_uses_composed_narrative_without_draft() {
        let mut bio = biography();
        bio.set_section_summary(LifeSectionKind::Career, "Ran a bakery");
        bio.set_visibility(true);

        let view = project(&bio).unwrap();
        assert_eq!(view.narrative_source, NarrativeSource::Composed);
        assert!(view.narrative.starts_with("# Autobiography"));
        assert!(view.narrative.contains("Ran a bakery"));
        assert_eq!(Some(&view.public_id), bio.public_id());
    }

    #[test]
    fn public_view_prefers_draft() {
        let mut bio = biography();
        bio.record_generated_story("# My Story\n\nIt began.", Voice::Simple);
        bio.set_visibility(true);

        let view = project(&bio).unwrap();
        assert_eq!(view.narrative_source, NarrativeSource::Draft);
        assert_eq!(view.narrative, "# My Story\n\nIt began.");
        assert!(view.last_generated_at.is_some());
    }

    #[test]
    fn public_view_never_exposes_owner() {
        let mut bio = biography();
        bio.set_visibility(true);
        let json = serde_json::to_string(&project(&bio).unwrap()).unwrap();
        assert!(!json.contains("owner-42"));
        assert!(!json.contains("userId"));
    }
}
