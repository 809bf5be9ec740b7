//! BiographyNormalizer - turns any stored record into a complete aggregate.
//!
//! Stored records may be partial, come from older layouts, or contain
//! wrongly-typed values. Normalization never fails: anything missing or
//! malformed is replaced with its default. Timeline order and existing
//! identifiers are preserved, as are `publicId` and `createdAt`.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::str::FromStr;

use crate::domain::foundation::{EventId, PublicId, Timestamp, UserId};

use super::{
    BiographyAggregate, Customization, FontFamily, LifeSection, LifeSectionKind,
    PersonalInformation, TimelineEvent, Visibility, Voice,
};

/// Stateless normalizer for stored biography records.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiographyNormalizer;

impl BiographyNormalizer {
    /// Normalizes a stored record owned by `user_id`.
    pub fn normalize(user_id: &UserId, raw: &Value) -> BiographyAggregate {
        Self::normalize_at(user_id, raw, Timestamp::now())
    }

    /// Normalizes using `now` for timestamps the record lacks.
    pub fn normalize_at(user_id: &UserId, raw: &Value, now: Timestamp) -> BiographyAggregate {
        let root = raw.as_object();

        let created_at = timestamp_field(root, "createdAt").unwrap_or(now);
        let updated_at = timestamp_field(root, "updatedAt").unwrap_or(created_at);

        BiographyAggregate {
            user_id: user_id.clone(),
            personal_information: personal_information(object_field(root, "personalInformation")),
            childhood: section(root, LifeSectionKind::Childhood),
            education: section(root, LifeSectionKind::Education),
            career: section(root, LifeSectionKind::Career),
            family: section(root, LifeSectionKind::Family),
            challenges: section(root, LifeSectionKind::Challenges),
            dreams: section(root, LifeSectionKind::Dreams),
            timeline: timeline(root.and_then(|r| r.get("timeline"))),
            narrative_draft: optional_string(root, "narrativeDraft")
                .or_else(|| optional_string(root, "storyDraft")),
            voice: voice(root),
            last_generated_at: timestamp_field(root, "lastGeneratedAt"),
            customization: customization(object_field(root, "customization")),
            visibility: visibility(root),
            created_at,
            updated_at,
        }
    }

    /// Re-normalizes an aggregate through its own record.
    ///
    /// Used by tests and repositories to check records are at a fixed point.
    pub fn renormalize(aggregate: &BiographyAggregate) -> BiographyAggregate {
        match aggregate.to_record() {
            Ok(record) => Self::normalize_at(aggregate.user_id(), &record, aggregate.created_at()),
            Err(_) => aggregate.clone(),
        }
    }
}

type Object = Map<String, Value>;

fn object_field<'a>(obj: Option<&'a Object>, key: &str) -> Option<&'a Object> {
    obj.and_then(|o| o.get(key)).and_then(Value::as_object)
}

fn string_field(obj: Option<&Object>, key: &str) -> String {
    obj.and_then(|o| o.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Reads an optional string. Blank strings count as absent.
fn optional_string(obj: Option<&Object>, key: &str) -> Option<String> {
    obj.and_then(|o| o.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn timestamp_field(obj: Option<&Object>, key: &str) -> Option<Timestamp> {
    obj.and_then(|o| o.get(key))
        .and_then(Value::as_str)
        .and_then(Timestamp::parse_rfc3339)
}

fn personal_information(obj: Option<&Object>) -> PersonalInformation {
    PersonalInformation {
        name: string_field(obj, "name"),
        date_of_birth: string_field(obj, "dateOfBirth"),
        birthplace: string_field(obj, "birthplace"),
        background: string_field(obj, "background"),
    }
}

fn section(root: Option<&Object>, kind: LifeSectionKind) -> LifeSection {
    let obj = object_field(root, kind.key()).or_else(|| object_field(root, kind.legacy_key()));
    LifeSection::new(string_field(obj, "summary"))
}

fn voice(root: Option<&Object>) -> Voice {
    optional_string(root, "voice")
        .or_else(|| optional_string(root, "style"))
        .and_then(|raw| Voice::from_str(&raw).ok())
        .unwrap_or_default()
}

fn customization(obj: Option<&Object>) -> Customization {
    let font = optional_string(obj, "font")
        .or_else(|| optional_string(obj, "fontFamily"))
        .and_then(|raw| FontFamily::from_str(&raw).ok())
        .unwrap_or_default();

    Customization {
        title: string_field(obj, "title"),
        subtitle: optional_string(obj, "subtitle"),
        cover_image: optional_string(obj, "coverImage"),
        font,
        favorite_quote: optional_string(obj, "favoriteQuote"),
    }
}

fn visibility(root: Option<&Object>) -> Visibility {
    let nested = object_field(root, "visibility");
    let source = if nested.is_some() { nested } else { root };

    let is_public = source
        .and_then(|o| o.get("isPublic"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let public_id = optional_string(source, "publicId").and_then(|raw| PublicId::new(raw).ok());

    // A biography that is public must always be reachable.
    let public_id = match public_id {
        None if is_public => Some(PublicId::generate()),
        other => other,
    };

    Visibility {
        is_public,
        public_id,
    }
}

fn timeline(raw: Option<&Value>) -> Vec<TimelineEvent> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut taken: HashSet<String> = HashSet::new();
    let mut events = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            continue;
        };
        let obj = Some(obj);

        let base = optional_string(obj, "id").unwrap_or_else(|| format!("event-{}", index + 1));
        let id = unique_id(base, &mut taken);

        events.push(TimelineEvent {
            id,
            title: string_field(obj, "title"),
            date: string_field(obj, "date"),
            description: string_field(obj, "description"),
            image_url: optional_string(obj, "imageUrl"),
            notes: optional_string(obj, "notes"),
        });
    }

    events
}

/// Returns `base` unless already taken, otherwise the first free `base-N`.
fn unique_id(base: String, taken: &mut HashSet<String>) -> EventId {
    let mut candidate = base.clone();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    taken.insert(candidate.clone());
    // Candidates are derived from non-blank strings, so construction cannot fail.
    EventId::new(candidate).unwrap_or_else(|_| EventId::generate())
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
