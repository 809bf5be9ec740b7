//! UpdateTimelineHandler - Command handler replacing the whole timeline.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::biography::{BiographyAggregate, TimelineEvent};
use crate::domain::foundation::{CommandMetadata, DomainError, EventId, ValidationError};
use crate::ports::BiographyRepository;

/// Command carrying the new timeline.
///
/// `payload` is either `{ "timeline": [...] }` or the bare array.
#[derive(Debug, Clone)]
pub struct UpdateTimelineCommand {
    pub payload: Value,
}

/// Handler replacing the timeline in the supplied order.
pub struct UpdateTimelineHandler {
    repository: Arc<dyn BiographyRepository>,
}

/// One incoming event. A missing or blank id gets a fresh one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineEventInput {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl TimelineEventInput {
    fn into_event(self) -> TimelineEvent {
        let id = self
            .id
            .and_then(|id| EventId::new(id).ok())
            .unwrap_or_else(EventId::generate);
        TimelineEvent {
            id,
            title: self.title,
            date: self.date,
            description: self.description,
            image_url: self.image_url.filter(|s| !s.trim().is_empty()),
            notes: self.notes.filter(|s| !s.trim().is_empty()),
        }
    }
}

fn parse_timeline(payload: Value) -> Result<Vec<TimelineEvent>, ValidationError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("timeline") {
            Some(Value::Array(items)) => items,
            _ => return Err(ValidationError::invalid_format("timeline", "expected an array")),
        },
        _ => return Err(ValidationError::invalid_format("timeline", "expected an array")),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<TimelineEventInput>(item)
                .map(TimelineEventInput::into_event)
                .map_err(|e| {
                    ValidationError::invalid_format(format!("timeline[{}]", index), e.to_string())
                })
        })
        .collect()
}

impl UpdateTimelineHandler {
    pub fn new(repository: Arc<dyn BiographyRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateTimelineCommand,
        metadata: CommandMetadata,
    ) -> Result<BiographyAggregate, DomainError> {
        let events = parse_timeline(cmd.payload)?;

        let biography = self
            .repository
            .update(
                &metadata.user_id,
                Box::new(move |biography: &mut BiographyAggregate| {
                    biography.replace_timeline(events)?;
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(
            user_id = %metadata.user_id,
            events = biography.timeline().len(),
            "Timeline replaced"
        );
        Ok(biography)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryBiographyRepository;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;

    fn setup() -> UpdateTimelineHandler {
        UpdateTimelineHandler::new(Arc::new(InMemoryBiographyRepository::new()))
    }

    async fn replace(handler: &UpdateTimelineHandler, payload: Value) -> Result<BiographyAggregate, DomainError> {
        handler
            .handle(UpdateTimelineCommand { payload }, CommandMetadata::test_fixture())
            .await
    }

    #[tokio::test]
    async fn replaces_timeline_in_supplied_order() {
        let handler = setup();
        let bio = replace(
            &handler,
            json!({ "timeline": [
                { "id": "b", "title": "Second", "date": "1990" },
                { "id": "a", "title": "First", "date": "1980", "notes": "" }
            ]}),
        )
        .await
        .unwrap();

        let ids: Vec<_> = bio.timeline().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert!(bio.timeline()[1].notes.is_none());
    }

    #[tokio::test]
    async fn assigns_ids_to_events_without_one() {
        let handler = setup();
        let bio = replace(&handler, json!([{ "title": "Born" }, { "id": " ", "title": "Moved" }]))
            .await
            .unwrap();

        let ids: Vec<_> = bio.timeline().iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| !id.as_str().trim().is_empty()));
    }

    #[tokio::test]
    async fn empty_array_clears_timeline() {
        let handler = setup();
        replace(&handler, json!([{ "title": "Born" }])).await.unwrap();
        let bio = replace(&handler, json!({ "timeline": [] })).await.unwrap();
        assert!(bio.timeline().is_empty());
    }

    #[tokio::test]
    async fn rejects_non_array_payloads() {
        let handler = setup();
        for payload in [json!({ "timeline": "nope" }), json!({}), json!(7)] {
            let err = replace(&handler, payload).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_ids_and_keeps_previous_timeline() {
        let repo = Arc::new(InMemoryBiographyRepository::new());
        let handler = UpdateTimelineHandler::new(repo.clone());
        replace(&handler, json!([{ "id": "keep", "title": "Kept" }])).await.unwrap();

        let err = replace(&handler, json!([{ "id": "x" }, { "id": "x" }])).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let user = CommandMetadata::test_fixture().user_id;
        let stored = repo.find_by_user(&user).await.unwrap().unwrap();
        assert_eq!(stored.timeline().len(), 1);
        assert_eq!(stored.timeline()[0].id.as_str(), "keep");
    }

    #[tokio::test]
    async fn rejects_wrongly_typed_event_fields() {
        let handler = setup();
        let err = replace(&handler, json!([{ "title": ["not", "text"] }])).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field").map(String::as_str), Some("timeline[0]"));
    }
}
