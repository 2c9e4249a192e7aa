//! Meeting record store.
//!
//! The store is a plain keyed record store: it enforces key uniqueness and
//! existence, nothing more. Business invariants such as legal status
//! transitions belong to the lifecycle manager, layered above raw storage.
//!
//! The trait is the seam for persistence: the reference deployment runs on
//! the in-memory implementation below; a durable keyed store can be swapped
//! in without changing the contract.

use crate::errors::SgError;
use crate::models::{Meeting, MeetingPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keyed record store for meeting metadata.
#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Insert a new record. Fails with [`SgError::Conflict`] when the id is
    /// already taken.
    async fn create(&self, meeting: Meeting) -> Result<Meeting, SgError>;

    /// Fetch a record by id. Fails with [`SgError::NotFound`] when absent.
    async fn get(&self, id: &str) -> Result<Meeting, SgError>;

    /// Merge the provided fields into an existing record, refreshing
    /// `updatedAt`. Fails with [`SgError::NotFound`] when absent; no
    /// partial record is created in that case.
    ///
    /// Concurrent patches to the same field are last-write-wins; derived
    /// fields are not part of [`MeetingPatch`] and cannot be touched here.
    async fn patch(&self, id: &str, patch: MeetingPatch) -> Result<Meeting, SgError>;
}

/// In-memory [`MeetingStore`] keyed by meeting id.
///
/// Records are never physically deleted: cancellation is a state, not an
/// erasure.
#[derive(Default)]
pub struct InMemoryMeetingStore {
    records: RwLock<HashMap<String, Meeting>>,
}

impl InMemoryMeetingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Merge patch fields into a meeting record in place.
fn apply_patch(meeting: &mut Meeting, patch: MeetingPatch) {
    if let Some(title) = patch.title {
        meeting.title = title;
    }
    if let Some(description) = patch.description {
        meeting.description = Some(description);
    }
    if let Some(date) = patch.date {
        meeting.date = date;
    }
    if let Some(time) = patch.time {
        meeting.time = time;
    }
    if let Some(duration) = patch.duration {
        meeting.duration = duration;
    }
    if let Some(status) = patch.status {
        meeting.status = status;
    }
    if let Some(participants) = patch.participants {
        meeting.participants = participants;
    }
    if let Some(participant_count) = patch.participant_count {
        meeting.participant_count = Some(participant_count);
    }
    if let Some(started_at) = patch.started_at {
        meeting.started_at = Some(started_at);
    }
    if let Some(outcome) = patch.outcome {
        meeting.outcome = Some(outcome);
    }
    if let Some(engagement_score) = patch.engagement_score {
        meeting.engagement_score = Some(engagement_score);
    }
    meeting.updated_at = Utc::now();
}

#[async_trait]
impl MeetingStore for InMemoryMeetingStore {
    async fn create(&self, meeting: Meeting) -> Result<Meeting, SgError> {
        let mut records = self.records.write().await;
        if records.contains_key(&meeting.id) {
            return Err(SgError::Conflict(format!(
                "Meeting {} already exists",
                meeting.id
            )));
        }
        records.insert(meeting.id.clone(), meeting.clone());
        Ok(meeting)
    }

    async fn get(&self, id: &str) -> Result<Meeting, SgError> {
        let records = self.records.read().await;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| SgError::NotFound("Meeting not found".to_string()))
    }

    async fn patch(&self, id: &str, patch: MeetingPatch) -> Result<Meeting, SgError> {
        let mut records = self.records.write().await;
        let meeting = records
            .get_mut(id)
            .ok_or_else(|| SgError::NotFound("Meeting not found".to_string()))?;
        apply_patch(meeting, patch);
        Ok(meeting.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::MeetingStatus;

    fn sample_meeting(id: &str) -> Meeting {
        Meeting {
            id: id.to_string(),
            title: "Demo".to_string(),
            description: None,
            date: "2024-01-20".to_string(),
            time: "14:00".to_string(),
            duration: "60 min".to_string(),
            status: MeetingStatus::Scheduled,
            room_name: format!("meeting-room-{}", id),
            meeting_url: format!("http://localhost:3000/meetings/{}/join", id),
            participants: Vec::new(),
            participant_count: None,
            started_at: None,
            ai_enabled: true,
            transcription_enabled: false,
            recording_enabled: false,
            outcome: None,
            engagement_score: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let store = InMemoryMeetingStore::new();
        store.create(sample_meeting("meeting-1")).await.unwrap();

        let fetched = store.get("meeting-1").await.unwrap();
        assert_eq!(fetched.title, "Demo");
        assert_eq!(fetched.status, MeetingStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_create_duplicate_id_conflicts() {
        let store = InMemoryMeetingStore::new();
        store.create(sample_meeting("meeting-1")).await.unwrap();

        let result = store.create(sample_meeting("meeting-1")).await;
        assert!(matches!(result, Err(SgError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = InMemoryMeetingStore::new();
        let result = store.get("meeting-missing").await;
        assert!(matches!(result, Err(SgError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_patch_merges_only_provided_fields() {
        let store = InMemoryMeetingStore::new();
        let created = store.create(sample_meeting("meeting-1")).await.unwrap();

        let patch = MeetingPatch {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = store.patch("meeting-1", patch).await.unwrap();

        assert_eq!(updated.title, "Renamed");
        // Untouched fields survive the merge
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.status, created.status);
        assert_eq!(updated.room_name, created.room_name);
    }

    #[tokio::test]
    async fn test_patch_refreshes_updated_at() {
        let store = InMemoryMeetingStore::new();
        let created = store.create(sample_meeting("meeting-1")).await.unwrap();

        let updated = store
            .patch("meeting-1", MeetingPatch::default())
            .await
            .unwrap();
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_patch_missing_id_leaves_store_unmodified() {
        let store = InMemoryMeetingStore::new();

        let patch = MeetingPatch {
            title: Some("Ghost".to_string()),
            ..Default::default()
        };
        let result = store.patch("meeting-missing", patch).await;
        assert!(matches!(result, Err(SgError::NotFound(_))));

        // No partial record was created
        let result = store.get("meeting-missing").await;
        assert!(matches!(result, Err(SgError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_patch_disjoint_fields_merge_cleanly() {
        let store = InMemoryMeetingStore::new();
        store.create(sample_meeting("meeting-1")).await.unwrap();

        let title_patch = MeetingPatch {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let outcome_patch = MeetingPatch {
            outcome: Some("closed-won".to_string()),
            ..Default::default()
        };
        store.patch("meeting-1", title_patch).await.unwrap();
        let merged = store.patch("meeting-1", outcome_patch).await.unwrap();

        assert_eq!(merged.title, "Renamed");
        assert_eq!(merged.outcome.as_deref(), Some("closed-won"));
    }
}
