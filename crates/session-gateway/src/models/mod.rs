//! Session Gateway models.
//!
//! Contains the meeting data model and the request/response types used by
//! the HTTP API. The wire format is camelCase JSON throughout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Meeting status enumeration.
///
/// Represents the lifecycle state of a meeting. Transitions between states
/// are enforced by the lifecycle manager, not by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    /// Meeting is scheduled but not yet active.
    Scheduled,

    /// Meeting is currently in progress.
    Live,

    /// Meeting has ended normally.
    Completed,

    /// Meeting was cancelled before it started.
    Cancelled,
}

impl MeetingStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Live => "live",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true if no further transitions are possible from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MeetingStatus::Completed | MeetingStatus::Cancelled)
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a participant within a single meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    /// Meeting host. Receives room admin rights in issued tokens.
    Host,

    /// Regular participant.
    Participant,
}

impl ParticipantRole {
    pub fn is_host(&self) -> bool {
        matches!(self, ParticipantRole::Host)
    }
}

/// A participant entry owned by exactly one meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Participant identifier. May coincide with the participant's email.
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub role: ParticipantRole,

    /// Set when the participant joins; refreshed on re-join.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_audio: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_video: Option<bool>,
}

/// A meeting record as stored and served by the gateway.
///
/// `room_name` and `meeting_url` are derived from `id` at creation time and
/// are never writable through the patch surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    /// Unique meeting identifier, assigned at creation.
    pub id: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Scheduled date, local and unzoned ("YYYY-MM-DD").
    pub date: String,

    /// Scheduled start time, local and unzoned ("HH:MM").
    pub time: String,

    /// Free-form duration with a leading number of minutes (e.g. "60 min").
    pub duration: String,

    pub status: MeetingStatus,

    /// Derived room identifier; deterministic function of `id`.
    pub room_name: String,

    /// Derived shareable join URL.
    pub meeting_url: String,

    #[serde(default)]
    pub participants: Vec<Participant>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    pub ai_enabled: bool,
    pub transcription_enabled: bool,
    pub recording_enabled: bool,

    /// Post-session outcome summary, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /v1/meetings`.
///
/// Server-assigned fields (`roomName`, `meetingUrl`, `createdAt`,
/// `updatedAt`) are injected by the handler; `id` is injected if absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingRequest {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub time: String,

    #[serde(default)]
    pub duration: String,

    #[serde(default)]
    pub ai_enabled: bool,

    #[serde(default)]
    pub transcription_enabled: bool,

    #[serde(default)]
    pub recording_enabled: bool,
}

/// Partial update for a meeting record.
///
/// Only provided fields are merged. Derived fields (`roomName`,
/// `meetingUrl`) are deliberately absent: they cannot be patched.
/// A `status` change is routed through the lifecycle manager by the
/// handler before the remaining fields reach the store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<String>,
    pub status: Option<MeetingStatus>,
    pub participants: Option<Vec<Participant>>,
    pub participant_count: Option<u32>,
    pub started_at: Option<DateTime<Utc>>,
    pub outcome: Option<String>,
    pub engagement_score: Option<f64>,
}

impl MeetingPatch {
    /// Returns true if no fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.duration.is_none()
            && self.status.is_none()
            && self.participants.is_none()
            && self.participant_count.is_none()
            && self.started_at.is_none()
            && self.outcome.is_none()
            && self.engagement_score.is_none()
    }
}

/// Request body for `POST /v1/tokens`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[serde(default)]
    pub room_name: String,

    #[serde(default)]
    pub participant_name: String,

    #[serde(default)]
    pub is_host: bool,
}

/// Response body for `POST /v1/tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque signed credential scoped to one room.
    pub token: String,
}

/// Request body for `POST /v1/meetings/{id}/join`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinMeetingRequest {
    #[serde(default)]
    pub participant_name: String,

    /// Stable participant identifier. Falls back to the email, then to the
    /// display name, when absent.
    #[serde(default)]
    pub participant_id: Option<String>,

    #[serde(default)]
    pub participant_email: Option<String>,

    /// Defaults to `participant` when absent.
    #[serde(default)]
    pub role: Option<ParticipantRole>,
}

/// Response body for `POST /v1/meetings/{id}/join`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinMeetingResponse {
    pub token: String,
    pub room_name: String,
    pub meeting_url: String,
}

/// Health check response, returned by `GET /v1/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status ("healthy").
    pub status: String,

    /// Deployment region.
    pub region: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(MeetingStatus::Scheduled.as_str(), "scheduled");
        assert_eq!(MeetingStatus::Live.as_str(), "live");
        assert_eq!(MeetingStatus::Completed.as_str(), "completed");
        assert_eq!(MeetingStatus::Cancelled.as_str(), "cancelled");
    }

    #[test]
    fn test_status_terminal_states() {
        assert!(!MeetingStatus::Scheduled.is_terminal());
        assert!(!MeetingStatus::Live.is_terminal());
        assert!(MeetingStatus::Completed.is_terminal());
        assert!(MeetingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&MeetingStatus::Scheduled).unwrap();
        assert_eq!(json, "\"scheduled\"");
    }

    #[test]
    fn test_token_request_defaults() {
        let request: TokenRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.room_name, "");
        assert_eq!(request.participant_name, "");
        assert!(!request.is_host);
    }

    #[test]
    fn test_meeting_patch_is_empty() {
        let patch = MeetingPatch::default();
        assert!(patch.is_empty());

        let patch = MeetingPatch {
            title: Some("Updated".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        // A status-only patch is not empty either
        let patch = MeetingPatch {
            status: Some(MeetingStatus::Cancelled),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_meeting_patch_rejects_nothing_but_ignores_derived_fields() {
        // roomName in a patch body is simply not a known field and is ignored
        let json = r#"{"title": "New title", "roomName": "meeting-room-hijack"}"#;
        let patch: MeetingPatch = serde_json::from_str(json).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New title"));
    }

    #[test]
    fn test_participant_role_is_host() {
        assert!(ParticipantRole::Host.is_host());
        assert!(!ParticipantRole::Participant.is_host());
    }
}
