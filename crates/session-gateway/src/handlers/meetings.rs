//! Meeting handlers.
//!
//! Implements the meeting resource and join endpoints:
//!
//! - `POST /v1/meetings` - Schedule a meeting
//! - `GET /v1/meetings/{id}` - Fetch a meeting record
//! - `PATCH /v1/meetings/{id}` - Merge fields into a meeting record
//! - `POST /v1/meetings/{id}/join` - Join a meeting and receive a token
//!
//! Status changes arriving through PATCH are routed through the lifecycle
//! manager so the transition graph is enforced at the boundary; the raw
//! store never validates transitions itself.

use crate::errors::SgError;
use crate::models::{
    CreateMeetingRequest, JoinMeetingRequest, JoinMeetingResponse, Meeting, MeetingPatch,
    MeetingStatus, Participant, ParticipantRole,
};
use crate::routes::AppState;
use crate::services::{eligibility, rooms};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Local, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ============================================================================
// Handler: POST /v1/meetings
// ============================================================================

/// Handler for `POST /v1/meetings`.
///
/// Schedules a meeting. The server injects `id` (if absent), `roomName`,
/// `meetingUrl`, `status = scheduled` and the record timestamps.
///
/// # Response
///
/// - 200 OK: Stored meeting record
/// - 400 Bad Request: missing title/date/time, or a duration string that
///   does not start with a number of minutes
/// - 409 Conflict: a meeting with the supplied id already exists
#[instrument(skip(state, request))]
pub async fn create_meeting(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateMeetingRequest>,
) -> Result<Json<Meeting>, SgError> {
    validate_create_request(&request)?;

    let id = match request.id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id,
        None => format!("meeting-{}", Uuid::new_v4()),
    };

    let now = Utc::now();
    let meeting = Meeting {
        room_name: rooms::room_name(&id),
        meeting_url: rooms::meeting_url(&state.config.public_base_url, &id),
        id,
        title: request.title,
        description: request.description,
        date: request.date,
        time: request.time,
        duration: request.duration,
        status: MeetingStatus::Scheduled,
        participants: Vec::new(),
        participant_count: None,
        started_at: None,
        ai_enabled: request.ai_enabled,
        transcription_enabled: request.transcription_enabled,
        recording_enabled: request.recording_enabled,
        outcome: None,
        engagement_score: None,
        created_at: now,
        updated_at: now,
    };

    let stored = state.store.create(meeting).await?;

    info!(
        target: "sg.handlers.meetings",
        meeting_id = %stored.id,
        room_name = %stored.room_name,
        "Meeting scheduled"
    );

    Ok(Json(stored))
}

/// Reject creation requests with missing required fields or a duration
/// string that would silently produce a zero-length join window.
fn validate_create_request(request: &CreateMeetingRequest) -> Result<(), SgError> {
    if request.title.trim().is_empty() {
        return Err(SgError::Validation("title is required".to_string()));
    }
    if request.date.trim().is_empty() {
        return Err(SgError::Validation("date is required".to_string()));
    }
    if request.time.trim().is_empty() {
        return Err(SgError::Validation("time is required".to_string()));
    }
    if eligibility::parse_duration_minutes(&request.duration).is_none() {
        return Err(SgError::Validation(
            "duration must start with a number of minutes (e.g. \"60 min\")".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Handler: GET /v1/meetings/{id}
// ============================================================================

/// Handler for `GET /v1/meetings/{id}`.
///
/// # Response
///
/// - 200 OK: Meeting record
/// - 404 Not Found: no meeting with that id
#[instrument(skip(state), fields(meeting_id = %id))]
pub async fn get_meeting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Meeting>, SgError> {
    let meeting = state.store.get(&id).await?;
    Ok(Json(meeting))
}

// ============================================================================
// Handler: PATCH /v1/meetings/{id}
// ============================================================================

/// Handler for `PATCH /v1/meetings/{id}`.
///
/// Merges the provided fields into the record. A `status` field is applied
/// through the lifecycle manager first, so illegal transitions fail with
/// 409 before anything is written. Derived fields (`roomName`,
/// `meetingUrl`) are not part of the patch surface at all.
///
/// # Response
///
/// - 200 OK: Merged meeting record
/// - 404 Not Found: no meeting with that id
/// - 409 Conflict: illegal status transition
#[instrument(skip(state, patch), fields(meeting_id = %id))]
pub async fn patch_meeting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(mut patch): Json<MeetingPatch>,
) -> Result<Json<Meeting>, SgError> {
    let target_status = patch.status.take();

    let mut meeting = match target_status {
        Some(target) => Some(state.lifecycle.transition(&id, target).await?),
        None => None,
    };

    if !patch.is_empty() {
        meeting = Some(state.store.patch(&id, patch).await?);
    }

    let meeting = match meeting {
        Some(meeting) => meeting,
        // Empty body: behave like a plain touch of updatedAt
        None => state.store.patch(&id, MeetingPatch::default()).await?,
    };

    info!(
        target: "sg.handlers.meetings",
        meeting_id = %id,
        status = %meeting.status,
        "Meeting updated"
    );

    Ok(Json(meeting))
}

// ============================================================================
// Handler: POST /v1/meetings/{id}/join
// ============================================================================

/// Handler for `POST /v1/meetings/{id}/join`.
///
/// Checks join eligibility, records the participant, and returns a
/// capability token scoped to the meeting's room:
///
/// - a host joining a scheduled meeting starts the session
///   (`scheduled -> live`, `participantCount = 1`);
/// - any participant joining a live meeting is appended (idempotently per
///   participant id) and counted;
/// - a non-host joining inside the window of a not-yet-started meeting
///   receives a token without mutating the record.
///
/// # Response
///
/// - 200 OK: `{ token, roomName, meetingUrl }`
/// - 400 Bad Request: missing `participantName`
/// - 403 Forbidden: outside the join window and not live
/// - 404 Not Found: missing, cancelled, or completed meeting
/// - 500 Internal Server Error: signing failure
#[instrument(skip(state, request), fields(meeting_id = %id))]
pub async fn join_meeting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<JoinMeetingRequest>,
) -> Result<Json<JoinMeetingResponse>, SgError> {
    if request.participant_name.trim().is_empty() {
        return Err(SgError::Validation(
            "participantName is required".to_string(),
        ));
    }

    let meeting = state.store.get(&id).await?;

    if meeting.status.is_terminal() {
        return Err(SgError::NotFound(
            "Meeting not found or has ended".to_string(),
        ));
    }

    // Schedule fields are local and unzoned, so the gate runs on local time
    let now = Local::now().naive_local();
    if !eligibility::can_join(&meeting, now) {
        warn!(
            target: "sg.handlers.meetings",
            meeting_id = %id,
            "Join rejected outside eligibility window"
        );
        return Err(SgError::Forbidden(
            "Meeting is not open for joining".to_string(),
        ));
    }

    let role = request.role.unwrap_or(ParticipantRole::Participant);
    let participant = Participant {
        id: request
            .participant_id
            .or_else(|| request.participant_email.clone())
            .unwrap_or_else(|| request.participant_name.clone()),
        name: request.participant_name.clone(),
        email: request.participant_email,
        role,
        joined_at: Some(Utc::now()),
        has_audio: None,
        has_video: None,
    };

    match (meeting.status, role) {
        (MeetingStatus::Scheduled, ParticipantRole::Host) => {
            state.lifecycle.start_session(&id, participant).await?;
        }
        (MeetingStatus::Live, _) => {
            state.lifecycle.join(&id, participant).await?;
        }
        // Early non-host joiner: the room exists, the record is untouched
        // until the host starts the session
        _ => {}
    }

    let token = state
        .tokens
        .issue_for_meeting(&id, &request.participant_name, role)?;

    info!(
        target: "sg.handlers.meetings",
        meeting_id = %id,
        role = ?role,
        "Participant issued join token"
    );

    Ok(Json(JoinMeetingResponse {
        token,
        room_name: meeting.room_name,
        meeting_url: meeting.meeting_url,
    }))
}
