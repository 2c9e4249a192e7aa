//! Meeting lifecycle state machine.
//!
//! Orchestrates state transitions of a meeting record on top of the raw
//! store. The machine is purely reactive: there are no timers and no
//! automatic `live -> completed` timeout. Absence of the host does not end
//! a meeting; an external watchdog that wants that policy calls the same
//! transition operations.
//!
//! Legal transitions:
//!
//! ```text
//! scheduled -> live       (host starts the session)
//! live      -> completed  (host ends the session or disconnects terminally)
//! scheduled -> cancelled  (explicit cancellation)
//! ```
//!
//! Everything else fails with `IllegalTransition` and leaves the record
//! unchanged.

use crate::errors::SgError;
use crate::models::{Meeting, MeetingPatch, MeetingStatus, Participant};
use crate::repositories::MeetingStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Returns true if `from -> to` is a legal lifecycle transition.
fn is_legal_transition(from: MeetingStatus, to: MeetingStatus) -> bool {
    matches!(
        (from, to),
        (MeetingStatus::Scheduled, MeetingStatus::Live)
            | (MeetingStatus::Live, MeetingStatus::Completed)
            | (MeetingStatus::Scheduled, MeetingStatus::Cancelled)
    )
}

/// Orchestrates meeting state transitions and participant-join side
/// effects, composing the store with the transition rules above.
#[derive(Clone)]
pub struct SessionLifecycleManager {
    store: Arc<dyn MeetingStore>,
}

impl SessionLifecycleManager {
    pub fn new(store: Arc<dyn MeetingStore>) -> Self {
        SessionLifecycleManager { store }
    }

    /// Move a meeting to `target`, applying the side effects the target
    /// state requires. The store is only touched after the transition has
    /// been validated, so an illegal request leaves state unchanged.
    pub async fn transition(&self, id: &str, target: MeetingStatus) -> Result<Meeting, SgError> {
        let meeting = self.store.get(id).await?;

        if !is_legal_transition(meeting.status, target) {
            return Err(SgError::IllegalTransition {
                from: meeting.status,
                to: target,
            });
        }

        let patch = match target {
            MeetingStatus::Live => MeetingPatch {
                status: Some(MeetingStatus::Live),
                started_at: Some(Utc::now()),
                participant_count: Some(1),
                ..Default::default()
            },
            _ => MeetingPatch {
                status: Some(target),
                ..Default::default()
            },
        };

        let updated = self.store.patch(id, patch).await?;
        info!(
            target: "sg.lifecycle",
            meeting_id = %id,
            from = %meeting.status,
            to = %target,
            "Meeting transitioned"
        );
        Ok(updated)
    }

    /// Start a scheduled session: `scheduled -> live`, recording the host
    /// as the first participant.
    pub async fn start_session(&self, id: &str, host: Participant) -> Result<Meeting, SgError> {
        let meeting = self.store.get(id).await?;

        if !is_legal_transition(meeting.status, MeetingStatus::Live) {
            return Err(SgError::IllegalTransition {
                from: meeting.status,
                to: MeetingStatus::Live,
            });
        }

        let participants = upsert_participant(meeting.participants, host);

        let patch = MeetingPatch {
            status: Some(MeetingStatus::Live),
            started_at: Some(Utc::now()),
            participant_count: Some(1),
            participants: Some(participants),
            ..Default::default()
        };

        let updated = self.store.patch(id, patch).await?;
        info!(target: "sg.lifecycle", meeting_id = %id, "Session started");
        Ok(updated)
    }

    /// End a live session: `live -> completed`.
    pub async fn end_session(&self, id: &str) -> Result<Meeting, SgError> {
        self.transition(id, MeetingStatus::Completed).await
    }

    /// Cancel a scheduled meeting: `scheduled -> cancelled`.
    pub async fn cancel(&self, id: &str) -> Result<Meeting, SgError> {
        self.transition(id, MeetingStatus::Cancelled).await
    }

    /// Record a participant joining a live meeting.
    ///
    /// Does not change `status`. Idempotent per participant id: a re-join
    /// refreshes `joinedAt` instead of duplicating the entry, and only a
    /// first join increments `participantCount`.
    pub async fn join(&self, id: &str, participant: Participant) -> Result<Meeting, SgError> {
        let meeting = self.store.get(id).await?;

        if meeting.status != MeetingStatus::Live {
            return Err(SgError::Forbidden("Meeting is not live".to_string()));
        }

        let is_rejoin = meeting.participants.iter().any(|p| p.id == participant.id);
        let current_count = meeting
            .participant_count
            .unwrap_or(meeting.participants.len() as u32);
        let participant_id = participant.id.clone();
        let participants = upsert_participant(meeting.participants, participant);

        let patch = MeetingPatch {
            participants: Some(participants),
            participant_count: Some(if is_rejoin {
                current_count
            } else {
                current_count + 1
            }),
            ..Default::default()
        };

        let updated = self.store.patch(id, patch).await?;
        info!(
            target: "sg.lifecycle",
            meeting_id = %id,
            participant_id = %participant_id,
            rejoin = is_rejoin,
            "Participant joined"
        );
        Ok(updated)
    }
}

/// Append a participant, or refresh the existing entry with the same id.
fn upsert_participant(
    mut participants: Vec<Participant>,
    incoming: Participant,
) -> Vec<Participant> {
    match participants.iter_mut().find(|p| p.id == incoming.id) {
        Some(existing) => {
            existing.name = incoming.name;
            existing.role = incoming.role;
            existing.joined_at = incoming.joined_at;
            if incoming.email.is_some() {
                existing.email = incoming.email;
            }
            if incoming.has_audio.is_some() {
                existing.has_audio = incoming.has_audio;
            }
            if incoming.has_video.is_some() {
                existing.has_video = incoming.has_video;
            }
        }
        None => participants.push(incoming),
    }
    participants
}
