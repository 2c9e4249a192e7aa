//! Room name and meeting URL derivation.
//!
//! Room names are a pure function of the meeting id so that independent
//! callers agree on the room for a meeting without a lookup.

/// Fixed prefix for derived room names.
///
/// Part of the external contract with the media server: changing it orphans
/// every room derived under the old prefix.
pub const ROOM_NAME_PREFIX: &str = "meeting-room-";

/// Derive the room name for a meeting id.
///
/// Deterministic and injective: the same id always yields the same room
/// name, and distinct ids never collide. Empty ids are rejected at the HTTP
/// boundary; here they produce a degenerate but still deterministic name.
pub fn room_name(meeting_id: &str) -> String {
    format!("{}{}", ROOM_NAME_PREFIX, meeting_id)
}

/// Derive the shareable join URL for a meeting.
///
/// Participants are sent through the join page rather than straight into
/// the room.
pub fn meeting_url(public_base_url: &str, meeting_id: &str) -> String {
    format!(
        "{}/meetings/{}/join",
        public_base_url.trim_end_matches('/'),
        meeting_id
    )
}
