//! Join-eligibility windowing.
//!
//! A scheduled meeting may be joined from 15 minutes before its scheduled
//! start until its nominal duration has elapsed. A live meeting is always
//! joinable regardless of the clock: the host may have started early or the
//! meeting may be running long, and the live override is the only way late
//! joiners can enter an overrunning meeting.

use crate::models::{Meeting, MeetingStatus};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// How early a meeting may be joined, in minutes before scheduled start.
pub const EARLY_JOIN_MINUTES: i64 = 15;

/// Parse the leading integer number of minutes from a free-form duration
/// string such as `"60 min"` or `"90"`.
///
/// Returns `None` when the string does not start with a number. Creation
/// validation rejects such strings, so stored records normally parse.
pub fn parse_duration_minutes(duration: &str) -> Option<i64> {
    let digits: String = duration
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Combine the meeting's local date and time strings into a naive datetime.
///
/// Returns `None` when either string is malformed.
pub fn scheduled_start(meeting: &Meeting) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(&meeting.date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(&meeting.time, "%H:%M").ok()?;
    Some(date.and_time(time))
}

/// Decide whether `now` falls inside the meeting's allowed join window.
///
/// The window is the inclusive interval
/// `[scheduledStart - 15min, scheduledStart + duration]`. A meeting whose
/// status is `live` is joinable regardless of the window. Malformed
/// schedule fields yield an unjoinable window (duration degrades to zero
/// minutes).
pub fn can_join(meeting: &Meeting, now: NaiveDateTime) -> bool {
    if meeting.status == MeetingStatus::Live {
        return true;
    }

    let Some(start) = scheduled_start(meeting) else {
        return false;
    };

    let duration_minutes = parse_duration_minutes(&meeting.duration).unwrap_or(0);
    let opens = start - Duration::minutes(EARLY_JOIN_MINUTES);
    let closes = start + Duration::minutes(duration_minutes);

    now >= opens && now <= closes
}
