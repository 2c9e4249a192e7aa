//! Storage layer for meeting records.

pub mod meetings;

pub use meetings::{InMemoryMeetingStore, MeetingStore};
