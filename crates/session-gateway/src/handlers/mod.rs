//! HTTP request handlers.

pub mod health;
pub mod meetings;
pub mod tokens;

pub use health::health_check;
pub use meetings::{create_meeting, get_meeting, join_meeting, patch_meeting};
pub use tokens::issue_token;
