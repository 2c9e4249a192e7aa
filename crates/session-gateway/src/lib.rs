//! Session Gateway Library
//!
//! This library provides the core functionality for the Session Gateway -
//! the access-control and lifecycle-tracking service in front of an
//! external real-time media server:
//!
//! - Capability token issuance scoped to (room, participant, role)
//! - Room-name derivation from meeting ids
//! - Meeting scheduling, lookup, and partial update
//! - The meeting lifecycle state machine and join-eligibility windowing
//!
//! # Architecture
//!
//! The gateway follows the Handler -> Service -> Repository pattern:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Capability token signing
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `models` - Data models
//! - `repositories` - Meeting record store
//! - `routes` - Axum router setup
//! - `services` - Room naming, eligibility, lifecycle, token facade

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
