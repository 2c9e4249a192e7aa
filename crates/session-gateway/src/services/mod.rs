//! Business logic composed by the HTTP handlers.

pub mod eligibility;
pub mod lifecycle;
pub mod rooms;
pub mod token_service;

pub use lifecycle::SessionLifecycleManager;
pub use token_service::TokenService;
