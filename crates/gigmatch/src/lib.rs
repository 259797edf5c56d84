//! Freelancer-to-job matching with moderated match review.
//!
//! The [`workflows::matching`] module holds the scoring engine and the service that
//! persists ranked candidates through caller-supplied collaborators.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
