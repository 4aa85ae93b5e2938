//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the entity/filter traits, the
//! `FetchResult` state type and the error taxonomy used across the core.

mod entity;
mod errors;
mod fetch_result;
mod ids;
mod timestamp;

pub use entity::{text_matches, Entity, EntityFilter};
pub use errors::{CacheError, RemoteError, SyncError, ValidationError};
pub use fetch_result::FetchResult;
pub use ids::{AnnotationId, FeedbackId, ThesisId, UserId};
pub use timestamp::Timestamp;
