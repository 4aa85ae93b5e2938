//! Entity synchronizers.
//!
//! [`EntitySync`] holds the cache/remote binding and the shared read and
//! write flows; the per-entity synchronizers add validation and the flows
//! specific to their entity.

mod entity_sync;
mod feedback;
mod thesis;
mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use entity_sync::EntitySync;
pub use feedback::FeedbackSynchronizer;
pub use thesis::ThesisSynchronizer;
pub use user::UserSynchronizer;
