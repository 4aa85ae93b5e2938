//! Domain layer containing the entities the client caches and the
//! vocabulary of the sync core.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, `FetchResult`, errors)
//! - `thesis` - Thesis submissions
//! - `feedback` - Advisor feedback and inline annotations
//! - `user` - User accounts and roles
//! - `session` - Credential, session epoch, unauthorized event

pub mod feedback;
pub mod foundation;
pub mod session;
pub mod thesis;
pub mod user;
