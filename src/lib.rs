//! Thesis Sync - offline-first synchronization core
//!
//! Keeps locally cached theses, feedback and users in step with the review
//! API, and owns the authentication session that every remote call runs
//! under.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
