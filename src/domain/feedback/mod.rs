//! Advisor feedback: the cached record with annotations, payloads and filter.

mod aggregate;
mod filter;

pub use aggregate::{Annotation, Feedback, FeedbackPatch, NewAnnotation, NewFeedback};
pub use filter::FeedbackFilter;
