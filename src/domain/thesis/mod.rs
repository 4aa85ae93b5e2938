//! Thesis submissions: the cached record, its payloads and list filter.

mod aggregate;
mod filter;

pub use aggregate::{NewThesis, Thesis, ThesisPatch, ThesisStatus};
pub use filter::ThesisFilter;
