//! User accounts: the cached user record, its payloads and list filter.

mod filter;
mod profile;

pub use filter::UserFilter;
pub use profile::{NewUser, Role, User, UserPatch};
