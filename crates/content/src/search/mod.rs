//! Search service implementations.
//!
//! - [`UnavailableSearch`] - fails every request with `NotImplemented`, for
//!   deployments without an index
//! - [`ContentSearch`] - substring search over any store that implements the
//!   directory, hierarchy and table traits
//!
//! Search never sits on the mutation path; callers can swap implementations
//! without touching the store.

mod content;
mod snippet;
mod unavailable;

pub use content::{BODY_SCORE, ContentSearch, FIELD_SCORE, MAX_SCORE, TITLE_SCORE};
pub use snippet::{contains_ignore_case, create_snippet, find_ignore_case, truncate};
pub use unavailable::UnavailableSearch;
