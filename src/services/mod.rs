//! Resource logic shared by the HTTP handlers. Each operation receives the
//! persistence context and the authenticated caller explicitly.

pub mod collection_requests;
pub mod households;
pub mod identity;
