// Resource handlers. Everything here sits behind the JWT middleware and
// receives the caller as an `AuthUser` extension; role checks and scoping
// happen in `services`.

pub mod collection_requests;
pub mod households;
