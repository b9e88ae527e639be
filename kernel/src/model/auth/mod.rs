pub mod event;

/// Opaque bearer token handed out at login and resolved back to a user id
/// on every guarded request.
pub struct AccessToken(pub String);
