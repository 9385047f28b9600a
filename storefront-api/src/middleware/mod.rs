/// Middleware for the API server
///
/// - `security`: Security response headers
///
/// Bearer authentication lives in `app::jwt_auth_layer`, next to the router
/// it guards.

pub mod security;
