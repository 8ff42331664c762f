// Middleware modules for the VMS backend

pub mod auth;
pub mod auth_middleware;
pub mod cors;

// Re-export auth types
pub use auth::{AuthenticatedAdmin, AuthenticatedUser};
pub use auth_middleware::{admin_auth_middleware, auth_middleware};
pub use cors::dynamic_cors_middleware;
