//! Authentication
//!
//! JWT bearer authentication: token service, claims, and the Axum
//! middleware gate.

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{AuthGateConfig, require_admin, require_auth};
