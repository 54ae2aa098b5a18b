//! Cloudflare Access authentication gate.
//!
//! Mutating endpoints require a `CF_Authorization` cookie whose JWT verifies
//! against the team's JWKS document. Outside production the gate is bypassed
//! entirely.

pub mod jwks;
pub mod middleware;

pub use jwks::{AccessClaims, AccessGate};
pub use middleware::{require_access, AccessState};

/// Cookie Cloudflare Access attaches after a successful login.
pub const ACCESS_COOKIE: &str = "CF_Authorization";
