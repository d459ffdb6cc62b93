//! `medportal-auth`: session tokens, roles and page-level access checks.
//!
//! Pure: no HTTP, no storage, no clock reads. Tokens are decoded, never
//! verified; the gateway remains the authority.

pub mod claims;
pub mod guard;
pub mod principal;
pub mod roles;
pub mod session;

pub use claims::{Claims, DecodeError, decode_claims};
pub use guard::{Access, AuthzError, authorize, role_guard};
pub use principal::Principal;
pub use roles::Role;
pub use session::{Session, TokenValidationError, validate_claims, validate_stored_token, validate_token};
