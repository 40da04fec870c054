//! Auth domain - JWT verification for staff and admin callers
//!
//! Tokens are issued by the identity provider with the shared secret; the
//! server only verifies them. Customers taking the quiz are anonymous.

pub mod jwt;

pub use jwt::{Claims, JwtService};
