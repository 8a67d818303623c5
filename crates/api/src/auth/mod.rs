//! Authentication primitives.
//!
//! Accounts and sign-in live in the identity service; this crate only
//! verifies the access tokens it issues.

pub mod jwt;
