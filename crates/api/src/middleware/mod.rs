//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the actor behind a JWT Bearer token.
//! - [`rbac::RequireBrand`] -- a brand actor, with its brand profile id.
//! - [`rbac::RequireManufacturer`] -- a manufacturer actor, with its profile id.

pub mod auth;
pub mod rbac;
