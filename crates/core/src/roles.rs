//! Actor roles carried in access-token claims.
//!
//! A role scopes which profile an actor id resolves to in the profile
//! directory. Values must match the `role` claim issued by the identity
//! service.

use serde::{Deserialize, Serialize};

pub const ROLE_BRAND: &str = "brand";
pub const ROLE_MANUFACTURER: &str = "manufacturer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Brand,
    Manufacturer,
}

impl ActorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brand => ROLE_BRAND,
            Self::Manufacturer => ROLE_MANUFACTURER,
        }
    }

    pub fn parse(role: &str) -> Option<Self> {
        match role {
            ROLE_BRAND => Some(Self::Brand),
            ROLE_MANUFACTURER => Some(Self::Manufacturer),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
