//! Authenticated principals.
//!
//! Staff (admin + security) share one table and one id sequence; hosts live
//! in their own table with an independent sequence. An id alone is therefore
//! ambiguous -- `(id, kind)` is the real authentication identity, and the
//! session always carries both.

use crate::entities::{hosts, users};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant stored in the session alongside the numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Admin,
    Security,
    Host,
}

impl PrincipalKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Security => "security",
            Self::Host => "host",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "security" => Some(Self::Security),
            "host" => Some(Self::Host),
            _ => None,
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role column of the staff (`users`) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    Superadmin,
    Security,
}

impl StaffRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
            Self::Security => "security",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "superadmin" => Some(Self::Superadmin),
            "security" => Some(Self::Security),
            _ => None,
        }
    }

    /// The session kind this role maps to. Superadmin is an admin for
    /// discrimination purposes.
    #[must_use]
    pub const fn kind(self) -> PrincipalKind {
        match self {
            Self::Admin | Self::Superadmin => PrincipalKind::Admin,
            Self::Security => PrincipalKind::Security,
        }
    }
}

/// A resolved, authenticated actor. Visitors are never principals.
#[derive(Debug, Clone)]
pub enum Principal {
    Staff(users::Model),
    Host(hosts::Model),
}

impl Principal {
    #[must_use]
    pub fn id(&self) -> i32 {
        match self {
            Self::Staff(u) => u.id,
            Self::Host(h) => h.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Self::Staff(u) => StaffRole::parse(&u.role)
                .map_or(PrincipalKind::Admin, StaffRole::kind),
            Self::Host(_) => PrincipalKind::Host,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        match self {
            Self::Staff(u) => &u.username,
            Self::Host(h) => &h.username,
        }
    }

    /// Whether this principal may currently act. Hosts additionally require
    /// admin approval.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Staff(u) => u.is_active,
            Self::Host(h) => h.is_active && h.is_approved,
        }
    }

    #[must_use]
    pub const fn as_host(&self) -> Option<&hosts::Model> {
        match self {
            Self::Host(h) => Some(h),
            Self::Staff(_) => None,
        }
    }

    #[must_use]
    pub const fn as_staff(&self) -> Option<&users::Model> {
        match self {
            Self::Staff(u) => Some(u),
            Self::Host(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            PrincipalKind::Admin,
            PrincipalKind::Security,
            PrincipalKind::Host,
        ] {
            assert_eq!(PrincipalKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PrincipalKind::parse("visitor"), None);
    }

    #[test]
    fn test_superadmin_discriminates_as_admin() {
        assert_eq!(StaffRole::Superadmin.kind(), PrincipalKind::Admin);
        assert_eq!(StaffRole::Admin.kind(), PrincipalKind::Admin);
        assert_eq!(StaffRole::Security.kind(), PrincipalKind::Security);
    }
}
