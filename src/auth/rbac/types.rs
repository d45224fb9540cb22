//! RBAC row models
//!
//! Namespace-scoped permissions derived from federated group membership.

use serde::{Deserialize, Serialize};

/// Permission level a group can hold on a namespace.
///
/// `Full` dominates every narrower kind; the declaration order drives the
/// `Ord` used when collapsing duplicate grants to the strongest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    /// Modify access to a namespace's modules
    Modify,
    /// Full access, implying modify and any narrower kind
    Full,
}

impl PermissionKind {
    /// Whether a held permission satisfies a requested one.
    pub fn satisfies(self, requested: PermissionKind) -> bool {
        self == PermissionKind::Full || self == requested
    }
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionKind::Modify => write!(f, "modify"),
            PermissionKind::Full => write!(f, "full"),
        }
    }
}

impl std::str::FromStr for PermissionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modify" => Ok(PermissionKind::Modify),
            "full" => Ok(PermissionKind::Full),
            _ => Err(format!("Invalid permission kind: {}", s)),
        }
    }
}

/// Module namespace, identified by a unique name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    /// Unique namespace name
    pub name: String,
}

impl Namespace {
    /// Create a namespace with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

/// Group of users, keyed by the group name asserted by the SSO provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroup {
    /// External group name from the identity provider
    pub name: String,
    /// Members of this group are global administrators
    pub site_admin: bool,
}

impl UserGroup {
    /// Create a group with the given name and admin flag
    pub fn new<S: Into<String>>(name: S, site_admin: bool) -> Self {
        Self {
            name: name.into(),
            site_admin,
        }
    }
}

/// Grant of a permission kind to a group on a namespace.
///
/// At most one row exists per (group, namespace) pair; the store enforces
/// last-write-wins on update and the resolver still collapses duplicates to
/// the most permissive kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespacePermission {
    /// Group the permission is granted to
    pub group_name: String,
    /// Namespace the permission applies to
    pub namespace: String,
    /// Granted permission kind
    pub permission: PermissionKind,
}
