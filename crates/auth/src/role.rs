use serde::{Deserialize, Serialize};

use branchline_core::{
    BranchId, Deletion, DomainError, DomainResult, Entity, PermissionId, RoleId, SoftDelete,
    UserId,
};

/// Whether a role is valid system-wide or confined to one branch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleScope {
    Global,
    Branch,
}

/// A named permission bundle, either global or bound to a single branch.
///
/// The `permissions` list is a denormalized cache of the authoritative
/// binding rows; the stores keep both in sync on assign/revoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub scope: RoleScope,
    pub branch: Option<BranchId>,
    pub permissions: Vec<PermissionId>,
    pub created_by: Option<UserId>,
    pub updated_by: Option<UserId>,
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl Role {
    /// Build a role, enforcing the scope/branch invariant:
    /// a Branch role must carry its branch, a Global role must not.
    pub fn new(
        name: impl Into<String>,
        scope: RoleScope,
        branch: Option<BranchId>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("role name cannot be empty"));
        }
        match (scope, branch) {
            (RoleScope::Branch, None) => Err(DomainError::invariant(
                "branch-scoped role requires a branch",
            )),
            (RoleScope::Global, Some(_)) => Err(DomainError::invariant(
                "global role cannot be bound to a branch",
            )),
            _ => Ok(Self {
                id: RoleId::new(),
                name,
                scope,
                branch,
                permissions: Vec::new(),
                created_by: None,
                updated_by: None,
                deletion: Deletion::active(),
            }),
        }
    }

    /// Uniqueness key: no two non-deleted roles share this triple.
    pub fn uniqueness_key(&self) -> (&str, RoleScope, Option<BranchId>) {
        (self.name.as_str(), self.scope, self.branch)
    }

    /// Add to the denormalized cache (set semantics).
    pub fn cache_permission(&mut self, permission: PermissionId) {
        if !self.permissions.contains(&permission) {
            self.permissions.push(permission);
        }
    }

    /// Remove from the denormalized cache.
    pub fn uncache_permission(&mut self, permission: PermissionId) {
        self.permissions.retain(|p| *p != permission);
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> RoleId {
        self.id
    }
}

impl SoftDelete for Role {
    fn deletion(&self) -> &Deletion {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut Deletion {
        &mut self.deletion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_role_requires_branch() {
        let err = Role::new("waiter", RoleScope::Branch, None).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn global_role_rejects_branch() {
        let err = Role::new("admin", RoleScope::Global, Some(BranchId::new())).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn role_name_cannot_be_blank() {
        let err = Role::new("   ", RoleScope::Global, None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn permission_cache_has_set_semantics() {
        let mut role = Role::new("waiter", RoleScope::Branch, Some(BranchId::new())).unwrap();
        let p = PermissionId::new();
        role.cache_permission(p);
        role.cache_permission(p);
        assert_eq!(role.permissions.len(), 1);
        role.uncache_permission(p);
        assert!(role.permissions.is_empty());
    }
}
