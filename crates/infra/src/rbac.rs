//! Role and role-permission-binding storage.
//!
//! Binding rows are the authoritative grant record; each role also carries a
//! denormalized permission-id cache that is kept in sync here on every
//! assign/revoke. Uniqueness rules apply to non-deleted rows only, so a
//! revoked or torn-down grant never blocks re-granting the same triple.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use branchline_auth::{Role, RolePermissionBinding, RoleScope};
use branchline_core::{BranchId, PermissionId, RoleId};

use crate::error::{EngineError, EngineResult};
use crate::permission_catalog::PermissionCatalog;
use crate::store::Collection;

/// Partial update for a role.
#[derive(Debug, Clone, Default)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub scope: Option<RoleScope>,
    pub branch: Option<BranchId>,
}

pub struct RbacStore {
    roles: Arc<dyn Collection<Role>>,
    bindings: Arc<dyn Collection<RolePermissionBinding>>,
    permissions: Arc<PermissionCatalog>,
}

impl RbacStore {
    pub fn new(
        roles: Arc<dyn Collection<Role>>,
        bindings: Arc<dyn Collection<RolePermissionBinding>>,
        permissions: Arc<PermissionCatalog>,
    ) -> Self {
        Self {
            roles,
            bindings,
            permissions,
        }
    }

    /// Create a role. No two non-deleted roles may share
    /// `(name, scope, branch)`; a previously soft-deleted role does not
    /// block the triple.
    pub fn create_role(
        &self,
        name: impl Into<String>,
        scope: RoleScope,
        branch: Option<BranchId>,
    ) -> EngineResult<Role> {
        let role = Role::new(name, scope, branch)?;
        let duplicates = self
            .roles
            .find(&|r| r.uniqueness_key() == role.uniqueness_key())?;
        if !duplicates.is_empty() {
            return Err(EngineError::conflict(
                "role already exists in this scope/branch",
            ));
        }
        self.roles.insert(role.clone())?;
        tracing::debug!(role = %role.id, name = %role.name, "role created");
        Ok(role)
    }

    pub fn get_role(&self, id: RoleId) -> EngineResult<Option<Role>> {
        Ok(self.roles.get(id)?)
    }

    pub fn list_roles(&self) -> EngineResult<Vec<Role>> {
        Ok(self.roles.list()?)
    }

    /// Update name/scope/branch, re-checking the scope invariant and the
    /// uniqueness rule against the other non-deleted roles.
    pub fn update_role(&self, id: RoleId, update: RoleUpdate) -> EngineResult<Role> {
        let mut role = self.roles.get(id)?.ok_or_else(EngineError::not_found)?;

        let name = update.name.unwrap_or_else(|| role.name.clone());
        let scope = update.scope.unwrap_or(role.scope);
        let branch = match scope {
            RoleScope::Branch => update.branch.or(role.branch),
            RoleScope::Global => None,
        };

        match (scope, branch) {
            (RoleScope::Branch, None) => {
                return Err(EngineError::invariant(
                    "branch-scoped role requires a branch",
                ));
            }
            _ => {}
        }

        let key = (name.as_str(), scope, branch);
        let duplicates = self
            .roles
            .find(&|r| r.id != id && r.uniqueness_key() == key)?;
        if !duplicates.is_empty() {
            return Err(EngineError::conflict(
                "another role with this name already exists in the same scope/branch",
            ));
        }

        role.name = name;
        role.scope = scope;
        role.branch = branch;
        self.roles.update(role.clone())?;
        Ok(role)
    }

    /// Soft-delete a role together with its live bindings.
    pub fn delete_role(&self, id: RoleId, at: DateTime<Utc>) -> EngineResult<Role> {
        let role = self.roles.get(id)?.ok_or_else(EngineError::not_found)?;
        self.bindings.mark_deleted_where(&|b| b.role == id, at)?;
        self.roles.mark_deleted_where(&|r| r.id == id, at)?;
        tracing::debug!(role = %id, "role soft-deleted");
        Ok(role)
    }

    /// Grant a permission to a role.
    ///
    /// Branch rules: a Branch-scoped role's binding carries the role's own
    /// branch unless an explicit override names it; an override naming any
    /// other branch is rejected. A Global role's bindings are branchless.
    /// This creation-time check is the primary gatekeeper for scope
    /// isolation; the resolver re-checks at read time.
    pub fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
        branch_override: Option<BranchId>,
    ) -> EngineResult<RolePermissionBinding> {
        let mut role = self.roles.get(role_id)?.ok_or_else(EngineError::not_found)?;
        if self.permissions.get(permission_id)?.is_none() {
            return Err(EngineError::not_found());
        }

        let branch = match role.scope {
            RoleScope::Branch => {
                let bound = branch_override.or(role.branch);
                match (bound, role.branch) {
                    (Some(b), Some(own)) if b != own => {
                        return Err(EngineError::conflict(
                            "binding branch must match the role's branch",
                        ));
                    }
                    (None, _) => {
                        return Err(EngineError::invariant(
                            "branch is required for branch-scoped roles",
                        ));
                    }
                    (Some(b), _) => Some(b),
                }
            }
            RoleScope::Global => None,
        };

        let triple = (role_id, permission_id, branch);
        let existing = self.bindings.find(&|b| b.triple() == triple)?;
        if !existing.is_empty() {
            return Err(EngineError::conflict(
                "this permission is already assigned to this role",
            ));
        }

        let binding = RolePermissionBinding::new(role_id, permission_id, branch);
        self.bindings.insert(binding.clone())?;

        role.cache_permission(permission_id);
        self.roles.update(role)?;

        tracing::debug!(role = %role_id, permission = %permission_id, "permission assigned");
        Ok(binding)
    }

    /// Revoke a permission from a role: soft-delete the matching bindings
    /// and drop the cache entry.
    pub fn revoke_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> EngineResult<()> {
        let mut role = self.roles.get(role_id)?.ok_or_else(EngineError::not_found)?;
        self.bindings.mark_deleted_where(
            &|b| b.role == role_id && b.permission == permission_id,
            Utc::now(),
        )?;
        role.uncache_permission(permission_id);
        self.roles.update(role)?;
        Ok(())
    }

    /// Live bindings for a role.
    pub fn bindings_for(&self, role_id: RoleId) -> EngineResult<Vec<RolePermissionBinding>> {
        Ok(self.bindings.find(&|b| b.role == role_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemCollection;
    use branchline_core::DomainError;

    fn store() -> RbacStore {
        RbacStore::new(
            Arc::new(MemCollection::new()),
            Arc::new(MemCollection::new()),
            Arc::new(PermissionCatalog::new()),
        )
    }

    fn assert_conflict(err: EngineError) {
        assert!(matches!(err, EngineError::Domain(DomainError::Conflict(_))));
    }

    #[test]
    fn duplicate_live_role_triple_conflicts() {
        let rbac = store();
        let branch = BranchId::new();
        rbac.create_role("waiter", RoleScope::Branch, Some(branch))
            .unwrap();
        let err = rbac
            .create_role("waiter", RoleScope::Branch, Some(branch))
            .unwrap_err();
        assert_conflict(err);
    }

    #[test]
    fn same_name_in_another_branch_is_allowed() {
        let rbac = store();
        rbac.create_role("waiter", RoleScope::Branch, Some(BranchId::new()))
            .unwrap();
        rbac.create_role("waiter", RoleScope::Branch, Some(BranchId::new()))
            .unwrap();
    }

    #[test]
    fn soft_deleted_role_frees_its_uniqueness_triple() {
        let rbac = store();
        let branch = BranchId::new();
        let first = rbac
            .create_role("waiter", RoleScope::Branch, Some(branch))
            .unwrap();
        rbac.delete_role(first.id, Utc::now()).unwrap();
        rbac.create_role("waiter", RoleScope::Branch, Some(branch))
            .unwrap();
    }

    #[test]
    fn deleting_a_role_soft_deletes_its_bindings() {
        let rbac = store();
        let branch = BranchId::new();
        let role = rbac
            .create_role("waiter", RoleScope::Branch, Some(branch))
            .unwrap();
        let perm = rbac.permissions.create("create-order", None).unwrap();
        rbac.assign_permission(role.id, perm.id, None).unwrap();

        rbac.delete_role(role.id, Utc::now()).unwrap();
        assert!(rbac.bindings_for(role.id).unwrap().is_empty());
    }

    #[test]
    fn binding_defaults_to_the_roles_own_branch() {
        let rbac = store();
        let branch = BranchId::new();
        let role = rbac
            .create_role("waiter", RoleScope::Branch, Some(branch))
            .unwrap();
        let perm = rbac.permissions.create("create-order", None).unwrap();
        let binding = rbac.assign_permission(role.id, perm.id, None).unwrap();
        assert_eq!(binding.branch, Some(branch));
    }

    #[test]
    fn binding_rejects_a_foreign_branch_override() {
        let rbac = store();
        let role = rbac
            .create_role("waiter", RoleScope::Branch, Some(BranchId::new()))
            .unwrap();
        let perm = rbac.permissions.create("create-order", None).unwrap();
        let err = rbac
            .assign_permission(role.id, perm.id, Some(BranchId::new()))
            .unwrap_err();
        assert_conflict(err);
    }

    #[test]
    fn global_role_bindings_are_branchless() {
        let rbac = store();
        let role = rbac.create_role("admin", RoleScope::Global, None).unwrap();
        let perm = rbac.permissions.create("list-companies", None).unwrap();
        let binding = rbac.assign_permission(role.id, perm.id, None).unwrap();
        assert_eq!(binding.branch, None);
    }

    #[test]
    fn duplicate_live_binding_conflicts_until_revoked() {
        let rbac = store();
        let role = rbac.create_role("admin", RoleScope::Global, None).unwrap();
        let perm = rbac.permissions.create("list-companies", None).unwrap();
        rbac.assign_permission(role.id, perm.id, None).unwrap();

        let err = rbac.assign_permission(role.id, perm.id, None).unwrap_err();
        assert_conflict(err);

        rbac.revoke_permission(role.id, perm.id).unwrap();
        rbac.assign_permission(role.id, perm.id, None).unwrap();
    }

    #[test]
    fn assign_and_revoke_keep_the_role_cache_in_sync() {
        let rbac = store();
        let role = rbac.create_role("admin", RoleScope::Global, None).unwrap();
        let perm = rbac.permissions.create("list-companies", None).unwrap();

        rbac.assign_permission(role.id, perm.id, None).unwrap();
        assert_eq!(
            rbac.get_role(role.id).unwrap().unwrap().permissions,
            vec![perm.id]
        );

        rbac.revoke_permission(role.id, perm.id).unwrap();
        assert!(rbac.get_role(role.id).unwrap().unwrap().permissions.is_empty());
    }

    #[test]
    fn assigning_to_a_missing_or_deleted_role_is_not_found() {
        let rbac = store();
        let perm = rbac.permissions.create("create-order", None).unwrap();
        let err = rbac
            .assign_permission(RoleId::new(), perm.id, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Domain(DomainError::NotFound)));
    }

    #[test]
    fn assigning_an_unknown_permission_is_not_found() {
        let rbac = store();
        let role = rbac.create_role("admin", RoleScope::Global, None).unwrap();
        let err = rbac
            .assign_permission(role.id, PermissionId::new(), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Domain(DomainError::NotFound)));
    }

    #[test]
    fn update_role_rejects_collision_with_live_role() {
        let rbac = store();
        rbac.create_role("manager", RoleScope::Global, None).unwrap();
        let other = rbac.create_role("admin", RoleScope::Global, None).unwrap();
        let err = rbac
            .update_role(
                other.id,
                RoleUpdate {
                    name: Some("manager".into()),
                    ..RoleUpdate::default()
                },
            )
            .unwrap_err();
        assert_conflict(err);
    }
}
