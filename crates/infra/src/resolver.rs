//! Store-backed scope resolution.
//!
//! Fetches the live binding rows for the principal's role, projects them to
//! permission names through the catalog, and delegates the decision to the
//! pure resolver. Read-only: it takes no locks and may run concurrently with
//! cascades on any tenant, observing mid-cascade state consistently because
//! every default read already filters deleted rows.

use std::sync::Arc;

use branchline_auth::{resolve, Decision, Grant, Permission, Principal, RolePermissionBinding};

use crate::permission_catalog::PermissionCatalog;
use crate::store::{Collection, StoreError};

pub struct ScopeResolver {
    bindings: Arc<dyn Collection<RolePermissionBinding>>,
    permissions: Arc<PermissionCatalog>,
}

impl ScopeResolver {
    pub fn new(
        bindings: Arc<dyn Collection<RolePermissionBinding>>,
        permissions: Arc<PermissionCatalog>,
    ) -> Self {
        Self {
            bindings,
            permissions,
        }
    }

    /// Decide whether `principal` holds any one of `required`.
    pub fn resolve(
        &self,
        principal: &Principal,
        required: &[Permission],
    ) -> Result<Decision, StoreError> {
        let Some(role_id) = principal.role else {
            // Short-circuit without touching storage; matches the pure
            // resolver's no-role denial.
            return Ok(resolve(None, &[], required, principal.branch));
        };

        let rows = self.bindings.find(&|b| b.role == role_id)?;

        let mut grants = Vec::with_capacity(rows.len());
        for row in rows {
            // A dangling permission id (hard-removed from the catalog)
            // projects to no grant and therefore denies by default.
            if let Some(name) = self.permissions.name_of(row.permission)? {
                grants.push(Grant {
                    permission: Permission::new(name),
                    branch: row.branch,
                });
            }
        }

        let decision = resolve(Some(role_id), &grants, required, principal.branch);
        if !decision.is_allowed() {
            tracing::debug!(user = %principal.user, "permission check denied");
        }
        Ok(decision)
    }
}
