use serde::{Deserialize, Serialize};

use branchline_core::{
    BindingId, BranchId, Deletion, Entity, PermissionId, RoleId, SoftDelete, UserId,
};

/// The authoritative grant record: one permission to one role, optionally
/// qualified by branch.
///
/// Uniqueness is enforced by the store on the non-deleted
/// `(role, permission, branch)` triple, so a previously revoked grant can be
/// re-issued later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionBinding {
    pub id: BindingId,
    pub role: RoleId,
    pub permission: PermissionId,
    pub branch: Option<BranchId>,
    pub created_by: Option<UserId>,
    pub updated_by: Option<UserId>,
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl RolePermissionBinding {
    pub fn new(role: RoleId, permission: PermissionId, branch: Option<BranchId>) -> Self {
        Self {
            id: BindingId::new(),
            role,
            permission,
            branch,
            created_by: None,
            updated_by: None,
            deletion: Deletion::active(),
        }
    }

    /// Uniqueness key: no two non-deleted bindings share this triple.
    pub fn triple(&self) -> (RoleId, PermissionId, Option<BranchId>) {
        (self.role, self.permission, self.branch)
    }
}

impl Entity for RolePermissionBinding {
    type Id = BindingId;

    fn id(&self) -> BindingId {
        self.id
    }
}

impl SoftDelete for RolePermissionBinding {
    fn deletion(&self) -> &Deletion {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut Deletion {
        &mut self.deletion
    }
}
