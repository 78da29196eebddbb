use serde::{Deserialize, Serialize};

use branchline_core::{
    BranchId, CompanyId, CompanyOwned, Deletion, Entity, RecordId, SoftDelete, UserId,
};

/// Links a user to a company, optionally pinned to one branch.
///
/// A company-level assignment leaves `branch` unset. Uniqueness is enforced
/// by the store on the non-deleted `(user, company, branch)` triple.
/// `is_active` is a suspension switch distinct from deletion: an inactive
/// membership stays visible to default reads but is skipped when tenant
/// teardown collects the users to deactivate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: RecordId,
    pub user: UserId,
    pub company: CompanyId,
    pub branch: Option<BranchId>,
    pub is_active: bool,
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl Membership {
    pub fn new(user: UserId, company: CompanyId, branch: Option<BranchId>) -> Self {
        Self {
            id: RecordId::new(),
            user,
            company,
            branch,
            is_active: true,
            deletion: Deletion::active(),
        }
    }

    /// Uniqueness key: no two non-deleted memberships share this triple.
    pub fn triple(&self) -> (UserId, CompanyId, Option<BranchId>) {
        (self.user, self.company, self.branch)
    }

    /// Suspend the assignment without deleting it. An inactive membership
    /// keeps its uniqueness slot but no longer links the user to the tenant
    /// for teardown purposes.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn reactivate(&mut self) {
        self.is_active = true;
    }
}

impl Entity for Membership {
    type Id = RecordId;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl CompanyOwned for Membership {
    fn company(&self) -> CompanyId {
        self.company
    }
}

impl SoftDelete for Membership {
    fn deletion(&self) -> &Deletion {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut Deletion {
        &mut self.deletion
    }
}
