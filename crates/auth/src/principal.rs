use serde::{Deserialize, Serialize};

use branchline_core::{BranchId, RoleId, UserId};

/// The authenticated caller, as attached by the (external) session layer.
///
/// Modeled as an explicit value passed into every check rather than ambient
/// request state, which keeps resolution a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user: UserId,
    /// The principal's role reference; `None` means no role assigned.
    pub role: Option<RoleId>,
    /// The branch the principal is currently operating in, if any.
    pub branch: Option<BranchId>,
}

impl Principal {
    pub fn new(user: UserId, role: Option<RoleId>, branch: Option<BranchId>) -> Self {
        Self { user, role, branch }
    }
}
