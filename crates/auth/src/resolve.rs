//! Pure scope resolution.
//!
//! Given a principal's role reference, the grants that role currently holds,
//! and the permissions a protected operation requires, decide allow/deny.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)

use serde::{Deserialize, Serialize};

use branchline_core::{BranchId, RoleId};

use crate::Permission;

/// A projected grant: the permission name a live binding confers, plus the
/// branch the binding is qualified to (none for global-role bindings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub permission: Permission,
    pub branch: Option<BranchId>,
}

impl Grant {
    pub fn global(permission: impl Into<Permission>) -> Self {
        Self {
            permission: permission.into(),
            branch: None,
        }
    }

    pub fn scoped(permission: impl Into<Permission>, branch: BranchId) -> Self {
        Self {
            permission: permission.into(),
            branch: Some(branch),
        }
    }
}

/// Outcome of a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Allowed,
    Denied(DenialReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Why a resolution denied.
///
/// Deliberately coarse: a denial never reveals which permissions exist beyond
/// the set the caller itself required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    NoRoleAssigned,
    InsufficientPermission,
}

impl core::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DenialReason::NoRoleAssigned => f.write_str("no role assigned"),
            DenialReason::InsufficientPermission => f.write_str("insufficient permission"),
        }
    }
}

/// Resolve a permission check.
///
/// Semantics:
/// - `required` is an OR-set: holding any one listed permission suffices.
/// - An unknown permission name never matches anything (default deny, no
///   error).
/// - A branch-qualified grant only matches when the caller is operating in
///   that same branch. This re-checks at resolution time what binding
///   creation already enforces, closing the cross-branch escalation window
///   a mismatched binding would otherwise open.
/// - Grants without a branch (global-role bindings) match regardless of the
///   caller's branch context.
pub fn resolve(
    role: Option<RoleId>,
    grants: &[Grant],
    required: &[Permission],
    branch_context: Option<BranchId>,
) -> Decision {
    if role.is_none() {
        return Decision::Denied(DenialReason::NoRoleAssigned);
    }

    let satisfied = required.iter().any(|needed| {
        grants.iter().any(|grant| {
            grant.permission == *needed
                && match grant.branch {
                    None => true,
                    Some(bound) => branch_context == Some(bound),
                }
        })
    });

    if satisfied {
        Decision::Allowed
    } else {
        Decision::Denied(DenialReason::InsufficientPermission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(names: &[&'static str]) -> Vec<Permission> {
        names.iter().map(|n| Permission::new(*n)).collect()
    }

    #[test]
    fn no_role_is_denied_before_anything_else() {
        let decision = resolve(None, &[Grant::global("create-branch")], &perms(&["create-branch"]), None);
        assert_eq!(decision, Decision::Denied(DenialReason::NoRoleAssigned));
    }

    #[test]
    fn any_one_required_permission_suffices() {
        let role = Some(RoleId::new());
        let grants = vec![Grant::global("update-menu")];
        let decision = resolve(role, &grants, &perms(&["create-menu", "update-menu"]), None);
        assert!(decision.is_allowed());
    }

    #[test]
    fn unknown_permission_never_matches() {
        let role = Some(RoleId::new());
        let grants = vec![Grant::global("create-branch")];
        let decision = resolve(role, &grants, &perms(&["no-such-capability"]), None);
        assert_eq!(
            decision,
            Decision::Denied(DenialReason::InsufficientPermission)
        );
    }

    #[test]
    fn empty_required_set_denies_by_default() {
        let role = Some(RoleId::new());
        let grants = vec![Grant::global("create-branch")];
        let decision = resolve(role, &grants, &[], None);
        assert_eq!(
            decision,
            Decision::Denied(DenialReason::InsufficientPermission)
        );
    }

    #[test]
    fn branch_grant_requires_matching_branch_context() {
        let role = Some(RoleId::new());
        let bound = BranchId::new();
        let elsewhere = BranchId::new();
        let grants = vec![Grant::scoped("create-order", bound)];

        let same = resolve(role, &grants, &perms(&["create-order"]), Some(bound));
        assert!(same.is_allowed());

        let other = resolve(role, &grants, &perms(&["create-order"]), Some(elsewhere));
        assert_eq!(
            other,
            Decision::Denied(DenialReason::InsufficientPermission)
        );

        let none = resolve(role, &grants, &perms(&["create-order"]), None);
        assert_eq!(none, Decision::Denied(DenialReason::InsufficientPermission));
    }

    #[test]
    fn global_grant_matches_in_any_branch_context() {
        let role = Some(RoleId::new());
        let grants = vec![Grant::global("list-companies")];
        let decision = resolve(
            role,
            &grants,
            &perms(&["list-companies"]),
            Some(BranchId::new()),
        );
        assert!(decision.is_allowed());
    }
}
