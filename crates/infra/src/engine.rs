//! The engine facade.
//!
//! One handle bundling the four surfaces a caller needs: permission checks,
//! tenant/role administration, teardown, and restore. All components share
//! the same [`Stores`], so a teardown is immediately visible to the next
//! permission check.

use std::sync::Arc;

use branchline_auth::{Decision, Permission, Principal};
use branchline_core::{BranchId, CompanyId, DomainError};
use branchline_tenancy::{Branch, Company};

use crate::cascade::{BranchTeardown, CascadeError, CascadeOrchestrator, CompanyTeardown};
use crate::error::{EngineError, EngineResult};
use crate::rbac::RbacStore;
use crate::resolver::ScopeResolver;
use crate::store::StoreError;
use crate::stores::Stores;
use crate::tenants::TenantDirectory;

pub struct Engine {
    stores: Stores,
    resolver: ScopeResolver,
    cascade: CascadeOrchestrator,
    tenants: TenantDirectory,
    rbac: RbacStore,
}

impl Engine {
    pub fn new(stores: Stores) -> Self {
        let resolver = ScopeResolver::new(
            Arc::clone(&stores.bindings),
            Arc::clone(&stores.permissions),
        );
        let cascade = CascadeOrchestrator::new(stores.clone());
        let tenants = TenantDirectory::new(
            Arc::clone(&stores.companies),
            Arc::clone(&stores.branches),
            Arc::clone(&stores.users),
            Arc::clone(&stores.memberships),
        );
        let rbac = RbacStore::new(
            Arc::clone(&stores.roles),
            Arc::clone(&stores.bindings),
            Arc::clone(&stores.permissions),
        );
        Self {
            stores,
            resolver,
            cascade,
            tenants,
            rbac,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Stores::in_memory())
    }

    /// Decide whether `principal` holds any one of `required`.
    pub fn authorize(
        &self,
        principal: &Principal,
        required: &[Permission],
    ) -> Result<Decision, StoreError> {
        self.resolver.resolve(principal, required)
    }

    /// Boundary guard for protected operations: `Unauthorized` without a
    /// session, `Forbidden` on any denial. The error carries no detail
    /// beyond the required set the caller already knows.
    pub fn require(
        &self,
        principal: Option<&Principal>,
        required: &[Permission],
    ) -> EngineResult<()> {
        let Some(principal) = principal else {
            return Err(EngineError::Domain(DomainError::Unauthorized));
        };
        match self.resolver.resolve(principal, required)? {
            Decision::Allowed => Ok(()),
            Decision::Denied(_) => Err(EngineError::Domain(DomainError::Forbidden)),
        }
    }

    /// Soft-delete a company and everything reachable from it.
    pub fn teardown_tenant(&self, id: CompanyId) -> Result<CompanyTeardown, CascadeError> {
        self.cascade.delete_company(id)
    }

    /// Soft-delete one branch and its branch-keyed dependents.
    pub fn teardown_branch(&self, id: BranchId) -> Result<BranchTeardown, CascadeError> {
        self.cascade.delete_branch(id)
    }

    /// Restore the single company row; dependents stay deleted.
    pub fn restore_tenant(&self, id: CompanyId) -> Result<Company, CascadeError> {
        self.cascade.restore_company(id)
    }

    /// Restore the single branch row; dependents stay deleted.
    pub fn restore_branch(&self, id: BranchId) -> Result<Branch, CascadeError> {
        self.cascade.restore_branch(id)
    }

    /// Company, branch, user and membership administration.
    pub fn tenants(&self) -> &TenantDirectory {
        &self.tenants
    }

    /// Role and binding administration.
    pub fn rbac(&self) -> &RbacStore {
        &self.rbac
    }

    /// The permission catalog.
    pub fn permissions(&self) -> &Arc<crate::permission_catalog::PermissionCatalog> {
        &self.stores.permissions
    }

    /// Deleted companies, for the administrative recovery listing.
    pub fn deleted_companies(&self) -> EngineResult<Vec<Company>> {
        self.tenants.list_deleted_companies()
    }

    /// Deleted branches, for the administrative recovery listing.
    pub fn deleted_branches(&self) -> EngineResult<Vec<Branch>> {
        self.tenants.list_deleted_branches()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchline_auth::{DenialReason, RoleScope};
    use branchline_core::UserId;
    use branchline_tenancy::{Address, UserRecord};

    use crate::tenants::{NewBranch, NewCompany};

    fn perm(name: &str) -> Permission {
        Permission::new(name.to_owned())
    }

    /// Set up "Acme" end to end: a branch, a table's worth of catalog, a
    /// waiter role with "create-order", and a member holding that role.
    fn acme(engine: &Engine) -> (CompanyId, BranchId, Principal) {
        let company = engine
            .tenants()
            .create_company(NewCompany {
                name: "acme".into(),
                email: "acme@example.com".into(),
                ..NewCompany::default()
            })
            .unwrap();
        let branch = engine
            .tenants()
            .create_branch(NewBranch {
                company: company.id,
                name: "acme-central".into(),
                email: "central@example.com".into(),
                phone: None,
                address: Address::default(),
                manager: None,
                manager_email: None,
                manager_phone: None,
                tables: 4,
            })
            .unwrap();

        let create_order = engine.permissions().create("create-order", None).unwrap();
        let waiter = engine
            .rbac()
            .create_role("waiter", RoleScope::Branch, Some(branch.id))
            .unwrap();
        engine
            .rbac()
            .assign_permission(waiter.id, create_order.id, None)
            .unwrap();

        let user = UserRecord::new("ada", "ada@example.com");
        let user = engine.tenants().create_user(user).unwrap();
        engine
            .tenants()
            .create_membership(user.id, company.id, Some(branch.id))
            .unwrap();

        let principal = Principal::new(user.id, Some(waiter.id), Some(branch.id));
        (company.id, branch.id, principal)
    }

    #[test]
    fn waiter_may_create_orders_until_the_tenant_is_torn_down() {
        let engine = Engine::in_memory();
        let (company, _, principal) = acme(&engine);

        let before = engine.authorize(&principal, &[perm("create-order")]).unwrap();
        assert!(before.is_allowed());

        engine.teardown_tenant(company).unwrap();

        let after = engine.authorize(&principal, &[perm("create-order")]).unwrap();
        assert_eq!(
            after,
            Decision::Denied(DenialReason::InsufficientPermission)
        );
    }

    #[test]
    fn authorize_is_an_or_over_the_required_set() {
        let engine = Engine::in_memory();
        let (_, _, principal) = acme(&engine);

        let decision = engine
            .authorize(&principal, &[perm("void-order"), perm("create-order")])
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[test]
    fn branch_role_does_not_reach_across_branches() {
        let engine = Engine::in_memory();
        let (company, _, principal) = acme(&engine);
        let other = engine
            .tenants()
            .create_branch(NewBranch {
                company,
                name: "acme-annex".into(),
                email: "annex@example.com".into(),
                phone: None,
                address: Address::default(),
                manager: None,
                manager_email: None,
                manager_phone: None,
                tables: 2,
            })
            .unwrap();

        let elsewhere = Principal::new(principal.user, principal.role, Some(other.id));
        let decision = engine
            .authorize(&elsewhere, &[perm("create-order")])
            .unwrap();
        assert!(!decision.is_allowed());
    }

    #[test]
    fn no_role_is_denied_with_its_own_reason() {
        let engine = Engine::in_memory();
        let principal = Principal::new(UserId::new(), None, None);
        let decision = engine.authorize(&principal, &[perm("create-order")]).unwrap();
        assert_eq!(decision, Decision::Denied(DenialReason::NoRoleAssigned));
    }

    #[test]
    fn restored_tenant_reappears_in_listings_without_its_branches() {
        let engine = Engine::in_memory();
        let (company, branch, _) = acme(&engine);

        engine.teardown_tenant(company).unwrap();
        assert_eq!(engine.deleted_companies().unwrap().len(), 1);

        engine.restore_tenant(company).unwrap();
        assert!(engine.deleted_companies().unwrap().is_empty());
        assert!(engine.tenants().get_company(company).is_ok());
        // The branch stays in the deleted listing until restored itself.
        assert_eq!(engine.deleted_branches().unwrap().len(), 1);
        engine.restore_branch(branch).unwrap();
        assert!(engine.deleted_branches().unwrap().is_empty());
    }

    #[test]
    fn require_maps_missing_session_to_unauthorized() {
        let engine = Engine::in_memory();
        let err = engine.require(None, &[perm("create-order")]).unwrap_err();
        assert_eq!(err, EngineError::Domain(DomainError::Unauthorized));
    }

    #[test]
    fn require_maps_any_denial_to_forbidden() {
        let engine = Engine::in_memory();
        let (_, _, principal) = acme(&engine);

        let no_role = Principal::new(UserId::new(), None, None);
        assert_eq!(
            engine.require(Some(&no_role), &[perm("create-order")]).unwrap_err(),
            EngineError::Domain(DomainError::Forbidden)
        );
        assert_eq!(
            engine.require(Some(&principal), &[perm("void-order")]).unwrap_err(),
            EngineError::Domain(DomainError::Forbidden)
        );
        engine.require(Some(&principal), &[perm("create-order")]).unwrap();
    }

    #[test]
    fn teardown_of_an_unknown_tenant_is_not_found() {
        let engine = Engine::in_memory();
        assert_eq!(
            engine.teardown_tenant(CompanyId::new()).unwrap_err(),
            CascadeError::NotFound
        );
    }
}
