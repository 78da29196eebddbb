//! Tenant teardown and restore.
//!
//! A teardown walks a fixed, ordered step list and soft-delete-marks every
//! dependent collection with one shared timestamp. The branch-id and user-id
//! snapshots are taken before the first write: every default read filters
//! deleted rows, so resolving "branches of this company" after the branch
//! step would come back empty and the branch-keyed steps would touch nothing.
//! Branch ids are snapshotted across deleted rows too, so a retry after a
//! partial failure still covers branches the failed attempt already marked.
//!
//! Teardown and restore are serialized per company id; operations on
//! different tenants run concurrently.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use thiserror::Error;

use branchline_auth::RoleScope;
use branchline_core::{BranchId, CompanyId, UserId};
use branchline_tenancy::{Branch, Company};

use crate::store::StoreError;
use crate::stores::Stores;

/// One collection touched by the cascade, in step order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeTarget {
    Company,
    Branches,
    Users,
    Memberships,
    Categories,
    Products,
    Ingredients,
    IngredientCategories,
    Menus,
    Kitchens,
    ProductPrices,
    ProductIngredients,
    Tables,
    BranchSalesMethods,
    ProductKitchens,
    MenuBranches,
    Roles,
    Bindings,
}

impl fmt::Display for CascadeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Company => "company",
            Self::Branches => "branches",
            Self::Users => "users",
            Self::Memberships => "memberships",
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Ingredients => "ingredients",
            Self::IngredientCategories => "ingredient-categories",
            Self::Menus => "menus",
            Self::Kitchens => "kitchens",
            Self::ProductPrices => "product-prices",
            Self::ProductIngredients => "product-ingredients",
            Self::Tables => "tables",
            Self::BranchSalesMethods => "branch-sales-methods",
            Self::ProductKitchens => "product-kitchens",
            Self::MenuBranches => "menu-branches",
            Self::Roles => "roles",
            Self::Bindings => "role-bindings",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CascadeError {
    /// The targeted company or branch does not exist at all (a soft-deleted
    /// row is still a valid teardown target, for retries).
    #[error("tenant not found")]
    NotFound,

    /// The cascade stopped partway. Earlier steps are applied and stay
    /// applied; re-running the same teardown resumes safely because every
    /// step is a no-op on rows it already marked.
    #[error("cascade stopped after {completed} of {total} steps at {failed}: {source}")]
    Partial {
        completed: usize,
        total: usize,
        failed: CascadeTarget,
        source: StoreError,
    },

    /// A failure before the first write (snapshot reads, lock acquisition).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a completed company teardown.
#[derive(Debug, Clone)]
pub struct CompanyTeardown {
    pub company: Company,
    pub deleted_at: DateTime<Utc>,
    /// Branch ids covered by the branch-keyed steps.
    pub branches: Vec<BranchId>,
    /// User ids deactivated through their memberships.
    pub users: Vec<UserId>,
    /// Rows newly marked across all collections. Zero on a re-run.
    pub rows_marked: usize,
}

/// Outcome of a completed branch teardown.
#[derive(Debug, Clone)]
pub struct BranchTeardown {
    pub branch: Branch,
    pub deleted_at: DateTime<Utc>,
    pub rows_marked: usize,
}

struct CascadeStep<'a> {
    target: CascadeTarget,
    action: Box<dyn Fn() -> Result<usize, StoreError> + 'a>,
}

/// The ordered step list for one teardown. Materialized up front so a
/// failure carries a concrete step position for the caller to log and retry.
struct CascadePlan<'a> {
    steps: Vec<CascadeStep<'a>>,
}

impl<'a> CascadePlan<'a> {
    fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn push(
        &mut self,
        target: CascadeTarget,
        action: impl Fn() -> Result<usize, StoreError> + 'a,
    ) {
        self.steps.push(CascadeStep {
            target,
            action: Box::new(action),
        });
    }

    fn run(self) -> Result<usize, CascadeError> {
        let total = self.steps.len();
        let mut marked = 0;
        for (index, step) in self.steps.into_iter().enumerate() {
            match (step.action)() {
                Ok(rows) => {
                    tracing::debug!(target = %step.target, rows, "cascade step applied");
                    marked += rows;
                }
                Err(source) => {
                    tracing::warn!(
                        target = %step.target,
                        completed = index,
                        error = %source,
                        "cascade stopped partway",
                    );
                    return Err(CascadeError::Partial {
                        completed: index,
                        total,
                        failed: step.target,
                        source,
                    });
                }
            }
        }
        Ok(marked)
    }
}

/// One lock cell per company id. Cells are created on first use and never
/// dropped; the map only ever grows by one small entry per tenant touched.
#[derive(Default)]
struct TenantLocks {
    inner: Mutex<HashMap<CompanyId, Arc<Mutex<()>>>>,
}

impl TenantLocks {
    fn cell(&self, id: CompanyId) -> Result<Arc<Mutex<()>>, StoreError> {
        let mut map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(Arc::clone(map.entry(id).or_default()))
    }
}

pub struct CascadeOrchestrator {
    stores: Stores,
    locks: TenantLocks,
}

impl CascadeOrchestrator {
    pub fn new(stores: Stores) -> Self {
        Self {
            stores,
            locks: TenantLocks::default(),
        }
    }

    /// Soft-delete a company and everything reachable from it.
    ///
    /// Succeeds on an already-deleted company with zero rows marked, which
    /// is what makes retrying after [`CascadeError::Partial`] safe.
    pub fn delete_company(&self, id: CompanyId) -> Result<CompanyTeardown, CascadeError> {
        let cell = self.locks.cell(id)?;
        let _serial = cell.lock().map_err(|_| StoreError::Poisoned)?;

        if self.stores.companies.get_any(id)?.is_none() {
            return Err(CascadeError::NotFound);
        }

        // Snapshots, before any write. Branch ids include already-deleted
        // rows (ownership is immutable); user ids come from live, active
        // memberships only, so long-revoked or deactivated members stay
        // untouched.
        let branch_ids: HashSet<BranchId> = self
            .stores
            .branches
            .find_any(&|b| b.company == id)?
            .into_iter()
            .map(|b| b.id)
            .collect();
        let user_ids: HashSet<UserId> = self
            .stores
            .memberships
            .find(&|m| m.company == id && m.is_active)?
            .into_iter()
            .map(|m| m.user)
            .collect();

        let at = Utc::now();
        let stores = &self.stores;
        let branches = &branch_ids;
        let users = &user_ids;

        let mut plan = CascadePlan::new();
        plan.push(CascadeTarget::Company, move || {
            stores.companies.mark_deleted_where(&|c| c.id == id, at)
        });
        plan.push(CascadeTarget::Branches, move || {
            stores.branches.mark_deleted_where(&|b| b.company == id, at)
        });
        plan.push(CascadeTarget::Users, move || {
            stores
                .users
                .mark_deleted_where(&|u| users.contains(&u.id), at)
        });
        plan.push(CascadeTarget::Memberships, move || {
            stores
                .memberships
                .mark_deleted_where(&|m| m.company == id, at)
        });
        plan.push(CascadeTarget::Categories, move || {
            stores
                .categories
                .mark_deleted_where(&|r| r.company == id, at)
        });
        plan.push(CascadeTarget::Products, move || {
            stores.products.mark_deleted_where(&|r| r.company == id, at)
        });
        plan.push(CascadeTarget::Ingredients, move || {
            stores
                .ingredients
                .mark_deleted_where(&|r| r.company == id, at)
        });
        plan.push(CascadeTarget::IngredientCategories, move || {
            stores
                .ingredient_categories
                .mark_deleted_where(&|r| r.company == id, at)
        });
        plan.push(CascadeTarget::Menus, move || {
            stores.menus.mark_deleted_where(&|r| r.company == id, at)
        });
        plan.push(CascadeTarget::Kitchens, move || {
            stores.kitchens.mark_deleted_where(&|r| r.company == id, at)
        });
        plan.push(CascadeTarget::ProductPrices, move || {
            stores
                .product_prices
                .mark_deleted_where(&|r| r.company == id, at)
        });
        plan.push(CascadeTarget::ProductIngredients, move || {
            stores
                .product_ingredients
                .mark_deleted_where(&|r| r.company == id, at)
        });
        plan.push(CascadeTarget::Tables, move || {
            stores
                .tables
                .mark_deleted_where(&|t| branches.contains(&t.branch), at)
        });
        plan.push(CascadeTarget::BranchSalesMethods, move || {
            stores
                .branch_sales_methods
                .mark_deleted_where(&|r| branches.contains(&r.branch), at)
        });
        plan.push(CascadeTarget::ProductKitchens, move || {
            stores
                .product_kitchens
                .mark_deleted_where(&|r| branches.contains(&r.branch), at)
        });
        plan.push(CascadeTarget::MenuBranches, move || {
            stores
                .menu_branches
                .mark_deleted_where(&|r| branches.contains(&r.branch), at)
        });
        plan.push(CascadeTarget::Roles, move || {
            stores.roles.mark_deleted_where(
                &|r| {
                    r.scope == RoleScope::Branch
                        && r.branch.is_some_and(|b| branches.contains(&b))
                },
                at,
            )
        });
        plan.push(CascadeTarget::Bindings, move || {
            stores
                .bindings
                .mark_deleted_where(&|b| b.branch.is_some_and(|br| branches.contains(&br)), at)
        });

        let rows_marked = plan.run()?;

        let company = self
            .stores
            .companies
            .get_any(id)?
            .ok_or(CascadeError::NotFound)?;
        tracing::info!(company = %id, rows = rows_marked, "company torn down");
        Ok(CompanyTeardown {
            company,
            deleted_at: at,
            branches: branch_ids.into_iter().collect(),
            users: user_ids.into_iter().collect(),
            rows_marked,
        })
    }

    /// Soft-delete one branch and its branch-keyed dependents. The owning
    /// company, its other branches, and company-keyed catalog rows are left
    /// alone.
    pub fn delete_branch(&self, id: BranchId) -> Result<BranchTeardown, CascadeError> {
        let Some(branch) = self.stores.branches.get_any(id)? else {
            return Err(CascadeError::NotFound);
        };
        let cell = self.locks.cell(branch.company)?;
        let _serial = cell.lock().map_err(|_| StoreError::Poisoned)?;

        let at = Utc::now();
        let stores = &self.stores;

        let mut plan = CascadePlan::new();
        plan.push(CascadeTarget::Branches, move || {
            stores.branches.mark_deleted_where(&|b| b.id == id, at)
        });
        plan.push(CascadeTarget::Memberships, move || {
            stores
                .memberships
                .mark_deleted_where(&|m| m.branch == Some(id), at)
        });
        plan.push(CascadeTarget::Tables, move || {
            stores.tables.mark_deleted_where(&|t| t.branch == id, at)
        });
        plan.push(CascadeTarget::BranchSalesMethods, move || {
            stores
                .branch_sales_methods
                .mark_deleted_where(&|r| r.branch == id, at)
        });
        plan.push(CascadeTarget::ProductKitchens, move || {
            stores
                .product_kitchens
                .mark_deleted_where(&|r| r.branch == id, at)
        });
        plan.push(CascadeTarget::MenuBranches, move || {
            stores
                .menu_branches
                .mark_deleted_where(&|r| r.branch == id, at)
        });
        plan.push(CascadeTarget::Roles, move || {
            stores.roles.mark_deleted_where(
                &|r| r.scope == RoleScope::Branch && r.branch == Some(id),
                at,
            )
        });
        plan.push(CascadeTarget::Bindings, move || {
            stores
                .bindings
                .mark_deleted_where(&|b| b.branch == Some(id), at)
        });

        let rows_marked = plan.run()?;

        let branch = self
            .stores
            .branches
            .get_any(id)?
            .ok_or(CascadeError::NotFound)?;
        tracing::info!(branch = %id, rows = rows_marked, "branch torn down");
        Ok(BranchTeardown {
            branch,
            deleted_at: at,
            rows_marked,
        })
    }

    /// Bring a company back. Restores the single company row only; every
    /// dependent marked by the teardown stays deleted. Undoing a full
    /// teardown means restoring each dependent explicitly.
    pub fn restore_company(&self, id: CompanyId) -> Result<Company, CascadeError> {
        let cell = self.locks.cell(id)?;
        let _serial = cell.lock().map_err(|_| StoreError::Poisoned)?;

        let company = self
            .stores
            .companies
            .restore(id)?
            .ok_or(CascadeError::NotFound)?;
        tracing::info!(company = %id, "company restored");
        Ok(company)
    }

    /// Bring one branch back, without touching its dependents.
    pub fn restore_branch(&self, id: BranchId) -> Result<Branch, CascadeError> {
        let Some(branch) = self.stores.branches.get_any(id)? else {
            return Err(CascadeError::NotFound);
        };
        let cell = self.locks.cell(branch.company)?;
        let _serial = cell.lock().map_err(|_| StoreError::Poisoned)?;

        let branch = self
            .stores
            .branches
            .restore(id)?
            .ok_or(CascadeError::NotFound)?;
        tracing::info!(branch = %id, "branch restored");
        Ok(branch)
    }
}
