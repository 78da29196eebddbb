//! Company/branch/membership administration.
//!
//! Uniqueness rules are scoped to non-deleted rows throughout: a torn-down
//! company's name or email is free for reuse while the old row stays
//! recoverable.

use std::sync::Arc;

use branchline_core::{BranchId, CompanyId, RecordId, UserId};
use branchline_tenancy::{Address, Branch, Company, Membership, UserRecord};

use crate::error::{EngineError, EngineResult};
use crate::store::Collection;

/// Input for company creation.
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Address,
}

/// Input for branch creation.
#[derive(Debug, Clone)]
pub struct NewBranch {
    pub company: CompanyId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Address,
    pub manager: Option<UserId>,
    pub manager_email: Option<String>,
    pub manager_phone: Option<String>,
    pub tables: u32,
}

pub struct TenantDirectory {
    companies: Arc<dyn Collection<Company>>,
    branches: Arc<dyn Collection<Branch>>,
    users: Arc<dyn Collection<UserRecord>>,
    memberships: Arc<dyn Collection<Membership>>,
}

impl TenantDirectory {
    pub fn new(
        companies: Arc<dyn Collection<Company>>,
        branches: Arc<dyn Collection<Branch>>,
        users: Arc<dyn Collection<UserRecord>>,
        memberships: Arc<dyn Collection<Membership>>,
    ) -> Self {
        Self {
            companies,
            branches,
            users,
            memberships,
        }
    }

    /* ---------------------------
     *  Companies
     * -------------------------*/

    /// Create a company. Name, email, phone and the combined address line
    /// must each be unique among non-deleted companies.
    pub fn create_company(&self, input: NewCompany) -> EngineResult<Company> {
        let company = Company::new(input.name, input.email)?;

        let email = company.email.clone();
        if !self.companies.find(&|c| c.email == email)?.is_empty() {
            return Err(EngineError::conflict("company email already in use"));
        }
        let name = company.name.clone();
        if !self.companies.find(&|c| c.name == name)?.is_empty() {
            return Err(EngineError::conflict("company name already in use"));
        }
        if let Some(phone) = &input.phone {
            let phone = phone.clone();
            if !self
                .companies
                .find(&|c| c.phone.as_deref() == Some(phone.as_str()))?
                .is_empty()
            {
                return Err(EngineError::conflict("company phone already in use"));
            }
        }
        if let Some(full) = &input.address.full {
            let full = full.clone();
            if !self
                .companies
                .find(&|c| c.address.full.as_deref() == Some(full.as_str()))?
                .is_empty()
            {
                return Err(EngineError::conflict(
                    "a company is already registered at this address",
                ));
            }
        }

        let mut company = company.with_address(input.address);
        company.phone = input.phone;
        self.companies.insert(company.clone())?;
        tracing::info!(company = %company.id, "company created");
        Ok(company)
    }

    pub fn get_company(&self, id: CompanyId) -> EngineResult<Company> {
        self.companies.get(id)?.ok_or_else(EngineError::not_found)
    }

    pub fn list_companies(&self) -> EngineResult<Vec<Company>> {
        Ok(self.companies.list()?)
    }

    pub fn list_deleted_companies(&self) -> EngineResult<Vec<Company>> {
        Ok(self.companies.list_deleted()?)
    }

    /* ---------------------------
     *  Branches
     * -------------------------*/

    /// Create a branch under an existing, non-deleted company.
    pub fn create_branch(&self, input: NewBranch) -> EngineResult<Branch> {
        if self.companies.get(input.company)?.is_none() {
            return Err(EngineError::not_found());
        }

        let email = input.email.clone();
        if !self.branches.find(&|b| b.email == email)?.is_empty() {
            return Err(EngineError::conflict("branch email already in use"));
        }

        let mut branch = Branch::new(input.company, input.name, input.email)?;
        branch.phone = input.phone;
        branch.address = input.address;
        branch.manager = input.manager;
        branch.manager_email = input.manager_email;
        branch.manager_phone = input.manager_phone;
        branch.tables = input.tables;
        self.branches.insert(branch.clone())?;
        tracing::info!(branch = %branch.id, company = %branch.company, "branch created");
        Ok(branch)
    }

    pub fn get_branch(&self, id: BranchId) -> EngineResult<Branch> {
        self.branches.get(id)?.ok_or_else(EngineError::not_found)
    }

    /// Non-deleted branches, optionally filtered to one company.
    pub fn list_branches(&self, company: Option<CompanyId>) -> EngineResult<Vec<Branch>> {
        match company {
            Some(id) => Ok(self.branches.find(&|b| b.company == id)?),
            None => Ok(self.branches.list()?),
        }
    }

    pub fn list_deleted_branches(&self) -> EngineResult<Vec<Branch>> {
        Ok(self.branches.list_deleted()?)
    }

    /// Update only the table count of a branch.
    pub fn update_branch_tables(&self, id: BranchId, tables: u32) -> EngineResult<Branch> {
        let mut branch = self.branches.get(id)?.ok_or_else(EngineError::not_found)?;
        branch.set_tables(tables);
        self.branches.update(branch.clone())?;
        Ok(branch)
    }

    /* ---------------------------
     *  Users and memberships
     * -------------------------*/

    pub fn create_user(&self, user: UserRecord) -> EngineResult<UserRecord> {
        let email = user.email.clone();
        if !self.users.find(&|u| u.email == email)?.is_empty() {
            return Err(EngineError::conflict("user email already in use"));
        }
        self.users.insert(user.clone())?;
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> EngineResult<Option<UserRecord>> {
        Ok(self.users.get(id)?)
    }

    /// Link a user to a company, optionally pinned to one of its branches.
    ///
    /// The branch, when given, must belong to the stated company. The
    /// `(user, company, branch)` triple must be unique among non-deleted
    /// memberships.
    pub fn create_membership(
        &self,
        user: UserId,
        company: CompanyId,
        branch: Option<BranchId>,
    ) -> EngineResult<Membership> {
        if self.companies.get(company)?.is_none() {
            return Err(EngineError::not_found());
        }
        if let Some(branch_id) = branch {
            let row = self.branches.get(branch_id)?.ok_or_else(EngineError::not_found)?;
            if row.company != company {
                return Err(EngineError::conflict(
                    "branch does not belong to the stated company",
                ));
            }
        }

        let triple = (user, company, branch);
        if !self.memberships.find(&|m| m.triple() == triple)?.is_empty() {
            return Err(EngineError::conflict("membership already exists"));
        }

        let membership = Membership::new(user, company, branch);
        self.memberships.insert(membership.clone())?;
        Ok(membership)
    }

    pub fn memberships_of_company(&self, company: CompanyId) -> EngineResult<Vec<Membership>> {
        Ok(self.memberships.find(&|m| m.company == company)?)
    }

    /// Suspend a membership without deleting it. The user keeps the
    /// uniqueness slot but stops counting as linked to the tenant.
    pub fn deactivate_membership(&self, id: RecordId) -> EngineResult<Membership> {
        let mut membership = self
            .memberships
            .get(id)?
            .ok_or_else(EngineError::not_found)?;
        membership.deactivate();
        self.memberships.update(membership.clone())?;
        Ok(membership)
    }
}
