use serde::{Deserialize, Serialize};

use branchline_core::{
    BranchId, CompanyId, CompanyOwned, Deletion, DomainError, DomainResult, Entity, SoftDelete,
    UserId,
};

use crate::company::Address;

/// A physical location owned by exactly one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub company: CompanyId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Address,
    pub manager: Option<UserId>,
    pub manager_email: Option<String>,
    pub manager_phone: Option<String>,
    /// Number of dining tables configured for the branch.
    pub tables: u32,
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl Branch {
    pub fn new(
        company: CompanyId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("branch name cannot be empty"));
        }
        if email.trim().is_empty() {
            return Err(DomainError::validation("branch email cannot be empty"));
        }
        Ok(Self {
            id: BranchId::new(),
            company,
            name,
            email,
            phone: None,
            address: Address::default(),
            manager: None,
            manager_email: None,
            manager_phone: None,
            tables: 0,
            deletion: Deletion::active(),
        })
    }

    pub fn set_tables(&mut self, tables: u32) {
        self.tables = tables;
    }
}

impl Entity for Branch {
    type Id = BranchId;

    fn id(&self) -> BranchId {
        self.id
    }
}

impl CompanyOwned for Branch {
    fn company(&self) -> CompanyId {
        self.company
    }
}

impl SoftDelete for Branch {
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
    fn branch_rejects_blank_name() {
        let err = Branch::new(CompanyId::new(), "", "central@example.com").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn tables_default_to_zero_and_can_be_updated() {
        let mut branch = Branch::new(CompanyId::new(), "Central", "central@example.com").unwrap();
        assert_eq!(branch.tables, 0);
        branch.set_tables(12);
        assert_eq!(branch.tables, 12);
    }
}
