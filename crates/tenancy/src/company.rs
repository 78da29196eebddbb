use serde::{Deserialize, Serialize};

use branchline_core::{CompanyId, Deletion, DomainError, DomainResult, Entity, SoftDelete};

/// Postal address fields shared by companies and branches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub province: Option<String>,
    pub district: Option<String>,
    pub neighborhood: Option<String>,
    pub street: Option<String>,
    /// The combined free-form address line.
    pub full: Option<String>,
}

/// The tenant root of the ownership hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Address,
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl Company {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("company name cannot be empty"));
        }
        if email.trim().is_empty() {
            return Err(DomainError::validation("company email cannot be empty"));
        }
        Ok(Self {
            id: CompanyId::new(),
            name,
            email,
            phone: None,
            address: Address::default(),
            deletion: Deletion::active(),
        })
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }
}

impl Entity for Company {
    type Id = CompanyId;

    fn id(&self) -> CompanyId {
        self.id
    }
}

impl SoftDelete for Company {
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
    fn company_rejects_blank_name() {
        let err = Company::new("  ", "acme@example.com").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn company_rejects_blank_email() {
        let err = Company::new("Acme", "").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_company_is_active() {
        let company = Company::new("Acme", "acme@example.com").unwrap();
        assert!(!company.is_deleted());
        assert_eq!(company.deleted_at(), None);
    }
}
