//! Dependent catalog records.
//!
//! The catalog business logic itself (menus, pricing rules, recipes) lives in
//! an excluded collaborator; these records carry only what the teardown
//! cascade needs: identity, the owning company or branch key, and the
//! soft-delete pair.

use serde::{Deserialize, Serialize};

use branchline_core::{
    BranchId, BranchOwned, CompanyId, CompanyOwned, Deletion, Entity, RecordId, SoftDelete,
};

macro_rules! company_record {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub id: RecordId,
            pub company: CompanyId,
            pub name: String,
            #[serde(flatten)]
            pub deletion: Deletion,
        }

        impl $name {
            pub fn new(company: CompanyId, name: impl Into<String>) -> Self {
                Self {
                    id: RecordId::new(),
                    company,
                    name: name.into(),
                    deletion: Deletion::active(),
                }
            }
        }

        impl Entity for $name {
            type Id = RecordId;

            fn id(&self) -> RecordId {
                self.id
            }
        }

        impl CompanyOwned for $name {
            fn company(&self) -> CompanyId {
                self.company
            }
        }

        impl SoftDelete for $name {
            fn deletion(&self) -> &Deletion {
                &self.deletion
            }

            fn deletion_mut(&mut self) -> &mut Deletion {
                &mut self.deletion
            }
        }
    };
}

macro_rules! branch_record {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub id: RecordId,
            pub branch: BranchId,
            pub name: String,
            #[serde(flatten)]
            pub deletion: Deletion,
        }

        impl $name {
            pub fn new(branch: BranchId, name: impl Into<String>) -> Self {
                Self {
                    id: RecordId::new(),
                    branch,
                    name: name.into(),
                    deletion: Deletion::active(),
                }
            }
        }

        impl Entity for $name {
            type Id = RecordId;

            fn id(&self) -> RecordId {
                self.id
            }
        }

        impl BranchOwned for $name {
            fn branch(&self) -> BranchId {
                self.branch
            }
        }

        impl SoftDelete for $name {
            fn deletion(&self) -> &Deletion {
                &self.deletion
            }

            fn deletion_mut(&mut self) -> &mut Deletion {
                &mut self.deletion
            }
        }
    };
}

company_record!(
    /// Product grouping within a company's menu structure.
    Category
);
company_record!(Product);
company_record!(Ingredient);
company_record!(IngredientCategory);
company_record!(Menu);
company_record!(
    /// Price row for a product; keyed by company for teardown purposes.
    ProductPrice
);
company_record!(
    /// Recipe line linking a product to an ingredient.
    ProductIngredient
);

branch_record!(
    /// A sales channel enabled for one branch.
    BranchSalesMethod
);
branch_record!(
    /// Routes a product's preparation to a kitchen of one branch.
    ProductKitchen
);
branch_record!(
    /// Publishes a menu at one branch.
    MenuBranch
);

/// Preparation station. Carries both keys: owned by a company, located at
/// one of its branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kitchen {
    pub id: RecordId,
    pub company: CompanyId,
    pub branch: BranchId,
    pub name: String,
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl Kitchen {
    pub fn new(company: CompanyId, branch: BranchId, name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            company,
            branch,
            name: name.into(),
            deletion: Deletion::active(),
        }
    }
}

impl Entity for Kitchen {
    type Id = RecordId;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl CompanyOwned for Kitchen {
    fn company(&self) -> CompanyId {
        self.company
    }
}

impl BranchOwned for Kitchen {
    fn branch(&self) -> BranchId {
        self.branch
    }
}

impl SoftDelete for Kitchen {
    fn deletion(&self) -> &Deletion {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut Deletion {
        &mut self.deletion
    }
}

/// Dining table at a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: RecordId,
    pub branch: BranchId,
    pub number: u32,
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl Table {
    pub fn new(branch: BranchId, number: u32) -> Self {
        Self {
            id: RecordId::new(),
            branch,
            number,
            deletion: Deletion::active(),
        }
    }
}

impl Entity for Table {
    type Id = RecordId;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl BranchOwned for Table {
    fn branch(&self) -> BranchId {
        self.branch
    }
}

impl SoftDelete for Table {
    fn deletion(&self) -> &Deletion {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut Deletion {
        &mut self.deletion
    }
}
