//! Entity trait: identity + continuity across state changes.

use crate::id::{BranchId, CompanyId};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Records keyed directly by their owning company.
pub trait CompanyOwned {
    fn company(&self) -> CompanyId;
}

/// Records keyed by an owning branch rather than a company.
pub trait BranchOwned {
    fn branch(&self) -> BranchId;
}
