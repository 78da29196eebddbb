//! `branchline-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod soft_delete;

pub use entity::{BranchOwned, CompanyOwned, Entity};
pub use error::{DomainError, DomainResult};
pub use id::{BindingId, BranchId, CompanyId, PermissionId, RecordId, RoleId, UserId};
pub use soft_delete::{Deletion, SoftDelete};
