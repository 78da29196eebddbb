//! Storage, administration, and the teardown engine.
//!
//! The authorization and tenancy models live in their own crates; this crate
//! gives them collections to live in and wires them into one [`Engine`]
//! handle: permission resolution against stored bindings, role and tenant
//! administration, and the soft-delete cascade with its restore counterpart.

pub mod cascade;
pub mod engine;
pub mod error;
pub mod permission_catalog;
pub mod rbac;
pub mod resolver;
pub mod store;
pub mod stores;
pub mod tenants;

pub use cascade::{
    BranchTeardown, CascadeError, CascadeOrchestrator, CascadeTarget, CompanyTeardown,
};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use permission_catalog::PermissionCatalog;
pub use rbac::{RbacStore, RoleUpdate};
pub use resolver::ScopeResolver;
pub use store::{Collection, MemCollection, StoreError};
pub use stores::Stores;
pub use tenants::{NewBranch, NewCompany, TenantDirectory};
