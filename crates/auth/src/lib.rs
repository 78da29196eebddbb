//! `branchline-auth` — pure authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod binding;
pub mod permissions;
pub mod principal;
pub mod resolve;
pub mod role;

pub use binding::RolePermissionBinding;
pub use permissions::{Permission, PermissionRecord};
pub use principal::Principal;
pub use resolve::{resolve, Decision, DenialReason, Grant};
pub use role::{Role, RoleScope};
