//! `branchline-tenancy` — the company → branch ownership hierarchy.
//!
//! Record shapes and validation only; uniqueness over live rows and the
//! teardown cascade are enforced by the store layer.

pub mod branch;
pub mod company;
pub mod membership;
pub mod user;

pub use branch::Branch;
pub use company::{Address, Company};
pub use membership::Membership;
pub use user::UserRecord;
