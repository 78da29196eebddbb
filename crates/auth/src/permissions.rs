use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use branchline_core::{DomainError, DomainResult, PermissionId};

/// Permission identifier.
///
/// Permissions are modeled as opaque capability strings (e.g. "create-branch").
/// The catalog is flat: there is no structure beyond name uniqueness, and an
/// unknown name simply never matches during resolution (default deny).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

/// Catalog entry backing a [`Permission`] name.
///
/// Immutable identity. Permission records are the one entity in the system
/// without a soft-delete pair: removal is a hard remove. Dangling permission
/// ids left behind in bindings never match a name, so they deny by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub id: PermissionId,
    pub name: String,
    pub description: Option<String>,
}

impl PermissionRecord {
    pub fn new(name: impl Into<String>, description: Option<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("permission name cannot be empty"));
        }
        Ok(Self {
            id: PermissionId::new(),
            name,
            description,
        })
    }
}
