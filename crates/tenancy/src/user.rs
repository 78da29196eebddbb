use serde::{Deserialize, Serialize};

use branchline_core::{Deletion, Entity, RoleId, SoftDelete, UserId};

/// Directory entry for an actor.
///
/// Credentials and sessions live in the excluded auth collaborator; this
/// record exists so tenant teardown can deactivate the people attached to a
/// company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Option<RoleId>,
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl UserRecord {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            role: None,
            deletion: Deletion::active(),
        }
    }

    pub fn with_role(mut self, role: RoleId) -> Self {
        self.role = Some(role);
        self
    }
}

impl Entity for UserRecord {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

impl SoftDelete for UserRecord {
    fn deletion(&self) -> &Deletion {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut Deletion {
        &mut self.deletion
    }
}
