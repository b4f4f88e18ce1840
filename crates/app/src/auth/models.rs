//! Auth data models.

use crate::domain::users::records::{Role, UserUuid};

/// The authenticated user a request acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Actor {
    pub user_uuid: UserUuid,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub const fn new(user_uuid: UserUuid, role: Role) -> Self {
        Self { user_uuid, role }
    }

    #[must_use]
    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}
