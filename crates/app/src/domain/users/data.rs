//! User Data

use crate::domain::users::records::{Role, UserUuid};

/// New User Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,

    /// SHA-256 digest of the user's API token; the raw token is never stored.
    pub token_hash: String,
}
