//! User Data

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{users::records::UserUuid, validation::not_blank};

/// The identity performing an action, as supplied by the identity provider.
///
/// Only recorded, never authenticated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Actor {
    /// User identifier.
    pub uid: UserUuid,

    /// Display name captured with every audit entry.
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

impl Actor {
    /// Create an actor.
    pub fn new(uid: UserUuid, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
        }
    }
}
