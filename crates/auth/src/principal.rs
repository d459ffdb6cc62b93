use chrono::{DateTime, Utc};

use medportal_core::UserId;

use crate::{Claims, Role};

/// Identity established from a validated session token.
///
/// Only the session validator constructs this, so holding one proves the
/// subject parsed as a user id and the token was not expired at validation
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    claims: Claims,
}

impl Principal {
    pub(crate) fn new(user_id: UserId, claims: Claims) -> Self {
        Self { user_id, claims }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> Option<&Role> {
        self.claims.role.as_ref()
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims
            .exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
    }
}
