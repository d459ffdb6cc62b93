use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use medportal_core::AccountRole;

/// Role claim as carried by a session token.
///
/// Opaque at this layer: an issuer may mint roles the client does not know,
/// and the guard must still compare them faithfully. The three roles the UI
/// renders for are exposed as constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const DOCTOR: Role = Role(Cow::Borrowed("doctor"));
    pub const PATIENT: Role = Role(Cow::Borrowed("patient"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The closed account role this claim names, if any.
    pub fn account_role(&self) -> Option<AccountRole> {
        self.as_str().parse().ok()
    }
}

impl From<AccountRole> for Role {
    fn from(role: AccountRole) -> Self {
        Self(Cow::Borrowed(role.as_str()))
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_account_roles() {
        assert_eq!(Role::from(AccountRole::Admin), Role::ADMIN);
        assert_eq!(Role::DOCTOR.account_role(), Some(AccountRole::Doctor));
        assert_eq!(Role::new("nurse").account_role(), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Role::PATIENT).unwrap(), "\"patient\"");
        let r: Role = serde_json::from_str("\"auditor\"").unwrap();
        assert_eq!(r.as_str(), "auditor");
    }
}
