use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::id::UserId;
use crate::validation::{Schema, Validate, ValidationErrors};
use crate::value_object::{Password, Username};

/// Account roles the identity service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Admin,
    Doctor,
    Patient,
}

impl AccountRole {
    pub const ALL: [AccountRole; 3] = [Self::Admin, Self::Doctor, Self::Patient];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Patient => "patient",
        }
    }
}

impl core::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::unknown_variant("role", s))
    }
}

/// Account as listed by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id_user: UserId,
    pub username: String,
}

/// Payload returned when an account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    #[serde(alias = "userID", alias = "IDUser")]
    pub id_user: UserId,
}

/// New account request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl Registration {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: AccountRole) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role: role.as_str().to_string(),
        }
    }
}

impl Validate for Registration {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let roles = AccountRole::ALL.map(|r| r.as_str());
        Schema::new()
            .parses::<Username>("username", &self.username)
            .parses::<Password>("password", &self.password)
            .one_of("role", &self.role, &roles)
            .finish()
    }
}

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Schema::new()
            .required("username", &self.username)
            .check(
                "password",
                if self.password.is_empty() {
                    Err(crate::ValueError::Required)
                } else {
                    Ok(())
                },
            )
            .finish()
    }
}

/// Login payload. The identity service has answered with the bare token, a
/// `{jwt}` object, or its protobuf-shaped `{Token}` object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LoginResult {
    Bare(String),
    Wrapped {
        #[serde(alias = "token", alias = "Token")]
        jwt: String,
    },
}

impl LoginResult {
    pub fn token(&self) -> &str {
        match self {
            Self::Bare(t) => t,
            Self::Wrapped { jwt } => jwt,
        }
    }

    pub fn into_token(self) -> String {
        match self {
            Self::Bare(t) => t,
            Self::Wrapped { jwt } => jwt,
        }
    }
}

/// Password-change form: the new password and its confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub new_password: String,
    pub confirmation: String,
}

impl PasswordChange {
    pub fn into_update(self) -> PasswordUpdate {
        PasswordUpdate {
            password: self.new_password,
        }
    }
}

impl Validate for PasswordChange {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Schema::new()
            .parses::<Password>("password", &self.new_password)
            .matches("confirmPassword", &self.confirmation, &self.new_password)
            .finish()
    }
}

/// Body of the password update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordUpdate {
    pub password: String,
}

/// Token revocation request sent on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistEntry {
    pub id_user: UserId,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_closed_set() {
        assert_eq!("doctor".parse::<AccountRole>().unwrap(), AccountRole::Doctor);
        assert!("nurse".parse::<AccountRole>().is_err());
        assert_eq!(serde_json::to_string(&AccountRole::Patient).unwrap(), "\"patient\"");
    }

    #[test]
    fn registration_schema() {
        assert!(Registration::new("ana_pop", "secret1", AccountRole::Admin).validate().is_ok());

        let bad = Registration {
            username: "a".into(),
            password: "short".into(),
            role: "nurse".into(),
        };
        let errs = bad.validate().unwrap_err();
        assert_eq!(errs.len(), 3);
        assert!(errs.get("role").is_some());
    }

    #[test]
    fn login_requires_both_fields() {
        let errs = LoginRequest {
            username: " ".into(),
            password: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn login_result_shapes() {
        let bare: LoginResult = serde_json::from_str("\"a.b.c\"").unwrap();
        let jwt: LoginResult = serde_json::from_str(r#"{"jwt":"a.b.c"}"#).unwrap();
        let proto: LoginResult = serde_json::from_str(r#"{"Token":"a.b.c","Info":{}}"#).unwrap();
        for r in [bare, jwt, proto] {
            assert_eq!(r.token(), "a.b.c");
        }
    }

    #[test]
    fn password_change_requires_matching_confirmation() {
        let change = PasswordChange {
            new_password: "secret1".into(),
            confirmation: "secret2".into(),
        };
        let errs = change.validate().unwrap_err();
        assert_eq!(errs.fields()[0].field, "confirmPassword");
    }

    #[test]
    fn created_user_accepts_aliases() {
        let a: CreatedUser = serde_json::from_str(r#"{"idUser":5}"#).unwrap();
        let b: CreatedUser = serde_json::from_str(r#"{"userID":5}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn blacklist_entry_wire_shape() {
        let entry = BlacklistEntry {
            id_user: UserId::new(3),
            token: "t".into(),
        };
        assert_eq!(serde_json::to_string(&entry).unwrap(), r#"{"idUser":3,"token":"t"}"#);
    }
}
