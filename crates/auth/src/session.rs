use chrono::{DateTime, Utc};
use thiserror::Error;

use medportal_core::{AccountRole, UserId};

use crate::claims::{Claims, DecodeError, decode_claims};
use crate::principal::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("malformed session token: {0}")]
    Decode(#[from] DecodeError),

    #[error("no session token")]
    MissingToken,

    #[error("token subject is missing or not a user id")]
    InvalidSubject,

    #[error("token expired at {exp} (now {now})")]
    Expired { exp: i64, now: i64 },
}

/// Decode `token` and check it structurally and temporally.
///
/// `sub` must be present and parse as an integer; `exp`, when present, must
/// not lie before `now`. Pure: no I/O, no clock reads.
pub fn validate_token(token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError> {
    let claims = decode_claims(token)?;
    validate_claims(&claims, now)?;
    Ok(claims)
}

/// [`validate_token`] for a token that may not exist.
pub fn validate_stored_token(
    token: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Claims, TokenValidationError> {
    validate_token(token.ok_or(TokenValidationError::MissingToken)?, now)
}

/// Check already-decoded claims, returning the subject as a user id.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<UserId, TokenValidationError> {
    let user_id = claims
        .sub
        .as_deref()
        .and_then(|sub| sub.trim().parse::<i64>().ok())
        .map(UserId::new)
        .ok_or(TokenValidationError::InvalidSubject)?;

    if let Some(exp) = claims.exp {
        let now = now.timestamp();
        if exp < now {
            return Err(TokenValidationError::Expired { exp, now });
        }
    }

    Ok(user_id)
}

/// Who is looking at the page.
///
/// Produced once per page load by [`Session::establish`]; views match on it
/// exhaustively instead of comparing role strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Admin(Principal),
    Doctor(Principal),
    Patient(Principal),
    Anonymous,
}

impl Session {
    /// Validate the stored token (if any) and classify the session.
    ///
    /// No token yields `Anonymous`. A valid token whose role the client does
    /// not render for also yields `Anonymous`; role-gated views still reject
    /// it through the guard.
    pub fn establish(token: Option<&str>, now: DateTime<Utc>) -> Result<Self, TokenValidationError> {
        let Some(token) = token else {
            return Ok(Self::Anonymous);
        };

        let claims = decode_claims(token)?;
        let user_id = validate_claims(&claims, now)?;
        let role = claims.role.as_ref().and_then(|r| r.account_role());
        let principal = Principal::new(user_id, claims);

        Ok(match role {
            Some(AccountRole::Admin) => Self::Admin(principal),
            Some(AccountRole::Doctor) => Self::Doctor(principal),
            Some(AccountRole::Patient) => Self::Patient(principal),
            None => {
                tracing::warn!(
                    user_id = %principal.user_id(),
                    role = ?principal.role(),
                    "session token carries no renderable role; treating as anonymous"
                );
                Self::Anonymous
            }
        })
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Admin(p) | Self::Doctor(p) | Self::Patient(p) => Some(p),
            Self::Anonymous => None,
        }
    }

    pub fn account_role(&self) -> Option<AccountRole> {
        match self {
            Self::Admin(_) => Some(AccountRole::Admin),
            Self::Doctor(_) => Some(AccountRole::Doctor),
            Self::Patient(_) => Some(AccountRole::Patient),
            Self::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::Duration;
    use proptest::prelude::*;

    fn token_with(payload: &serde_json::Value) -> String {
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.signature",
            URL_SAFE_NO_PAD.encode(payload.to_string())
        )
    }

    #[test]
    fn reference_token_validates() {
        let claims = validate_token(
            "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIiwicm9sZSI6ImFkbWluIn0.sig",
            Utc::now(),
        )
        .unwrap();
        assert_eq!(claims.sub.as_deref(), Some("1"));
        assert_eq!(claims.role, Some(Role::ADMIN));
    }

    #[test]
    fn malformed_token_propagates_decode_error() {
        assert_eq!(
            validate_token("notatoken", Utc::now()),
            Err(TokenValidationError::Decode(DecodeError::MissingSegment))
        );
    }

    #[test]
    fn subject_must_be_an_integer() {
        let now = Utc::now();
        for payload in [
            serde_json::json!({"role": "admin"}),
            serde_json::json!({"sub": "abc", "role": "admin"}),
            serde_json::json!({"sub": "", "role": "admin"}),
            serde_json::json!({"sub": true, "role": "admin"}),
            serde_json::json!({"sub": 1.5, "role": "admin"}),
            serde_json::json!({"sub": {}, "role": "admin"}),
            serde_json::json!({"sub": ["1"], "role": "admin"}),
        ] {
            assert_eq!(
                validate_token(&token_with(&payload), now),
                Err(TokenValidationError::InvalidSubject)
            );
        }
    }

    #[test]
    fn absent_token_is_reported() {
        assert_eq!(
            validate_stored_token(None, Utc::now()),
            Err(TokenValidationError::MissingToken)
        );
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let at_now = token_with(&serde_json::json!({"sub": "3", "exp": now.timestamp()}));
        assert!(validate_token(&at_now, now).is_ok());

        let past = token_with(&serde_json::json!({"sub": "3", "exp": now.timestamp() - 1}));
        assert!(matches!(
            validate_token(&past, now),
            Err(TokenValidationError::Expired { .. })
        ));
    }

    #[test]
    fn non_string_role_is_denied_not_undecodable() {
        let now = Utc::now();
        let token = token_with(&serde_json::json!({"sub": "1", "role": 7}));
        let claims = validate_token(&token, now).unwrap();
        assert_eq!(claims.role, None);
        assert!(!crate::role_guard(&claims, &[Role::ADMIN]));
        assert_eq!(Session::establish(Some(&token), now).unwrap(), Session::Anonymous);
    }

    #[test]
    fn unreadable_expiry_is_expired() {
        let token = token_with(&serde_json::json!({"sub": "1", "exp": "tomorrow"}));
        assert!(matches!(
            validate_token(&token, Utc::now()),
            Err(TokenValidationError::Expired { exp: 0, .. })
        ));
    }

    #[test]
    fn establish_classifies_roles() {
        let now = Utc::now();
        let exp = (now + Duration::hours(1)).timestamp();

        assert_eq!(Session::establish(None, now).unwrap(), Session::Anonymous);

        let doctor = token_with(&serde_json::json!({"sub": "9", "role": "doctor", "exp": exp}));
        let session = Session::establish(Some(&doctor), now).unwrap();
        assert!(matches!(session, Session::Doctor(_)));
        assert_eq!(session.principal().unwrap().user_id(), UserId::new(9));
        assert_eq!(
            session.principal().unwrap().expires_at().unwrap().timestamp(),
            exp
        );

        let unknown = token_with(&serde_json::json!({"sub": "9", "role": "nurse"}));
        assert_eq!(Session::establish(Some(&unknown), now).unwrap(), Session::Anonymous);

        let expired = token_with(&serde_json::json!({"sub": "9", "role": "admin", "exp": 1}));
        assert!(Session::establish(Some(&expired), now).is_err());
    }

    proptest! {
        #[test]
        fn unexpired_tokens_round_trip_their_claims(
            sub in 1i64..1_000_000,
            role in "[a-z]{1,12}",
            ahead in 0i64..10_000_000,
        ) {
            let now = Utc::now();
            let exp = now.timestamp() + ahead;
            let payload = serde_json::json!({"sub": sub.to_string(), "role": role, "exp": exp});
            let claims = validate_token(&token_with(&payload), now).unwrap();
            prop_assert_eq!(claims.sub, Some(sub.to_string()));
            prop_assert_eq!(claims.role, Some(Role::new(role)));
            prop_assert_eq!(claims.exp, Some(exp));
        }

        #[test]
        fn past_expiry_is_always_rejected(sub in 1i64..1_000_000, behind in 1i64..10_000_000) {
            let now = Utc::now();
            let payload = serde_json::json!({"sub": sub.to_string(), "exp": now.timestamp() - behind});
            let is_expired = matches!(
                validate_token(&token_with(&payload), now),
                Err(TokenValidationError::Expired { .. })
            );
            prop_assert!(is_expired);
        }
    }
}
