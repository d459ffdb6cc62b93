use thiserror::Error;

use crate::{Claims, Principal, Role, Session};

/// Role policies the gateway enforces on its routes, mirrored for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No session required.
    Public,
    AdminOnly,
    AdminAndDoctor,
    DoctorOnly,
    PatientOnly,
    PatientAndDoctor,
    AllRoles,
}

const ADMIN_ONLY: &[Role] = &[Role::ADMIN];
const ADMIN_AND_DOCTOR: &[Role] = &[Role::ADMIN, Role::DOCTOR];
const DOCTOR_ONLY: &[Role] = &[Role::DOCTOR];
const PATIENT_ONLY: &[Role] = &[Role::PATIENT];
const PATIENT_AND_DOCTOR: &[Role] = &[Role::PATIENT, Role::DOCTOR];
const ALL_ROLES: &[Role] = &[Role::ADMIN, Role::DOCTOR, Role::PATIENT];

impl Access {
    /// Roles admitted by this policy; `None` for [`Access::Public`].
    pub fn allowed_roles(self) -> Option<&'static [Role]> {
        match self {
            Self::Public => None,
            Self::AdminOnly => Some(ADMIN_ONLY),
            Self::AdminAndDoctor => Some(ADMIN_AND_DOCTOR),
            Self::DoctorOnly => Some(DOCTOR_ONLY),
            Self::PatientOnly => Some(PATIENT_ONLY),
            Self::PatientAndDoctor => Some(PATIENT_AND_DOCTOR),
            Self::AllRoles => Some(ALL_ROLES),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not signed in")]
    Unauthenticated,

    #[error("forbidden: role '{0}' may not view this page")]
    Forbidden(String),
}

/// Is the token's role in `allowed`?
///
/// Exact, case-sensitive comparison. A token without a role claim is denied
/// and the event is logged.
pub fn role_guard(claims: &Claims, allowed: &[Role]) -> bool {
    match &claims.role {
        Some(role) => allowed.contains(role),
        None => {
            tracing::warn!(sub = ?claims.sub, "session token has no role claim");
            false
        }
    }
}

/// Check a session against a page policy.
///
/// Returns the session's principal when admitted. [`Access::Public`] never
/// fails and yields `Ok(None)` for anonymous sessions.
pub fn authorize(session: &Session, access: Access) -> Result<Option<&Principal>, AuthzError> {
    let Some(allowed) = access.allowed_roles() else {
        return Ok(session.principal());
    };

    let principal = session.principal().ok_or(AuthzError::Unauthenticated)?;
    if role_guard(principal.claims(), allowed) {
        Ok(Some(principal))
    } else {
        Err(AuthzError::Forbidden(
            principal
                .role()
                .map(|r| r.as_str().to_string())
                .unwrap_or_default(),
        ))
    }
}
