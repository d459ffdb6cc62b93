//! Client-side route table.

use serde::{Serialize, Serializer};

use medportal_auth::Access;
use medportal_core::{AppointmentId, ConsultationId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Logout,
    RegisterAdmin,
    RegisterDoctor,
    RegisterPatient,
    Profile,
    ChangePassword,
    Users,
    Doctors,
    Appointments,
    NewAppointment,
    EditAppointment(AppointmentId),
    Consultations,
    NewConsultation,
    EditConsultation(ConsultationId),
    NotFound(String),
}

impl Route {
    /// Resolve a path. Anything unrecognised, including malformed ids, is
    /// [`Route::NotFound`].
    pub fn parse(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["home"] => Self::Home,
            ["login"] => Self::Login,
            ["logout"] => Self::Logout,
            ["register-admin"] => Self::RegisterAdmin,
            ["register-doctor"] => Self::RegisterDoctor,
            ["register-patient"] => Self::RegisterPatient,
            ["profile"] => Self::Profile,
            ["profile", "update-password"] => Self::ChangePassword,
            ["users"] => Self::Users,
            ["doctors"] => Self::Doctors,
            ["appointments"] => Self::Appointments,
            ["appointments", "new"] => Self::NewAppointment,
            ["appointments", id, "edit"] => match id.parse() {
                Ok(id) => Self::EditAppointment(id),
                Err(_) => Self::NotFound(path.to_string()),
            },
            ["consultations"] => Self::Consultations,
            ["consultations", "new"] => Self::NewConsultation,
            ["consultations", id, "edit"] => match id.parse() {
                Ok(id) => Self::EditConsultation(id),
                Err(_) => Self::NotFound(path.to_string()),
            },
            _ => Self::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/home".into(),
            Self::Login => "/login".into(),
            Self::Logout => "/logout".into(),
            Self::RegisterAdmin => "/register-admin".into(),
            Self::RegisterDoctor => "/register-doctor".into(),
            Self::RegisterPatient => "/register-patient".into(),
            Self::Profile => "/profile".into(),
            Self::ChangePassword => "/profile/update-password".into(),
            Self::Users => "/users".into(),
            Self::Doctors => "/doctors".into(),
            Self::Appointments => "/appointments".into(),
            Self::NewAppointment => "/appointments/new".into(),
            Self::EditAppointment(id) => format!("/appointments/{id}/edit"),
            Self::Consultations => "/consultations".into(),
            Self::NewConsultation => "/consultations/new".into(),
            Self::EditConsultation(id) => format!("/consultations/{id}/edit"),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Policy a session must satisfy before the page loads any data.
    pub fn access(&self) -> Access {
        match self {
            Self::Home
            | Self::Login
            | Self::Logout
            | Self::RegisterAdmin
            | Self::NotFound(_) => Access::Public,
            Self::RegisterDoctor | Self::Users => Access::AdminOnly,
            Self::RegisterPatient => Access::AdminAndDoctor,
            Self::Profile | Self::ChangePassword => Access::AllRoles,
            Self::Doctors => Access::PatientOnly,
            Self::Appointments | Self::Consultations => Access::PatientAndDoctor,
            Self::NewAppointment
            | Self::EditAppointment(_)
            | Self::NewConsultation
            | Self::EditConsultation(_) => Access::DoctorOnly,
        }
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_round_trip() {
        let id: ConsultationId = "65a1f0c2b3d4e5f601234567".parse().unwrap();
        for route in [
            Route::Home,
            Route::Login,
            Route::Logout,
            Route::RegisterAdmin,
            Route::RegisterDoctor,
            Route::RegisterPatient,
            Route::Profile,
            Route::ChangePassword,
            Route::Users,
            Route::Doctors,
            Route::Appointments,
            Route::NewAppointment,
            Route::EditAppointment(AppointmentId::new(3)),
            Route::Consultations,
            Route::NewConsultation,
            Route::EditConsultation(id),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn root_query_and_trailing_slash() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/users/"), Route::Users);
        assert_eq!(Route::parse("/doctors?page=2"), Route::Doctors);
    }

    #[test]
    fn unknown_and_malformed_paths_are_not_found() {
        assert_eq!(Route::parse("/nope"), Route::NotFound("/nope".into()));
        assert!(matches!(Route::parse("/appointments/abc/edit"), Route::NotFound(_)));
        assert!(matches!(Route::parse("/consultations/12/edit"), Route::NotFound(_)));
    }

    #[test]
    fn policies() {
        assert_eq!(Route::Users.access(), Access::AdminOnly);
        assert_eq!(Route::Doctors.access(), Access::PatientOnly);
        assert_eq!(Route::Appointments.access(), Access::PatientAndDoctor);
        assert_eq!(Route::NewConsultation.access(), Access::DoctorOnly);
        assert_eq!(Route::Profile.access(), Access::AllRoles);
        assert_eq!(Route::NotFound("/x".into()).access(), Access::Public);
    }
}
