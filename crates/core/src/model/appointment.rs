use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DomainError;
use crate::id::{AppointmentId, DoctorId, PatientId};
use crate::validation::{Schema, Validate, ValidationErrors};

/// Appointment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    NotPresent,
    Canceled,
    Honored,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        Self::Scheduled,
        Self::Confirmed,
        Self::NotPresent,
        Self::Canceled,
        Self::Honored,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::NotPresent => "not_present",
            Self::Canceled => "canceled",
            Self::Honored => "honored",
        }
    }
}

impl core::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| DomainError::unknown_variant("appointment status", s))
    }
}

/// Appointment owned by the appointment service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "idProgramare", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AppointmentId>,
    pub id_patient: PatientId,
    pub id_doctor: DoctorId,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
}

impl Entity for Appointment {
    type Id = AppointmentId;

    fn id(&self) -> Option<&AppointmentId> {
        self.id.as_ref()
    }
}

impl Validate for Appointment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Schema::new()
            .positive_id("idPatient", self.id_patient.get())
            .positive_id("idDoctor", self.id_doctor.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::gateway_date;
    use chrono::NaiveDate;

    #[test]
    fn status_wire_names() {
        assert_eq!(serde_json::to_string(&AppointmentStatus::NotPresent).unwrap(), "\"not_present\"");
        assert_eq!("honored".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::Honored);
        assert!("lost".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn new_appointment_omits_id() {
        let a = Appointment {
            id: None,
            id_patient: PatientId::new(1),
            id_doctor: DoctorId::new(2),
            date: gateway_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            status: AppointmentStatus::Scheduled,
        };
        assert!(a.validate().is_ok());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"{"idPatient":1,"idDoctor":2,"date":"2024-05-01T00:00:00Z","status":"scheduled"}"#
        );
    }

    #[test]
    fn rejects_unassigned_participants() {
        let a = Appointment {
            id: Some(AppointmentId::new(3)),
            id_patient: PatientId::new(0),
            id_doctor: DoctorId::new(-1),
            date: Utc::now(),
            status: AppointmentStatus::Confirmed,
        };
        assert_eq!(a.validate().unwrap_err().len(), 2);
    }
}
